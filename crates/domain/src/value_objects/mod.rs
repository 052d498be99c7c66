//! Value objects - Immutable objects defined by their attributes

mod mood;
mod secret_token;
mod settings;

pub use mood::{HungerCategory, MoodBand, RestCategory};
pub use secret_token::{SecretToken, MASK_CHAR, MAX_MASK_LEN};
pub use settings::{
    TalkSettings, DEFAULT_MAX_PROMPT_CHARS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_MS,
};
