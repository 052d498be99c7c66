//! Prompt assembly from character state.
//!
//! Builds the single-line instruction sent to the chat endpoint. Each clause
//! reads one attribute group; a failed read drops that clause only.

mod appearance;

pub use appearance::describe_appearance;

use pawntalk_domain::{
    AttributeError, HealthState, HungerCategory, MoodBand, MoodState, Passion, PlayLog,
    RestCategory, SubjectView, DEFAULT_MAX_PROMPT_CHARS,
};

/// Returned when there is no character to describe.
pub const FALLBACK_PROMPT: &str = "Only say the answer and nothing else. Say something.";

const PREAMBLE: &str = "Only output the spoken line, first-person, one short sentence. No narration. ";

/// Appended to any text cut at a character budget.
pub const ELLIPSIS: char = '…';

/// Tuning for [`PromptAssembler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptConfig {
    /// Character budget for the whole prompt
    pub max_chars: usize,
    /// Skills with a passion to mention
    pub top_passions: usize,
    /// Play-log lines to mention
    pub recent_events: usize,
    /// Character budget for the joined play-log lines
    pub events_max_chars: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_PROMPT_CHARS,
            top_passions: 2,
            recent_events: 3,
            events_max_chars: 220,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromptAssembler {
    config: PromptConfig,
}

impl PromptAssembler {
    pub fn new(config: PromptConfig) -> Self {
        Self { config }
    }

    pub fn with_max_chars(max_chars: usize) -> Self {
        Self::new(PromptConfig {
            max_chars,
            ..PromptConfig::default()
        })
    }

    /// Build the prompt for `subject`, or [`FALLBACK_PROMPT`] without one.
    pub fn assemble(&self, subject: Option<&dyn SubjectView>, log: Option<&dyn PlayLog>) -> String {
        let Some(subject) = subject else {
            return FALLBACK_PROMPT.to_string();
        };

        let name = subject.label();
        let mut out = String::with_capacity(512);

        out.push_str(PREAMBLE);

        out.push_str("You are ");
        out.push_str(&name);
        if let Some(faction) = clause("faction", subject.faction()).flatten() {
            out.push_str(" of ");
            out.push_str(&faction);
        }
        out.push_str(". ");

        let clauses = [
            ("Personality", self.personality(subject)),
            ("Passions", self.passions(subject)),
            ("Health", self.health(subject)),
            ("Mood", self.mood(subject)),
            ("Recent events", self.recent_events(subject, log)),
        ];
        for (heading, body) in clauses {
            if let Some(body) = body.filter(|b| !b.is_empty()) {
                out.push_str(heading);
                out.push_str(": ");
                out.push_str(&body);
                out.push_str(". ");
            }
        }

        out.push_str("Make \"");
        out.push_str(&name);
        out.push_str("\" say something appropriate.");

        truncate_chars(&sanitize(&out), self.config.max_chars)
    }

    fn personality(&self, subject: &dyn SubjectView) -> Option<String> {
        let mut bits = Vec::new();

        let backstories = clause("backstories", subject.backstories())?;
        if let Some(title) = backstories.childhood.filter(|t| !t.is_empty()) {
            bits.push(format!("childhood: {title}"));
        }
        if let Some(title) = backstories.adulthood.filter(|t| !t.is_empty()) {
            bits.push(format!("adulthood: {title}"));
        }

        let mut traits = clause("traits", subject.traits())?;
        traits.sort_by_key(|t| std::cmp::Reverse(t.degree.unsigned_abs()));
        let top: Vec<String> = traits.into_iter().take(2).map(|t| t.label).collect();
        if !top.is_empty() {
            bits.push(format!("traits: {}", top.join(", ")));
        }

        Some(bits.join("; "))
    }

    fn passions(&self, subject: &dyn SubjectView) -> Option<String> {
        let mut skills: Vec<_> = clause("skills", subject.skills())??
            .into_iter()
            .filter(|s| s.passion > Passion::None)
            .collect();
        skills.sort_by(|a, b| b.level.cmp(&a.level).then(b.passion.cmp(&a.passion)));

        let top: Vec<String> = skills
            .into_iter()
            .take(self.config.top_passions.max(1))
            .map(|s| match s.passion {
                Passion::Major => format!("{} (major)", s.label),
                _ => format!("{} (minor)", s.label),
            })
            .collect();

        (!top.is_empty()).then(|| top.join(", "))
    }

    fn health(&self, subject: &dyn SubjectView) -> Option<String> {
        let health = clause("health", subject.health())??;
        Some(summarize_health(&health))
    }

    fn mood(&self, subject: &dyn SubjectView) -> Option<String> {
        let mood = clause("mood", subject.mood())??;
        Some(summarize_mood(&mood))
    }

    fn recent_events(&self, subject: &dyn SubjectView, log: Option<&dyn PlayLog>) -> Option<String> {
        let entries = clause("play_log", log?.entries())?;
        let id = subject.id();

        let mut recent: Vec<String> = entries
            .into_iter()
            .rev()
            .filter(|e| e.concerns(&id))
            .take(self.config.recent_events.max(1))
            .filter_map(|e| e.text.filter(|t| !t.is_empty()))
            .collect();
        recent.reverse();

        let joined = recent.join(" | ");
        if joined.is_empty() {
            return None;
        }
        Some(truncate_chars(&joined, self.config.events_max_chars))
    }
}

fn summarize_health(health: &HealthState) -> String {
    let mut bits = Vec::new();

    if health.pain > 0.01 {
        bits.push(format!("pain {}", to_percent(health.pain)));
    }
    if health.bleed_rate > 0.0 {
        bits.push("bleeding".to_string());
    }

    let mut notable: Vec<&str> = Vec::new();
    for condition in health.conditions.iter().filter(|c| c.is_notable()) {
        if notable.len() == 3 {
            break;
        }
        if !notable.contains(&condition.label.as_str()) {
            notable.push(&condition.label);
        }
    }
    if !notable.is_empty() {
        bits.push(notable.join(", "));
    }

    if health.rest.is_some_and(|r| r != RestCategory::Rested) {
        bits.push("tired".to_string());
    }
    if health.food.is_some_and(|f| f != HungerCategory::Fed) {
        bits.push("hungry".to_string());
    }

    if bits.is_empty() {
        "stable".to_string()
    } else {
        bits.join("; ")
    }
}

fn summarize_mood(mood: &MoodState) -> String {
    let band = MoodBand::from_level(mood.level);

    // First of equals wins.
    let strongest = mood.memories.iter().reduce(|best, m| {
        if m.mood_offset.abs() > best.mood_offset.abs() {
            m
        } else {
            best
        }
    });

    match strongest {
        Some(memory) => format!("{} ({})", band, memory.label),
        None => band.to_string(),
    }
}

fn to_percent(fraction: f32) -> String {
    format!("{}%", (fraction.clamp(0.0, 1.0) * 100.0).round_ties_even() as u32)
}

/// Unwrap an attribute read, logging and dropping failures.
fn clause<T>(attribute: &'static str, read: Result<T, AttributeError>) -> Option<T> {
    match read {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(attribute, error = %e, "Attribute unreadable, clause omitted");
            None
        }
    }
}

/// CR/LF to spaces, collapse space runs, trim.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let c = if c == '\r' || c == '\n' { ' ' } else { c };
        if c == ' ' && out.ends_with(' ') {
            continue;
        }
        out.push(c);
    }
    out.trim().to_string()
}

/// Cut to `max` characters and append [`ELLIPSIS`] when longer.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => {
            let mut out = text[..cut].to_string();
            out.push(ELLIPSIS);
            out
        }
        None => text.to_string(),
    }
}
