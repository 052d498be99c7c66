//! Visual description for image-generation prompts.

use pawntalk_domain::AppearanceSnapshot;

/// Comma-joined look of a character: gender, skin, hair, apparel, implants.
pub fn describe_appearance(appearance: &AppearanceSnapshot) -> String {
    let mut out = String::new();

    out.push_str(&format!("{} human colonist with ", appearance.gender));
    out.push_str(&format!("{} skin, ", appearance.skin_color));
    out.push_str(&format!("{} hair, ", appearance.hair));

    for item in &appearance.apparel {
        out.push_str(&format!("wearing {item}, "));
    }
    for implant in &appearance.implants {
        out.push_str(&format!("with {implant}, "));
    }

    out.trim_end_matches([',', ' ']).to_string()
}
