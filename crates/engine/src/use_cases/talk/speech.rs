//! Display formatting for generated lines.

use crate::use_cases::prompt::truncate_chars;

/// Longest speech bubble before it is cut.
pub const BUBBLE_MAX_CHARS: usize = 120;

/// Shown when a reply trims to nothing.
pub const EMPTY_REPLY: &str = "(...)";

/// Bubble text: cut to [`BUBBLE_MAX_CHARS`] plus ellipsis, single line.
pub fn bubble_text(text: &str) -> String {
    truncate_chars(text, BUBBLE_MAX_CHARS).replace(['\r', '\n'], " ")
}

/// Line written to the host's play log.
pub fn play_log_line(name: &str, text: &str) -> String {
    format!("{name}: {text}")
}

/// Trimmed reply, or [`EMPTY_REPLY`] when nothing is left.
pub fn normalize_reply(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        EMPTY_REPLY.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_bubble_is_cut_and_flattened() {
        let text = format!("{}\n{}", "a".repeat(100), "b".repeat(100));
        let bubble = bubble_text(&text);
        assert_eq!(bubble.chars().count(), BUBBLE_MAX_CHARS + 1);
        assert!(bubble.ends_with('…'));
        assert!(!bubble.contains('\n'));
    }

    #[test]
    fn blank_reply_becomes_placeholder() {
        assert_eq!(normalize_reply("  \n "), "(...)");
        assert_eq!(normalize_reply("  Hello.  "), "Hello.");
    }
}
