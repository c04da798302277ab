//! Prompt building — renders a `LyricRequest` into the system and user messages.
//!
//! The required line count appears in both messages. Models follow counting
//! constraints unreliably, so the repetition stays.

use crate::llm_client::prompts::PLAIN_TEXT_ONLY;
use crate::lyrics::prompts::{EMPTY_FIELD, LYRICS_SYSTEM_TEMPLATE, LYRICS_USER_TEMPLATE};
use crate::lyrics::request::LyricRequest;
use crate::lyrics::syllables::annotate;

/// Knobs that change how the prompt is rendered.
#[derive(Debug, Clone, Copy)]
pub struct PromptOptions {
    /// Append `(~N syllables)` to each raw line.
    pub syllable_hints: bool,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            syllable_hints: true,
        }
    }
}

/// The two messages sent to the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub line_count: usize,
}

impl Prompt {
    /// Both role blocks as one instruction string.
    pub fn render(&self) -> String {
        format!("[system]\n{}\n\n[user]\n{}", self.system, self.user)
    }
}

pub fn build_prompt(request: &LyricRequest, options: &PromptOptions) -> Prompt {
    let line_count = request.line_count();
    let count = line_count.to_string();

    let numbered_lines: Vec<String> = if options.syllable_hints {
        annotate(&request.raw_lines)
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let unit = if line.syllable_estimate == 1 {
                    "syllable"
                } else {
                    "syllables"
                };
                format!("{}. {} (~{} {unit})", i + 1, line.text, line.syllable_estimate)
            })
            .collect()
    } else {
        request
            .raw_lines
            .iter()
            .enumerate()
            .map(|(i, line)| format!("{}. {line}", i + 1))
            .collect()
    };
    let numbered_lines = numbered_lines.join("\n");

    let system = LYRICS_SYSTEM_TEMPLATE
        .replace("{plain_text_only}", PLAIN_TEXT_ONLY)
        .replace("{line_count}", &count);

    // Raw lines go in last so a literal "{line_count}" sung by the user is left alone.
    let user = LYRICS_USER_TEMPLATE
        .replace("{line_count}", &count)
        .replace("{mood}", or_none(&request.mood))
        .replace("{section}", or_none(&request.section))
        .replace("{story}", or_none(&request.story))
        .replace("{numbered_lines}", &numbered_lines);

    Prompt {
        system,
        user,
        line_count,
    }
}

fn or_none(field: &str) -> &str {
    if field.is_empty() {
        EMPTY_FIELD
    } else {
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::request::MumblrRequest;
    use serde_json::json;

    fn request(lines: &[&str]) -> LyricRequest {
        LyricRequest {
            raw_lines: lines.iter().map(|l| l.to_string()).collect(),
            mood: String::new(),
            section: String::new(),
            story: String::new(),
        }
    }

    #[test]
    fn test_line_count_appears_in_both_blocks() {
        for n in [1usize, 2, 7, 12] {
            let lines: Vec<String> = (0..n).map(|i| format!("line number {i}")).collect();
            let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
            let prompt = build_prompt(&request(&lines), &PromptOptions::default());

            assert_eq!(prompt.line_count, n);
            assert!(prompt.system.contains(&format!("EXACTLY {n} lines")));
            assert!(prompt.user.contains(&format!("exactly {n} numbered lines")));
            assert!(prompt.render().contains(&n.to_string()));
        }
    }

    #[test]
    fn test_raw_lines_are_numbered_with_syllable_hints() {
        let prompt = build_prompt(
            &request(&["hey there sugar", "love"]),
            &PromptOptions::default(),
        );
        assert!(prompt.user.contains("1. hey there sugar (~4 syllables)"));
        assert!(prompt.user.contains("2. love (~1 syllable)"));
    }

    #[test]
    fn test_syllable_hints_can_be_disabled() {
        let prompt = build_prompt(
            &request(&["hey there sugar"]),
            &PromptOptions {
                syllable_hints: false,
            },
        );
        assert!(prompt.user.contains("1. hey there sugar\n"));
        assert!(!prompt.user.contains("syllable"));
    }

    #[test]
    fn test_empty_context_renders_none() {
        let prompt = build_prompt(&request(&["oh baby why"]), &PromptOptions::default());
        assert!(prompt.user.contains("Mood: (none)"));
        assert!(prompt.user.contains("Section: (none)"));
        assert!(prompt.user.contains("Story: (none)"));
    }

    #[test]
    fn test_context_fields_are_included() {
        let mut req = request(&["hey there sugar", "what did you do"]);
        req.mood = "Breakup & Heartbreak".to_string();
        req.section = "Verse".to_string();
        req.story = "She left in June".to_string();

        let prompt = build_prompt(&req, &PromptOptions::default());
        assert!(prompt.user.contains("Mood: Breakup & Heartbreak"));
        assert!(prompt.user.contains("Section: Verse"));
        assert!(prompt.user.contains("Story: She left in June"));
    }

    #[test]
    fn test_system_block_carries_hard_constraints() {
        let prompt = build_prompt(&request(&["a line"]), &PromptOptions::default());
        assert!(prompt.system.contains("NEVER merge"));
        assert!(prompt.system.contains("+/-1"));
        assert!(prompt.system.contains(PLAIN_TEXT_ONLY));
        assert!(!prompt.system.contains("{line_count}"));
    }

    #[test]
    fn test_multiline_recording_is_one_numbered_prompt_line() {
        let body: MumblrRequest =
            serde_json::from_value(json!({"recordings": ["line one\nline two"]})).unwrap();
        let req = LyricRequest::from_body(&body).unwrap();
        let prompt = build_prompt(&req, &PromptOptions::default());

        assert_eq!(prompt.line_count, 1);
        assert!(prompt.user.contains("1. line one line two (~4 syllables)\n\nMood:"));
        assert!(!prompt.user.lines().any(|l| l.starts_with("line two")));
    }

    #[test]
    fn test_placeholder_text_in_user_input_is_not_expanded() {
        let prompt = build_prompt(&request(&["sing {line_count} times"]), &PromptOptions::default());
        assert!(prompt.user.contains("sing {line_count} times"));
    }
}
