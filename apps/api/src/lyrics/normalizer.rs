//! Response normalization — checks the model's reply against the requested line count.
//!
//! The reply body is returned as the model wrote it (trimmed, fences removed).
//! It is only accepted if it carries exactly as many numbered lines as were sent,
//! numbered 1, 2, 3... in order.

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedLyrics {
    /// Response body sent to the client.
    pub text: String,
    /// Lyric text of each numbered line, markers removed.
    pub lines: Vec<String>,
    pub count: usize,
}

/// Strips ```text ... ``` or ``` ... ``` code fences from LLM output.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an info string such as "text" or "lyrics" on the opening fence line.
    let inner = match inner.split_once('\n') {
        Some((info, rest)) if !info.trim().contains(' ') => rest,
        _ => inner,
    };
    inner
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(inner)
        .trim()
}

/// Splits a leading `N.`, `N)` or `N:` marker into its number and the text after it.
fn numbered_line(line: &str) -> Option<(usize, &str)> {
    let line = line.trim_start();
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let number = line[..digits].parse::<usize>().ok()?;
    let mut chars = line[digits..].chars();
    match chars.next() {
        Some('.' | ')' | ':') => Some((number, chars.as_str().trim())),
        _ => None,
    }
}

/// Trims the reply and verifies it holds exactly `expected` lines numbered `1..=expected`.
///
/// On failure `actual` is how many lines followed the sequence from 1 before it broke.
pub fn normalize_response(raw: &str, expected: usize) -> Result<GeneratedLyrics, AppError> {
    let text = strip_code_fences(raw);
    if text.is_empty() {
        return Err(AppError::Upstream(
            "generation service returned an empty reply".to_string(),
        ));
    }

    let numbered: Vec<(usize, &str)> = text.lines().filter_map(numbered_line).collect();

    let in_sequence = numbered
        .iter()
        .enumerate()
        .take_while(|(i, (number, _))| *number == i + 1)
        .count();

    if in_sequence != numbered.len() || numbered.len() != expected {
        return Err(AppError::ContractViolation {
            expected,
            actual: in_sequence,
        });
    }

    let lines: Vec<String> = numbered.into_iter().map(|(_, l)| l.to_string()).collect();

    Ok(GeneratedLyrics {
        text: text.to_string(),
        count: lines.len(),
        lines,
    })
}
