//! Request validation — turns the loosely-typed POST body into a `LyricRequest`.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;

pub const NO_INPUT_MESSAGE: &str =
    "No lyric input: provide a non-empty 'recordings' list or 'transcription'";

/// Raw POST /mumblr body. Every field is optional and loosely typed; the
/// frontend has sent numbers inside `recordings` before.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MumblrRequest {
    pub transcription: Option<Value>,
    pub recordings: Option<Value>,
    pub mood: Option<Value>,
    pub section: Option<Value>,
    pub story: Option<Value>,
}

/// A validated request. `raw_lines` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricRequest {
    pub raw_lines: Vec<String>,
    pub mood: String,
    pub section: String,
    pub story: String,
}

impl LyricRequest {
    /// Derives the line list, preferring `recordings` over `transcription`.
    pub fn from_body(body: &MumblrRequest) -> Result<Self, AppError> {
        let recordings = body
            .recordings
            .as_ref()
            .map(recording_lines)
            .unwrap_or_default();

        let raw_lines = if !recordings.is_empty() {
            recordings
        } else {
            match body.transcription.as_ref().and_then(stringify) {
                Some(line) => vec![line],
                None => return Err(AppError::Validation(NO_INPUT_MESSAGE.to_string())),
            }
        };

        Ok(LyricRequest {
            raw_lines,
            mood: context_field(&body.mood),
            section: context_field(&body.section),
            story: context_field(&body.story),
        })
    }

    pub fn line_count(&self) -> usize {
        self.raw_lines.len()
    }
}

fn recording_lines(recordings: &Value) -> Vec<String> {
    match recordings {
        Value::Array(items) => items.iter().filter_map(stringify).collect(),
        single => stringify(single).into_iter().collect(),
    }
}

/// Single-line text form of a scalar JSON value; `None` for null, containers and blanks.
/// Runs of whitespace, newlines included, collapse to one space so a take stays one line.
fn stringify(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.split_whitespace().collect::<Vec<_>>().join(" "),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn context_field(value: &Option<Value>) -> String {
    value.as_ref().and_then(stringify).unwrap_or_default()
}
