use std::fmt;

use anyhow::{bail, Context, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Sampling temperature used when creative mode is off.
pub const CONSERVATIVE_TEMPERATURE: f32 = 0.4;
/// Sampling temperature used when creative mode is on.
pub const CREATIVE_TEMPERATURE: f32 = 0.8;

/// Application configuration loaded from environment variables.
/// Built once at startup and read-only afterwards; refuses to build without an API key.
#[derive(Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model: String,
    pub creative_mode: bool,
    pub temperature: f32,
    pub seed: Option<i64>,
    pub max_tokens: u32,
    pub upstream_timeout_secs: u64,
    pub syllable_hints: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = require_var(&lookup, "OPENAI_API_KEY")?;

        let creative_mode = optional_var(&lookup, "MUMBLR_CREATIVE")
            .map(|v| parse_bool("MUMBLR_CREATIVE", &v))
            .transpose()?
            .unwrap_or(false);

        let temperature = match optional_var(&lookup, "MUMBLR_TEMPERATURE") {
            Some(raw) => {
                let t = raw
                    .parse::<f32>()
                    .context("MUMBLR_TEMPERATURE must be a number")?;
                if !(0.0..=2.0).contains(&t) {
                    bail!("MUMBLR_TEMPERATURE must be between 0.0 and 2.0, got {t}");
                }
                t
            }
            None if creative_mode => CREATIVE_TEMPERATURE,
            None => CONSERVATIVE_TEMPERATURE,
        };

        let seed = optional_var(&lookup, "MUMBLR_SEED")
            .map(|v| v.parse::<i64>().context("MUMBLR_SEED must be an integer"))
            .transpose()?;

        let syllable_hints = optional_var(&lookup, "MUMBLR_SYLLABLE_HINTS")
            .map(|v| parse_bool("MUMBLR_SYLLABLE_HINTS", &v))
            .transpose()?
            .unwrap_or(true);

        let max_tokens = optional_var(&lookup, "MUMBLR_MAX_TOKENS")
            .unwrap_or_else(|| "512".to_string())
            .parse::<u32>()
            .context("MUMBLR_MAX_TOKENS must be a positive integer")?;
        if max_tokens == 0 {
            bail!("MUMBLR_MAX_TOKENS must be a positive integer, got 0");
        }

        let upstream_timeout_secs = optional_var(&lookup, "MUMBLR_UPSTREAM_TIMEOUT_SECS")
            .unwrap_or_else(|| "60".to_string())
            .parse::<u64>()
            .context("MUMBLR_UPSTREAM_TIMEOUT_SECS must be a whole number of seconds")?;
        if upstream_timeout_secs == 0 {
            bail!("MUMBLR_UPSTREAM_TIMEOUT_SECS must be at least 1 second, got 0");
        }

        Ok(Config {
            openai_api_key,
            openai_base_url: optional_var(&lookup, "OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: optional_var(&lookup, "OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            creative_mode,
            temperature,
            seed,
            max_tokens,
            upstream_timeout_secs,
            syllable_hints,
            port: optional_var(&lookup, "PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_var(&lookup, "RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

// The API key must never reach the logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("model", &self.model)
            .field("creative_mode", &self.creative_mode)
            .field("temperature", &self.temperature)
            .field("seed", &self.seed)
            .field("max_tokens", &self.max_tokens)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("syllable_hints", &self.syllable_hints)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

fn require_var<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional_var(lookup, key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats blank values the same as unset ones.
fn optional_var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{key} must be a boolean (true/false), got '{other}'"),
    }
}
