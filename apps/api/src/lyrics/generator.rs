//! Lyric generation — the request pipeline.
//!
//! Flow: LyricRequest → build_prompt → one generation call → normalize_response.
//!
//! There is exactly one upstream call per request. Failures, including a wrong
//! line count, go back to the caller as errors and are never retried here.

use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::lyrics::builder::{build_prompt, PromptOptions};
use crate::lyrics::normalizer::{normalize_response, GeneratedLyrics};
use crate::lyrics::request::LyricRequest;

pub async fn generate_lyrics(
    generator: &dyn TextGenerator,
    options: &PromptOptions,
    request: &LyricRequest,
) -> Result<GeneratedLyrics, AppError> {
    let prompt = build_prompt(request, options);
    info!(
        "Requesting {} lyric lines from {} (mood={:?}, section={:?})",
        prompt.line_count,
        generator.model(),
        request.mood,
        request.section
    );
    debug!("Prompt:\n{}", prompt.render());

    let raw = generator.generate(&prompt.system, &prompt.user).await?;

    let lyrics = normalize_response(&raw, prompt.line_count)?;
    info!("Generated {} lyric lines", lyrics.count);

    Ok(lyrics)
}
