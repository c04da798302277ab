//! Axum route handlers for the lyric API.

use anyhow::Context;
use axum::{extract::State, http::header, response::IntoResponse};
use bytes::Bytes;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::lyrics::generator::generate_lyrics;
use crate::lyrics::request::{LyricRequest, MumblrRequest};
use crate::state::AppState;

/// POST /mumblr
///
/// Validates the body, runs one generation and returns the lyrics as plain text.
/// The body is parsed by hand so a malformed payload is reported as an internal
/// error with the detail kept in the logs.
pub async fn handle_generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let body: MumblrRequest =
        serde_json::from_slice(&body).context("Request body is not a valid JSON object")?;

    let request = LyricRequest::from_body(&body)?;

    let span = info_span!("mumblr", request_id = %Uuid::new_v4(), lines = request.line_count());
    let lyrics = generate_lyrics(state.generator.as_ref(), &state.prompt_options, &request)
        .instrument(span)
        .await?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        lyrics.text,
    ))
}
