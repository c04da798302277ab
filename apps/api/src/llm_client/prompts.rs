// Shared prompt fragments.
// Each feature that needs LLM calls defines its own prompts.rs alongside it;
// this file holds the cross-cutting pieces.

/// Instruction that keeps the reply to bare output text.
pub const PLAIN_TEXT_ONLY: &str = "\
    Respond with the requested lines only. \
    Do NOT add titles, headings, commentary, explanations or apologies. \
    Do NOT use markdown code fences or quotation marks around lines.";
