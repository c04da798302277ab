// Lyric generation: request validation, prompt building, the upstream call
// and reply checking. All LLM calls go through llm_client.

pub mod builder;
pub mod generator;
pub mod handlers;
pub mod normalizer;
pub mod prompts;
pub mod request;
pub mod syllables;
