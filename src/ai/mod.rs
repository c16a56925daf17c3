pub mod gemini;
pub mod prompts;

pub use gemini::GeminiClient;

use anyhow::Result;
use async_trait::async_trait;

/// The generative text API: one prompt string in, one completion string out.
/// No schema or function-calling contract is assumed; everything downstream
/// parses raw text (see `crate::parse`).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
