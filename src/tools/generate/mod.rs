//! Generative-text capability used to propose selectors.

mod client;
mod types;

pub use client::HttpGenerator;
pub use types::*;

use crate::error::{Result, RevexError};
use async_trait::async_trait;

/// "Given a prompt, return one generated continuation."
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Generate exactly one candidate of at most `max_output_tokens` new tokens.
    async fn generate(&self, prompt: &str, max_output_tokens: usize) -> Result<String>;
}

/// Generator used when no model endpoint is configured. Every call reports
/// the capability as unavailable, so the pipeline runs on fallback selectors.
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn generate(&self, _prompt: &str, _max_output_tokens: usize) -> Result<String> {
        Err(RevexError::CapabilityUnavailable(
            "no model endpoint configured".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_generator_is_unavailable() {
        let err = DisabledGenerator.generate("prompt", 10).await.unwrap_err();
        assert!(matches!(err, RevexError::CapabilityUnavailable(_)));
        assert!(!err.is_fatal());
    }
}
