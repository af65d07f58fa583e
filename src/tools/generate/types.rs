use serde::{Deserialize, Serialize};

/// Text-generation request body (Hugging Face inference format).
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest<'a> {
    pub inputs: &'a str,
    pub parameters: GenerationParameters,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationParameters {
    pub max_new_tokens: usize,
    pub num_return_sequences: usize,
    /// Only the continuation, never the echoed prompt.
    pub return_full_text: bool,
}

impl GenerationParameters {
    pub fn single(max_new_tokens: usize) -> Self {
        Self {
            max_new_tokens,
            num_return_sequences: 1,
            return_full_text: false,
        }
    }
}

/// One candidate in the endpoint's response array.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedText {
    pub generated_text: String,
}
