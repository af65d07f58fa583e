use thiserror::Error;

pub type Result<T> = std::result::Result<T, RevexError>;

#[derive(Debug, Error)]
pub enum RevexError {
    #[error("URL parameter is required")]
    MissingParameter,
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("render failed: {0}")]
    Render(String),
    #[error("text generation unavailable: {0}")]
    CapabilityUnavailable(String),
    #[error("selector inference unavailable: {0}")]
    InferenceUnavailable(String),
    #[error("field extraction failed: {0}")]
    FieldExtraction(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("{0}")]
    Other(String),
}

impl RevexError {
    /// Fatal errors abort the whole session; everything else is absorbed
    /// where it happens.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RevexError::Render(_) | RevexError::Other(_))
    }

    /// Errors caused by the caller's input, reported before any work starts.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RevexError::MissingParameter | RevexError::InvalidUrl(_))
    }
}

/* Conversions so `?` works smoothly */
impl From<std::io::Error> for RevexError {
    fn from(e: std::io::Error) -> Self {
        RevexError::Other(e.to_string())
    }
}
impl From<serde_json::Error> for RevexError {
    fn from(e: serde_json::Error) -> Self {
        RevexError::Other(e.to_string())
    }
}
impl From<reqwest::Error> for RevexError {
    fn from(e: reqwest::Error) -> Self {
        RevexError::CapabilityUnavailable(e.to_string())
    }
}
impl From<chromiumoxide::error::CdpError> for RevexError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        RevexError::Render(e.to_string())
    }
}
