use thiserror::Error;

/// Failures of the answer-generation stage.
///
/// The library never produces user-facing strings from these directly;
/// [`GenerationError::user_message`] is the single mapping the
/// presentation layer uses, keeping credentials and wire detail out of
/// user output. Full detail stays available for logging via `Display`.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The generation credential is absent from the environment.
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    /// The assembled prompt exceeds the model input budget.
    /// Rejected explicitly instead of truncating context.
    #[error("prompt is {chars} characters, over the {limit} character budget")]
    PromptTooLarge { chars: usize, limit: usize },

    /// Transport-level failure: connection, TLS, timeout.
    #[error("generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("generation API returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The API answered 200 but the body was not usable.
    #[error("malformed generation response: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    /// Generic user-facing message for this failure.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingApiKey => {
                "The assistant is not configured for answer generation yet. \
                 Set GEMINI_API_KEY and try again."
            }
            Self::PromptTooLarge { .. } => {
                "That question pulled in more reference material than can be sent \
                 to the model. Please try a more specific question."
            }
            Self::Http(_) | Self::Api { .. } | Self::MalformedResponse(_) => {
                "An error occurred while generating the answer. Please try again."
            }
        }
    }
}
