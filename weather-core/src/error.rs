use thiserror::Error;

pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a valid city or country name.";
pub const NOT_FOUND_FALLBACK: &str = "City not found";

/// Failures of a weather lookup. The display text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// Rejected locally, no request was made.
    #[error("{0}")]
    Validation(String),

    /// The provider answered with a non-success status.
    #[error("{0}")]
    NotFound(String),

    /// The request failed or the body could not be read.
    #[error("{0}")]
    Transport(String),
}

impl WeatherError {
    pub fn empty_query() -> Self {
        WeatherError::Validation(EMPTY_QUERY_MESSAGE.to_string())
    }

    /// Use the provider's message when it sent one.
    pub fn not_found(provider_message: Option<String>) -> Self {
        let message = provider_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| NOT_FOUND_FALLBACK.to_string());
        WeatherError::NotFound(message)
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        WeatherError::Transport(err.to_string())
    }
}
