use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Api error: {0} - {1}")]
    Api(StatusCode, String),

    #[error("Model returned no candidates")]
    EmptyResponse,

    #[error("Malformed model output: {0}")]
    Malformed(String),
}

impl GeneratorError {
    /// True for failures worth retrying as-is: the service was unreachable or
    /// answered with an error status. Malformed output needs a fresh
    /// generation instead.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, GeneratorError::Http(_) | GeneratorError::Api(_, _))
    }
}
