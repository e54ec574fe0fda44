use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("gemini api key not configured")]
    NotConfigured,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api call failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request timed out")]
    Timeout,

    #[error("invalid response format from api: {0}")]
    MalformedResponse(String),

    #[error("throttler is no longer accepting requests")]
    ThrottlerClosed,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error {0}")]
    Parse(String),
}

impl Error {
    pub fn config(err: impl ToString) -> Self {
        Self::Config(err.to_string())
    }

    pub fn validation(err: impl ToString) -> Self {
        Self::Validation(err.to_string())
    }

    pub fn malformed(err: impl ToString) -> Self {
        Self::MalformedResponse(err.to_string())
    }

    pub fn parse(error: impl ToString) -> Self {
        Self::Parse(error.to_string())
    }

    /// Transient failures of the remote call. Anything raised locally before
    /// a request leaves the process is final.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status { .. } | Self::Timeout | Self::MalformedResponse(_)
        )
    }
}

impl From<tokio::time::error::Elapsed> for Error {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::Timeout
    }
}
