use thiserror::Error;

/// Failures talking to an upstream places API
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Upstream answered with a non-success HTTP status
    #[error("HTTP {0}")]
    Status(u16),

    /// Upstream answered 2xx but reported an error in its payload
    #[error("{0}")]
    Upstream(String),

    /// Upstream answered 2xx with a status code other than `OK` and no message
    #[error("returned status {0}")]
    UnexpectedStatus(String),

    /// The request never produced a usable response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        match err.status() {
            Some(status) => Self::Status(status.as_u16()),
            None => Self::Transport(err.to_string()),
        }
    }
}
