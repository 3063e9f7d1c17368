use std::io;

#[derive(thiserror::Error, Debug)]
pub enum CheckError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("timeout")]
    Timeout,
    #[error("http error: {0}")]
    Http(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("unknown error")]
    Unknown,
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl CheckError {
    /// True for errors caused by the caller's input rather than the system.
    pub fn is_validation(&self) -> bool {
        matches!(self, CheckError::Validation(_) | CheckError::UnknownPlatform(_))
    }
}

impl From<reqwest::Error> for CheckError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CheckError::Timeout
        } else if err.is_connect() || err.is_request() {
            CheckError::Network(err.to_string())
        } else if err.is_status() || err.is_body() || err.is_decode() || err.is_redirect() {
            CheckError::Http(err.to_string())
        } else {
            CheckError::Unknown
        }
    }
}
