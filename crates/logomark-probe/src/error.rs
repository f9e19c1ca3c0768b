use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe unavailable: {0}")]
    Unavailable(String),
    #[error("invalid probe setting: {0}")]
    InvalidSetting(String),
    #[cfg(feature = "http-probe")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
