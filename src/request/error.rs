use thiserror::Error;

use super::steps::StepId;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Request is missing the {0} step")]
    Incomplete(StepId),

    #[error("Submission failed: {0}")]
    Submission(String),
}

pub type Result<T> = std::result::Result<T, RequestError>;
