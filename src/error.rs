use thiserror::Error;

use crate::request::RequestError;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FleetError>;
