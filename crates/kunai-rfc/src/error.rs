use thiserror::Error;

/// RFC model and validation errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Unknown iTIP method: {0}")]
    UnknownMethod(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
