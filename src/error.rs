//! Error type shared by every generation stage.

/// Errors raised by landmass generation.
///
/// Placement exhaustion is not an error; `World::add_continent` reports it
/// through its return value instead.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GenError>;

/// Shorthand for building an `InvalidInput` error.
pub(crate) fn invalid(msg: impl Into<String>) -> GenError {
    GenError::InvalidInput(msg.into())
}
