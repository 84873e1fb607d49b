use thiserror::Error;

/// Errors surfaced by the comparison engine.
///
/// Malformed metric values never produce an error; they aggregate as `0`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Unreadable payload: {0}")]
    Payload(String),
}

pub type Result<T> = std::result::Result<T, CompareError>;
