use thiserror::Error;

/// Failures surfaced by the core crate.
///
/// Interaction entry points never return these; they collapse to empty
/// results instead. Only configuration and controller model resolution can
/// fail.
#[derive(Debug, Error)]
pub enum XrError {
    #[error("controller model unavailable for slot {0}")]
    ModelUnavailable(u8),
    #[error("unknown controller profile `{0}`")]
    UnknownProfile(String),
    #[error("invalid scene config: {0}")]
    InvalidConfig(&'static str),
    #[error("pixel data has {got} bytes, expected {expected}")]
    BufferSize { expected: usize, got: usize },
}

pub type XrResult<T> = Result<T, XrError>;
