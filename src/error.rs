//! Crate error type.

/// Errors produced by encoding or decoding.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("input contains a character outside {{A,C,T,G}}")]
    InvalidInput,
    #[error("bit stream ended before the expected field could be read")]
    TruncatedStream,
    #[error("corrupt stream: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
