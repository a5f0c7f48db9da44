//! Parse errors for the textual forms of protocol types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid hex: {0}")]
    Hex(String),

    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}
