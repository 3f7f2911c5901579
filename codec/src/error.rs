use thiserror::Error;

use crate::Format;

/// Errors raised while detecting or converting certificate encodings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Nothing but whitespace was supplied
    #[error("input is empty")]
    EmptyInput,

    /// The text is not a valid encoding of the claimed format
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// The text matches none of PEM, hex or Base64
    #[error("could not detect the input format")]
    UnrecognizedFormat,

    /// No `-----BEGIN <label>-----` line was found
    #[error("missing a pre encapsulation boundary")]
    MissingBeginMarker,

    /// The `-----END <label>-----` line is missing
    #[error("missing a post encapsulation boundary")]
    MissingEndMarker,

    /// BEGIN and END labels differ
    #[error("label doesn't match: BEGIN {begin}, END {end}")]
    LabelMismatch { begin: String, end: String },

    #[error("conversion from {from} to {to} is not supported")]
    UnsupportedConversion { from: Format, to: Format },

    #[error("source and target format are both {0}")]
    SameFormat(Format),
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::InvalidFormat(format!("invalid base64: {}", e))
    }
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Error::InvalidFormat(format!("invalid hex: {}", e))
    }
}
