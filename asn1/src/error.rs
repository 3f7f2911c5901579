//! Error types for ASN.1 primitive decoding.

use kensa_der::Tag;
use thiserror::Error;

/// Errors that can occur while interpreting a DER node as an ASN.1 value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("expected {expected}, got {actual}")]
    UnexpectedTag { expected: Tag, actual: Tag },
    #[error("{0} is constructed, expected primitive content")]
    NotPrimitive(Tag),

    // Boolean errors
    #[error("BOOLEAN: invalid encoding")]
    InvalidBoolean,

    // Integer errors
    #[error("INTEGER: no data")]
    IntegerNoData,

    // ObjectIdentifier errors
    #[error("OBJECT IDENTIFIER: no data")]
    ObjectIdentifierNoData,
    #[error("OBJECT IDENTIFIER: incomplete encoding")]
    ObjectIdentifierIncompleteEncoding,
    #[error("OBJECT IDENTIFIER: component overflows 64 bits")]
    ObjectIdentifierOverflow,

    // BitString errors
    #[error("BIT STRING: no data")]
    BitStringNoData,
    #[error("BIT STRING: unused bits {0} out of range (must be 0-7)")]
    BitStringUnusedBitsOutOfRange(u8),

    // Time errors
    #[error("UTCTime: invalid format")]
    UtcTimeInvalidFormat,
    #[error("GeneralizedTime: invalid format")]
    GeneralizedTimeInvalidFormat,
}
