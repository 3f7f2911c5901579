use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] kensa_codec::Error),
    #[error("malformed ASN.1: {0}")]
    MalformedAsn1(#[from] kensa_der::Error),
    #[error("invalid ASN.1 value: {0}")]
    InvalidAsn1(#[from] kensa_asn1::Error),
    #[error("invalid extension: {0}")]
    InvalidExtension(#[from] crate::extensions::Error),

    /// The typed model has no representation for this key. Callers fall
    /// back to the manual walker on this variant only.
    #[error("unsupported public key algorithm: {oid}")]
    UnsupportedKeyAlgorithm { oid: String },

    #[error("{field}: expected {expected}")]
    UnexpectedElement {
        field: &'static str,
        expected: &'static str,
    },
    #[error("missing {0}")]
    MissingField(&'static str),
    #[error("invalid version: {0}")]
    InvalidVersion(String),

    #[error("failed to read certificate file: {0}")]
    Io(#[from] std::io::Error),
}
