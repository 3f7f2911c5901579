//! Extension-specific error types

use thiserror::Error;

/// Which extension decoder raised the error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    BasicConstraints,
    KeyUsage,
    SubjectKeyIdentifier,
    AuthorityKeyIdentifier,
    SubjectAltName,
    ExtendedKeyUsage,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BasicConstraints => write!(f, "BasicConstraints"),
            Self::KeyUsage => write!(f, "KeyUsage"),
            Self::SubjectKeyIdentifier => write!(f, "SubjectKeyIdentifier"),
            Self::AuthorityKeyIdentifier => write!(f, "AuthorityKeyIdentifier"),
            Self::SubjectAltName => write!(f, "SubjectAltName"),
            Self::ExtendedKeyUsage => write!(f, "ExtendedKeyUsage"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("{0}: expected SEQUENCE")]
    ExpectedSequence(Kind),

    #[error("{0}: unexpected element type")]
    UnexpectedElementType(Kind),

    #[error("BasicConstraints: pathLenConstraint out of range for u32")]
    PathLenConstraintOutOfRange,

    #[error("{kind}: {source}")]
    Asn1 {
        kind: Kind,
        #[source]
        source: kensa_asn1::Error,
    },
}

impl Error {
    pub(crate) fn asn1(kind: Kind) -> impl FnOnce(kensa_asn1::Error) -> Error {
        move |source| Error::Asn1 { kind, source }
    }
}
