use nom::error::{ErrorKind, ParseError};
use thiserror::Error;

/// Structural failures while reading DER tag/length/value triples.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("empty input")]
    Empty,
    #[error("truncated tag")]
    TruncatedTag,
    #[error("tag number does not fit in 32 bits")]
    TagNumberOverflow,
    #[error("truncated length")]
    TruncatedLength,
    #[error("indefinite length is not allowed in DER")]
    IndefiniteLength,
    #[error("length field of {0} octets is too large")]
    LengthTooLarge(u8),
    #[error("declared length {declared} exceeds remaining {remaining} bytes")]
    LengthOverrun { declared: usize, remaining: usize },
    #[error("constructed values nested deeper than {0} levels")]
    NestingTooDeep(usize),
    #[error("parser error {0:?}")]
    Parser(ErrorKind),
    #[error("parser incomplete: {0:?}")]
    ParserIncomplete(nom::Needed),
}

impl<I> ParseError<I> for Error {
    fn from_error_kind(_input: I, kind: ErrorKind) -> Self {
        Error::Parser(kind)
    }

    fn append(_input: I, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl From<nom::Err<Error>> for Error {
    fn from(err: nom::Err<Error>) -> Self {
        match err {
            nom::Err::Incomplete(needed) => Error::ParserIncomplete(needed),
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
        }
    }
}
