//! Encoder trait, the reverse direction of [`crate::decoder::Decoder`].
//!
//! Used to re-emit DER bytes from a decoded TLV tree and to wrap DER back
//! into PEM text.

/// Converts `T` into `E`.
///
/// Implemented on the source type. `E` must implement `EncodableTo<T>`.
pub trait Encoder<T, E: EncodableTo<T>> {
    type Error;

    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait declaring that `E` can be encoded from `T`.
pub trait EncodableTo<T> {}
