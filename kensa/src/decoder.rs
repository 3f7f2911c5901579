//! Decoder trait for type-safe conversions.
//!
//! `Decoder<T, D>` converts a source `T` into a destination `D`. The
//! destination must opt in with `DecodableFrom<T>`, so only conversions that
//! a crate deliberately declares can be written as `source.decode()`.
//!
//! # Implementing
//!
//! ```no_run
//! use kensa::decoder::{DecodableFrom, Decoder};
//!
//! struct Hex(String);
//! struct Bytes(Vec<u8>);
//!
//! #[derive(Debug)]
//! struct BadHex;
//!
//! impl DecodableFrom<Hex> for Bytes {}
//!
//! impl Decoder<Hex, Bytes> for Hex {
//!     type Error = BadHex;
//!
//!     fn decode(&self) -> Result<Bytes, Self::Error> {
//!         if self.0.len() % 2 != 0 {
//!             return Err(BadHex);
//!         }
//!         Ok(Bytes(self.0.as_bytes().to_vec()))
//!     }
//! }
//! ```
//!
//! # Where it is used
//!
//! - `kensa-der`: `Vec<u8>` / `&[u8]` → `Der`
//! - `kensa-asn1`: `Tlv` → `ObjectIdentifier`, `Integer`, `BitString`, ...
//! - `kensa-codec`: `Pem` → `Vec<u8>`
//! - `kensa-x509`: `Der` → `CertificateRecord`

/// Converts `T` into `D`.
///
/// Implemented on the source type. `D` must implement `DecodableFrom<T>`.
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into `D`.
    ///
    /// # Errors
    ///
    /// Returns an error when `self` does not hold a valid encoding of `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait declaring that `D` can be decoded from `T`.
///
/// It has no methods. Without it any type could claim to decode into any
/// other type; with it the compiler rejects undeclared conversions.
pub trait DecodableFrom<T> {}
