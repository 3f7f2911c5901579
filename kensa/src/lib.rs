//! # kensa
//!
//! Conversion traits shared by every layer of the kensa certificate decoder.
//!
//! A certificate travels through the workspace like this:
//! ```text
//! text (PEM / Base64 / hex) → Vec<u8> → Der → Tlv tree → CertificateRecord
//! ```
//!
//! Each hop is a `Decoder` implementation on the source type, guarded by a
//! `DecodableFrom` marker on the destination type. The reverse hops (used to
//! re-emit DER from a parsed tree) go through `Encoder` / `EncodableTo`.
//!
//! ```ignore
//! use kensa::decoder::Decoder;
//! use kensa_der::Der;
//!
//! let bytes = vec![0x30, 0x00];
//! let der: Der = bytes.decode().unwrap();
//! ```

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
