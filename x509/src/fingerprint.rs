use md5::Md5;
use serde::Serialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Digests of the exact DER bytes handed to the decoder, as uppercase hex
/// without separators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fingerprints {
    pub md5: String,
    pub sha1: String,
    pub sha256: String,
}

impl Fingerprints {
    pub fn compute(der: &[u8]) -> Self {
        Fingerprints {
            md5: hex::encode_upper(Md5::digest(der)),
            sha1: hex::encode_upper(Sha1::digest(der)),
            sha256: hex::encode_upper(Sha256::digest(der)),
        }
    }
}
