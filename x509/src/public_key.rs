//! Subject public key models shared by both extraction strategies.

use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::Integer;
use kensa_der::Tlv;
use kensa_oid::{Industry, NamedCurve, known, resolve};

use crate::cursor::{Cursor, sequence};
use crate::error::Error;
use crate::record::{PublicKeyInfo, bits_label};

/*
RFC 8017 Appendix A.1.1
RSAPublicKey ::= SEQUENCE {
    modulus           INTEGER,  -- n
    publicExponent    INTEGER   -- e
}
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RsaPublicKey {
    modulus: Integer,
    public_exponent: Integer,
}

impl RsaPublicKey {
    /// Big-endian magnitude of the modulus, without the sign octet.
    fn modulus_bytes(&self) -> Vec<u8> {
        self.modulus.as_bigint().to_bytes_be().1
    }

    pub(crate) fn to_info(&self, industry: Industry) -> PublicKeyInfo {
        PublicKeyInfo {
            modulus: Some(self.modulus_bytes()),
            exponent: Some(self.public_exponent.to_string()),
            ..PublicKeyInfo::new(
                resolve(known::RSA_ENCRYPTION, industry),
                bits_label(self.modulus.as_bigint().bits()),
            )
        }
    }
}

impl DecodableFrom<Tlv> for RsaPublicKey {}

impl Decoder<Tlv, RsaPublicKey> for Tlv {
    type Error = Error;

    fn decode(&self) -> Result<RsaPublicKey, Self::Error> {
        let mut fields = Cursor::new(sequence(self, "RSAPublicKey")?);
        let modulus: Integer = fields.take("modulus")?.decode()?;
        let public_exponent: Integer = fields.take("public exponent")?.decode()?;
        Ok(RsaPublicKey {
            modulus,
            public_exponent,
        })
    }
}

/// Reads the PKCS#1 key carried in a subjectPublicKey BIT STRING.
pub(crate) fn rsa_public_key(key_bits: &[u8]) -> Result<RsaPublicKey, Error> {
    let tlv = kensa_der::decode(key_bits)?;
    tlv.decode()
}

/// `P-256 (secp256r1)` for curves with a SEC name, otherwise the bare name.
pub(crate) fn curve_label(curve: &NamedCurve) -> String {
    match curve.alias {
        Some(alias) => format!("{} ({})", curve.name, alias),
        None => curve.name.to_string(),
    }
}

/// An elliptic-curve key on a recognised named curve.
pub(crate) fn ec_info(
    algorithm: &str,
    curve: &NamedCurve,
    point: Option<Vec<u8>>,
    industry: Industry,
) -> PublicKeyInfo {
    PublicKeyInfo {
        curve: Some(curve_label(curve)),
        point,
        ..PublicKeyInfo::new(
            resolve(algorithm, industry),
            bits_label(u64::from(curve.bits)),
        )
    }
}
