use chrono::{DateTime, Utc};
use kensa_codec::{Label, Pem};
use kensa_oid::Industry;
use serde::{Serialize, Serializer};

use crate::fingerprint::Fingerprints;
use crate::name::{DistinguishedName, Name};
use crate::spaced_hex;

/// Size label used whenever the key size cannot be determined.
pub const UNKNOWN: &str = "unknown";

/// Everything the engine reports about one certificate.
///
/// `valid_from <= valid_to` is not checked; the record states whatever the
/// certificate bytes say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    /// `V1`, `V2` or `V3` (stored value plus one).
    pub version: String,
    /// Uppercase hex of the serial's content octets.
    pub serial_number: String,
    pub signature_algorithm: String,
    pub issuer: DistinguishedName,
    pub subject: DistinguishedName,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    pub public_key: PublicKeyInfo,
    pub extensions: Vec<ExtensionEntry>,
    pub fingerprints: Fingerprints,
    pub raw: RawForms,
}

impl CertificateRecord {
    /// First extension entry with the given display name.
    pub fn extension(&self, name: &str) -> Option<&ExtensionEntry> {
        self.extensions.iter().find(|ext| ext.name == name)
    }

    /// Inclusive date-range check against `instant`.
    pub fn is_valid_at(&self, instant: DateTime<Utc>) -> bool {
        self.valid_from <= instant && instant <= self.valid_to
    }

    /// True for SM2 keys or SM-family signature algorithms.
    pub fn uses_national_crypto(&self) -> bool {
        self.public_key.algorithm.contains("SM2") || self.signature_algorithm.contains("SM")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionEntry {
    pub name: String,
    pub critical: bool,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyInfo {
    pub algorithm: String,
    /// `<n> bit`, or [`UNKNOWN`].
    pub size: String,
    /// RSA modulus magnitude, big-endian.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_spaced_hex"
    )]
    pub modulus: Option<Vec<u8>>,
    /// RSA public exponent in decimal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exponent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve: Option<String>,
    /// Encoded EC point as it appears in the BIT STRING.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_spaced_hex"
    )]
    pub point: Option<Vec<u8>>,
}

impl PublicKeyInfo {
    pub fn new(algorithm: impl Into<String>, size: impl Into<String>) -> Self {
        PublicKeyInfo {
            algorithm: algorithm.into(),
            size: size.into(),
            modulus: None,
            exponent: None,
            curve: None,
            point: None,
        }
    }

    pub fn unknown() -> Self {
        PublicKeyInfo::new(UNKNOWN, UNKNOWN)
    }

    pub fn modulus_hex(&self) -> Option<String> {
        self.modulus.as_deref().map(spaced_hex)
    }

    pub fn point_hex(&self) -> Option<String> {
        self.point.as_deref().map(spaced_hex)
    }
}

pub(crate) fn bits_label(bits: u64) -> String {
    format!("{} bit", bits)
}

fn serialize_spaced_hex<S: Serializer>(bytes: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
    match bytes {
        Some(bytes) => s.serialize_str(&spaced_hex(bytes)),
        None => s.serialize_none(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawForms {
    /// The input DER wrapped as a `CERTIFICATE` PEM block.
    pub pem: String,
    /// Uppercase hex of the input DER.
    pub der: String,
}

impl RawForms {
    pub fn new(der: &[u8]) -> Self {
        RawForms {
            pem: Pem::from_bytes(Label::Certificate, der).to_string(),
            der: hex::encode_upper(der),
        }
    }
}

/// Fields collected by either extraction strategy, before names are resolved.
#[derive(Debug)]
pub(crate) struct Fields {
    pub(crate) version: u64,
    pub(crate) serial_number: String,
    pub(crate) signature_algorithm: String,
    pub(crate) issuer: Name,
    pub(crate) subject: Name,
    pub(crate) valid_from: DateTime<Utc>,
    pub(crate) valid_to: DateTime<Utc>,
    pub(crate) public_key: PublicKeyInfo,
    pub(crate) extensions: Vec<ExtensionEntry>,
}

impl Fields {
    /// Resolves names for `industry`, appends industry attributes found in the
    /// subject and then the issuer, and fingerprints `der`.
    pub(crate) fn into_record(self, der: &[u8], industry: Industry) -> CertificateRecord {
        let mut extensions = self.extensions;
        extensions.extend(self.subject.industry_entries(industry));
        extensions.extend(self.issuer.industry_entries(industry));

        CertificateRecord {
            version: format!("V{}", self.version.saturating_add(1)),
            serial_number: self.serial_number,
            signature_algorithm: kensa_oid::resolve(&self.signature_algorithm, industry)
                .into_owned(),
            issuer: self.issuer.to_map(industry),
            subject: self.subject.to_map(industry),
            valid_from: self.valid_from,
            valid_to: self.valid_to,
            public_key: self.public_key,
            extensions,
            fingerprints: Fingerprints::compute(der),
            raw: RawForms::new(der),
        }
    }
}
