use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{ObjectIdentifier, boolean, octet_string};
use kensa_der::{Tag, Tlv};
use kensa_oid::{Industry, resolve};
use tracing::{debug, warn};

use crate::cursor::{Cursor, sequence};
use crate::record::ExtensionEntry;
use crate::spaced_hex;

mod authority_key_identifier;
mod basic_constraints;
pub mod error;
mod extended_key_usage;
mod generic;
mod key_usage;
mod subject_alt_name;
mod subject_key_identifier;

pub use authority_key_identifier::AuthorityKeyIdentifier;
pub use basic_constraints::BasicConstraints;
pub use error::{Error, Kind};
pub use extended_key_usage::ExtendedKeyUsage;
pub use key_usage::KeyUsage;
pub use subject_alt_name::{GeneralName, SubjectAltName};
pub use subject_key_identifier::SubjectKeyIdentifier;

/// A typed X.509 v3 extension.
///
/// `parse` receives the DER node carried inside the extension's OCTET
/// STRING. `describe` produces the display text; it takes the industry
/// because some values contain OIDs or names that resolve differently.
pub trait Extension: Sized {
    /// Dotted OID this type decodes (e.g. "2.5.29.19" for BasicConstraints)
    const OID: &'static str;

    fn parse(value: &Tlv) -> Result<Self, Error>;

    fn describe(&self, industry: Industry) -> String;
}

fn render<T: Extension>(value: &Tlv, industry: Industry) -> Result<String, Error> {
    Ok(T::parse(value)?.describe(industry))
}

/// Best-effort rendering for values that could not be decoded.
pub(crate) fn raw_description(oid: &str, value: &[u8]) -> String {
    format!("OID: {}\nHex: {}", oid, spaced_hex(value))
}

/// Display text for one extension value. Never fails: undecodable values
/// degrade to the OID and a hex dump.
pub fn describe(oid: &str, value: &[u8], industry: Industry) -> String {
    let tlv = match kensa_der::decode(value) {
        Ok(tlv) => tlv,
        Err(e) => {
            debug!(%oid, error = %e, "extension value is not DER");
            return raw_description(oid, value);
        }
    };
    let rendered = match oid {
        KeyUsage::OID => render::<KeyUsage>(&tlv, industry),
        BasicConstraints::OID => render::<BasicConstraints>(&tlv, industry),
        SubjectKeyIdentifier::OID => render::<SubjectKeyIdentifier>(&tlv, industry),
        AuthorityKeyIdentifier::OID => render::<AuthorityKeyIdentifier>(&tlv, industry),
        SubjectAltName::OID => render::<SubjectAltName>(&tlv, industry),
        ExtendedKeyUsage::OID => render::<ExtendedKeyUsage>(&tlv, industry),
        _ => return generic::describe(oid, &tlv, industry),
    };
    rendered.unwrap_or_else(|e| {
        warn!(%oid, error = %e, "failed to decode extension");
        raw_description(oid, value)
    })
}

/*
RFC 5280 Section 4.1.2.9

Extension  ::=  SEQUENCE  {
    extnID      OBJECT IDENTIFIER,
    critical    BOOLEAN DEFAULT FALSE,
    extnValue   OCTET STRING
}
*/

/// An extension before its value is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExtension {
    oid: ObjectIdentifier,
    critical: bool,
    value: Vec<u8>,
}

impl RawExtension {
    pub fn oid(&self) -> &ObjectIdentifier {
        &self.oid
    }

    pub fn critical(&self) -> bool {
        self.critical
    }

    /// Content of the extnValue OCTET STRING.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn to_entry(&self, industry: Industry) -> ExtensionEntry {
        let oid = self.oid.to_string();
        ExtensionEntry {
            name: resolve(&oid, industry).into_owned(),
            critical: self.critical,
            value: describe(&oid, &self.value, industry),
        }
    }
}

impl DecodableFrom<Tlv> for RawExtension {}

impl Decoder<Tlv, RawExtension> for Tlv {
    type Error = crate::error::Error;

    fn decode(&self) -> Result<RawExtension, Self::Error> {
        let mut fields = Cursor::new(sequence(self, "extension")?);
        let oid: ObjectIdentifier = fields.take("extension id")?.decode()?;
        // only an explicit BOOLEAN whose first octet is 0xFF marks the extension critical
        let critical = match fields.take_if(|t| t.tag() == Tag::BOOLEAN) {
            Some(flag) => boolean(flag)?,
            None => false,
        };
        let value = octet_string(fields.take("extension value")?)?.to_vec();
        Ok(RawExtension {
            oid,
            critical,
            value,
        })
    }
}
