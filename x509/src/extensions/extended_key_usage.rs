use kensa::decoder::Decoder;
use kensa_asn1::ObjectIdentifier;
use kensa_der::{Tag, Tlv};
use kensa_oid::{Industry, resolve};

use super::error::{Error, Kind};
use super::Extension;

/*
RFC 5280 Section 4.2.1.12
ExtendedKeyUsage ::= SEQUENCE SIZE (1..MAX) OF KeyPurposeId
KeyPurposeId ::= OBJECT IDENTIFIER
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedKeyUsage {
    pub purposes: Vec<ObjectIdentifier>,
}

impl ExtendedKeyUsage {
    pub fn contains(&self, oid: &str) -> bool {
        self.purposes.iter().any(|p| p.to_string() == oid)
    }
}

impl Extension for ExtendedKeyUsage {
    const OID: &'static str = kensa_oid::known::EXTENDED_KEY_USAGE;

    fn parse(value: &Tlv) -> Result<Self, Error> {
        if value.tag() != Tag::SEQUENCE {
            return Err(Error::ExpectedSequence(Kind::ExtendedKeyUsage));
        }
        let purposes = value
            .children()
            .unwrap_or_default()
            .iter()
            .map(|child| child.decode().map_err(Error::asn1(Kind::ExtendedKeyUsage)))
            .collect::<Result<Vec<ObjectIdentifier>, _>>()?;
        Ok(ExtendedKeyUsage { purposes })
    }

    fn describe(&self, industry: Industry) -> String {
        if self.purposes.is_empty() {
            return "Unspecified".to_string();
        }
        self.purposes
            .iter()
            .map(|oid| resolve(&oid.to_string(), industry).into_owned())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
