use kensa_der::{TagClass, Tlv};
use kensa_oid::Industry;

use super::error::{Error, Kind};
use super::Extension;
use super::subject_alt_name::GeneralName;
use crate::name::format_distinguished_name;
use crate::spaced_hex;

/*
RFC 5280 Section 4.2.1.1
AuthorityKeyIdentifier ::= SEQUENCE {
    keyIdentifier             [0] KeyIdentifier           OPTIONAL,
    authorityCertIssuer       [1] GeneralNames            OPTIONAL,
    authorityCertSerialNumber [2] CertificateSerialNumber OPTIONAL
}

KeyIdentifier ::= OCTET STRING
CertificateSerialNumber ::= INTEGER
*/

/// All three fields are implicitly tagged, so only the context tag number
/// tells them apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorityKeyIdentifier {
    pub key_identifier: Option<Vec<u8>>,
    pub authority_cert_issuer: Option<Vec<GeneralName>>,
    /// content octets of the issuer's serial number INTEGER
    pub authority_cert_serial_number: Option<Vec<u8>>,
}

impl Extension for AuthorityKeyIdentifier {
    const OID: &'static str = kensa_oid::known::AUTHORITY_KEY_IDENTIFIER;

    fn parse(value: &Tlv) -> Result<Self, Error> {
        let children = value
            .children()
            .ok_or(Error::ExpectedSequence(Kind::AuthorityKeyIdentifier))?;
        let mut aki = AuthorityKeyIdentifier::default();
        for child in children {
            let tag = child.tag();
            if tag.class() != TagClass::ContextSpecific {
                continue;
            }
            match (tag.number(), child.data(), child.children()) {
                (0, Some(data), _) => aki.key_identifier = Some(data.to_vec()),
                (1, _, Some(names)) => {
                    aki.authority_cert_issuer =
                        Some(names.iter().filter_map(GeneralName::from_tlv).collect())
                }
                (2, Some(data), _) => aki.authority_cert_serial_number = Some(data.to_vec()),
                _ => return Err(Error::UnexpectedElementType(Kind::AuthorityKeyIdentifier)),
            }
        }
        Ok(aki)
    }

    fn describe(&self, industry: Industry) -> String {
        let mut lines = Vec::new();
        if let Some(key_id) = &self.key_identifier {
            lines.push(format!("Key ID: {}", spaced_hex(key_id)));
        }
        if let Some(issuer) = &self.authority_cert_issuer {
            let names = issuer
                .iter()
                .filter_map(|name| match name {
                    GeneralName::DirectoryName(dn) => {
                        Some(format_distinguished_name(&dn.to_map(industry)))
                    }
                    _ => None,
                })
                .collect::<Vec<_>>();
            if !names.is_empty() {
                lines.push(format!("Issuer: {}", names.join("; ")));
            }
        }
        if let Some(serial) = &self.authority_cert_serial_number {
            lines.push(format!("Serial: {}", spaced_hex(serial)));
        }
        if lines.is_empty() {
            return "None".to_string();
        }
        lines.join("\n")
    }
}
