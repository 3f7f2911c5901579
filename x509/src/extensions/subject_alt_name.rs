use std::fmt;
use std::net::Ipv4Addr;

use kensa::encoder::Encoder;
use kensa_asn1::decode_string;
use kensa_der::{Tag, TagClass, Tlv};
use kensa_oid::Industry;

use super::error::{Error, Kind};
use super::Extension;
use crate::name::{Name, format_distinguished_name};
use crate::spaced_hex;

/*
RFC 5280 Section 4.2.1.6
SubjectAltName ::= GeneralNames

GeneralNames ::= SEQUENCE SIZE (1..MAX) OF GeneralName

GeneralName ::= CHOICE {
    otherName                       [0]     OtherName,
    rfc822Name                      [1]     IA5String,
    dNSName                         [2]     IA5String,
    x400Address                     [3]     ORAddress,
    directoryName                   [4]     Name,
    ediPartyName                    [5]     EDIPartyName,
    uniformResourceIdentifier       [6]     IA5String,
    iPAddress                       [7]     OCTET STRING,
    registeredID                    [8]     OBJECT IDENTIFIER
}
*/

/// One entry of a GeneralNames sequence.
///
/// Only the forms that appear in practice get their own variant; the rest
/// keep their context tag number and content octets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneralName {
    Email(String),
    Dns(String),
    Uri(String),
    IpAddress(Vec<u8>),
    DirectoryName(Name),
    Other { number: u32, content: Vec<u8> },
}

impl GeneralName {
    /// Returns `None` for nodes outside the context-specific class.
    pub(crate) fn from_tlv(tlv: &Tlv) -> Option<GeneralName> {
        let tag = tlv.tag();
        if tag.class() != TagClass::ContextSpecific {
            return None;
        }
        let name = match (tag.number(), tlv.data(), tlv.children()) {
            (1, Some(data), _) => GeneralName::Email(ia5(data)),
            (2, Some(data), _) => GeneralName::Dns(ia5(data)),
            (6, Some(data), _) => GeneralName::Uri(ia5(data)),
            (7, Some(data), _) => GeneralName::IpAddress(data.to_vec()),
            (4, _, Some([name, ..])) => GeneralName::DirectoryName(Name::walk(name)),
            (number, _, _) => GeneralName::Other {
                number,
                content: content_octets(tlv),
            },
        };
        Some(name)
    }

    pub fn describe(&self, industry: Industry) -> String {
        match self {
            GeneralName::Email(email) => format!("Email: {}", email),
            GeneralName::Dns(dns) => format!("DNS: {}", dns),
            GeneralName::Uri(uri) => format!("URI: {}", uri),
            GeneralName::IpAddress(ip) => format!("IP: {}", format_ip(ip)),
            GeneralName::DirectoryName(name) => format!(
                "Type 4: {}",
                format_distinguished_name(&name.to_map(industry))
            ),
            GeneralName::Other { number, content } => {
                format!("Type {}: {}", number, spaced_hex(content))
            }
        }
    }
}

fn ia5(data: &[u8]) -> String {
    decode_string(Tag::IA5_STRING, data)
}

fn content_octets(tlv: &Tlv) -> Vec<u8> {
    match (tlv.data(), tlv.children()) {
        (Some(data), _) => data.to_vec(),
        (None, Some(children)) => children
            .iter()
            .filter_map(|child| Encoder::<Tlv, Vec<u8>>::encode(child).ok())
            .flatten()
            .collect(),
        (None, None) => Vec::new(),
    }
}

// IPv6 addresses are shown as a fixed placeholder
fn format_ip(bytes: &[u8]) -> String {
    match <[u8; 4]>::try_from(bytes) {
        Ok(v4) => Ipv4Addr::from(v4).to_string(),
        Err(_) if bytes.len() == 16 => "[IPv6]".to_string(),
        Err(_) => spaced_hex(bytes),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAltName {
    pub names: Vec<GeneralName>,
}

impl Extension for SubjectAltName {
    const OID: &'static str = kensa_oid::known::SUBJECT_ALT_NAME;

    fn parse(value: &Tlv) -> Result<Self, Error> {
        if value.tag() != Tag::SEQUENCE {
            return Err(Error::ExpectedSequence(Kind::SubjectAltName));
        }
        let names = value
            .children()
            .unwrap_or_default()
            .iter()
            .map(|child| {
                GeneralName::from_tlv(child)
                    .ok_or(Error::UnexpectedElementType(Kind::SubjectAltName))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SubjectAltName { names })
    }

    fn describe(&self, industry: Industry) -> String {
        if self.names.is_empty() {
            return "None".to_string();
        }
        self.names
            .iter()
            .map(|name| name.describe(industry))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for SubjectAltName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe(Industry::Standard))
    }
}
