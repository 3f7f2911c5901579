use indexmap::IndexMap;
use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{ObjectIdentifier, decode_string};
use kensa_der::Tlv;
use kensa_oid::{Industry, attribute_short_name, industry_name, resolve};
use tracing::warn;

use crate::cursor::sequence;
use crate::error::Error;
use crate::record::ExtensionEntry;

/// Attribute name to value, in first-seen order.
pub type DistinguishedName = IndexMap<String, String>;

const DISPLAY_ORDER: [&str; 6] = ["CN", "OU", "O", "L", "ST", "C"];

/*
RFC 5280 Section 4.1.2.4

Name ::= CHOICE { -- only one possibility for now --
  rdnSequence  RDNSequence }

RDNSequence ::= SEQUENCE OF RelativeDistinguishedName

RelativeDistinguishedName ::= SET SIZE (1..MAX) OF AttributeTypeAndValue

AttributeTypeAndValue ::= SEQUENCE {
  type     AttributeType,
  value    AttributeValue }
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub oid: String,
    pub value: String,
}

impl Attribute {
    /// DN short name (`CN`, `O`, ...) when there is one, otherwise the resolved OID name.
    pub fn key(&self, industry: Industry) -> String {
        match attribute_short_name(&self.oid) {
            Some(short) => short.to_string(),
            None => resolve(&self.oid, industry).into_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Name {
    attributes: Vec<Attribute>,
}

impl Name {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Name { attributes }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Later attributes with the same key overwrite earlier ones in place.
    pub fn to_map(&self, industry: Industry) -> DistinguishedName {
        let mut map = DistinguishedName::new();
        for attr in &self.attributes {
            map.insert(attr.key(industry), attr.value.clone());
        }
        map
    }

    /// Attributes known to the industry overlay, surfaced as extension entries.
    pub(crate) fn industry_entries(
        &self,
        industry: Industry,
    ) -> impl Iterator<Item = ExtensionEntry> + '_ {
        self.attributes.iter().filter_map(move |attr| {
            industry_name(&attr.oid, industry).map(|name| ExtensionEntry {
                name: name.to_string(),
                critical: false,
                value: attr.value.clone(),
            })
        })
    }

    /// Best-effort walk used by the manual strategy. Attributes that cannot be
    /// read are logged and skipped.
    pub(crate) fn walk(tlv: &Tlv) -> Name {
        let Some(rdns) = tlv.children() else {
            warn!(tag = %tlv.tag(), "name is not constructed");
            return Name::default();
        };
        let attributes = rdns
            .iter()
            .flat_map(|rdn| rdn.children().unwrap_or_default())
            .filter_map(|atv| match lenient_attribute(atv) {
                Ok(attr) => Some(attr),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable name attribute");
                    None
                }
            })
            .collect();
        Name { attributes }
    }
}

fn lenient_attribute(tlv: &Tlv) -> Result<Attribute, Error> {
    let [oid, value, ..] = sequence(tlv, "attribute")? else {
        return Err(Error::MissingField("attribute value"));
    };
    let oid: ObjectIdentifier = oid.decode()?;
    let data = value.data().ok_or(Error::UnexpectedElement {
        field: "attribute value",
        expected: "primitive value",
    })?;
    Ok(Attribute {
        oid: oid.to_string(),
        value: decode_string(value.tag(), data),
    })
}

impl DecodableFrom<Tlv> for Name {}

impl Decoder<Tlv, Name> for Tlv {
    type Error = Error;

    fn decode(&self) -> Result<Name, Self::Error> {
        let mut attributes = Vec::new();
        for rdn in sequence(self, "name")? {
            let atvs = rdn.children().ok_or(Error::UnexpectedElement {
                field: "relative distinguished name",
                expected: "SET",
            })?;
            for atv in atvs {
                let [oid, value] = sequence(atv, "attribute")? else {
                    return Err(Error::UnexpectedElement {
                        field: "attribute",
                        expected: "type and value",
                    });
                };
                let oid: ObjectIdentifier = oid.decode()?;
                let data = value
                    .data()
                    .filter(|_| value.tag().is_string())
                    .ok_or(Error::UnexpectedElement {
                        field: "attribute value",
                        expected: "string",
                    })?;
                attributes.push(Attribute {
                    oid: oid.to_string(),
                    value: decode_string(value.tag(), data),
                });
            }
        }
        Ok(Name { attributes })
    }
}

/// `CN, OU, O, L, ST, C` first, then every other key in order, as `KEY=value`
/// joined by `, `.
pub fn format_distinguished_name(dn: &DistinguishedName) -> String {
    let ordered = DISPLAY_ORDER
        .iter()
        .filter_map(|key| dn.get_key_value(*key));
    let rest = dn
        .iter()
        .filter(|(key, _)| !DISPLAY_ORDER.contains(&key.as_str()));
    ordered
        .chain(rest)
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use kensa_der::{Tag, Tlv};
    use rstest::rstest;

    use super::*;

    fn atv(oid: &[u8], tag: Tag, value: &[u8]) -> Tlv {
        Tlv::new_constructed(
            Tag::SEQUENCE,
            vec![
                Tlv::new_primitive(Tag::OBJECT_IDENTIFIER, oid.to_vec()),
                Tlv::new_primitive(tag, value.to_vec()),
            ],
        )
    }

    fn name(atvs: Vec<Tlv>) -> Tlv {
        Tlv::new_constructed(
            Tag::SEQUENCE,
            atvs.into_iter()
                .map(|a| Tlv::new_constructed(Tag::SET, vec![a]))
                .collect(),
        )
    }

    const CN: &[u8] = &[0x55, 0x04, 0x03];
    const O: &[u8] = &[0x55, 0x04, 0x0a];
    const C: &[u8] = &[0x55, 0x04, 0x06];
    // 1.2.156.10197.6.1.4.2.2
    const TAXPAYER_ID: &[u8] = &[0x2a, 0x81, 0x1c, 0xcf, 0x55, 0x06, 0x01, 0x04, 0x02, 0x02];
    // 2.5.4.17
    const POSTAL_CODE: &[u8] = &[0x55, 0x04, 0x11];

    #[test]
    fn test_name_decode() {
        let tlv = name(vec![
            atv(C, Tag::PRINTABLE_STRING, b"CN"),
            atv(O, Tag::UTF8_STRING, "国家税务总局".as_bytes()),
            atv(CN, Tag::UTF8_STRING, b"Kensa SM2 CA"),
        ]);
        let decoded: Name = tlv.decode().unwrap();
        let map = decoded.to_map(Industry::Standard);
        assert_eq!(
            vec![("C", "CN"), ("O", "国家税务总局"), ("CN", "Kensa SM2 CA")],
            map.iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_name_decode_rejects_non_string_value() {
        let tlv = name(vec![atv(CN, Tag::INTEGER, &[0x01])]);
        let result: Result<Name, Error> = tlv.decode();
        assert!(matches!(
            result,
            Err(Error::UnexpectedElement {
                field: "attribute value",
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_keys_overwrite_in_place() {
        let tlv = name(vec![
            atv(CN, Tag::UTF8_STRING, b"Legacy V1"),
            atv(O, Tag::UTF8_STRING, b"Org"),
            atv(CN, Tag::UTF8_STRING, b"Legacy V1 Override"),
        ]);
        let map = Name::walk(&tlv).to_map(Industry::Standard);
        assert_eq!(2, map.len());
        assert_eq!(Some((0, &"CN".to_string(), &"Legacy V1 Override".to_string())), map.get_full("CN"));
    }

    #[test]
    fn test_walk_skips_broken_attributes() {
        let broken = Tlv::new_constructed(
            Tag::SEQUENCE,
            vec![Tlv::new_primitive(Tag::OBJECT_IDENTIFIER, vec![])],
        );
        let tlv = name(vec![broken, atv(CN, Tag::IA5_STRING, b"ok")]);
        let walked = Name::walk(&tlv);
        assert_eq!(1, walked.attributes().len());
        assert_eq!("ok", walked.attributes()[0].value);
    }

    #[rstest(industry, key, entries,
        case(Industry::Standard, "1.2.156.10197.6.1.4.2.2", 0),
        case(Industry::Tax, "Taxpayer Identification Number", 1),
        case(Industry::Customs, "1.2.156.10197.6.1.4.2.2", 0),
    )]
    fn test_industry_attributes(industry: Industry, key: &str, entries: usize) {
        let tlv = name(vec![
            atv(TAXPAYER_ID, Tag::PRINTABLE_STRING, b"91110000100000000X"),
            atv(POSTAL_CODE, Tag::PRINTABLE_STRING, b"100000"),
        ]);
        let walked = Name::walk(&tlv);
        let map = walked.to_map(industry);
        assert_eq!(Some(&"91110000100000000X".to_string()), map.get(key));
        assert_eq!(Some(&"100000".to_string()), map.get("Postal Code"));

        let synthetic: Vec<ExtensionEntry> = walked.industry_entries(industry).collect();
        assert_eq!(entries, synthetic.len());
        if let Some(entry) = synthetic.first() {
            assert_eq!(key, entry.name);
            assert!(!entry.critical);
            assert_eq!("91110000100000000X", entry.value);
        }
    }

    #[test]
    fn test_format_distinguished_name() {
        let dn: DistinguishedName = [
            ("C", "US"),
            ("E", "admin@kensa.test"),
            ("ST", "California"),
            ("O", "Kensa Test"),
            ("CN", "rsa.kensa.test"),
            ("Postal Code", "94105"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(
            "CN=rsa.kensa.test, O=Kensa Test, ST=California, C=US, E=admin@kensa.test, Postal Code=94105",
            format_distinguished_name(&dn)
        );
        assert_eq!("", format_distinguished_name(&DistinguishedName::new()));
    }
}
