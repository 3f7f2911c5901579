use kensa_asn1::octet_string;
use kensa_der::Tlv;
use kensa_oid::Industry;

use super::error::{Error, Kind};
use super::Extension;
use crate::spaced_hex;

/*
RFC 5280 Section 4.2.1.2
SubjectKeyIdentifier ::= KeyIdentifier
KeyIdentifier ::= OCTET STRING
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectKeyIdentifier {
    /// typically a SHA-1 hash of the subjectPublicKey bits
    pub key_identifier: Vec<u8>,
}

impl Extension for SubjectKeyIdentifier {
    const OID: &'static str = kensa_oid::known::SUBJECT_KEY_IDENTIFIER;

    fn parse(value: &Tlv) -> Result<Self, Error> {
        let key_identifier = octet_string(value)
            .map_err(Error::asn1(Kind::SubjectKeyIdentifier))?
            .to_vec();
        Ok(SubjectKeyIdentifier { key_identifier })
    }

    fn describe(&self, _industry: Industry) -> String {
        spaced_hex(&self.key_identifier)
    }
}

#[cfg(test)]
mod tests {
    use kensa_der::{Tag, Tlv};
    use rstest::rstest;

    use super::*;

    #[rstest(content, expected,
        case(vec![0x6d, 0xf9, 0xdd, 0x44], "6D F9 DD 44"),
        case(vec![0x00], "00"),
        case(vec![], ""),
    )]
    fn test_subject_key_identifier(content: Vec<u8>, expected: &str) {
        let ski =
            SubjectKeyIdentifier::parse(&Tlv::new_primitive(Tag::OCTET_STRING, content.clone()))
                .unwrap();
        assert_eq!(content, ski.key_identifier);
        assert_eq!(expected, ski.describe(Industry::Standard));
    }

    #[test]
    fn test_subject_key_identifier_wrong_tag() {
        let err = SubjectKeyIdentifier::parse(&Tlv::new_primitive(Tag::INTEGER, vec![0x01]))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Asn1 {
                kind: Kind::SubjectKeyIdentifier,
                ..
            }
        ));
    }
}
