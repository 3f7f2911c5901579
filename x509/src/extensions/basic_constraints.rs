use std::fmt;

use kensa_asn1::Element;
use kensa_der::Tlv;
use kensa_oid::Industry;

use super::error::{Error, Kind};
use super::Extension;

/*
RFC 5280 Section 4.2.1.9
BasicConstraints ::= SEQUENCE {
    cA                      BOOLEAN DEFAULT FALSE,
    pathLenConstraint       INTEGER (0..MAX) OPTIONAL
}
*/

/// Basic Constraints extension ([RFC 5280 Section 4.2.1.9](https://datatracker.ietf.org/doc/html/rfc5280#section-4.2.1.9)).
///
/// Identifies whether the subject of the certificate is a CA and the maximum
/// depth of valid certification paths that include this certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicConstraints {
    pub ca: bool,
    pub path_len_constraint: Option<u32>,
}

impl Extension for BasicConstraints {
    const OID: &'static str = kensa_oid::known::BASIC_CONSTRAINTS;

    fn parse(value: &Tlv) -> Result<Self, Error> {
        let element = Element::try_from(value).map_err(Error::asn1(Kind::BasicConstraints))?;
        let Element::Sequence(children) = element else {
            return Err(Error::ExpectedSequence(Kind::BasicConstraints));
        };
        let (ca, path_len_constraint) =
            children
                .iter()
                .try_fold((false, None), |(ca, path_len), child| {
                    let element = Element::try_from(child)
                        .map_err(Error::asn1(Kind::BasicConstraints))?;
                    match element {
                        Element::Boolean(b) => Ok((b, path_len)),
                        Element::Integer(i) => {
                            let value = i.to_u32().ok_or(Error::PathLenConstraintOutOfRange)?;
                            Ok((ca, Some(value)))
                        }
                        _ => Err(Error::UnexpectedElementType(Kind::BasicConstraints)),
                    }
                })?;
        Ok(BasicConstraints {
            ca,
            path_len_constraint,
        })
    }

    fn describe(&self, _industry: Industry) -> String {
        self.to_string()
    }
}

impl fmt::Display for BasicConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CA: {}", if self.ca { "yes" } else { "no" })?;
        if let Some(path_len) = self.path_len_constraint {
            write!(f, "\nPath Length Constraint: {}", path_len)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use kensa_der::{Tag, Tlv};
    use rstest::rstest;

    use super::*;

    fn constraints(children: Vec<Tlv>) -> Tlv {
        Tlv::new_constructed(Tag::SEQUENCE, children)
    }

    fn ca(flag: u8) -> Tlv {
        Tlv::new_primitive(Tag::BOOLEAN, vec![flag])
    }

    fn path_len(content: &[u8]) -> Tlv {
        Tlv::new_primitive(Tag::INTEGER, content.to_vec())
    }

    #[rstest(input, expected,
        case(constraints(vec![]), "CA: no"),
        case(constraints(vec![ca(0xff)]), "CA: yes"),
        case(constraints(vec![ca(0x00)]), "CA: no"),
        case(constraints(vec![ca(0xff), path_len(&[0x00])]), "CA: yes\nPath Length Constraint: 0"),
        case(constraints(vec![ca(0xff), path_len(&[0x01])]), "CA: yes\nPath Length Constraint: 1"),
        // cA omitted because it equals the DEFAULT
        case(constraints(vec![path_len(&[0x03])]), "CA: no\nPath Length Constraint: 3"),
    )]
    fn test_basic_constraints(input: Tlv, expected: &str) {
        let bc = BasicConstraints::parse(&input).unwrap();
        assert_eq!(expected, bc.describe(Industry::Standard));
    }

    #[rstest(input, expected,
        case(ca(0xff), Error::ExpectedSequence(Kind::BasicConstraints)),
        case(constraints(vec![path_len(&[0xff])]), Error::PathLenConstraintOutOfRange),
        case(constraints(vec![path_len(&[0x01, 0x00, 0x00, 0x00, 0x00])]), Error::PathLenConstraintOutOfRange),
        case(constraints(vec![Tlv::new_primitive(Tag::NULL, vec![])]), Error::UnexpectedElementType(Kind::BasicConstraints)),
    )]
    fn test_basic_constraints_invalid(input: Tlv, expected: Error) {
        assert_eq!(expected, BasicConstraints::parse(&input).unwrap_err());
    }
}
