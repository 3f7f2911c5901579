//! Typed certificate model.
//!
//! Every field is decoded strictly into its RFC 5280 shape. The public key
//! model is closed: RSA, or EC on one of the NIST prime curves. Anything
//! else is reported as [`Error::UnsupportedKeyAlgorithm`] so the caller can
//! hand the certificate to the manual walker instead.

use chrono::{DateTime, Utc};
use kensa::decoder::{DecodableFrom, Decoder};
use kensa_asn1::{BitString, Element, Integer, ObjectIdentifier};
use kensa_der::{Tag, Tlv};
use kensa_oid::{Industry, NamedCurve, known, named_curve};
use tracing::{debug, warn};

use crate::cursor::{Cursor, sequence};
use crate::error::Error;
use crate::extensions::RawExtension;
use crate::name::Name;
use crate::public_key::{RsaPublicKey, ec_info, rsa_public_key};
use crate::record::{Fields, PublicKeyInfo};

/*
https://datatracker.ietf.org/doc/html/rfc5280#section-4.1

Certificate  ::=  SEQUENCE  {
    tbsCertificate       TBSCertificate,
    signatureAlgorithm   AlgorithmIdentifier,
    signatureValue       BIT STRING
}
 */

#[derive(Debug, Clone)]
pub(crate) struct Certificate {
    tbs_certificate: TbsCertificate,
    signature_algorithm: AlgorithmIdentifier,
    signature_value: BitString,
}

impl Certificate {
    pub(crate) fn into_fields(self, industry: Industry) -> Fields {
        let tbs = self.tbs_certificate;
        if tbs.signature != self.signature_algorithm {
            warn!(
                inner = %tbs.signature.algorithm,
                outer = %self.signature_algorithm.algorithm,
                "signature algorithm differs between tbsCertificate and certificate"
            );
        }
        debug!(
            signature_bits = self.signature_value.bit_len(),
            "decoded certificate with typed model"
        );
        Fields {
            version: tbs.version as u64,
            serial_number: tbs.serial_number,
            signature_algorithm: self.signature_algorithm.algorithm.to_string(),
            issuer: tbs.issuer,
            subject: tbs.subject,
            valid_from: tbs.validity.not_before,
            valid_to: tbs.validity.not_after,
            public_key: tbs.subject_public_key_info.to_info(industry),
            extensions: tbs
                .extensions
                .iter()
                .map(|ext| ext.to_entry(industry))
                .collect(),
        }
    }
}

impl DecodableFrom<Tlv> for Certificate {}

impl Decoder<Tlv, Certificate> for Tlv {
    type Error = Error;

    fn decode(&self) -> Result<Certificate, Self::Error> {
        let mut fields = Cursor::new(sequence(self, "certificate")?);
        let tbs_certificate: TbsCertificate = fields.take("tbsCertificate")?.decode()?;
        let signature_algorithm: AlgorithmIdentifier =
            fields.take("signatureAlgorithm")?.decode()?;
        let signature_value: BitString = fields.take("signatureValue")?.decode()?;
        Ok(Certificate {
            tbs_certificate,
            signature_algorithm,
            signature_value,
        })
    }
}

/*
TBSCertificate  ::=  SEQUENCE  {
     version         [0]  EXPLICIT Version DEFAULT v1,
     serialNumber         CertificateSerialNumber,
     signature            AlgorithmIdentifier,
     issuer               Name,
     validity             Validity,
     subject              Name,
     subjectPublicKeyInfo SubjectPublicKeyInfo,
     issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
     subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
     extensions      [3]  EXPLICIT Extensions OPTIONAL
}
 */

#[derive(Debug, Clone)]
pub(crate) struct TbsCertificate {
    version: Version,
    /// uppercase hex of the INTEGER content octets
    serial_number: String,
    signature: AlgorithmIdentifier,
    issuer: Name,
    validity: Validity,
    subject: Name,
    subject_public_key_info: SubjectPublicKeyInfo,
    extensions: Vec<RawExtension>,
}

impl DecodableFrom<Tlv> for TbsCertificate {}

impl Decoder<Tlv, TbsCertificate> for Tlv {
    type Error = Error;

    fn decode(&self) -> Result<TbsCertificate, Self::Error> {
        let mut fields = Cursor::new(sequence(self, "tbsCertificate")?);

        let version: Version = match fields.take_if(|t| t.tag() == Tag::context_specific(0, true)) {
            Some(explicit) => explicit
                .children()
                .and_then(<[Tlv]>::first)
                .ok_or(Error::MissingField("version"))?
                .decode()?,
            None => Version::V1,
        };

        let serial = fields.take("serialNumber")?;
        let _: Integer = serial.decode()?;
        let serial_number = hex::encode_upper(serial.data().unwrap_or_default());

        let signature: AlgorithmIdentifier = fields.take("signature")?.decode()?;
        let issuer = name(fields.take("issuer")?, "issuer");
        let validity: Validity = fields.take("validity")?.decode()?;
        let subject = name(fields.take("subject")?, "subject");
        let subject_public_key_info: SubjectPublicKeyInfo =
            fields.take("subjectPublicKeyInfo")?.decode()?;

        fields.take_if(|t| t.tag().is_context_specific(1));
        fields.take_if(|t| t.tag().is_context_specific(2));

        let extensions = match fields.take_if(|t| t.tag() == Tag::context_specific(3, true)) {
            Some(explicit) => {
                let list = explicit
                    .children()
                    .and_then(<[Tlv]>::first)
                    .ok_or(Error::MissingField("extensions"))?;
                sequence(list, "extensions")?
                    .iter()
                    .filter_map(|ext| {
                        let raw: Result<RawExtension, Error> = ext.decode();
                        raw.inspect_err(|e| warn!(error = %e, "skipping malformed extension"))
                            .ok()
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        Ok(TbsCertificate {
            version,
            serial_number,
            signature,
            issuer,
            validity,
            subject,
            subject_public_key_info,
            extensions,
        })
    }
}

/// Strict decode, degrading to the lenient walk so that one odd attribute
/// does not reject the whole certificate.
fn name(tlv: &Tlv, field: &'static str) -> Name {
    let strict: Result<Name, Error> = tlv.decode();
    strict.unwrap_or_else(|e| {
        warn!(field, error = %e, "name is not strictly well-formed");
        Name::walk(tlv)
    })
}

// Version  ::=  INTEGER  {  v1(0), v2(1), v3(2)  }
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Version {
    V1 = 0,
    V2 = 1,
    V3 = 2,
}

impl DecodableFrom<Tlv> for Version {}

impl Decoder<Tlv, Version> for Tlv {
    type Error = Error;

    fn decode(&self) -> Result<Version, Self::Error> {
        let value: Integer = self.decode()?;
        match value.to_u64() {
            Some(0) => Ok(Version::V1),
            Some(1) => Ok(Version::V2),
            Some(2) => Ok(Version::V3),
            _ => Err(Error::InvalidVersion(format!(
                "unknown version value: {}",
                value
            ))),
        }
    }
}

/*
AlgorithmIdentifier  ::=  SEQUENCE  {
    algorithm               OBJECT IDENTIFIER,
    parameters              ANY DEFINED BY algorithm OPTIONAL
}
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AlgorithmIdentifier {
    algorithm: ObjectIdentifier,
    parameters: Option<Tlv>,
}

impl DecodableFrom<Tlv> for AlgorithmIdentifier {}

impl Decoder<Tlv, AlgorithmIdentifier> for Tlv {
    type Error = Error;

    fn decode(&self) -> Result<AlgorithmIdentifier, Self::Error> {
        let elements = sequence(self, "AlgorithmIdentifier")?;
        let (algorithm, parameters) = match elements {
            [algorithm] => (algorithm, None),
            [algorithm, parameters] => (algorithm, Some(parameters.clone())),
            _ => {
                return Err(Error::UnexpectedElement {
                    field: "AlgorithmIdentifier",
                    expected: "1 or 2 elements",
                });
            }
        };
        Ok(AlgorithmIdentifier {
            algorithm: algorithm.decode()?,
            parameters,
        })
    }
}

/*
Validity ::= SEQUENCE {
    notBefore      Time,
    notAfter       Time
}

Time ::= CHOICE {
    utcTime        UTCTime,
    generalTime    GeneralizedTime
}
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Validity {
    not_before: DateTime<Utc>,
    not_after: DateTime<Utc>,
}

fn time(tlv: &Tlv, field: &'static str) -> Result<DateTime<Utc>, Error> {
    match Element::try_from(tlv)? {
        Element::UtcTime(dt) | Element::GeneralizedTime(dt) => Ok(dt),
        _ => Err(Error::UnexpectedElement {
            field,
            expected: "UTCTime or GeneralizedTime",
        }),
    }
}

impl DecodableFrom<Tlv> for Validity {}

impl Decoder<Tlv, Validity> for Tlv {
    type Error = Error;

    fn decode(&self) -> Result<Validity, Self::Error> {
        let [not_before, not_after] = sequence(self, "validity")? else {
            return Err(Error::UnexpectedElement {
                field: "validity",
                expected: "2 elements",
            });
        };
        Ok(Validity {
            not_before: time(not_before, "notBefore")?,
            not_after: time(not_after, "notAfter")?,
        })
    }
}

/*
SubjectPublicKeyInfo  ::=  SEQUENCE  {
    algorithm            AlgorithmIdentifier,
    subjectPublicKey     BIT STRING
}
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SubjectPublicKeyInfo {
    Rsa(RsaPublicKey),
    Ec {
        curve: &'static NamedCurve,
        point: Vec<u8>,
    },
}

impl SubjectPublicKeyInfo {
    fn to_info(&self, industry: Industry) -> PublicKeyInfo {
        match self {
            SubjectPublicKeyInfo::Rsa(key) => key.to_info(industry),
            SubjectPublicKeyInfo::Ec { curve, point } => {
                ec_info(known::EC_PUBLIC_KEY, curve, Some(point.clone()), industry)
            }
        }
    }
}

// Curves the typed model can represent.
const STANDARD_CURVES: [&str; 3] = [known::SECP256R1, known::SECP384R1, known::SECP521R1];

fn unsupported(oid: impl ToString) -> Error {
    Error::UnsupportedKeyAlgorithm {
        oid: oid.to_string(),
    }
}

impl DecodableFrom<Tlv> for SubjectPublicKeyInfo {}

impl Decoder<Tlv, SubjectPublicKeyInfo> for Tlv {
    type Error = Error;

    fn decode(&self) -> Result<SubjectPublicKeyInfo, Self::Error> {
        let mut fields = Cursor::new(sequence(self, "subjectPublicKeyInfo")?);
        let algorithm: AlgorithmIdentifier = fields.take("algorithm")?.decode()?;
        let key: BitString = fields.take("subjectPublicKey")?.decode()?;

        let oid = algorithm.algorithm.to_string();
        match oid.as_str() {
            known::RSA_ENCRYPTION => Ok(SubjectPublicKeyInfo::Rsa(rsa_public_key(
                key.as_bytes(),
            )?)),
            known::EC_PUBLIC_KEY => {
                let Some(params) = algorithm.parameters else {
                    return Err(unsupported(oid));
                };
                let curve_oid: ObjectIdentifier = params.decode()?;
                let curve_oid = curve_oid.to_string();
                match named_curve(&curve_oid) {
                    Some(curve) if STANDARD_CURVES.contains(&curve.oid) => {
                        Ok(SubjectPublicKeyInfo::Ec {
                            curve,
                            point: key.as_bytes().to_vec(),
                        })
                    }
                    _ => Err(unsupported(curve_oid)),
                }
            }
            _ => Err(unsupported(oid)),
        }
    }
}

/// Decodes `root` with the typed model.
pub(crate) fn extract(root: &Tlv, industry: Industry) -> Result<Fields, Error> {
    let certificate: Certificate = root.decode()?;
    Ok(certificate.into_fields(industry))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn oid(bytes: &[u8]) -> Tlv {
        Tlv::new_primitive(Tag::OBJECT_IDENTIFIER, bytes.to_vec())
    }

    fn spki(algorithm: Vec<Tlv>, key: &[u8]) -> Tlv {
        let mut bits = vec![0x00];
        bits.extend_from_slice(key);
        Tlv::new_constructed(
            Tag::SEQUENCE,
            vec![
                Tlv::new_constructed(Tag::SEQUENCE, algorithm),
                Tlv::new_primitive(Tag::BIT_STRING, bits),
            ],
        )
    }

    const EC_PUBLIC_KEY: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01];
    const SECP256R1: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07];
    const SM2: &[u8] = &[0x2a, 0x81, 0x1c, 0xcf, 0x55, 0x01, 0x82, 0x2d];

    #[rstest(input, expected,
        case(Tlv::new_primitive(Tag::INTEGER, vec![0x00]), Version::V1),
        case(Tlv::new_primitive(Tag::INTEGER, vec![0x01]), Version::V2),
        case(Tlv::new_primitive(Tag::INTEGER, vec![0x02]), Version::V3),
    )]
    fn test_version(input: Tlv, expected: Version) {
        let version: Version = input.decode().unwrap();
        assert_eq!(expected, version);
    }

    #[test]
    fn test_version_out_of_range() {
        let result: Result<Version, _> = Tlv::new_primitive(Tag::INTEGER, vec![0x03]).decode();
        assert!(matches!(result, Err(Error::InvalidVersion(_))));
    }

    #[test]
    fn test_validity_mixed_time_types() {
        let tlv = Tlv::new_constructed(
            Tag::SEQUENCE,
            vec![
                Tlv::new_primitive(Tag::UTC_TIME, b"230101000000Z".to_vec()),
                Tlv::new_primitive(Tag::GENERALIZED_TIME, b"20330101000000Z".to_vec()),
            ],
        );
        let validity: Validity = tlv.decode().unwrap();
        assert_eq!(
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            validity.not_before
        );
        assert_eq!(
            Utc.with_ymd_and_hms(2033, 1, 1, 0, 0, 0).unwrap(),
            validity.not_after
        );
    }

    #[test]
    fn test_validity_rejects_non_time() {
        let tlv = Tlv::new_constructed(
            Tag::SEQUENCE,
            vec![
                Tlv::new_primitive(Tag::UTC_TIME, b"230101000000Z".to_vec()),
                Tlv::new_primitive(Tag::INTEGER, vec![0x01]),
            ],
        );
        let result: Result<Validity, _> = tlv.decode();
        assert!(matches!(
            result,
            Err(Error::UnexpectedElement {
                field: "notAfter",
                ..
            })
        ));
    }

    #[test]
    fn test_algorithm_identifier_with_null_parameters() {
        let tlv = Tlv::new_constructed(
            Tag::SEQUENCE,
            vec![
                oid(&[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b]),
                Tlv::new_primitive(Tag::NULL, vec![]),
            ],
        );
        let alg: AlgorithmIdentifier = tlv.decode().unwrap();
        assert_eq!(known::SHA256_WITH_RSA, alg.algorithm.to_string());
        assert_eq!(Some(Tlv::new_primitive(Tag::NULL, vec![])), alg.parameters);
    }

    #[test]
    fn test_spki_p256() {
        let tlv = spki(vec![oid(EC_PUBLIC_KEY), oid(SECP256R1)], &[0x04, 0x01, 0x02]);
        let key: SubjectPublicKeyInfo = tlv.decode().unwrap();
        let info = key.to_info(Industry::Standard);
        assert_eq!("EC Public Key", info.algorithm);
        assert_eq!("256 bit", info.size);
        assert_eq!(Some("P-256 (secp256r1)".to_string()), info.curve);
        assert_eq!(Some(vec![0x04, 0x01, 0x02]), info.point);
    }

    #[rstest(algorithm, unsupported_oid,
        // SM2 algorithm identifier
        case(vec![oid(SM2)], "1.2.156.10197.1.301"),
        // id-ecPublicKey on the SM2 curve
        case(vec![oid(EC_PUBLIC_KEY), oid(SM2)], "1.2.156.10197.1.301"),
        // id-ecPublicKey without a named curve
        case(vec![oid(EC_PUBLIC_KEY)], "1.2.840.10045.2.1"),
        case(vec![oid(&[0x2a, 0x03, 0x04])], "1.2.3.4"),
    )]
    fn test_spki_unsupported(algorithm: Vec<Tlv>, unsupported_oid: &str) {
        let result: Result<SubjectPublicKeyInfo, _> = spki(algorithm, &[0x04]).decode();
        match result {
            Err(Error::UnsupportedKeyAlgorithm { oid }) => assert_eq!(unsupported_oid, oid),
            other => panic!("expected UnsupportedKeyAlgorithm, got {:?}", other),
        }
    }

    #[test]
    fn test_certificate_rejects_non_sequence() {
        let result: Result<Certificate, _> = Tlv::new_primitive(Tag::INTEGER, vec![0x01]).decode();
        assert!(matches!(
            result,
            Err(Error::UnexpectedElement {
                field: "certificate",
                expected: "SEQUENCE"
            })
        ));
    }
}
