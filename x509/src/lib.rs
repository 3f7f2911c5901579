//! X.509 certificate extraction.
//!
//! A certificate is first decoded with a strict typed model. When that model
//! has no representation for the subject key (SM2, or EC on a curve outside
//! the NIST set) the same TLV tree is walked positionally instead. Both
//! paths produce a [`CertificateRecord`].
//!
//! ```no_run
//! use kensa_x509::{Industry, parse_certificate_from_file};
//!
//! let record = parse_certificate_from_file("cert.pem", Industry::Standard).unwrap();
//! println!("{} {}", record.serial_number, record.fingerprints.sha256);
//! ```

use std::path::Path;

use kensa::decoder::Decoder;
use kensa_codec::is_binary_content;
use kensa_der::{Der, Tlv};
use tracing::{debug, warn};

mod cursor;
pub mod error;
pub mod extensions;
mod fingerprint;
mod manual;
mod name;
mod public_key;
mod record;
mod standard;

pub use error::Error;
pub use fingerprint::Fingerprints;
pub use kensa_oid::Industry;
pub use name::{Attribute, DistinguishedName, Name, format_distinguished_name};
pub use record::{CertificateRecord, ExtensionEntry, PublicKeyInfo, RawForms, UNKNOWN};

pub type Result<T> = std::result::Result<T, Error>;

/// Uppercase hex octets separated by single spaces (`0A 1B 2C`).
pub(crate) fn spaced_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

fn root(der: &[u8]) -> Result<Tlv> {
    let parsed: Der = der.decode()?;
    if parsed.elements().len() > 1 {
        warn!(
            count = parsed.elements().len() - 1,
            "ignoring data after the certificate"
        );
    }
    parsed
        .elements()
        .first()
        .cloned()
        .ok_or(Error::MissingField("certificate"))
}

/// Extracts a record from DER bytes.
///
/// The typed model is tried first. Only
/// [`Error::UnsupportedKeyAlgorithm`] sends the certificate to the manual
/// walker; every other failure is returned as is.
pub fn parse_der(der: &[u8], industry: Industry) -> Result<CertificateRecord> {
    let root = root(der)?;
    let fields = match standard::extract(&root, industry) {
        Ok(fields) => fields,
        Err(Error::UnsupportedKeyAlgorithm { oid }) => {
            debug!(%oid, "key algorithm outside the typed model, walking manually");
            manual::extract(&root, industry)?
        }
        Err(e) => return Err(e),
    };
    Ok(fields.into_record(der, industry))
}

/// Extracts a record from PEM, bare Base64 or hex text.
pub fn parse_certificate(input: &str, industry: Industry) -> Result<CertificateRecord> {
    let der = kensa_codec::to_der(input)?;
    parse_der(&der, industry)
}

/// Extracts a record from file content held in memory.
///
/// Text is tried first; if that fails the bytes are retried once as binary
/// DER and the binary error is the one reported.
pub fn parse_certificate_from_bytes(bytes: &[u8], industry: Industry) -> Result<CertificateRecord> {
    match std::str::from_utf8(bytes) {
        Ok(text) if !is_binary_content(text) => {
            parse_certificate(text, industry).or_else(|e| {
                debug!(error = %e, "text decoding failed, retrying as binary DER");
                parse_der(bytes, industry)
            })
        }
        _ => parse_der(bytes, industry),
    }
}

/// Reads `path` once and extracts a record from its content.
pub fn parse_certificate_from_file(
    path: impl AsRef<Path>,
    industry: Industry,
) -> Result<CertificateRecord> {
    let bytes = std::fs::read(path)?;
    parse_certificate_from_bytes(&bytes, industry)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use super::*;

    const RSA_PEM: &str = include_str!("../../testdata/certs/rsa.pem");
    const RSA_DER: &[u8] = include_bytes!("../../testdata/certs/rsa.der");
    const EC_PEM: &str = include_str!("../../testdata/certs/ec.pem");
    const SM2_PEM: &str = include_str!("../../testdata/certs/sm2.pem");
    const SM2_CURVE_PEM: &str = include_str!("../../testdata/certs/sm2_curve.pem");
    const V1_PEM: &str = include_str!("../../testdata/certs/v1.pem");

    fn entry<'a>(record: &'a CertificateRecord, name: &str) -> &'a ExtensionEntry {
        record
            .extension(name)
            .unwrap_or_else(|| panic!("missing extension {}", name))
    }

    #[rstest(input, expected,
        case(&[], ""),
        case(&[0x0a], "0A"),
        case(&[0x00, 0xff, 0x1b], "00 FF 1B"),
    )]
    fn test_spaced_hex(input: &[u8], expected: &str) {
        assert_eq!(expected, spaced_hex(input));
    }

    #[test]
    fn test_rsa_certificate() {
        let record = parse_certificate(RSA_PEM, Industry::Standard).unwrap();
        assert_eq!("V3", record.version);
        assert_eq!("1A2B3C4D", record.serial_number);
        assert_eq!("SHA256withRSA", record.signature_algorithm);
        assert_eq!(
            "CN=rsa.kensa.test, OU=Engineering, O=Kensa Test, L=San Francisco, ST=California, C=US",
            format_distinguished_name(&record.subject)
        );
        assert_eq!(record.issuer, record.subject);
        assert_eq!(
            Utc.with_ymd_and_hms(2026, 10, 16, 1, 38, 23).unwrap(),
            record.valid_from
        );
        assert_eq!(
            Utc.with_ymd_and_hms(2036, 10, 13, 1, 38, 23).unwrap(),
            record.valid_to
        );

        assert_eq!("RSA", record.public_key.algorithm);
        assert_eq!("2048 bit", record.public_key.size);
        assert_eq!(Some("65537".to_string()), record.public_key.exponent);
        assert_eq!(Some(256), record.public_key.modulus.as_ref().map(Vec::len));
        assert_eq!(None, record.public_key.curve);

        let names: Vec<&str> = record.extensions.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            vec![
                "Basic Constraints",
                "Key Usage",
                "Extended Key Usage",
                "Subject Alternative Name",
                "Subject Key Identifier",
            ],
            names
        );
        let bc = entry(&record, "Basic Constraints");
        assert!(bc.critical);
        assert_eq!("CA: no", bc.value);
        assert_eq!(
            "Digital Signature\nKey Encipherment",
            entry(&record, "Key Usage").value
        );
        assert!(!entry(&record, "Extended Key Usage").critical);
        assert_eq!(
            "Server Authentication\nClient Authentication",
            entry(&record, "Extended Key Usage").value
        );
        assert_eq!(
            "DNS: rsa.kensa.test\nDNS: www.kensa.test\nIP: 192.168.1.10\nURI: https://kensa.test/",
            entry(&record, "Subject Alternative Name").value
        );
        assert_eq!(
            "6D F9 DD 44 23 EB C2 41 3E C7 D8 BB 7F E2 4C 55 3C 6E 5F 85",
            entry(&record, "Subject Key Identifier").value
        );

        assert_eq!(64, record.fingerprints.sha256.len());
        assert_eq!(
            "8C2CFACABE90501AF8ED98FCDAEFCC04980C37DB458904896C4389E456FC3F20",
            record.fingerprints.sha256
        );
        assert!(!record.uses_national_crypto());
    }

    #[test]
    fn test_rsa_der_matches_pem() {
        let from_pem = parse_certificate(RSA_PEM, Industry::Standard).unwrap();
        let from_der = parse_der(RSA_DER, Industry::Standard).unwrap();
        assert_eq!(from_pem, from_der);
        assert_eq!(hex::encode_upper(RSA_DER), from_der.raw.der);
        assert!(from_der.raw.pem.starts_with("-----BEGIN CERTIFICATE-----\n"));
        assert_eq!(
            RSA_PEM.trim(),
            from_der.raw.pem.trim(),
            "re-wrapped PEM matches the fixture"
        );
    }

    #[test]
    fn test_ec_certificate() {
        let record = parse_certificate(EC_PEM, Industry::Standard).unwrap();
        assert_eq!("1234", record.serial_number);
        assert_eq!("SHA256withECDSA", record.signature_algorithm);
        assert_eq!("EC Public Key", record.public_key.algorithm);
        assert_eq!("256 bit", record.public_key.size);
        assert_eq!(Some("P-256 (secp256r1)".to_string()), record.public_key.curve);
        assert_eq!(Some(65), record.public_key.point.as_ref().map(Vec::len));
        assert_eq!(
            "CA: yes\nPath Length Constraint: 1",
            entry(&record, "Basic Constraints").value
        );
        assert_eq!(
            "Certificate Sign\nCRL Sign",
            entry(&record, "Key Usage").value
        );
        assert_eq!(
            "CD0A8AD6A948B81DF1A7262047694C8014CF2EE86EF347A488941CB165FEE25C",
            record.fingerprints.sha256
        );
    }

    #[test]
    fn test_sm2_certificate_falls_back_to_manual() {
        let der = kensa_codec::to_der(SM2_PEM).unwrap();
        let root = root(&der).unwrap();
        assert!(matches!(
            standard::extract(&root, Industry::Standard),
            Err(Error::UnsupportedKeyAlgorithm { .. })
        ));

        let record = parse_der(&der, Industry::Standard).unwrap();
        assert_eq!("V3", record.version);
        assert_eq!("00C0FFEE0123456789", record.serial_number);
        assert_eq!("SM3withSM2", record.signature_algorithm);
        assert_eq!("SM2", record.public_key.algorithm);
        assert_eq!("256 bit", record.public_key.size);
        assert_eq!(Some("SM2".to_string()), record.public_key.curve);
        assert_eq!(Some(65), record.public_key.point.as_ref().map(Vec::len));
        assert!(record.uses_national_crypto());

        assert_eq!(
            "CN=Kensa SM2 CA, O=国家税务总局, C=CN",
            format_distinguished_name(&record.issuer)
        );
        assert_eq!(Some(&"张三".to_string()), record.subject.get("CN"));
        assert_eq!(Some(&"北京".to_string()), record.subject.get("ST"));
        assert_eq!(
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            record.valid_from
        );
        assert_eq!(
            Utc.with_ymd_and_hms(2033, 1, 1, 0, 0, 0).unwrap(),
            record.valid_to
        );

        let bc = entry(&record, "Basic Constraints");
        assert!(bc.critical);
        assert_eq!("CA: yes\nPath Length Constraint: 0", bc.value);
        assert_eq!(
            "Digital Signature\nNon Repudiation",
            entry(&record, "Key Usage").value
        );
        assert_eq!(
            "01 02 03 04 05 06 07 08 09 0A 0B 0C 0D 0E 0F 10 11 12 13 14",
            entry(&record, "Subject Key Identifier").value
        );
        // unknown extension: the name is the OID itself
        assert_eq!(
            "OID: 1.2.3.4.5.6.7\n[0] String: custom\n[1] Integer: 2A",
            entry(&record, "1.2.3.4.5.6.7").value
        );
        assert_eq!(
            "1C86B470E3D27A49368B5FB14991A080C4AE8FF7A0E9897B9F8B476A986F2F6D",
            record.fingerprints.sha256
        );
    }

    #[rstest(industry, synthetic,
        case(Industry::Standard, None),
        case(Industry::Tax, Some("Taxpayer Identification Number")),
        case(Industry::Customs, None),
    )]
    fn test_sm2_certificate_industry(industry: Industry, synthetic: Option<&str>) {
        let record = parse_certificate(SM2_PEM, industry).unwrap();
        assert_eq!(4 + synthetic.iter().count(), record.extensions.len());
        if let Some(name) = synthetic {
            let last = record.extensions.last().unwrap();
            assert_eq!(name, last.name);
            assert!(!last.critical);
            assert_eq!("91110000100000000X", last.value);
            assert_eq!(
                Some(&"91110000100000000X".to_string()),
                record.subject.get(name)
            );
        }
    }

    #[test]
    fn test_sm2_curve_certificate() {
        let record = parse_certificate(SM2_CURVE_PEM, Industry::Standard).unwrap();
        assert_eq!("07", record.serial_number);
        assert_eq!("EC Public Key", record.public_key.algorithm);
        assert_eq!(Some("SM2".to_string()), record.public_key.curve);
        assert_eq!("256 bit", record.public_key.size);
        assert_eq!(
            "Key ID: A3 6E 71 E3 EB 98 B3 89 2C D9 30 E8 47 0F 6B A6 CB FA 5B 6B",
            entry(&record, "Authority Key Identifier").value
        );
        assert_eq!(
            "A3 6E 71 E3 EB 98 B3 89 2C D9 30 E8 47 0F 6B A6 CB FA 5B 6B",
            entry(&record, "Subject Key Identifier").value
        );
        let bc = entry(&record, "Basic Constraints");
        assert!(bc.critical);
        assert_eq!("CA: yes", bc.value);
    }

    #[test]
    fn test_v1_certificate() {
        let record = parse_certificate(V1_PEM, Industry::Standard).unwrap();
        assert_eq!("V1", record.version);
        assert_eq!("05", record.serial_number);
        assert_eq!("SHA384withECDSA", record.signature_algorithm);
        // later duplicates overwrite earlier ones
        assert_eq!(Some(&"Legacy V1 Override".to_string()), record.subject.get("CN"));
        assert_eq!(1, record.subject.len());
        assert_eq!(
            Utc.with_ymd_and_hms(1950, 1, 1, 0, 0, 0).unwrap(),
            record.valid_from
        );
        assert_eq!(
            Utc.with_ymd_and_hms(2049, 12, 31, 23, 59, 59).unwrap(),
            record.valid_to
        );
        assert!(record.extensions.is_empty());
    }

    #[test]
    fn test_parse_certificate_from_hex_and_base64() {
        let from_pem = parse_certificate(EC_PEM, Industry::Standard).unwrap();
        let der = kensa_codec::to_der(EC_PEM).unwrap();
        let from_hex =
            parse_certificate(&hex::encode_upper(&der), Industry::Standard).unwrap();
        let from_base64 =
            parse_certificate(&kensa_codec::encode_base64(&der), Industry::Standard).unwrap();
        assert_eq!(from_pem, from_hex);
        assert_eq!(from_pem, from_base64);
    }

    #[test]
    fn test_parse_certificate_single_line_pem() {
        let single_line = RSA_PEM.split_whitespace().collect::<Vec<_>>().join(" ");
        let record = parse_certificate(&single_line, Industry::Standard).unwrap();
        assert_eq!(parse_der(RSA_DER, Industry::Standard).unwrap(), record);
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
        haystack
            .windows(needle.len())
            .enumerate()
            .filter(|(_, w)| *w == needle)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_malformed_extension_is_skipped() {
        // basicConstraints: OID, critical TRUE, then the extnValue OCTET STRING
        let mut der = RSA_DER.to_vec();
        let [at] = find(&der, &[0x06, 0x03, 0x55, 0x1d, 0x13, 0x01, 0x01, 0xff, 0x04])[..] else {
            panic!("basicConstraints not found");
        };
        der[at + 8] = 0x05;

        let record = parse_der(&der, Industry::Standard).unwrap();
        assert!(record.extension("Basic Constraints").is_none());
        assert!(record.extension("Subject Alternative Name").is_some());
        assert_eq!(
            parse_der(RSA_DER, Industry::Standard).unwrap().extensions.len() - 1,
            record.extensions.len()
        );
    }

    #[test]
    fn test_non_string_name_attribute_degrades() {
        let mut der = RSA_DER.to_vec();
        let mut needle = vec![0x0c, 0x0e];
        needle.extend_from_slice(b"rsa.kensa.test");
        // issuer first, then subject
        let [_, subject_cn] = find(&der, &needle)[..] else {
            panic!("subject CN not found");
        };
        der[subject_cn] = 0x04;

        let record = parse_der(&der, Industry::Standard).unwrap();
        assert_eq!(Some("rsa.kensa.test"), record.subject.get("CN").map(String::as_str));
        assert_eq!(Some("US"), record.subject.get("C").map(String::as_str));
    }

    #[test]
    fn test_trailing_data_is_ignored() {
        let mut der = RSA_DER.to_vec();
        der.extend_from_slice(&[0x05, 0x00]);
        let record = parse_der(&der, Industry::Standard).unwrap();
        assert_eq!("1A2B3C4D", record.serial_number);
        // fingerprints cover the bytes as given
        assert_ne!(
            "8C2CFACABE90501AF8ED98FCDAEFCC04980C37DB458904896C4389E456FC3F20",
            record.fingerprints.sha256
        );
    }

    #[rstest(input,
        case(b"".as_slice()),
        case(&[0x30, 0x82, 0x01]),
        case(&[0x30, 0x00]),
        case(&[0x02, 0x01, 0x01]),
    )]
    fn test_parse_der_rejects_malformed(input: &[u8]) {
        assert!(parse_der(input, Industry::Standard).is_err());
    }

    #[test]
    fn test_parse_certificate_rejects_unknown_text() {
        assert!(matches!(
            parse_certificate("not a certificate", Industry::Standard),
            Err(Error::Codec(_))
        ));
    }

    #[test]
    fn test_parse_certificate_from_bytes_binary() {
        let record = parse_certificate_from_bytes(RSA_DER, Industry::Standard).unwrap();
        assert_eq!("1A2B3C4D", record.serial_number);
    }

    #[test]
    fn test_parse_certificate_from_file() {
        let mut pem = tempfile::NamedTempFile::new().unwrap();
        pem.write_all(SM2_PEM.as_bytes()).unwrap();
        let record = parse_certificate_from_file(pem.path(), Industry::Tax).unwrap();
        assert!(record.extension("Taxpayer Identification Number").is_some());

        let mut der = tempfile::NamedTempFile::new().unwrap();
        der.write_all(RSA_DER).unwrap();
        let record = parse_certificate_from_file(der.path(), Industry::Standard).unwrap();
        assert_eq!("RSA", record.public_key.algorithm);
    }

    #[test]
    fn test_parse_certificate_from_missing_file() {
        assert!(matches!(
            parse_certificate_from_file("/nonexistent/kensa.pem", Industry::Standard),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = parse_certificate(EC_PEM, Industry::Standard).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!("1234", json["serialNumber"]);
        assert_eq!("SHA256withECDSA", json["signatureAlgorithm"]);
        assert_eq!("P-256 (secp256r1)", json["publicKey"]["curve"]);
        assert!(json["publicKey"].get("modulus").is_none());
        assert_eq!("ec.kensa.test", json["subject"]["CN"]);
        assert_eq!("Basic Constraints", json["extensions"][0]["name"]);
    }
}
