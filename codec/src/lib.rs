//! Text encodings a certificate arrives in, and conversions between them.
//!
//! Four formats are recognised: PEM, bare Base64, hex, and DER. DER here
//! means binary DER carried as Base64 without any envelope, which is how a
//! binary file is held once it has been read as text.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

mod convert;
pub mod error;
mod load;
mod pem;

pub use convert::{
    base64_to_hex, convert_format, hex_to_base64, hex_to_pem, pem_to_hex, to_der, to_der_bytes,
};
pub use error::Error;
pub use load::{LoadedInput, der_file_name, load_input};
pub use pem::{Label, Pem, base64_to_pem, pem_to_base64};

const MIN_HEX_LEN: usize = 20;
const MIN_BASE64_LEN: usize = 20;
const BASE64_PROBE_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Format {
    Pem,
    Base64,
    Hex,
    Der,
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Format::Pem => write!(f, "PEM"),
            Format::Base64 => write!(f, "BASE64"),
            Format::Hex => write!(f, "HEX"),
            Format::Der => write!(f, "DER"),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PEM" => Ok(Format::Pem),
            "BASE64" => Ok(Format::Base64),
            "HEX" => Ok(Format::Hex),
            "DER" => Ok(Format::Der),
            _ => Err(Error::InvalidFormat(format!("unknown format '{}'", s))),
        }
    }
}

pub(crate) fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn is_base64_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '+' || c == '/'
}

fn trial_decodes(compact: &str) -> bool {
    let end = compact.len().min(BASE64_PROBE_LEN);
    compact.is_char_boundary(end) && STANDARD.decode(&compact[..end]).is_ok()
}

/// Classifies text as PEM, hex or Base64. Never returns [`Format::Der`].
///
/// Checks run in that order, so a string of hex digits that is also valid
/// Base64 is reported as hex.
pub fn detect_format(text: &str) -> Option<Format> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.contains("-----BEGIN") && trimmed.contains("-----END") {
        return Some(Format::Pem);
    }

    let compact = strip_whitespace(trimmed);
    if trimmed
        .chars()
        .all(|c| c.is_ascii_hexdigit() || c.is_whitespace())
        && compact.len() >= MIN_HEX_LEN
        && compact.len() % 2 == 0
    {
        return Some(Format::Hex);
    }

    if trimmed
        .chars()
        .all(|c| is_base64_char(c) || c == '=' || c.is_whitespace())
        && compact.len() % 4 == 0
        && trial_decodes(&compact)
    {
        return Some(Format::Base64);
    }

    None
}

/// Stricter Base64 check used when classifying loaded files: padding only at
/// the end and at least 20 significant characters.
pub fn is_valid_base64_text(text: &str) -> bool {
    let trimmed = text.trim();
    let body = trimmed.trim_end_matches('=');
    if trimmed.len() - body.len() > 2 || body.is_empty() {
        return false;
    }
    if !body.chars().all(|c| is_base64_char(c) || c.is_whitespace()) {
        return false;
    }
    let compact = strip_whitespace(trimmed);
    compact.len() >= MIN_BASE64_LEN && compact.len() % 4 == 0 && trial_decodes(&compact)
}

/// True when more than 10% of the characters are control characters other
/// than tab, LF and CR.
pub fn is_binary_content(text: &str) -> bool {
    let total = text.chars().count();
    let control = text
        .chars()
        .filter(|c| (*c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r'))
        .count();
    control * 10 > total
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes Base64, ignoring any whitespace.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, Error> {
    Ok(STANDARD.decode(strip_whitespace(text))?)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const RSA_PEM: &str = include_str!("../../testdata/certs/rsa.pem");

    #[rstest(input, expected,
        case(RSA_PEM, Some(Format::Pem)),
        case("  -----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----  ", Some(Format::Pem)),
        case("-----BEGIN CERTIFICATE-----\nAAAA\n", None),
        case("30 82 01 0A 02 82 01 01 00 C0 FF EE", Some(Format::Hex)),
        case("308201\n0a0282010100c0ffee", Some(Format::Hex)),
        // hex wins over base64 when both apply
        case("0123456789ABCDEF01234567", Some(Format::Hex)),
        // odd number of hex digits falls through to base64
        case("0123456789ABCDEF0123456", None),
        case("MIIBCgKCAQEAwP/u", Some(Format::Base64)),
        case("MIIBCgKC\nAQEAwP/u", Some(Format::Base64)),
        case("MIIBCgKCAQEAwP/", None),
        case("not a certificate, at all!", None),
        // plain words can be valid base64
        case("notacertificateatall", Some(Format::Base64)),
        case("abc", None),
        case("", None),
        case("   \n\t ", None),
    )]
    fn test_detect_format(input: &str, expected: Option<Format>) {
        assert_eq!(expected, detect_format(input));
    }

    #[rstest(input, expected,
        case("MIIBCgKCAQEAwP/uASNFZ4k=", true),
        case("MIIBCgKC\nAQEAwP/u\nASNFZ4k=", true),
        case("MIIBCgKCAQEAwP/u", false),
        case("MIIB=CgKCAQEAwP/uASNFZ4k=", false),
        case("MIIBCgKCAQEAwP/uASNFZ4k===", false),
        case("MIIBCgKCAQEAwP/uASNFZ4", false),
        case("", false),
    )]
    fn test_is_valid_base64_text(input: &str, expected: bool) {
        assert_eq!(expected, is_valid_base64_text(input));
    }

    #[rstest(input, expected,
        case("plain text\twith tabs\r\nand newlines\n", false),
        case("\u{0}\u{1}\u{2}abcdefgh", true),
        // exactly 10% is not binary
        case("\u{1}bcdefghij", false),
        case("\u{1}\u{2}cdefghij", true),
        case("", false),
    )]
    fn test_is_binary_content(input: &str, expected: bool) {
        assert_eq!(expected, is_binary_content(input));
    }

    #[rstest(bytes,
        case(vec![]),
        case(vec![0x00]),
        case(vec![0xff, 0xfe]),
        case((0..=255).collect::<Vec<u8>>()),
    )]
    fn test_base64_round_trip(bytes: Vec<u8>) {
        assert_eq!(bytes, decode_base64(&encode_base64(&bytes)).unwrap());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(Ok(Format::Base64), "base64".parse());
        assert_eq!(Ok(Format::Der), "DER".parse());
        assert!("p12".parse::<Format>().is_err());
        assert_eq!("HEX", Format::Hex.to_string());
    }
}
