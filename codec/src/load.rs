use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::Error;
use crate::{Format, detect_format, encode_base64, is_binary_content, is_valid_base64_text};

const DEFAULT_DER_FILE_NAME: &str = "certificate.der";

static TEXT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(pem|crt|cer|txt)$").expect("suffix pattern is valid"));

/// File content prepared for conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedInput {
    /// Text handed to the converter. Binary files are carried as Base64.
    pub text: String,
    /// Format the content was classified as, if any.
    pub format: Option<Format>,
    pub from_binary: bool,
    /// Set when the content was loaded but matches no known format.
    pub warning: Option<String>,
}

/// Classifies raw file bytes.
///
/// Content that is not UTF-8, or is mostly control characters, is treated as
/// binary DER and re-encoded as Base64 with [`Format::Der`].
pub fn load_input(bytes: &[u8]) -> Result<LoadedInput, Error> {
    if bytes.is_empty() {
        return Err(Error::EmptyInput);
    }

    let text = match std::str::from_utf8(bytes) {
        Ok(text) if !is_binary_content(text) => text,
        _ => {
            debug!(len = bytes.len(), "loaded binary content");
            return Ok(LoadedInput {
                text: encode_base64(bytes),
                format: Some(Format::Der),
                from_binary: true,
                warning: None,
            });
        }
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyInput);
    }

    // hex digits are also Base64 characters, so hex is settled first
    let format = match detect_format(trimmed) {
        Some(Format::Pem) => Some(Format::Pem),
        Some(Format::Hex) => Some(Format::Hex),
        _ if is_valid_base64_text(trimmed) => Some(Format::Base64),
        detected => detected,
    };

    let warning = match format {
        Some(_) => None,
        None => {
            warn!("input does not look like PEM, Base64 or hex");
            Some("content loaded but its format could not be recognised".to_string())
        }
    };

    Ok(LoadedInput {
        text: trimmed.to_string(),
        format,
        from_binary: false,
        warning,
    })
}

/// Name for a downloaded DER file derived from the input file name.
pub fn der_file_name(name: Option<&str>) -> String {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return DEFAULT_DER_FILE_NAME.to_string();
    };
    if TEXT_SUFFIX.is_match(name) {
        return TEXT_SUFFIX.replace(name, ".der").into_owned();
    }
    if name.to_ascii_lowercase().ends_with(".der") {
        name.to_string()
    } else {
        format!("{}.der", name)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::to_der_bytes;

    const RSA_PEM: &str = include_str!("../../testdata/certs/rsa.pem");
    const RSA_DER: &[u8] = include_bytes!("../../testdata/certs/rsa.der");

    #[test]
    fn test_load_binary() {
        let loaded = load_input(RSA_DER).unwrap();
        assert!(loaded.from_binary);
        assert_eq!(Some(Format::Der), loaded.format);
        assert_eq!(None, loaded.warning);
        assert_eq!(RSA_DER, to_der_bytes(&loaded.text, Format::Der).unwrap().as_slice());
    }

    #[test]
    fn test_load_pem() {
        let loaded = load_input(RSA_PEM.as_bytes()).unwrap();
        assert!(!loaded.from_binary);
        assert_eq!(Some(Format::Pem), loaded.format);
        assert_eq!(RSA_PEM.trim(), loaded.text);
    }

    #[rstest(input, expected,
        case("MIIBCgKCAQEAwP/uASNFZ4k=\n", Some(Format::Base64)),
        case("30 82 01 0A 02 82 01 01 00 C0 FF EE", Some(Format::Hex)),
        case("just some notes, nothing more", None),
    )]
    fn test_load_text(input: &str, expected: Option<Format>) {
        let loaded = load_input(input.as_bytes()).unwrap();
        assert_eq!(expected, loaded.format);
        assert_eq!(expected.is_none(), loaded.warning.is_some());
        assert!(!loaded.from_binary);
    }

    #[rstest(input,
        case(b"".as_slice()),
        case(b"  \n\t ".as_slice()),
    )]
    fn test_load_empty(input: &[u8]) {
        assert_eq!(Err(Error::EmptyInput), load_input(input));
    }

    #[rstest(name, expected,
        case(Some("server.pem"), "server.der"),
        case(Some("server.CRT"), "server.der"),
        case(Some("chain.cer"), "chain.der"),
        case(Some("dump.txt"), "dump.der"),
        case(Some("server.der"), "server.der"),
        case(Some("server.pem.bak"), "server.pem.bak.der"),
        case(Some("certificate"), "certificate.der"),
        case(Some("  "), "certificate.der"),
        case(None, "certificate.der"),
    )]
    fn test_der_file_name(name: Option<&str>, expected: &str) {
        assert_eq!(expected, der_file_name(name));
    }
}
