use std::{
    fmt::{Display, Formatter},
    str::FromStr,
    sync::LazyLock,
};

use base64::{Engine, engine::general_purpose::STANDARD};
use kensa::decoder::{DecodableFrom, Decoder};
use kensa::encoder::{EncodableTo, Encoder};
use regex::Regex;

use crate::error::Error;
use crate::strip_whitespace;

const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";
const RSA_PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";
const EC_PRIVATE_KEY_LABEL: &str = "EC PRIVATE KEY";
const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";
const CERTIFICATE_LABEL: &str = "CERTIFICATE";

const SNIFF_PREFIX: usize = 100;

// Not anchored: header, body and footer may share a single line.
static BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-----(BEGIN|END) ([^-]+)-----").expect("PEM boundary pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// X.509 Certificate
    Certificate,
    /// PKCS#8 private key
    PrivateKey,
    /// PKCS#1 RSA private key
    RsaPrivateKey,
    /// SEC1 EC private key
    EcPrivateKey,
    /// X.509 SubjectPublicKeyInfo
    PublicKey,
    Other(String),
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Certificate => write!(f, "{}", CERTIFICATE_LABEL),
            Label::PrivateKey => write!(f, "{}", PRIVATE_KEY_LABEL),
            Label::RsaPrivateKey => write!(f, "{}", RSA_PRIVATE_KEY_LABEL),
            Label::EcPrivateKey => write!(f, "{}", EC_PRIVATE_KEY_LABEL),
            Label::PublicKey => write!(f, "{}", PUBLIC_KEY_LABEL),
            Label::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        match s.trim() {
            CERTIFICATE_LABEL => Label::Certificate,
            PRIVATE_KEY_LABEL => Label::PrivateKey,
            RSA_PRIVATE_KEY_LABEL => Label::RsaPrivateKey,
            EC_PRIVATE_KEY_LABEL => Label::EcPrivateKey,
            PUBLIC_KEY_LABEL => Label::PublicKey,
            other => Label::Other(other.to_string()),
        }
    }
}

impl Label {
    /// Guesses a label from keywords in the first decoded bytes of `base64`.
    ///
    /// This is a heuristic: the keywords are searched for as raw ASCII, so
    /// binary DER that happens to contain `EC` in its prefix is mislabelled.
    pub fn sniff(base64: &str) -> Label {
        let end = base64
            .char_indices()
            .nth(SNIFF_PREFIX)
            .map_or(base64.len(), |(i, _)| i);
        let Ok(decoded) = STANDARD.decode(&base64[..end]) else {
            return Label::Certificate;
        };
        let contains = |needle: &[u8]| decoded.windows(needle.len()).any(|w| w == needle);
        if contains(b"RSA") {
            Label::RsaPrivateKey
        } else if contains(b"EC") {
            Label::EcPrivateKey
        } else if contains(b"PRIVATE") {
            Label::PrivateKey
        } else if contains(b"PUBLIC") {
            Label::PublicKey
        } else {
            Label::Certificate
        }
    }

    /// Every `-----BEGIN x-----` / `-----END x-----` marker in `text`, with
    /// its byte range.
    fn boundaries(text: &str) -> impl Iterator<Item = Boundary> + '_ {
        BOUNDARY.captures_iter(text).filter_map(|captured| {
            let whole = captured.get(0)?;
            Some(Boundary {
                begin: captured.get(1)?.as_str() == "BEGIN",
                label: Label::from(captured.get(2)?.as_str()),
                start: whole.start(),
                end: whole.end(),
            })
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Boundary {
    begin: bool,
    label: Label,
    start: usize,
    end: usize,
}

/*
ref: https://www.rfc-editor.org/rfc/rfc7468.html#section-3
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pem {
    label: Label,
    base64_data: String, // base64 encoded data, no whitespace
}

impl Pem {
    pub fn new(label: Label, base64_data: String) -> Self {
        Pem { label, base64_data }
    }

    pub fn from_bytes(label: Label, data: &[u8]) -> Self {
        Pem {
            label,
            base64_data: STANDARD.encode(data),
        }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn data(&self) -> &str {
        &self.base64_data
    }
}

impl Display for Pem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "-----BEGIN {}-----", self.label)?;
        // RFC 7468: base64 text should be wrapped at 64 characters
        for chunk in self.base64_data.as_bytes().chunks(64) {
            let line = std::str::from_utf8(chunk).map_err(|_| std::fmt::Error)?;
            writeln!(f, "{}", line)?;
        }
        write!(f, "-----END {}-----", self.label)
    }
}

/// Parses the first PEM block. Text before the BEGIN line is ignored.
impl FromStr for Pem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut boundaries = Label::boundaries(s).skip_while(|b| !b.begin);
        let begin = boundaries.next().ok_or(Error::MissingBeginMarker)?;
        let end = match boundaries.next() {
            Some(end) if !end.begin => end,
            _ => return Err(Error::MissingEndMarker),
        };
        if begin.label != end.label {
            return Err(Error::LabelMismatch {
                begin: begin.label.to_string(),
                end: end.label.to_string(),
            });
        }
        let body = strip_whitespace(&s[begin.end..end.start]);
        if body.is_empty() {
            return Err(Error::InvalidFormat("no data between PEM markers".into()));
        }
        Ok(Pem::new(end.label, body))
    }
}

impl DecodableFrom<Pem> for Vec<u8> {}

impl Decoder<Pem, Vec<u8>> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Vec<u8>, Self::Error> {
        // This discards label information from Pem format.
        Ok(STANDARD.decode(self.data())?)
    }
}

impl EncodableTo<Vec<u8>> for Pem {}

/// Wraps DER bytes as a `CERTIFICATE` block.
impl Encoder<Vec<u8>, Pem> for Vec<u8> {
    type Error = Error;

    fn encode(&self) -> Result<Pem, Self::Error> {
        Ok(Pem::from_bytes(Label::Certificate, self))
    }
}

/// Strips every `-----BEGIN …-----` / `-----END …-----` marker and all whitespace.
pub fn pem_to_base64(text: &str) -> Result<String, Error> {
    let base64 = strip_whitespace(&BOUNDARY.replace_all(text, ""));
    if base64.is_empty() {
        return Err(Error::InvalidFormat("no base64 content in PEM text".into()));
    }
    Ok(base64)
}

/// Wraps Base64 text at 64 columns under a label guessed by [`Label::sniff`].
pub fn base64_to_pem(text: &str) -> Result<String, Error> {
    let base64 = strip_whitespace(text);
    if base64.is_empty() {
        return Err(Error::InvalidFormat("empty base64 text".into()));
    }
    let label = Label::sniff(&base64);
    Ok(Pem::new(label, base64).to_string())
}
