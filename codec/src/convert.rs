use std::str::FromStr;

use kensa::decoder::Decoder;
use tracing::debug;

use crate::error::Error;
use crate::pem::{Pem, base64_to_pem, pem_to_base64};
use crate::{Format, decode_base64, detect_format, encode_base64, strip_whitespace};

const HEX_LINE_WIDTH: usize = 64;

/// Uppercase hex of the decoded bytes, wrapped at 64 characters per line.
pub fn base64_to_hex(text: &str) -> Result<String, Error> {
    let base64 = strip_whitespace(text);
    if base64.is_empty() {
        return Err(Error::InvalidFormat("empty base64 text".into()));
    }
    let bytes = decode_base64(&base64)?;
    let hex = hex::encode_upper(bytes);
    let lines = hex
        .as_bytes()
        .chunks(HEX_LINE_WIDTH)
        .map(|chunk| std::str::from_utf8(chunk).map_err(|e| Error::InvalidFormat(e.to_string())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

/// Base64 of hex text. Whitespace is ignored; odd length or non-hex digits fail.
pub fn hex_to_base64(text: &str) -> Result<String, Error> {
    let hex = strip_whitespace(text);
    if hex.is_empty() {
        return Err(Error::InvalidFormat("empty hex text".into()));
    }
    if hex.len() % 2 != 0 {
        return Err(Error::InvalidFormat("odd number of hex digits".into()));
    }
    let bytes = hex::decode(&hex)?;
    Ok(encode_base64(&bytes))
}

pub fn pem_to_hex(text: &str) -> Result<String, Error> {
    base64_to_hex(&pem_to_base64(text)?)
}

pub fn hex_to_pem(text: &str) -> Result<String, Error> {
    base64_to_pem(&hex_to_base64(text)?)
}

/// Converts between text formats. DER input is Base64 without an envelope.
///
/// Converting *to* DER produces bytes rather than text; use [`to_der_bytes`].
pub fn convert_format(input: &str, from: Format, to: Format) -> Result<String, Error> {
    if input.trim().is_empty() {
        return Err(Error::EmptyInput);
    }
    if from == to {
        return Err(Error::SameFormat(from));
    }
    debug!(%from, %to, "converting");
    match (from, to) {
        (Format::Pem, Format::Base64) => pem_to_base64(input),
        (Format::Pem, Format::Hex) => pem_to_hex(input),
        (Format::Base64, Format::Pem) => base64_to_pem(input),
        (Format::Base64, Format::Hex) => base64_to_hex(input),
        (Format::Hex, Format::Pem) => hex_to_pem(input),
        (Format::Hex, Format::Base64) => hex_to_base64(input),
        (Format::Der, Format::Pem) => base64_to_pem(&strip_whitespace(input)),
        (Format::Der, Format::Base64) => Ok(strip_whitespace(input)),
        (Format::Der, Format::Hex) => base64_to_hex(input),
        (from, to) => Err(Error::UnsupportedConversion { from, to }),
    }
}

/// Binary DER for text in `source` format. PEM input yields the first block.
pub fn to_der_bytes(input: &str, source: Format) -> Result<Vec<u8>, Error> {
    if input.trim().is_empty() {
        return Err(Error::EmptyInput);
    }
    match source {
        Format::Pem => Pem::from_str(input)?.decode(),
        Format::Base64 | Format::Der => decode_base64(input),
        Format::Hex => decode_base64(&hex_to_base64(input)?),
    }
}

/// Detects the format of `input` and decodes it to DER bytes.
pub fn to_der(input: &str) -> Result<Vec<u8>, Error> {
    if input.trim().is_empty() {
        return Err(Error::EmptyInput);
    }
    let format = detect_format(input).ok_or(Error::UnrecognizedFormat)?;
    debug!(%format, "detected input format");
    to_der_bytes(input, format)
}
