use kensa_der::Tag;

/// Decodes the content of a directory-string style value.
///
/// BMPString is UTF-16BE and UniversalString is UCS-4. For every other string
/// type the bytes are treated as UTF-8 only when a multi-byte lead octet
/// (`>= 0xC0`) is present; otherwise each byte maps to one code point. This
/// is an approximation: it mis-renders genuine Latin-1 text that happens to
/// contain such octets, and falls back to Latin-1 when UTF-8 decoding fails.
pub fn decode_string(tag: Tag, data: &[u8]) -> String {
    match tag {
        Tag::BMP_STRING => decode_bmp_string(data),
        Tag::UNIVERSAL_STRING => decode_universal_string(data),
        _ if data.iter().any(|b| *b >= 0xc0) => match std::str::from_utf8(data) {
            Ok(s) => s.to_string(),
            Err(_) => decode_latin1(data),
        },
        _ => decode_latin1(data),
    }
}

fn decode_latin1(data: &[u8]) -> String {
    data.iter().map(|b| *b as char).collect()
}

fn decode_bmp_string(data: &[u8]) -> String {
    let units = data
        .chunks_exact(2)
        .map(|c| u16::from_be_bytes([c[0], c[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

fn decode_universal_string(data: &[u8]) -> String {
    data.chunks_exact(4)
        .map(|c| {
            char::from_u32(u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                .unwrap_or(char::REPLACEMENT_CHARACTER)
        })
        .collect()
}
