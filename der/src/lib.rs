//! DER tag/length/value decoding.
//!
//! This is the only layer that touches raw certificate bytes. It knows
//! nothing about X.509: it turns a buffer into a tree of [`Tlv`] nodes and
//! back again.
//!
//! ```
//! use kensa::decoder::Decoder;
//! use kensa_der::{Der, Tag};
//!
//! let der: Der = vec![0x30, 0x03, 0x02, 0x01, 0x07].decode().unwrap();
//! let root = der.root().unwrap();
//! assert_eq!(root.tag(), Tag::SEQUENCE);
//! assert_eq!(root.children().unwrap().len(), 1);
//! ```

use std::fmt::{self, Display, Formatter};

use kensa::decoder::{DecodableFrom, Decoder};
use kensa::encoder::{EncodableTo, Encoder};
use nom::bytes::complete::take;
use nom::number::complete::be_u8;
use nom::{IResult, Parser};

pub mod error;

pub use error::Error;

const CLASS_MASK: u8 = 0xc0;
const CONSTRUCTED_BIT: u8 = 0x20;
const LOW_TAG_MASK: u8 = 0x1f;
const LONG_FORM_BIT: u8 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagClass {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl TagClass {
    fn from_bits(b: u8) -> Self {
        match b & CLASS_MASK {
            0x00 => TagClass::Universal,
            0x40 => TagClass::Application,
            0x80 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }

    fn bits(self) -> u8 {
        match self {
            TagClass::Universal => 0x00,
            TagClass::Application => 0x40,
            TagClass::ContextSpecific => 0x80,
            TagClass::Private => 0xc0,
        }
    }
}

/// Decoded identifier octets: class, tag number and the constructed bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    class: TagClass,
    number: u32,
    constructed: bool,
}

impl Tag {
    pub const BOOLEAN: Tag = Tag::universal(0x01, false);
    pub const INTEGER: Tag = Tag::universal(0x02, false);
    pub const BIT_STRING: Tag = Tag::universal(0x03, false);
    pub const OCTET_STRING: Tag = Tag::universal(0x04, false);
    pub const NULL: Tag = Tag::universal(0x05, false);
    pub const OBJECT_IDENTIFIER: Tag = Tag::universal(0x06, false);
    pub const UTF8_STRING: Tag = Tag::universal(0x0c, false);
    pub const SEQUENCE: Tag = Tag::universal(0x10, true);
    pub const SET: Tag = Tag::universal(0x11, true);
    pub const NUMERIC_STRING: Tag = Tag::universal(0x12, false);
    pub const PRINTABLE_STRING: Tag = Tag::universal(0x13, false);
    pub const T61_STRING: Tag = Tag::universal(0x14, false);
    pub const IA5_STRING: Tag = Tag::universal(0x16, false);
    pub const UTC_TIME: Tag = Tag::universal(0x17, false);
    pub const GENERALIZED_TIME: Tag = Tag::universal(0x18, false);
    pub const VISIBLE_STRING: Tag = Tag::universal(0x1a, false);
    pub const UNIVERSAL_STRING: Tag = Tag::universal(0x1c, false);
    pub const BMP_STRING: Tag = Tag::universal(0x1e, false);

    pub const fn new(class: TagClass, number: u32, constructed: bool) -> Self {
        Tag {
            class,
            number,
            constructed,
        }
    }

    pub const fn universal(number: u32, constructed: bool) -> Self {
        Tag::new(TagClass::Universal, number, constructed)
    }

    pub const fn context_specific(number: u32, constructed: bool) -> Self {
        Tag::new(TagClass::ContextSpecific, number, constructed)
    }

    pub fn class(&self) -> TagClass {
        self.class
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// True for `[number]` in the context-specific class, primitive or constructed.
    pub fn is_context_specific(&self, number: u32) -> bool {
        self.class == TagClass::ContextSpecific && self.number == number
    }

    /// True for universal string types whose content is character data.
    pub fn is_string(&self) -> bool {
        self.class == TagClass::Universal
            && matches!(
                self.number,
                0x0c | 0x12 | 0x13 | 0x14 | 0x16 | 0x1a | 0x1c | 0x1e
            )
    }

    pub fn universal_name(&self) -> Option<&'static str> {
        if self.class != TagClass::Universal {
            return None;
        }
        let name = match self.number {
            0x01 => "BOOLEAN",
            0x02 => "INTEGER",
            0x03 => "BIT STRING",
            0x04 => "OCTET STRING",
            0x05 => "NULL",
            0x06 => "OBJECT IDENTIFIER",
            0x0a => "ENUMERATED",
            0x0c => "UTF8String",
            0x10 => "SEQUENCE",
            0x11 => "SET",
            0x12 => "NumericString",
            0x13 => "PrintableString",
            0x14 => "T61String",
            0x16 => "IA5String",
            0x17 => "UTCTime",
            0x18 => "GeneralizedTime",
            0x1a => "VisibleString",
            0x1c => "UniversalString",
            0x1e => "BMPString",
            _ => return None,
        };
        Some(name)
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.class {
            TagClass::Universal => match self.universal_name() {
                Some(name) => write!(f, "{}", name),
                None => write!(f, "UNIVERSAL {}", self.number),
            },
            TagClass::Application => write!(f, "[APPLICATION {}]", self.number),
            TagClass::ContextSpecific => write!(f, "[{}]", self.number),
            TagClass::Private => write!(f, "[PRIVATE {}]", self.number),
        }
    }
}

/// Content of a node: raw octets, or the children of a constructed encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Primitive(Vec<u8>),
    Constructed(Vec<Tlv>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    tag: Tag,
    value: Value,
}

impl Tlv {
    pub fn new_primitive(tag: Tag, data: Vec<u8>) -> Self {
        Tlv {
            tag,
            value: Value::Primitive(data),
        }
    }

    pub fn new_constructed(tag: Tag, children: Vec<Tlv>) -> Self {
        Tlv {
            tag,
            value: Value::Constructed(children),
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Raw content octets of a primitive node.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Primitive(data) => Some(data),
            Value::Constructed(_) => None,
        }
    }

    /// Children of a constructed node.
    pub fn children(&self) -> Option<&[Tlv]> {
        match &self.value {
            Value::Primitive(_) => None,
            Value::Constructed(children) => Some(children),
        }
    }

    /// Number of content octets this node occupies once encoded.
    pub fn content_len(&self) -> usize {
        match &self.value {
            Value::Primitive(data) => data.len(),
            Value::Constructed(children) => children.iter().map(Tlv::encoded_len).sum(),
        }
    }

    /// Full encoded size including identifier and length octets.
    pub fn encoded_len(&self) -> usize {
        let content = self.content_len();
        tag_len(&self.tag) + length_len(content) + content
    }

    /// Parses a single TLV, returning the unconsumed remainder.
    ///
    /// Constructed values nested more than [`MAX_DEPTH`] levels below the
    /// outermost TLV are rejected with [`Error::NestingTooDeep`].
    pub fn parse(input: &[u8]) -> IResult<&[u8], Tlv, Error> {
        Self::parse_nested(input, 0)
    }

    fn parse_nested(input: &[u8], depth: usize) -> IResult<&[u8], Tlv, Error> {
        if depth > MAX_DEPTH {
            return Err(nom::Err::Failure(Error::NestingTooDeep(MAX_DEPTH)));
        }
        let (input, tag) = parse_tag(input)?;
        let (input, length) = parse_length(input)?;
        if length > input.len() {
            return Err(nom::Err::Failure(Error::LengthOverrun {
                declared: length,
                remaining: input.len(),
            }));
        }
        let (input, content) = take::<usize, &[u8], Error>(length).parse(input)?;

        if tag.constructed {
            let mut children = Vec::new();
            let mut rest = content;
            while !rest.is_empty() {
                let (next, child) = Self::parse_nested(rest, depth + 1)?;
                children.push(child);
                rest = next;
            }
            return Ok((input, Tlv::new_constructed(tag, children)));
        }

        Ok((input, Tlv::new_primitive(tag, content.to_vec())))
    }

    fn write_tree(&self, f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match &self.value {
            Value::Constructed(children) => {
                writeln!(
                    f,
                    "{}{} ({} bytes, {} items)",
                    indent,
                    self.tag,
                    self.content_len(),
                    children.len()
                )?;
                for child in children {
                    child.write_tree(f, depth + 1)?;
                }
                Ok(())
            }
            Value::Primitive(data) => {
                writeln!(
                    f,
                    "{}{} ({} bytes): {}",
                    indent,
                    self.tag,
                    data.len(),
                    preview(&self.tag, data)
                )
            }
        }
    }
}

impl Display for Tlv {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

const PREVIEW_BYTES: usize = 32;

/// Deepest nesting accepted by [`Tlv::parse`]. Certificates stay below ten.
pub const MAX_DEPTH: usize = 64;

fn preview(tag: &Tag, data: &[u8]) -> String {
    let textual = tag.is_string() || *tag == Tag::UTC_TIME || *tag == Tag::GENERALIZED_TIME;
    if textual && *tag != Tag::BMP_STRING {
        if let Ok(s) = std::str::from_utf8(data) {
            return format!("\"{}\"", s);
        }
    }
    let mut out = data
        .iter()
        .take(PREVIEW_BYTES)
        .map(|b| format!("{:02X}", b))
        .collect::<String>();
    if data.len() > PREVIEW_BYTES {
        out.push_str("...");
    }
    out
}

/// Every top-level TLV found in a buffer. Certificates have exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Der {
    elements: Vec<Tlv>,
}

impl Der {
    pub fn new(elements: Vec<Tlv>) -> Self {
        Der { elements }
    }

    pub fn elements(&self) -> &[Tlv] {
        &self.elements
    }

    pub fn root(&self) -> Option<&Tlv> {
        self.elements.first()
    }
}

impl Display for Der {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for tlv in &self.elements {
            write!(f, "{}", tlv)?;
        }
        Ok(())
    }
}

/// Decodes the first TLV in `bytes`. Trailing data is ignored.
pub fn decode(bytes: &[u8]) -> Result<Tlv, Error> {
    if bytes.is_empty() {
        return Err(Error::Empty);
    }
    let (_, tlv) = Tlv::parse(bytes)?;
    Ok(tlv)
}

fn decode_all(bytes: &[u8]) -> Result<Der, Error> {
    if bytes.is_empty() {
        return Err(Error::Empty);
    }
    let mut elements = Vec::new();
    let mut rest = bytes;
    while !rest.is_empty() {
        let (next, tlv) = Tlv::parse(rest)?;
        elements.push(tlv);
        rest = next;
    }
    Ok(Der { elements })
}

impl DecodableFrom<Vec<u8>> for Der {}

impl Decoder<Vec<u8>, Der> for Vec<u8> {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        decode_all(self)
    }
}

impl DecodableFrom<&[u8]> for Der {}

impl Decoder<&[u8], Der> for &[u8] {
    type Error = Error;

    fn decode(&self) -> Result<Der, Self::Error> {
        decode_all(self)
    }
}

impl EncodableTo<Tlv> for Vec<u8> {}

impl Encoder<Tlv, Vec<u8>> for Tlv {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        let mut out = Vec::with_capacity(self.encoded_len());
        write_tlv(self, &mut out);
        Ok(out)
    }
}

impl EncodableTo<Der> for Vec<u8> {}

impl Encoder<Der, Vec<u8>> for Der {
    type Error = Error;

    fn encode(&self) -> Result<Vec<u8>, Self::Error> {
        let mut out = Vec::new();
        for tlv in &self.elements {
            write_tlv(tlv, &mut out);
        }
        Ok(out)
    }
}

fn byte(input: &[u8], err: Error) -> IResult<&[u8], u8, Error> {
    be_u8::<&[u8], Error>(input).map_err(|_| nom::Err::Failure(err))
}

fn parse_tag(input: &[u8]) -> IResult<&[u8], Tag, Error> {
    let (mut input, first) = byte(input, Error::TruncatedTag)?;
    let class = TagClass::from_bits(first);
    let constructed = first & CONSTRUCTED_BIT != 0;

    if first & LOW_TAG_MASK != LOW_TAG_MASK {
        let number = (first & LOW_TAG_MASK) as u32;
        return Ok((input, Tag::new(class, number, constructed)));
    }

    // high-tag-number form: base-128 digits, high bit marks continuation
    let mut number = 0u32;
    loop {
        let (rest, b) = byte(input, Error::TruncatedTag)?;
        input = rest;
        if number > (u32::MAX >> 7) {
            return Err(nom::Err::Failure(Error::TagNumberOverflow));
        }
        number = (number << 7) | (b & 0x7f) as u32;
        if b & 0x80 == 0 {
            break;
        }
    }
    Ok((input, Tag::new(class, number, constructed)))
}

fn parse_length(input: &[u8]) -> IResult<&[u8], usize, Error> {
    let (input, n) = byte(input, Error::TruncatedLength)?;
    if n & LONG_FORM_BIT == 0 {
        // short form: 0-127
        return Ok((input, n as usize));
    }

    let count = n & 0x7f;
    if count == 0 {
        return Err(nom::Err::Failure(Error::IndefiniteLength));
    }
    if count as usize > std::mem::size_of::<usize>() {
        return Err(nom::Err::Failure(Error::LengthTooLarge(count)));
    }
    if input.len() < count as usize {
        return Err(nom::Err::Failure(Error::TruncatedLength));
    }
    let (input, octets) = take::<usize, &[u8], Error>(count as usize).parse(input)?;
    let length = octets.iter().fold(0usize, |n, &b| (n << 8) | b as usize);
    Ok((input, length))
}

fn tag_len(tag: &Tag) -> usize {
    if tag.number < LOW_TAG_MASK as u32 {
        return 1;
    }
    let mut n = tag.number;
    let mut digits = 1;
    while n >= 0x80 {
        n >>= 7;
        digits += 1;
    }
    1 + digits
}

fn length_len(length: usize) -> usize {
    if length < 0x80 {
        return 1;
    }
    let octets = (usize::BITS - length.leading_zeros()).div_ceil(8) as usize;
    1 + octets
}

fn write_tlv(tlv: &Tlv, out: &mut Vec<u8>) {
    let tag = tlv.tag;
    let mut first = tag.class.bits();
    if tag.constructed {
        first |= CONSTRUCTED_BIT;
    }
    if tag.number < LOW_TAG_MASK as u32 {
        out.push(first | tag.number as u8);
    } else {
        out.push(first | LOW_TAG_MASK);
        let mut digits = Vec::new();
        let mut n = tag.number;
        loop {
            digits.push((n & 0x7f) as u8);
            n >>= 7;
            if n == 0 {
                break;
            }
        }
        while let Some(d) = digits.pop() {
            out.push(if digits.is_empty() { d } else { d | 0x80 });
        }
    }

    let length = tlv.content_len();
    if length < 0x80 {
        out.push(length as u8);
    } else {
        let octets = length.to_be_bytes();
        let skip = octets.iter().take_while(|b| **b == 0).count();
        out.push(LONG_FORM_BIT | (octets.len() - skip) as u8);
        out.extend_from_slice(&octets[skip..]);
    }

    match &tlv.value {
        Value::Primitive(data) => out.extend_from_slice(data),
        Value::Constructed(children) => {
            for child in children {
                write_tlv(child, out);
            }
        }
    }
}
