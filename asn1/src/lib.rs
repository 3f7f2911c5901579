use std::fmt::Display;

use chrono::{DateTime, Utc};
use kensa::decoder::{DecodableFrom, Decoder};
use kensa_der::{Tag, TagClass, Tlv};
use num_bigint::BigInt;
use num_traits::ToPrimitive;

pub mod error;
mod string;
mod time;

pub use error::Error;
pub use string::decode_string;
pub use time::{parse_generalized_time, parse_time_or_now, parse_utc_time};

/// Borrowed, typed view of a single DER node.
#[derive(Debug, Clone, PartialEq)]
pub enum Element<'a> {
    Boolean(bool),
    Integer(Integer),
    BitString(BitString),
    OctetString(&'a [u8]),
    Null,
    ObjectIdentifier(ObjectIdentifier),
    String(String),
    UtcTime(DateTime<Utc>),
    GeneralizedTime(DateTime<Utc>),
    Sequence(&'a [Tlv]),
    Set(&'a [Tlv]),
    ContextSpecific { number: u32, tlv: &'a Tlv },
    Unimplemented(&'a Tlv),
}

impl<'a> TryFrom<&'a Tlv> for Element<'a> {
    type Error = Error;

    fn try_from(tlv: &'a Tlv) -> Result<Self, Self::Error> {
        let tag = tlv.tag();
        if tag.class() == TagClass::ContextSpecific {
            return Ok(Element::ContextSpecific {
                number: tag.number(),
                tlv,
            });
        }
        if tag.class() != TagClass::Universal {
            return Ok(Element::Unimplemented(tlv));
        }

        if let Some(children) = tlv.children() {
            return Ok(match tag {
                Tag::SEQUENCE => Element::Sequence(children),
                Tag::SET => Element::Set(children),
                _ => Element::Unimplemented(tlv),
            });
        }

        let data = primitive(tlv)?;
        let element = match tag {
            Tag::BOOLEAN => Element::Boolean(boolean(tlv)?),
            Tag::INTEGER => Element::Integer(tlv.decode()?),
            Tag::BIT_STRING => Element::BitString(tlv.decode()?),
            Tag::OCTET_STRING => Element::OctetString(data),
            Tag::NULL => Element::Null,
            Tag::OBJECT_IDENTIFIER => Element::ObjectIdentifier(tlv.decode()?),
            Tag::UTC_TIME => Element::UtcTime(parse_utc_time(data)?),
            Tag::GENERALIZED_TIME => Element::GeneralizedTime(parse_generalized_time(data)?),
            t if t.is_string() => Element::String(decode_string(t, data)),
            _ => Element::Unimplemented(tlv),
        };
        Ok(element)
    }
}

fn primitive(tlv: &Tlv) -> Result<&[u8], Error> {
    tlv.data().ok_or(Error::NotPrimitive(tlv.tag()))
}

fn expect_tag(tlv: &Tlv, expected: Tag) -> Result<&[u8], Error> {
    if tlv.tag() != expected {
        return Err(Error::UnexpectedTag {
            expected,
            actual: tlv.tag(),
        });
    }
    primitive(tlv)
}

/// Reads a DER BOOLEAN. Only the first content octet is inspected.
pub fn boolean(tlv: &Tlv) -> Result<bool, Error> {
    let data = expect_tag(tlv, Tag::BOOLEAN)?;
    data.first()
        .map(|b| *b == 0xff)
        .ok_or(Error::InvalidBoolean)
}

// ASN.1 INTEGER is arbitrary size and signed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Integer {
    inner: BigInt,
}

impl Integer {
    pub fn as_bigint(&self) -> &BigInt {
        &self.inner
    }

    pub fn to_u32(&self) -> Option<u32> {
        self.inner.to_u32()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.inner.to_u64()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.inner.to_i64()
    }

    /// Two's complement big-endian bytes, uppercase hex, no separators.
    pub fn to_hex(&self) -> String {
        self.inner
            .to_signed_bytes_be()
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect()
    }
}

impl From<&[u8]> for Integer {
    fn from(value: &[u8]) -> Self {
        Integer {
            inner: BigInt::from_signed_bytes_be(value),
        }
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Integer {
            inner: BigInt::from(value),
        }
    }
}

impl Display for Integer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl DecodableFrom<Tlv> for Integer {}

impl Decoder<Tlv, Integer> for Tlv {
    type Error = Error;

    fn decode(&self) -> Result<Integer, Self::Error> {
        let data = expect_tag(self, Tag::INTEGER)?;
        if data.is_empty() {
            return Err(Error::IntegerNoData);
        }
        Ok(Integer::from(data))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentifier {
    inner: Vec<u64>,
}

impl ObjectIdentifier {
    pub fn arcs(&self) -> &[u64] {
        &self.inner
    }
}

impl TryFrom<&[u8]> for ObjectIdentifier {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(Error::ObjectIdentifierNoData);
        }

        let mut subidentifiers = Vec::new();
        let mut val = 0u64;
        let mut pending = false;
        for b in value {
            if val > (u64::MAX >> 7) {
                return Err(Error::ObjectIdentifierOverflow);
            }
            val = (val << 7) | (*b as u64 & 0x7f);
            pending = true;
            if *b & 0x80 == 0 {
                subidentifiers.push(val);
                val = 0;
                pending = false;
            }
        }
        if pending {
            return Err(Error::ObjectIdentifierIncompleteEncoding);
        }

        // The first subidentifier packs the first two arcs as 40 * X + Y.
        let mut inner = Vec::with_capacity(subidentifiers.len() + 1);
        let first = subidentifiers[0];
        match first {
            0..40 => inner.extend([0, first]),
            40..80 => inner.extend([1, first - 40]),
            _ => inner.extend([2, first - 80]),
        }
        inner.extend_from_slice(&subidentifiers[1..]);

        Ok(ObjectIdentifier { inner })
    }
}

impl Display for ObjectIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self
            .inner
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", s)
    }
}

impl DecodableFrom<Tlv> for ObjectIdentifier {}

impl Decoder<Tlv, ObjectIdentifier> for Tlv {
    type Error = Error;

    fn decode(&self) -> Result<ObjectIdentifier, Self::Error> {
        let data = expect_tag(self, Tag::OBJECT_IDENTIFIER)?;
        ObjectIdentifier::try_from(data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitString {
    unused: u8,
    data: Vec<u8>,
}

impl BitString {
    pub fn unused_bits(&self) -> u8 {
        self.unused
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.unused as usize)
    }

    /// Named bit `index`, counting from the most significant bit of the first octet.
    pub fn bit(&self, index: usize) -> bool {
        if index >= self.bit_len() {
            return false;
        }
        let byte = self.data[index / 8];
        byte & (0x80 >> (index % 8)) != 0
    }
}

impl TryFrom<&[u8]> for BitString {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let (&unused, data) = value.split_first().ok_or(Error::BitStringNoData)?;
        if unused > 7 {
            return Err(Error::BitStringUnusedBitsOutOfRange(unused));
        }
        Ok(BitString {
            unused,
            data: data.to_vec(),
        })
    }
}

impl DecodableFrom<Tlv> for BitString {}

impl Decoder<Tlv, BitString> for Tlv {
    type Error = Error;

    fn decode(&self) -> Result<BitString, Self::Error> {
        let data = expect_tag(self, Tag::BIT_STRING)?;
        BitString::try_from(data)
    }
}

/// Content octets of an OCTET STRING node.
pub fn octet_string(tlv: &Tlv) -> Result<&[u8], Error> {
    expect_tag(tlv, Tag::OCTET_STRING)
}
