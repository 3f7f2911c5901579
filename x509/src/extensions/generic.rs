//! Rendering for extensions without a dedicated decoder.

use kensa_asn1::Element;
use kensa_der::Tlv;
use kensa_oid::{Industry, resolve};

use crate::spaced_hex;

const MAX_ITEMS: usize = 10;

pub(crate) fn describe(oid: &str, tlv: &Tlv, industry: Industry) -> String {
    format!("OID: {}\n{}", oid, describe_value(tlv, industry))
}

fn describe_value(tlv: &Tlv, industry: Industry) -> String {
    match Element::try_from(tlv) {
        Ok(Element::Sequence([])) => "SEQUENCE (0 items)".to_string(),
        Ok(Element::Sequence(items)) => {
            let mut lines = items
                .iter()
                .take(MAX_ITEMS)
                .enumerate()
                .map(|(i, item)| format!("[{}] {}", i, describe_item(item, industry)))
                .collect::<Vec<_>>();
            if items.len() > MAX_ITEMS {
                lines.push("...(more items)".to_string());
            }
            lines.join("\n")
        }
        Ok(Element::OctetString(data)) => format!("Hex: {}", spaced_hex(data)),
        Ok(Element::String(s)) => format!("String: {}", s),
        Ok(Element::Integer(i)) => format!("Integer: {}", i.to_hex()),
        Ok(Element::Boolean(b)) => format!("Boolean: {}", b),
        Ok(Element::ObjectIdentifier(oid)) => {
            format!("OID: {}", resolve(&oid.to_string(), industry))
        }
        _ => format!("Type {}: {}", tlv.tag().number(), spaced_hex(&content(tlv))),
    }
}

fn describe_item(item: &Tlv, industry: Industry) -> String {
    match Element::try_from(item) {
        Ok(Element::String(s)) => format!("String: {}", s),
        Ok(Element::Integer(i)) => format!("Integer: {}", i.to_hex()),
        Ok(Element::OctetString(data)) => format!("Octets: {}", spaced_hex(data)),
        Ok(Element::ObjectIdentifier(oid)) => {
            format!("OID: {}", resolve(&oid.to_string(), industry))
        }
        Ok(Element::Boolean(b)) => format!("Boolean: {}", b),
        _ => format!("Type {}", item.tag().number()),
    }
}

fn content(tlv: &Tlv) -> Vec<u8> {
    tlv.data().map(<[u8]>::to_vec).unwrap_or_default()
}
