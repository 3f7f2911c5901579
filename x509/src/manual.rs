//! Positional walk over the certificate TLV tree.
//!
//! Used when the typed model declines a key algorithm (SM2 and friends).
//! Only a broken outer structure or a missing mandatory field aborts; damaged
//! names, times, keys or extensions are logged and degraded.

use chrono::{DateTime, Utc};
use kensa::decoder::Decoder;
use kensa_asn1::{BitString, Integer, ObjectIdentifier, parse_time_or_now};
use kensa_der::{Tag, Tlv};
use kensa_oid::{Industry, known, named_curve, resolve};
use tracing::{debug, warn};

use crate::cursor::{Cursor, sequence};
use crate::error::Error;
use crate::extensions::RawExtension;
use crate::name::Name;
use crate::public_key::{ec_info, rsa_public_key};
use crate::record::{ExtensionEntry, Fields, PublicKeyInfo, UNKNOWN, bits_label};

const SM2_KEY_BITS: u64 = 256;
// 0x04 || X || Y on a 256-bit curve
const SM2_POINT_LEN: usize = 65;

pub(crate) fn extract(root: &Tlv, industry: Industry) -> Result<Fields, Error> {
    let mut certificate = Cursor::new(sequence(root, "certificate")?);
    let mut tbs = Cursor::new(certificate.take_sequence("tbsCertificate")?);

    let version = match tbs.take_if(|t| t.tag() == Tag::context_specific(0, true)) {
        Some(explicit) => version(explicit),
        None => 0,
    };
    let serial = tbs.take("serialNumber")?;
    let serial_number = hex::encode_upper(serial.data().unwrap_or_default());

    let mut signature = Cursor::new(tbs.take_sequence("signature")?);
    let signature_algorithm: ObjectIdentifier = signature.take("signature algorithm")?.decode()?;

    let issuer = Name::walk(tbs.take("issuer")?);
    let (valid_from, valid_to) = validity(tbs.take("validity")?);
    let subject = Name::walk(tbs.take("subject")?);
    let public_key = public_key(tbs.take("subjectPublicKeyInfo")?, industry);

    tbs.take_if(|t| t.tag().is_context_specific(1));
    tbs.take_if(|t| t.tag().is_context_specific(2));

    let extensions = match tbs.take_if(|t| t.tag() == Tag::context_specific(3, true)) {
        Some(explicit) => extensions(explicit, industry),
        None => Vec::new(),
    };
    if !tbs.remaining().is_empty() {
        debug!(
            count = tbs.remaining().len(),
            "ignoring trailing tbsCertificate fields"
        );
    }

    Ok(Fields {
        version,
        serial_number,
        signature_algorithm: signature_algorithm.to_string(),
        issuer,
        subject,
        valid_from,
        valid_to,
        public_key,
        extensions,
    })
}

fn version(explicit: &Tlv) -> u64 {
    let value: Option<Result<Integer, _>> = explicit
        .children()
        .and_then(<[Tlv]>::first)
        .map(|tlv| tlv.decode());
    match value {
        Some(Ok(version)) => version.to_u64().unwrap_or_else(|| {
            warn!(%version, "version out of range, assuming v1");
            0
        }),
        Some(Err(e)) => {
            warn!(error = %e, "unreadable version, assuming v1");
            0
        }
        None => {
            warn!("empty version field, assuming v1");
            0
        }
    }
}

fn validity(tlv: &Tlv) -> (DateTime<Utc>, DateTime<Utc>) {
    let times = tlv.children().unwrap_or_default();
    let at = |index: usize| match times.get(index).and_then(Tlv::data) {
        Some(data) => parse_time_or_now(data),
        None => {
            warn!(index, "missing validity time, substituting current time");
            Utc::now()
        }
    };
    (at(0), at(1))
}

fn public_key(spki: &Tlv, industry: Industry) -> PublicKeyInfo {
    walk_public_key(spki, industry).unwrap_or_else(|e| {
        warn!(error = %e, "unreadable subjectPublicKeyInfo");
        PublicKeyInfo::unknown()
    })
}

fn walk_public_key(spki: &Tlv, industry: Industry) -> Result<PublicKeyInfo, Error> {
    let mut fields = Cursor::new(sequence(spki, "subjectPublicKeyInfo")?);
    let mut algorithm = Cursor::new(fields.take_sequence("algorithm")?);
    let oid: ObjectIdentifier = algorithm.take("algorithm")?.decode()?;
    let parameters = algorithm.peek();
    let key: BitString = fields.take("subjectPublicKey")?.decode()?;
    let bytes = key.as_bytes();

    let oid = oid.to_string();
    let info = match oid.as_str() {
        known::SM2 => PublicKeyInfo {
            curve: Some("SM2".to_string()),
            point: (bytes.len() >= SM2_POINT_LEN).then(|| bytes.to_vec()),
            ..PublicKeyInfo::new(resolve(known::SM2, industry), bits_label(SM2_KEY_BITS))
        },
        known::EC_PUBLIC_KEY => {
            let point = (!bytes.is_empty()).then(|| bytes.to_vec());
            let curve: Option<ObjectIdentifier> = parameters.and_then(|p| p.decode().ok());
            let curve = curve.map(|c| c.to_string());
            match curve.as_deref().map(|c| (c, named_curve(c))) {
                Some((_, Some(named))) => ec_info(known::EC_PUBLIC_KEY, named, point, industry),
                Some((unknown_curve, None)) => PublicKeyInfo {
                    curve: Some(unknown_curve.to_string()),
                    point,
                    ..PublicKeyInfo::new(resolve(known::EC_PUBLIC_KEY, industry), UNKNOWN)
                },
                None => PublicKeyInfo {
                    point,
                    ..PublicKeyInfo::new(resolve(known::EC_PUBLIC_KEY, industry), UNKNOWN)
                },
            }
        }
        known::RSA_ENCRYPTION => rsa_public_key(bytes)?.to_info(industry),
        other => PublicKeyInfo::new(resolve(other, industry), UNKNOWN),
    };
    Ok(info)
}

fn extensions(explicit: &Tlv, industry: Industry) -> Vec<ExtensionEntry> {
    let Some(list) = explicit
        .children()
        .and_then(<[Tlv]>::first)
        .and_then(Tlv::children)
    else {
        warn!("extensions field is not a SEQUENCE");
        return Vec::new();
    };
    list.iter()
        .filter_map(|ext| {
            let raw: Result<RawExtension, Error> = ext.decode();
            match raw {
                Ok(raw) => Some(raw.to_entry(industry)),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable extension");
                    None
                }
            }
        })
        .collect()
}
