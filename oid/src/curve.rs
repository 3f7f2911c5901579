use crate::known;

/// A named elliptic curve the public-key walker recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedCurve {
    pub oid: &'static str,
    pub name: &'static str,
    pub alias: Option<&'static str>,
    pub bits: u32,
}

const CURVES: &[NamedCurve] = &[
    NamedCurve {
        oid: known::SECP256R1,
        name: "P-256",
        alias: Some("secp256r1"),
        bits: 256,
    },
    NamedCurve {
        oid: known::SECP384R1,
        name: "P-384",
        alias: Some("secp384r1"),
        bits: 384,
    },
    NamedCurve {
        oid: known::SECP521R1,
        name: "P-521",
        alias: Some("secp521r1"),
        bits: 521,
    },
    NamedCurve {
        oid: known::SM2,
        name: "SM2",
        alias: None,
        bits: 256,
    },
];

pub fn named_curve(oid: &str) -> Option<&'static NamedCurve> {
    CURVES.iter().find(|c| c.oid == oid)
}
