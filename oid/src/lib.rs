//! Human-readable names for object identifiers.
//!
//! Resolution consults the overlay of the selected [`Industry`] first, then
//! the base table, and finally returns the dotted OID unchanged. It never
//! fails. All tables are immutable statics built on first use.
//!
//! ```
//! use kensa_oid::{Industry, resolve};
//!
//! assert_eq!(resolve("1.2.840.113549.1.1.1", Industry::Standard), "RSA");
//! assert_eq!(resolve("1.2.156.10197.6.1.4.2.2", Industry::Tax), "Taxpayer Identification Number");
//! assert_eq!(resolve("1.2.3.4", Industry::Customs), "1.2.3.4");
//! ```

use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

mod curve;
pub mod error;
pub mod known;
mod table;

pub use curve::{NamedCurve, named_curve};
pub use error::Error;
pub use table::{OidTable, attribute_short_name};

/// Selects which overlay table takes precedence over the base names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    #[default]
    Standard,
    Tax,
    Customs,
}

impl Industry {
    pub const ALL: [Industry; 3] = [Industry::Standard, Industry::Tax, Industry::Customs];

    pub fn overlay(self) -> &'static OidTable {
        match self {
            Industry::Standard => &table::STANDARD,
            Industry::Tax => &table::TAX,
            Industry::Customs => &table::CUSTOMS,
        }
    }
}

impl Display for Industry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Industry::Standard => write!(f, "standard"),
            Industry::Tax => write!(f, "tax"),
            Industry::Customs => write!(f, "customs"),
        }
    }
}

impl FromStr for Industry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Industry::Standard),
            "tax" => Ok(Industry::Tax),
            "customs" => Ok(Industry::Customs),
            _ => Err(Error::UnknownIndustry(s.to_string())),
        }
    }
}

pub fn base_table() -> &'static OidTable {
    &table::BASE
}

/// Name from the industry overlay only. Used to surface industry attributes.
pub fn industry_name(oid: &str, industry: Industry) -> Option<&'static str> {
    industry.overlay().get(oid)
}

/// Display name for `oid`: industry overlay, then base table, then `oid` itself.
pub fn resolve(oid: &str, industry: Industry) -> Cow<'_, str> {
    industry_name(oid, industry)
        .or_else(|| table::BASE.get(oid))
        .map(Cow::Borrowed)
        .unwrap_or(Cow::Borrowed(oid))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest(oid, industry, expected,
        case("1.2.840.113549.1.1.1", Industry::Standard, "RSA"),
        case("1.2.840.113549.1.1.11", Industry::Tax, "SHA256withRSA"),
        case("1.2.156.10197.1.301", Industry::Customs, "SM2"),
        case("1.2.156.10197.1.501", Industry::Standard, "SM3withSM2"),
        case("2.5.29.19", Industry::Standard, "Basic Constraints"),
        case("1.3.6.1.5.5.7.3.1", Industry::Standard, "Server Authentication"),
        case("1.2.156.10197.6.1.4.2.2", Industry::Tax, "Taxpayer Identification Number"),
        case("1.2.156.10197.6.1.4.3.2", Industry::Customs, "E-Port Card Number"),
        // overlays are independent
        case("1.2.156.10197.6.1.4.2.2", Industry::Standard, "1.2.156.10197.6.1.4.2.2"),
        case("1.2.156.10197.6.1.4.2.2", Industry::Customs, "1.2.156.10197.6.1.4.2.2"),
        case("1.2.156.10197.6.1.4.3.1", Industry::Tax, "1.2.156.10197.6.1.4.3.1"),
        case("1.2.3.4.5.6.7", Industry::Standard, "1.2.3.4.5.6.7"),
        case("", Industry::Standard, ""),
    )]
    fn test_resolve(oid: &str, industry: Industry, expected: &str) {
        assert_eq!(expected, resolve(oid, industry));
    }

    #[test]
    fn test_overlays_do_not_shadow_base_entries() {
        for industry in Industry::ALL {
            for oid in [known::RSA_ENCRYPTION, known::COMMON_NAME, known::KEY_USAGE] {
                assert!(!industry.overlay().contains(oid));
                assert_eq!(base_table().get(oid), Some(resolve(oid, industry).as_ref()));
            }
        }
        assert!(Industry::Standard.overlay().is_empty());
        assert_eq!(Industry::Tax.overlay().len(), 4);
        assert_eq!(Industry::Customs.overlay().len(), 4);
    }

    #[rstest(oid, expected,
        case("2.5.4.3", Some("CN")),
        case("2.5.4.6", Some("C")),
        case("2.5.4.9", Some("STREET")),
        case("2.5.4.5", Some("SERIALNUMBER")),
        case("1.2.840.113549.1.9.1", Some("E")),
        case("2.5.4.17", None),
        case("1.2.156.10197.6.1.4.2.2", None),
    )]
    fn test_attribute_short_name(oid: &str, expected: Option<&str>) {
        assert_eq!(expected, attribute_short_name(oid));
    }

    #[rstest(oid, name, bits,
        case("1.2.840.10045.3.1.7", "P-256", 256),
        case("1.3.132.0.34", "P-384", 384),
        case("1.3.132.0.35", "P-521", 521),
        case("1.2.156.10197.1.301", "SM2", 256),
    )]
    fn test_named_curve(oid: &str, name: &str, bits: u32) {
        let curve = named_curve(oid).unwrap();
        assert_eq!(name, curve.name);
        assert_eq!(bits, curve.bits);
    }

    #[test]
    fn test_named_curve_unknown() {
        assert!(named_curve("1.3.132.0.10").is_none());
    }

    #[rstest(input, expected,
        case("standard", Ok(Industry::Standard)),
        case("TAX", Ok(Industry::Tax)),
        case("Customs", Ok(Industry::Customs)),
        case("bank", Err(Error::UnknownIndustry("bank".to_string()))),
    )]
    fn test_industry_from_str(input: &str, expected: Result<Industry, Error>) {
        assert_eq!(expected, input.parse::<Industry>());
    }

    #[test]
    fn test_industry_serde() {
        assert_eq!("\"tax\"", serde_json::to_string(&Industry::Tax).unwrap());
        let industry: Industry = serde_json::from_str("\"customs\"").unwrap();
        assert_eq!(Industry::Customs, industry);
    }
}
