use std::collections::HashMap;
use std::sync::LazyLock;

use crate::known;

/// Immutable dotted-OID to display-name mapping.
#[derive(Debug)]
pub struct OidTable {
    entries: HashMap<&'static str, &'static str>,
}

impl OidTable {
    fn from_entries(entries: &[(&'static str, &'static str)]) -> Self {
        OidTable {
            entries: entries.iter().copied().collect(),
        }
    }

    pub fn get(&self, oid: &str) -> Option<&'static str> {
        self.entries.get(oid).copied()
    }

    pub fn contains(&self, oid: &str) -> bool {
        self.entries.contains_key(oid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const BASE_ENTRIES: &[(&str, &str)] = &[
    // algorithms
    (known::RSA_ENCRYPTION, "RSA"),
    (known::SHA1_WITH_RSA, "SHA1withRSA"),
    (known::SHA256_WITH_RSA, "SHA256withRSA"),
    (known::SHA384_WITH_RSA, "SHA384withRSA"),
    (known::SHA512_WITH_RSA, "SHA512withRSA"),
    (known::EC_PUBLIC_KEY, "EC Public Key"),
    (known::ECDSA_WITH_SHA256, "SHA256withECDSA"),
    (known::ECDSA_WITH_SHA384, "SHA384withECDSA"),
    (known::ECDSA_WITH_SHA512, "SHA512withECDSA"),
    (known::SM2, "SM2"),
    (known::SM3_WITH_SM2, "SM3withSM2"),
    // distinguished name attributes
    (known::COMMON_NAME, "Common Name (CN)"),
    (known::COUNTRY_NAME, "Country (C)"),
    (known::LOCALITY_NAME, "Locality (L)"),
    (known::STATE_OR_PROVINCE_NAME, "State or Province (ST)"),
    (known::ORGANIZATION_NAME, "Organization (O)"),
    (known::ORGANIZATIONAL_UNIT_NAME, "Organizational Unit (OU)"),
    (known::STREET_ADDRESS, "Street Address"),
    (known::SERIAL_NUMBER, "Serial Number"),
    (known::POSTAL_CODE, "Postal Code"),
    (known::EMAIL_ADDRESS, "Email Address"),
    // extensions
    (known::SUBJECT_KEY_IDENTIFIER, "Subject Key Identifier"),
    (known::KEY_USAGE, "Key Usage"),
    (known::SUBJECT_ALT_NAME, "Subject Alternative Name"),
    (known::BASIC_CONSTRAINTS, "Basic Constraints"),
    (known::CRL_DISTRIBUTION_POINTS, "CRL Distribution Points"),
    (known::CERTIFICATE_POLICIES, "Certificate Policies"),
    (known::AUTHORITY_KEY_IDENTIFIER, "Authority Key Identifier"),
    (known::EXTENDED_KEY_USAGE, "Extended Key Usage"),
    (known::AUTHORITY_INFO_ACCESS, "Authority Info Access"),
    (known::SCT_LIST, "Signed Certificate Timestamp List"),
    // extended key usage purposes
    (known::SERVER_AUTH, "Server Authentication"),
    (known::CLIENT_AUTH, "Client Authentication"),
    (known::CODE_SIGNING, "Code Signing"),
    (known::EMAIL_PROTECTION, "Email Protection"),
    (known::TIME_STAMPING, "Time Stamping"),
    (known::OCSP_SIGNING, "OCSP Signing"),
];

const TAX_ENTRIES: &[(&str, &str)] = &[
    (known::TAX_REGISTRATION_NUMBER, "Tax Registration Number"),
    (known::TAXPAYER_ID, "Taxpayer Identification Number"),
    (known::TAX_AUTHORITY_CODE, "Tax Authority Code"),
    (known::TAX_OFFICER_CODE, "Tax Officer Code"),
];

const CUSTOMS_ENTRIES: &[(&str, &str)] = &[
    (known::CUSTOMS_CODE, "Customs Code"),
    (known::E_PORT_CARD_NUMBER, "E-Port Card Number"),
    (known::DECLARANT_CERTIFICATE_NUMBER, "Customs Declarant Certificate Number"),
    (known::ENTERPRISE_CUSTOMS_CODE, "Enterprise Customs Code"),
];

pub(crate) static BASE: LazyLock<OidTable> = LazyLock::new(|| OidTable::from_entries(BASE_ENTRIES));
pub(crate) static STANDARD: LazyLock<OidTable> = LazyLock::new(|| OidTable::from_entries(&[]));
pub(crate) static TAX: LazyLock<OidTable> = LazyLock::new(|| OidTable::from_entries(TAX_ENTRIES));
pub(crate) static CUSTOMS: LazyLock<OidTable> =
    LazyLock::new(|| OidTable::from_entries(CUSTOMS_ENTRIES));

/// `CN`, `O`, ... for the attribute types that have a conventional short form.
pub fn attribute_short_name(oid: &str) -> Option<&'static str> {
    let name = match oid {
        known::COMMON_NAME => "CN",
        known::COUNTRY_NAME => "C",
        known::LOCALITY_NAME => "L",
        known::STATE_OR_PROVINCE_NAME => "ST",
        known::ORGANIZATION_NAME => "O",
        known::ORGANIZATIONAL_UNIT_NAME => "OU",
        known::STREET_ADDRESS => "STREET",
        known::SERIAL_NUMBER => "SERIALNUMBER",
        known::EMAIL_ADDRESS => "E",
        _ => return None,
    };
    Some(name)
}
