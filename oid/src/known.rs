//! Dotted forms of the OIDs the decoder looks for by value.

// algorithms
pub const RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
pub const SHA1_WITH_RSA: &str = "1.2.840.113549.1.1.5";
pub const SHA256_WITH_RSA: &str = "1.2.840.113549.1.1.11";
pub const SHA384_WITH_RSA: &str = "1.2.840.113549.1.1.12";
pub const SHA512_WITH_RSA: &str = "1.2.840.113549.1.1.13";
pub const EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";
pub const ECDSA_WITH_SHA256: &str = "1.2.840.10045.4.3.2";
pub const ECDSA_WITH_SHA384: &str = "1.2.840.10045.4.3.3";
pub const ECDSA_WITH_SHA512: &str = "1.2.840.10045.4.3.4";
pub const SM2: &str = "1.2.156.10197.1.301";
pub const SM3_WITH_SM2: &str = "1.2.156.10197.1.501";

// named curves
pub const SECP256R1: &str = "1.2.840.10045.3.1.7";
pub const SECP384R1: &str = "1.3.132.0.34";
pub const SECP521R1: &str = "1.3.132.0.35";

// attribute types
pub const COMMON_NAME: &str = "2.5.4.3";
pub const SERIAL_NUMBER: &str = "2.5.4.5";
pub const COUNTRY_NAME: &str = "2.5.4.6";
pub const LOCALITY_NAME: &str = "2.5.4.7";
pub const STATE_OR_PROVINCE_NAME: &str = "2.5.4.8";
pub const STREET_ADDRESS: &str = "2.5.4.9";
pub const ORGANIZATION_NAME: &str = "2.5.4.10";
pub const ORGANIZATIONAL_UNIT_NAME: &str = "2.5.4.11";
pub const POSTAL_CODE: &str = "2.5.4.17";
pub const EMAIL_ADDRESS: &str = "1.2.840.113549.1.9.1";

// certificate extensions
pub const SUBJECT_KEY_IDENTIFIER: &str = "2.5.29.14";
pub const KEY_USAGE: &str = "2.5.29.15";
pub const SUBJECT_ALT_NAME: &str = "2.5.29.17";
pub const BASIC_CONSTRAINTS: &str = "2.5.29.19";
pub const CRL_DISTRIBUTION_POINTS: &str = "2.5.29.31";
pub const CERTIFICATE_POLICIES: &str = "2.5.29.32";
pub const AUTHORITY_KEY_IDENTIFIER: &str = "2.5.29.35";
pub const EXTENDED_KEY_USAGE: &str = "2.5.29.37";
pub const AUTHORITY_INFO_ACCESS: &str = "1.3.6.1.5.5.7.1.1";
pub const SCT_LIST: &str = "1.3.6.1.4.1.11129.2.4.2";

// extended key usage purposes
pub const SERVER_AUTH: &str = "1.3.6.1.5.5.7.3.1";
pub const CLIENT_AUTH: &str = "1.3.6.1.5.5.7.3.2";
pub const CODE_SIGNING: &str = "1.3.6.1.5.5.7.3.3";
pub const EMAIL_PROTECTION: &str = "1.3.6.1.5.5.7.3.4";
pub const TIME_STAMPING: &str = "1.3.6.1.5.5.7.3.8";
pub const OCSP_SIGNING: &str = "1.3.6.1.5.5.7.3.9";

// tax industry attributes
pub const TAX_REGISTRATION_NUMBER: &str = "1.2.156.10197.6.1.4.2.1";
pub const TAXPAYER_ID: &str = "1.2.156.10197.6.1.4.2.2";
pub const TAX_AUTHORITY_CODE: &str = "1.2.156.10197.6.1.4.2.3";
pub const TAX_OFFICER_CODE: &str = "1.2.156.10197.6.1.4.2.4";

// customs industry attributes
pub const CUSTOMS_CODE: &str = "1.2.156.10197.6.1.4.3.1";
pub const E_PORT_CARD_NUMBER: &str = "1.2.156.10197.6.1.4.3.2";
pub const DECLARANT_CERTIFICATE_NUMBER: &str = "1.2.156.10197.6.1.4.3.3";
pub const ENTERPRISE_CUSTOMS_CODE: &str = "1.2.156.10197.6.1.4.3.4";
