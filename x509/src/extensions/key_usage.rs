use std::fmt;

use kensa::decoder::Decoder;
use kensa_asn1::BitString;
use kensa_der::Tlv;
use kensa_oid::Industry;

use super::error::{Error, Kind};
use super::Extension;

/*
RFC 5280 Section 4.2.1.3
KeyUsage ::= BIT STRING {
    digitalSignature        (0),
    nonRepudiation          (1), -- renamed to contentCommitment
    keyEncipherment         (2),
    dataEncipherment        (3),
    keyAgreement            (4),
    keyCertSign             (5),
    cRLSign                 (6),
    encipherOnly            (7),
    decipherOnly            (8)
}
*/

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyUsage {
    pub digital_signature: bool,
    pub non_repudiation: bool,
    pub key_encipherment: bool,
    pub data_encipherment: bool,
    pub key_agreement: bool,
    pub key_cert_sign: bool,
    pub crl_sign: bool,
    pub encipher_only: bool,
    pub decipher_only: bool,
}

impl KeyUsage {
    fn labels(&self) -> Vec<&'static str> {
        [
            (self.digital_signature, "Digital Signature"),
            (self.non_repudiation, "Non Repudiation"),
            (self.key_encipherment, "Key Encipherment"),
            (self.data_encipherment, "Data Encipherment"),
            (self.key_agreement, "Key Agreement"),
            (self.key_cert_sign, "Certificate Sign"),
            (self.crl_sign, "CRL Sign"),
            (self.encipher_only, "Encipher Only"),
            (self.decipher_only, "Decipher Only"),
        ]
        .into_iter()
        .filter_map(|(set, label)| set.then_some(label))
        .collect()
    }
}

impl From<&BitString> for KeyUsage {
    fn from(bits: &BitString) -> Self {
        KeyUsage {
            digital_signature: bits.bit(0),
            non_repudiation: bits.bit(1),
            key_encipherment: bits.bit(2),
            data_encipherment: bits.bit(3),
            key_agreement: bits.bit(4),
            key_cert_sign: bits.bit(5),
            crl_sign: bits.bit(6),
            encipher_only: bits.bit(7),
            decipher_only: bits.bit(8),
        }
    }
}

impl Extension for KeyUsage {
    const OID: &'static str = kensa_oid::known::KEY_USAGE;

    fn parse(value: &Tlv) -> Result<Self, Error> {
        let bits: BitString = value.decode().map_err(Error::asn1(Kind::KeyUsage))?;
        Ok(KeyUsage::from(&bits))
    }

    fn describe(&self, _industry: Industry) -> String {
        self.to_string()
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = self.labels();
        if labels.is_empty() {
            write!(f, "Unspecified")
        } else {
            write!(f, "{}", labels.join("\n"))
        }
    }
}
