use std::fmt::Write;

use chrono::{DateTime, Utc};
use clap::Args;
use kensa_x509::{CertificateRecord, Industry, format_distinguished_name, parse_certificate_from_bytes};
use tracing::debug;

use crate::error::Result;
use crate::output::{OutputFormat, render};
use crate::utils::read_input;

const INDENT: &str = "    ";

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the certificate file (PEM, Base64, hex or DER). If not specified, reads from stdin
    file: Option<String>,

    /// OID overlay used to name attributes and algorithms (standard, tax, customs)
    #[arg(long, default_value = "standard")]
    industry: Industry,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Show only subject
    #[arg(long)]
    show_subject: bool,

    /// Show only issuer
    #[arg(long)]
    show_issuer: bool,

    /// Show only validity dates
    #[arg(long)]
    show_dates: bool,

    /// Show only serial number
    #[arg(long)]
    show_serial: bool,

    /// List all extensions
    #[arg(long)]
    list_extensions: bool,

    /// Show MD5, SHA1 and SHA256 fingerprints
    #[arg(long)]
    show_fingerprint: bool,

    /// Check certificate validity against the current time
    #[arg(long)]
    check_expiry: bool,
}

impl Config {
    fn should_show_specific_fields(&self) -> bool {
        self.show_subject
            || self.show_issuer
            || self.show_dates
            || self.show_serial
            || self.list_extensions
            || self.show_fingerprint
            || self.check_expiry
    }
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let input = read_input(config.file.as_deref())?;
    let record = parse_certificate_from_bytes(&input, config.industry)?;
    debug!(industry = %config.industry, serial = %record.serial_number, "parsed certificate");

    if config.should_show_specific_fields() {
        let (output, valid) = show_specific_fields(&record, &config, Utc::now())?;
        print!("{}", output);
        if !valid {
            std::process::exit(1);
        }
        return Ok(());
    }

    match render(&record, config.output)? {
        Some(output) => print!("{}", output),
        None => print!("{}", format_certificate(&record)?),
    }
    Ok(())
}

/// Renders the selected fields. The flag is false when `--check-expiry`
/// found the certificate outside its validity period.
fn show_specific_fields(
    record: &CertificateRecord,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<(String, bool)> {
    let mut output = String::new();
    let mut valid = true;

    if config.show_subject {
        writeln!(output, "Subject: {}", format_distinguished_name(&record.subject))?;
    }
    if config.show_issuer {
        writeln!(output, "Issuer: {}", format_distinguished_name(&record.issuer))?;
    }
    if config.show_dates {
        format_dates(&mut output, record, "")?;
    }
    if config.show_serial {
        writeln!(output, "Serial Number: {}", record.serial_number)?;
    }
    if config.list_extensions {
        format_extension_list(&mut output, record)?;
    }
    if config.show_fingerprint {
        format_fingerprints(&mut output, record, "")?;
    }
    if config.check_expiry {
        valid = format_expiry(&mut output, record, now)?;
    }
    Ok((output, valid))
}

fn format_dates(output: &mut String, record: &CertificateRecord, indent: &str) -> Result<()> {
    writeln!(
        output,
        "{}Not Before: {}",
        indent,
        record.valid_from.format("%b %d %H:%M:%S %Y GMT")
    )?;
    writeln!(
        output,
        "{}Not After : {}",
        indent,
        record.valid_to.format("%b %d %H:%M:%S %Y GMT")
    )?;
    Ok(())
}

fn format_extension_list(output: &mut String, record: &CertificateRecord) -> Result<()> {
    if record.extensions.is_empty() {
        writeln!(output, "No extensions")?;
        return Ok(());
    }
    writeln!(output, "Extensions:")?;
    for ext in &record.extensions {
        let critical = if ext.critical { " (critical)" } else { "" };
        writeln!(output, "  {}{}", ext.name, critical)?;
    }
    Ok(())
}

fn format_fingerprints(output: &mut String, record: &CertificateRecord, indent: &str) -> Result<()> {
    let fp = &record.fingerprints;
    writeln!(output, "{}MD5 Fingerprint: {}", indent, fp.md5)?;
    writeln!(output, "{}SHA1 Fingerprint: {}", indent, fp.sha1)?;
    writeln!(output, "{}SHA256 Fingerprint: {}", indent, fp.sha256)?;
    Ok(())
}

fn format_expiry(output: &mut String, record: &CertificateRecord, now: DateTime<Utc>) -> Result<bool> {
    if record.is_valid_at(now) {
        writeln!(
            output,
            "Certificate is VALID (expires on {})",
            record.valid_to.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        return Ok(true);
    }
    if now < record.valid_from {
        writeln!(
            output,
            "Certificate is NOT YET VALID (valid from {})",
            record.valid_from.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
    } else {
        writeln!(
            output,
            "Certificate is EXPIRED (expired on {})",
            record.valid_to.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
    }
    Ok(false)
}

/// Writes `text` line by line, each prefixed with `indent`.
fn write_indented(output: &mut String, text: &str, indent: &str) -> Result<()> {
    for line in text.lines() {
        writeln!(output, "{}{}", indent, line)?;
    }
    Ok(())
}

fn format_certificate(record: &CertificateRecord) -> Result<String> {
    let l1 = INDENT;
    let l2 = INDENT.repeat(2);
    let l3 = INDENT.repeat(3);
    let mut output = String::new();

    writeln!(output, "Certificate:")?;
    writeln!(output, "{}Version: {}", l1, record.version)?;
    writeln!(output, "{}Serial Number: {}", l1, record.serial_number)?;
    writeln!(output, "{}Signature Algorithm: {}", l1, record.signature_algorithm)?;
    writeln!(output, "{}Issuer: {}", l1, format_distinguished_name(&record.issuer))?;
    writeln!(output, "{}Validity:", l1)?;
    format_dates(&mut output, record, &l2)?;
    writeln!(output, "{}Subject: {}", l1, format_distinguished_name(&record.subject))?;

    let key = &record.public_key;
    writeln!(output, "{}Subject Public Key Info:", l1)?;
    writeln!(output, "{}Public Key Algorithm: {}", l2, key.algorithm)?;
    writeln!(output, "{}Key Size: {}", l2, key.size)?;
    if let Some(curve) = &key.curve {
        writeln!(output, "{}Curve: {}", l2, curve)?;
    }
    if let Some(modulus) = key.modulus_hex() {
        writeln!(output, "{}Modulus:", l2)?;
        write_indented(&mut output, &modulus, &l3)?;
    }
    if let Some(exponent) = &key.exponent {
        writeln!(output, "{}Exponent: {}", l2, exponent)?;
    }
    if let Some(point) = key.point_hex() {
        writeln!(output, "{}Public Point:", l2)?;
        write_indented(&mut output, &point, &l3)?;
    }

    if !record.extensions.is_empty() {
        writeln!(output, "{}X509v3 Extensions:", l1)?;
        for ext in &record.extensions {
            let critical = if ext.critical { " (critical)" } else { "" };
            writeln!(output, "{}{}:{}", l2, ext.name, critical)?;
            write_indented(&mut output, &ext.value, &l3)?;
        }
    }

    writeln!(output, "{}Fingerprints:", l1)?;
    format_fingerprints(&mut output, record, &l2)?;
    Ok(output)
}
