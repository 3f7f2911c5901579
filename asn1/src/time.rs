use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use crate::error::Error;

fn number(digits: &[u8]) -> Option<u32> {
    digits.iter().try_fold(0u32, |n, d| {
        d.is_ascii_digit().then(|| n * 10 + (d - b'0') as u32)
    })
}

fn assemble(year: i32, rest: &[u8]) -> Option<DateTime<Utc>> {
    let month = number(&rest[0..2])?;
    let day = number(&rest[2..4])?;
    let hour = number(&rest[4..6])?;
    let minute = number(&rest[6..8])?;
    let second = number(&rest[8..10])?;
    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(hour, minute, second)
        .map(|dt| dt.and_utc())
}

/// `YYMMDDHHMMSSZ`. Two-digit years of 50 and above are 19xx, below are 20xx.
pub fn parse_utc_time(data: &[u8]) -> Result<DateTime<Utc>, Error> {
    if data.len() != 13 || data[12] != b'Z' {
        return Err(Error::UtcTimeInvalidFormat);
    }
    let yy = number(&data[0..2]).ok_or(Error::UtcTimeInvalidFormat)? as i32;
    let year = if yy >= 50 { 1900 + yy } else { 2000 + yy };
    assemble(year, &data[2..12]).ok_or(Error::UtcTimeInvalidFormat)
}

/// `YYYYMMDDHHMMSSZ`.
pub fn parse_generalized_time(data: &[u8]) -> Result<DateTime<Utc>, Error> {
    if data.len() != 15 || data[14] != b'Z' {
        return Err(Error::GeneralizedTimeInvalidFormat);
    }
    let year = number(&data[0..4]).ok_or(Error::GeneralizedTimeInvalidFormat)? as i32;
    assemble(year, &data[4..14]).ok_or(Error::GeneralizedTimeInvalidFormat)
}

/// Picks the time format from the content length (13 or 15 characters).
///
/// Anything unparseable yields the current instant instead of an error, so a
/// damaged validity field never aborts certificate extraction.
pub fn parse_time_or_now(data: &[u8]) -> DateTime<Utc> {
    let parsed = match data.len() {
        13 => parse_utc_time(data).ok(),
        15 => parse_generalized_time(data).ok(),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        warn!(
            value = %String::from_utf8_lossy(data),
            "unparseable time, substituting current time"
        );
        Utc::now()
    })
}
