use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{EdfError, Result};

/// Two-digit years above this value belong to the 1900s, the rest to the 2000s.
pub const YEAR_PIVOT: u32 = 84;

/// Decodes `bytes[offset..offset + len]` as US-ASCII and trims the padding.
///
/// Bytes outside the ASCII range become U+FFFD. Trimming strips every leading
/// and trailing character at or below the space character, so NUL padding is
/// removed the same way as blanks.
pub fn ascii_field(bytes: &[u8], offset: usize, len: usize) -> String {
    ascii_string(&bytes[offset..offset + len])
}

/// 将字节按 US-ASCII 解码并去除首尾填充
pub fn ascii_string(bytes: &[u8]) -> String {
    let decoded: String = bytes
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
        .collect();
    decoded.trim_matches(|c: char| c <= ' ').to_string()
}

/// Parses a non-negative integer header field.
pub fn parse_count(field: &'static str, raw: &str) -> Result<usize> {
    raw.trim().parse::<usize>().map_err(|_| EdfError::malformed(field, raw))
}

/// Parses a finite, non-negative decimal header field.
pub fn parse_seconds(field: &'static str, raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(EdfError::malformed(field, raw)),
    }
}

/// Converts the EDF `dd.mm.yy` / `hh.mm.ss` pair into a timestamp.
///
/// The two-digit year is disambiguated around [`YEAR_PIVOT`]: `85`-`99` map
/// to 1985-1999 and `00`-`84` map to 2000-2084. Every field must be exactly
/// two ASCII digits and the result must be a real calendar date and time;
/// anything else is [`EdfError::InvalidTimestamp`].
///
/// # Examples
///
/// ```rust
/// use edfcatalog::utils::format_date;
/// use chrono::{Datelike, Timelike};
///
/// let start = format_date("02.01.85", "03.04.05")?;
/// assert_eq!((start.year(), start.month(), start.day()), (1985, 1, 2));
/// assert_eq!((start.hour(), start.minute(), start.second()), (3, 4, 5));
///
/// assert_eq!(format_date("19.09.19", "12.30.00")?.year(), 2019);
/// assert!(format_date("bad", "invalid").is_err());
/// # Ok::<(), edfcatalog::EdfError>(())
/// ```
pub fn format_date(date: &str, time: &str) -> Result<NaiveDateTime> {
    let invalid = || EdfError::InvalidTimestamp {
        date: date.to_string(),
        time: time.to_string(),
    };

    let [day, month, yy] = split_two_digit_fields(date).ok_or_else(invalid)?;
    let [hour, minute, second] = split_two_digit_fields(time).ok_or_else(invalid)?;

    let year = if yy > YEAR_PIVOT { 1900 + yy } else { 2000 + yy };

    let start_date = NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid)?;
    let start_time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(invalid)?;

    Ok(NaiveDateTime::new(start_date, start_time))
}

/// Splits `aa.bb.cc` into three numbers, each written with exactly two digits.
fn split_two_digit_fields(token: &str) -> Option<[u32; 3]> {
    let mut values = [0u32; 3];
    let mut parts = token.split('.');

    for value in values.iter_mut() {
        let part = parts.next()?;
        if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *value = part.parse().ok()?;
    }

    if parts.next().is_some() {
        return None;
    }
    Some(values)
}
