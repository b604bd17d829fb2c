//! Publication date delocalization and parsing

use chrono::NaiveDate;

use super::errors::ExtractError;
use crate::utils::collapse_whitespace;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Rewrite `2005年1月15日` style dates as `2005 Jan 15`
///
/// Months are replaced from December down so that `11月` is never read as
/// `1` followed by `1月`.
#[must_use]
pub fn delocalize_date(raw: &str) -> String {
    let mut out = raw.replace('年', " ").replace('日', "");
    for month in (1..=12).rev() {
        let abbreviation = MONTH_ABBREVIATIONS[month - 1];
        out = out
            .replace(&format!("{month:02}月"), &format!("{abbreviation} "))
            .replace(&format!("{month}月"), &format!("{abbreviation} "));
    }
    collapse_whitespace(&out)
}

/// Parse a (possibly localized) publication date
///
/// A missing day defaults to the 15th and a missing month to January.
///
/// # Errors
///
/// Returns `ExtractError::InvalidDate` when no calendar date can be read.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ExtractError> {
    let invalid = || ExtractError::InvalidDate(raw.to_string());
    let cleaned = delocalize_date(raw);

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, format) {
            return Ok(date);
        }
    }

    let mut parts = cleaned.split(' ');
    let year = parts
        .next()
        .and_then(|y| y.parse::<i32>().ok())
        .ok_or_else(invalid)?;
    let month = match parts.next() {
        None => 1,
        Some(name) => month_number(name).ok_or_else(invalid)?,
    };
    let day = match parts.next() {
        None => 15,
        Some(day) => day.parse::<u32>().map_err(|_| invalid())?,
    };
    if parts.next().is_some() {
        return Err(invalid());
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

fn month_number(name: &str) -> Option<u32> {
    MONTH_ABBREVIATIONS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .and_then(|i| u32::try_from(i + 1).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_digit_months_are_not_split() {
        assert_eq!(delocalize_date("2012年11月3日"), "2012 Nov 3");
        assert_eq!(delocalize_date("2012年1月13日"), "2012 Jan 13");
        assert_eq!(delocalize_date("2012年01月13日"), "2012 Jan 13");
    }

    #[test]
    fn parses_full_and_partial_dates() {
        assert_eq!(parse_date("2005年1月1日"), Ok(NaiveDate::from_ymd_opt(2005, 1, 1).unwrap()));
        assert_eq!(parse_date("2008年12月"), Ok(NaiveDate::from_ymd_opt(2008, 12, 15).unwrap()));
        assert_eq!(parse_date("2010-06-30"), Ok(NaiveDate::from_ymd_opt(2010, 6, 30).unwrap()));
    }

    #[test]
    fn rejects_nonsense() {
        assert!(matches!(parse_date("第1版"), Err(ExtractError::InvalidDate(_))));
        assert!(parse_date("2005年2月30日").is_err());
    }
}
