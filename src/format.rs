//! Display helpers for patient values.
//!
//! Everything here produces text for the screen only. Stored values are never
//! rewritten through these functions.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Placeholder shown for missing values.
pub const EMPTY: &str = "-";

/// Zero date some backends emit for "no date".
const ZERO_DATE: &str = "0000-00-00";

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");
const DATE_TIME_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const ISO_LOCAL_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
// id-ID short date, e.g. 20/3/1992
const DISPLAY_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[day padding:none]/[month padding:none]/[year]");

/// Returns the value, or the placeholder when it is missing or empty.
pub fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(value) if !value.is_empty() => value,
        _ => EMPTY,
    }
}

/// Maps a gender code to its label.
pub fn format_gender(code: Option<&str>) -> &'static str {
    match code {
        Some("L") => "Laki-laki",
        Some("P") => "Perempuan",
        _ => EMPTY,
    }
}

/// Parses the calendar date out of the date and timestamp shapes the backend
/// uses. Fractional seconds and offsets are accepted through RFC 3339.
pub fn parse_date(value: &str) -> Option<Date> {
    let value = value.trim();
    if value.is_empty() || value.starts_with(ZERO_DATE) {
        return None;
    }
    if let Ok(date) = Date::parse(value, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(stamp) = PrimitiveDateTime::parse(value, DATE_TIME_FORMAT) {
        return Some(stamp.date());
    }
    if let Ok(stamp) = PrimitiveDateTime::parse(value, ISO_LOCAL_FORMAT) {
        return Some(stamp.date());
    }
    OffsetDateTime::parse(value, &Rfc3339)
        .ok()
        .map(OffsetDateTime::date)
}

/// Formats a date for display, falling back to the placeholder.
pub fn format_date(value: Option<&str>) -> String {
    value
        .and_then(parse_date)
        .and_then(|date| date.format(DISPLAY_FORMAT).ok())
        .unwrap_or_else(|| EMPTY.to_string())
}

/// Formats a UTC timestamp the way audit columns store it.
pub fn timestamp(now: OffsetDateTime) -> String {
    now.format(DATE_TIME_FORMAT)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

/// Whole years between `birth` and `today`.
pub fn age_on(birth: Date, today: Date) -> Option<u32> {
    if birth > today {
        return None;
    }
    let mut years = today.year() - birth.year();
    if (today.month() as u8, today.day()) < (birth.month() as u8, birth.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn empty_and_zero_dates_render_as_dash() {
        assert_eq!(format_date(None), "-");
        assert_eq!(format_date(Some("")), "-");
        assert_eq!(format_date(Some("0000-00-00")), "-");
        assert_eq!(format_date(Some("0000-00-00 00:00:00")), "-");
        assert_eq!(format_date(Some("kemarin")), "-");
        assert_eq!(format_date(Some("2024-02-30")), "-");
    }

    #[test]
    fn well_formed_dates_use_indonesian_short_form() {
        assert_eq!(format_date(Some("1992-03-20")), "20/3/1992");
        assert_eq!(format_date(Some("2024-11-05 08:15:00")), "5/11/2024");
        assert_eq!(format_date(Some("2024-11-05T08:15:00")), "5/11/2024");
        assert_eq!(format_date(Some("2024-11-05T08:15:00.123+07:00")), "5/11/2024");
    }

    #[test]
    fn gender_labels() {
        assert_eq!(format_gender(Some("L")), "Laki-laki");
        assert_eq!(format_gender(Some("P")), "Perempuan");
        assert_eq!(format_gender(Some("l")), "-");
        assert_eq!(format_gender(Some("")), "-");
        assert_eq!(format_gender(None), "-");
    }

    #[test]
    fn or_dash_only_replaces_missing_values() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("Budi")), "Budi");
    }

    #[test]
    fn age_counts_completed_years() {
        let birth = date!(1990 - 06 - 15);
        assert_eq!(age_on(birth, date!(2024 - 06 - 14)), Some(33));
        assert_eq!(age_on(birth, date!(2024 - 06 - 15)), Some(34));
        assert_eq!(age_on(birth, date!(1989 - 01 - 01)), None);
    }

    #[test]
    fn audit_timestamp_shape() {
        let now = datetime!(2025-01-02 03:04:05 UTC);
        assert_eq!(timestamp(now), "2025-01-02 03:04:05");
    }
}
