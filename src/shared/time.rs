//! Date parsing for request payloads, query strings and seed files.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::errors::DomainError;

/// Parse an instant sent by a client.
///
/// Accepts an RFC 3339 date-time (`2025-10-10T08:00:00+02:00`), a date-time
/// without offset (read as UTC) or a bare calendar date (`2025-10-10`, read
/// as midnight UTC). `field` names the input in the validation message.
pub fn parse_instant(field: &str, raw: &str) -> Result<DateTime<Utc>, DomainError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(DomainError::Validation(format!(
        "{field}: expected an ISO 8601 date, got '{raw}'"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn calendar_date_is_midnight_utc() {
        let parsed = parse_instant("start", "2025-10-10").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 10, 10, 0, 0, 0).unwrap());
    }

    #[test]
    fn rfc3339_offset_is_normalized() {
        let parsed = parse_instant("start", "2025-10-10T10:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 10, 10, 8, 0, 0).unwrap());
    }

    #[test]
    fn naive_datetime_is_utc() {
        let parsed = parse_instant("end", " 2025-10-12T18:30:00 ").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 10, 12, 18, 30, 0).unwrap());
    }

    #[test]
    fn garbage_is_a_validation_error() {
        let err = parse_instant("end", "next tuesday").unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.starts_with("end:")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn impossible_date_is_rejected() {
        assert!(parse_instant("start", "2025-02-30").is_err());
    }
}
