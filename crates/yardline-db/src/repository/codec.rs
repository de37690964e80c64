//! Conversions between stored string columns and domain types.

use chrono::NaiveDate;
use surrealdb_types::SurrealValue;
use tracing::warn;
use uuid::Uuid;

use crate::error::DbError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
pub(crate) struct CountRow {
    pub total: u64,
}

pub(crate) fn parse_uuid(field: &str, value: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::Decode(format!("invalid {field} UUID: {e}")))
}

pub(crate) fn parse_opt_uuid(field: &str, value: Option<&str>) -> Result<Option<Uuid>, DbError> {
    value.map(|v| parse_uuid(field, v)).transpose()
}

pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| DbError::Decode(format!("invalid {field} date '{value}': {e}")))
}

/// Lenient parse for optional equipment/project dates.
///
/// An unreadable date is treated as absent so the record still loads;
/// it simply drops out of date-based checks.
pub(crate) fn parse_opt_date(field: &str, value: Option<String>) -> Option<NaiveDate> {
    let raw = value?;
    match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            warn!(field, value = %raw, error = %e, "Ignoring unparsable stored date");
            None
        }
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn format_opt_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(format_date)
}

pub(crate) fn unknown_variant(kind: &str, value: &str) -> DbError {
    DbError::Decode(format!("unknown {kind}: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_roundtrip_through_storage_format() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
        assert_eq!(format_date(date), "2025-02-28");
        assert_eq!(parse_date("due_date", "2025-02-28").unwrap(), date);
    }

    #[test]
    fn malformed_optional_date_is_dropped() {
        assert_eq!(parse_opt_date("next_maintenance", Some("31/02/2025".into())), None);
        assert_eq!(parse_opt_date("next_maintenance", None), None);
    }

    #[test]
    fn malformed_required_date_errors() {
        assert!(matches!(
            parse_date("due_date", "soon"),
            Err(DbError::Decode(_))
        ));
    }
}
