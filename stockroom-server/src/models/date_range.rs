//! Date window for transaction queries
//!
//! A window only exists when both bounds are non-blank. A single bound,
//! whatever its value, is ignored and the query runs over all time.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use super::ValidationError;

const DATE_FORMAT_REASON: &str = "expected RFC 3339 timestamp or YYYY-MM-DD date";

/// Inclusive `[start, end]` window over `transactionDate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Build a window from raw query bounds.
    ///
    /// Blank bounds count as absent. Bounds are parsed only when both are
    /// given, so a lone bound never fails the request.
    pub fn from_bounds(
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Option<Self>, ValidationError> {
        let (Some(start), Some(end)) = (non_blank(start), non_blank(end)) else {
            return Ok(None);
        };

        Ok(Some(Self {
            start: parse_bound("startDate", start, NaiveTime::MIN)?,
            end: parse_bound("endDate", end, end_of_day())?,
        }))
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a trimmed bound; bare dates take `time_of_day` in UTC.
fn parse_bound(
    field: &'static str,
    raw: &str,
    time_of_day: NaiveTime,
) -> Result<DateTime<Utc>, ValidationError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|d| d.and_time(time_of_day).and_utc())
        .map_err(|_| ValidationError::InvalidFormat {
            field,
            reason: DATE_FORMAT_REASON,
        })
}

fn end_of_day() -> NaiveTime {
    // 23:59:59.999999 always exists
    NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN)
}
