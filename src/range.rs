//! Resolution of range selection tokens into concrete calendar-day spans.

use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;
use tracing::info;

use crate::error::{CompareError, Result};
use crate::platform::PlatformId;

/// Search data lands with a delay, so computed windows end this many days back.
pub const SEARCH_LAG_DAYS: u64 = 3;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive calendar-day span with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(CompareError::InvalidRange(format!(
                "start {} is after end {}",
                start.format(ISO_DATE_FORMAT),
                end.format(ISO_DATE_FORMAT)
            )));
        }
        Ok(Self { start, end })
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    fn shift_back(self, days: u64) -> Result<Self> {
        let back = |d: NaiveDate| {
            d.checked_sub_days(Days::new(days))
                .ok_or_else(|| CompareError::InvalidRange(format!("cannot shift {} back", d)))
        };
        Ok(Self {
            start: back(self.start)?,
            end: back(self.end)?,
        })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format(ISO_DATE_FORMAT),
            self.end.format(ISO_DATE_FORMAT)
        )
    }
}

pub fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT)
        .map_err(|e| CompareError::InvalidRange(format!("'{}' is not a YYYY-MM-DD date: {}", value, e)))
}

/// Resolves `token` against `today`.
///
/// `custom` takes both explicit dates verbatim. `today` and a day count `n`
/// produce windows ending today, shifted back by [`SEARCH_LAG_DAYS`] for the
/// search platform.
pub fn resolve(
    token: &str,
    explicit_start: Option<&str>,
    explicit_end: Option<&str>,
    platform: PlatformId,
    today: NaiveDate,
) -> Result<DateRange> {
    let token = token.trim();

    if token.eq_ignore_ascii_case("custom") {
        let (Some(start), Some(end)) = (explicit_start, explicit_end) else {
            return Err(CompareError::InvalidRange(
                "custom range requires both a start and an end date".to_string(),
            ));
        };
        let range = DateRange::new(parse_iso_date(start)?, parse_iso_date(end)?)?;
        info!(action = "resolve", component = "range", token, range = %range, "Resolved custom range");
        return Ok(range);
    }

    let computed = if token.eq_ignore_ascii_case("today") {
        DateRange::new(today, today)?
    } else {
        let days: u64 = token
            .parse()
            .map_err(|_| CompareError::InvalidRange(format!("unrecognised range token '{}'", token)))?;
        if days == 0 {
            return Err(CompareError::InvalidRange(
                "day count must be at least 1".to_string(),
            ));
        }
        let start = today
            .checked_sub_days(Days::new(days - 1))
            .ok_or_else(|| CompareError::InvalidRange(format!("{} days reaches before the calendar", days)))?;
        DateRange::new(start, today)?
    };

    let range = match platform {
        PlatformId::Search => computed.shift_back(SEARCH_LAG_DAYS)?,
        PlatformId::Cdn | PlatformId::WebAnalytics => computed,
    };

    info!(
        action = "resolve",
        component = "range",
        token,
        platform = %platform,
        range = %range,
        days = range.days(),
        "Resolved relative range"
    );
    Ok(range)
}

/// [`resolve`] against the current UTC calendar day.
pub fn resolve_today(
    token: &str,
    explicit_start: Option<&str>,
    explicit_end: Option<&str>,
    platform: PlatformId,
) -> Result<DateRange> {
    resolve(
        token,
        explicit_start,
        explicit_end,
        platform,
        Utc::now().date_naive(),
    )
}
