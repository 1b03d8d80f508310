use chrono::NaiveDate;

use super::DateRangeError;

/// A date range with inclusive start and end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Creates a date range covering one entire competition season.
    ///
    /// # Panics
    /// Panics if the year is outside chrono's representable range.
    pub fn season(year: u16) -> Self {
        let start = NaiveDate::from_ymd_opt(year as i32, 1, 1)
            .expect("Invalid year for DateRange::season");
        let end = NaiveDate::from_ymd_opt(year as i32, 12, 31)
            .expect("Invalid year for DateRange::season end calculation");
        Self { start, end }
    }
}
