//! Calendar helpers for the month-end rule and retention cutoffs

use chrono::{Datelike, Days, NaiveDate};

/// True when `date` is the last day of its month
pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    match date.succ_opt() {
        Some(next) => next.month() != date.month(),
        // NaiveDate::MAX is Dec 31
        None => true,
    }
}

/// `today` minus `days`, saturating
///
/// A negative count is treated as zero. A count reaching past the
/// earliest representable date yields `NaiveDate::MIN`.
pub fn days_before(today: NaiveDate, days: i64) -> NaiveDate {
    let days = u64::try_from(days).unwrap_or(0);
    today
        .checked_sub_days(Days::new(days))
        .unwrap_or(NaiveDate::MIN)
}
