use crate::consts::{
    CENTURY_CYCLE, FEBRUARY, FEBRUARY_DAYS, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE,
    LONG_MONTH_DAYS, LONG_MONTHS, SHORT_MONTH_DAYS, SHORT_MONTHS,
};

/// Gregorian leap year rule.
pub const fn is_leap_year(year: u64) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

/// Number of days in `month` of `year`.
///
/// Values outside `1..=12` are not rejected: they fall back to 31 days so
/// the caller can judge the day on its own terms while the month is still
/// being typed.
pub fn max_day_for(month: u64, year: u64) -> u64 {
    if LONG_MONTHS.contains(&month) {
        LONG_MONTH_DAYS
    } else if SHORT_MONTHS.contains(&month) {
        SHORT_MONTH_DAYS
    } else if month == FEBRUARY {
        if is_leap_year(year) {
            FEBRUARY_DAYS_LEAP
        } else {
            FEBRUARY_DAYS
        }
    } else {
        LONG_MONTH_DAYS
    }
}
