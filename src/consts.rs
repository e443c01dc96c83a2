use chrono::NaiveDate;

/// Highest valid month (December)
pub const MAX_MONTH: u64 = 12;

/// Month number for February
pub const FEBRUARY: u64 = 2;

/// Days in months with 31 days
pub const LONG_MONTH_DAYS: u64 = 31;
/// Days in months with 30 days
pub const SHORT_MONTH_DAYS: u64 = 30;
/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u64 = 29;
/// Days in February for common years
pub const FEBRUARY_DAYS: u64 = 28;

/// Months with 31 days
pub const LONG_MONTHS: [u64; 7] = [1, 3, 5, 7, 8, 10, 12];
/// Months with 30 days
pub const SHORT_MONTHS: [u64; 4] = [4, 6, 9, 11];

/// Year used for the February length while the year buffer is still empty
pub const FALLBACK_YEAR: u64 = 1900;

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u64 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u64 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u64 = 400;

/// Separator between the components of a normalized birthday (`MM-DD-YYYY`)
pub const DATE_SEPARATOR: char = '-';
/// Pad width of the day and month components
pub const DAY_MONTH_WIDTH: usize = 2;
/// Pad width of the year component
pub const YEAR_WIDTH: usize = 4;

/// Earliest date of birth the form accepts
pub const EARLIEST_BIRTH_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1900, 1, 1) {
    Some(date) => date,
    None => panic!("1900-01-01 is a valid date"),
};

/// Minimum length of a Telegram username
pub const MIN_TELEGRAM_USERNAME_LEN: usize = 3;

/// Path of the backend verification endpoint
pub const VERIFY_PATH: &str = "/users/verify";

/// Prefix carried by hex signatures that the backend does not expect
pub const SIGNATURE_HEX_PREFIX: &str = "0x";

/// How long the success notice stays visible
pub const NOTICE_DURATION_MS: u32 = 3000;
