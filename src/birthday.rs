//! Birthday input made of three free-text numeric fields.
//!
//! [`BirthdayField`] owns the day, month and year buffers. Every edit strips
//! non-digits, re-derives validity, and pushes the current error message and
//! the `MM-DD-YYYY` normalized date to a [`BirthdayListener`].

use chrono::{DateTime, Datelike, Local, NaiveDate};

use crate::calendar::max_day_for;
use crate::consts::{DATE_SEPARATOR, DAY_MONTH_WIDTH, FALLBACK_YEAR, MAX_MONTH, YEAR_WIDTH};
use crate::prelude::*;

/// Date layouts accepted for the initial value, tried in order after RFC 3339.
const SEED_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y"];

/// One of the three sub-fields of the birthday input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Field {
    #[display(fmt = "day")]
    Day,
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "year")]
    Year,
}

/// The message surfaced for the first invalid sub-field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FieldError {
    #[display(fmt = "Day invalid")]
    Day,
    #[display(fmt = "Month invalid")]
    Month,
    #[display(fmt = "Year invalid")]
    Year,
}

impl FieldError {
    /// The sub-field this error belongs to
    pub const fn field(self) -> Field {
        match self {
            Self::Day => Field::Day,
            Self::Month => Field::Month,
            Self::Year => Field::Year,
        }
    }
}

/// Which number selects the month length when checking the day.
///
/// `ByDayValue` reproduces the widget this crate replaces, which looked up
/// the month length using the day number. With it, a day is only bounded by
/// 31 (or by February's length when the day itself is 2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DayKeying {
    /// Look up the month length with the numeric day value.
    ByDayValue,
    /// Look up the month length with the numeric month value.
    #[default]
    ByMonth,
}

/// Source of the current calendar year, the upper bound for the year field.
pub trait Clock {
    fn current_year(&self) -> u64;
}

/// Reads the year from the local wall clock on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> u64 {
        u64::try_from(Local::now().year()).unwrap_or(0)
    }
}

/// Always reports the same year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, From)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn current_year(&self) -> u64 {
        self.0
    }
}

/// Receives the derived state after every buffer mutation.
pub trait BirthdayListener {
    /// Called with the normalized `MM-DD-YYYY` string, valid or not.
    fn on_change(&mut self, normalized: &str);
    /// Called with the current error message, empty when every field is valid.
    fn on_error(&mut self, message: &str);
}

impl BirthdayListener for () {
    fn on_change(&mut self, _normalized: &str) {}
    fn on_error(&mut self, _message: &str) {}
}

impl<L: BirthdayListener + ?Sized> BirthdayListener for &mut L {
    fn on_change(&mut self, normalized: &str) {
        (**self).on_change(normalized);
    }

    fn on_error(&mut self, message: &str) {
        (**self).on_error(message);
    }
}

/// Adapts a pair of closures into a [`BirthdayListener`].
pub struct Callbacks<C, E> {
    on_change: C,
    on_error: E,
}

impl<C, E> Callbacks<C, E>
where
    C: FnMut(&str),
    E: FnMut(&str),
{
    pub fn new(on_change: C, on_error: E) -> Self {
        Self { on_change, on_error }
    }
}

impl<C, E> BirthdayListener for Callbacks<C, E>
where
    C: FnMut(&str),
    E: FnMut(&str),
{
    fn on_change(&mut self, normalized: &str) {
        (self.on_change)(normalized);
    }

    fn on_error(&mut self, message: &str) {
        (self.on_error)(message);
    }
}

/// Per-field validity plus the single error surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validity {
    pub is_day_valid: bool,
    pub is_month_valid: bool,
    pub is_year_valid: bool,
}

impl Validity {
    /// First failing field in day, month, year order.
    pub const fn error(&self) -> Option<FieldError> {
        if !self.is_day_valid {
            Some(FieldError::Day)
        } else if !self.is_month_valid {
            Some(FieldError::Month)
        } else if !self.is_year_valid {
            Some(FieldError::Year)
        } else {
            None
        }
    }

    /// The error as shown to the user; empty when there is none.
    pub fn error_message(&self) -> String {
        self.error().map(|e| e.to_string()).unwrap_or_default()
    }

    pub const fn is_valid(&self) -> bool {
        self.is_day_valid && self.is_month_valid && self.is_year_valid
    }
}

/// State of the birthday widget: three digit buffers and how to judge them.
#[derive(Debug, Clone)]
pub struct BirthdayField<L = (), C = SystemClock> {
    day: String,
    month: String,
    year: String,
    keying: DayKeying,
    clock: C,
    listener: L,
}

impl BirthdayField {
    /// Creates the field, seeding the buffers from `default_value`.
    ///
    /// A value that does not parse as a date leaves every buffer empty. No
    /// notification is sent until the first edit or [`BirthdayField::emit`].
    pub fn new(default_value: &str) -> Self {
        let mut field = Self {
            day: String::new(),
            month: String::new(),
            year: String::new(),
            keying: DayKeying::default(),
            clock: SystemClock,
            listener: (),
        };
        field.seed(default_value);
        field
    }
}

impl<L, C> BirthdayField<L, C>
where
    L: BirthdayListener,
    C: Clock,
{
    /// Replaces the listener that receives change and error notifications.
    pub fn with_listener<L2: BirthdayListener>(self, listener: L2) -> BirthdayField<L2, C> {
        BirthdayField {
            day: self.day,
            month: self.month,
            year: self.year,
            keying: self.keying,
            clock: self.clock,
            listener,
        }
    }

    /// Replaces the source of the current year.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> BirthdayField<L, C2> {
        BirthdayField {
            day: self.day,
            month: self.month,
            year: self.year,
            keying: self.keying,
            clock,
            listener: self.listener,
        }
    }

    #[must_use]
    pub fn with_keying(mut self, keying: DayKeying) -> Self {
        self.keying = keying;
        self
    }

    fn seed(&mut self, default_value: &str) {
        let Some(date) = parse_seed(default_value) else {
            tracing::debug!(value = default_value, "birthday seed is not a date, starting empty");
            return;
        };
        self.day = date.day().to_string();
        self.month = date.month().to_string();
        self.year = date.year().to_string();
    }

    pub fn set_day(&mut self, raw: &str) {
        self.set(Field::Day, raw);
    }

    pub fn set_month(&mut self, raw: &str) {
        self.set(Field::Month, raw);
    }

    pub fn set_year(&mut self, raw: &str) {
        self.set(Field::Year, raw);
    }

    /// Stores the digits of `raw` into `field` and notifies the listener.
    pub fn set(&mut self, field: Field, raw: &str) {
        let digits = digits_only(raw);
        match field {
            Field::Day => self.day = digits,
            Field::Month => self.month = digits,
            Field::Year => self.year = digits,
        }
        self.emit();
    }

    /// Clears all three buffers and notifies the listener.
    pub fn reset(&mut self) {
        self.day.clear();
        self.month.clear();
        self.year.clear();
        self.emit();
    }

    /// Re-derives the state and pushes it to the listener.
    pub fn emit(&mut self) {
        let message = self.validity().error_message();
        let normalized = self.normalized_date();
        tracing::trace!(%normalized, error = %message, "birthday derived");
        self.listener.on_error(&message);
        self.listener.on_change(&normalized);
    }

    pub fn day(&self) -> &str {
        &self.day
    }

    pub fn month(&self) -> &str {
        &self.month
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub const fn keying(&self) -> DayKeying {
        self.keying
    }

    pub const fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Numeric values of (day, month, year); an empty buffer reads as 0.
    pub fn numbers(&self) -> (u64, u64, u64) {
        (
            parse_buffer(&self.day),
            parse_buffer(&self.month),
            parse_buffer(&self.year),
        )
    }

    pub fn validity(&self) -> Validity {
        let (day, month, year) = self.numbers();
        let bounded_year = if year == 0 { FALLBACK_YEAR } else { year };
        let length_key = match self.keying {
            DayKeying::ByDayValue => day,
            DayKeying::ByMonth => month,
        };

        Validity {
            is_day_valid: day > 0 && day <= max_day_for(length_key, bounded_year),
            is_month_valid: month > 0 && month <= MAX_MONTH,
            is_year_valid: year > 0 && year <= self.clock.current_year(),
        }
    }

    /// The buffers zero-padded into `MM-DD-YYYY`, whatever their validity.
    pub fn normalized_date(&self) -> String {
        format!(
            "{month:0>mw$}{sep}{day:0>mw$}{sep}{year:0>yw$}",
            month = self.month,
            day = self.day,
            year = self.year,
            sep = DATE_SEPARATOR,
            mw = DAY_MONTH_WIDTH,
            yw = YEAR_WIDTH,
        )
    }

    /// The entered date, when every field is valid and the date exists.
    pub fn to_date(&self) -> Option<NaiveDate> {
        if !self.validity().is_valid() {
            return None;
        }
        let (day, month, year) = self.numbers();
        NaiveDate::from_ymd_opt(
            i32::try_from(year).ok()?,
            u32::try_from(month).ok()?,
            u32::try_from(day).ok()?,
        )
    }
}

/// Keeps only ASCII digits.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Parses a digits-only buffer; values beyond `u64` saturate.
fn parse_buffer(buffer: &str) -> u64 {
    buffer
        .bytes()
        .filter(u8::is_ascii_digit)
        .fold(0, |acc, b| acc.saturating_mul(10).saturating_add(u64::from(b - b'0')))
}

fn parse_seed(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let date = DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| {
            SEED_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        })?;

    // Buffers hold digits only, so years before 1 BCE cannot be represented
    (date.year() >= 0).then_some(date)
}

/// Parses a normalized `MM-DD-YYYY` string back into a date.
///
/// Components are read as numbers, so padded buffers such as `03-005-1990`
/// give the same date as [`BirthdayField::to_date`].
pub fn parse_normalized_date(value: &str) -> Option<NaiveDate> {
    let mut parts = value.trim().split(DATE_SEPARATOR);
    let (month, day, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let component = |part: &str| {
        (!part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())).then(|| parse_buffer(part))
    };
    NaiveDate::from_ymd_opt(
        i32::try_from(component(year)?).ok()?,
        u32::try_from(component(month)?).ok()?,
        u32::try_from(component(day)?).ok()?,
    )
}
