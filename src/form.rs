//! Values of the verification form and their schema checks.

use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::birthday::parse_normalized_date;
use crate::consts::{EARLIEST_BIRTH_DATE, MIN_TELEGRAM_USERNAME_LEN};
use crate::prelude::*;
use crate::session::Session;

/// Wire layout of the date of birth.
pub const DOB_FORMAT: &str = "%Y-%m-%d";

/// Fields of the verification form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FormField {
    #[display(fmt = "telegram_username")]
    TelegramUsername,
    #[display(fmt = "wallet_address")]
    WalletAddress,
    #[display(fmt = "date_of_birth")]
    DateOfBirth,
}

/// A schema violation on one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormIssue {
    #[error("Telegram ID must be at least 3 characters.")]
    TelegramUsernameTooShort,
    #[error("Wallet address is required.")]
    WalletAddressRequired,
    #[error("A date of birth is required.")]
    DateOfBirthRequired,
    #[error("Date of birth must be between 1900-01-01 and today.")]
    DateOfBirthOutOfRange,
}

impl FormIssue {
    pub const fn field(self) -> FormField {
        match self {
            Self::TelegramUsernameTooShort => FormField::TelegramUsername,
            Self::WalletAddressRequired => FormField::WalletAddress,
            Self::DateOfBirthRequired | Self::DateOfBirthOutOfRange => FormField::DateOfBirth,
        }
    }
}

/// Every field that failed validation, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summary(.0))]
pub struct FormErrors(pub Vec<FormIssue>);

fn summary(issues: &[FormIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl FormErrors {
    pub fn issues(&self) -> &[FormIssue] {
        &self.0
    }

    /// The message to show under `field`, if it failed.
    pub fn message_for(&self, field: FormField) -> Option<String> {
        self.0
            .iter()
            .find(|issue| issue.field() == field)
            .map(ToString::to_string)
    }
}

/// Raw values as held by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub telegram_username: String,
    pub wallet_address: String,
    pub date_of_birth: Option<NaiveDate>,
}

/// Values that passed the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidForm {
    pub telegram_username: String,
    pub wallet_address: String,
    pub date_of_birth: NaiveDate,
}

impl ValidForm {
    /// The date of birth as sent to the backend and embedded in the signed message.
    pub fn dob(&self) -> String {
        self.date_of_birth.format(DOB_FORMAT).to_string()
    }
}

impl FormValues {
    /// Fills the read-only fields from the session.
    pub fn prefill(&mut self, session: &Session) {
        if let Some(address) = session.address().filter(|a| !a.is_empty()) {
            self.wallet_address = address.to_owned();
        }
        if let Some(username) = session.telegram_username() {
            self.telegram_username = username.to_owned();
        }
    }

    /// Takes the date of birth from a normalized `MM-DD-YYYY` birthday string.
    ///
    /// Strings that are not a real date clear the field.
    pub fn set_birthday(&mut self, normalized: &str) {
        self.date_of_birth = parse_normalized_date(normalized);
    }

    /// Clears the date of birth, as after a successful submission.
    pub fn reset_date_of_birth(&mut self) {
        self.date_of_birth = None;
    }

    /// Checks the values against today's date.
    ///
    /// # Errors
    /// Returns `FormErrors` listing every failing field.
    pub fn validate(&self) -> Result<ValidForm, FormErrors> {
        self.validate_at(Local::now().date_naive())
    }

    /// Checks the values, bounding the date of birth by `today`.
    ///
    /// # Errors
    /// Returns `FormErrors` listing every failing field.
    pub fn validate_at(&self, today: NaiveDate) -> Result<ValidForm, FormErrors> {
        let mut issues = Vec::new();

        if self.telegram_username.chars().count() < MIN_TELEGRAM_USERNAME_LEN {
            issues.push(FormIssue::TelegramUsernameTooShort);
        }
        if self.wallet_address.is_empty() {
            issues.push(FormIssue::WalletAddressRequired);
        }
        match self.date_of_birth {
            None => issues.push(FormIssue::DateOfBirthRequired),
            Some(dob) if dob < EARLIEST_BIRTH_DATE || dob > today => {
                issues.push(FormIssue::DateOfBirthOutOfRange);
            }
            Some(_) => {}
        }

        match (issues.is_empty(), self.date_of_birth) {
            (true, Some(date_of_birth)) => Ok(ValidForm {
                telegram_username: self.telegram_username.clone(),
                wallet_address: self.wallet_address.clone(),
                date_of_birth,
            }),
            _ => Err(FormErrors(issues)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::{MockSigner, telegram};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn filled() -> FormValues {
        FormValues {
            telegram_username: "alice".into(),
            wallet_address: "ckt1abc".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 3, 5),
        }
    }

    #[test]
    fn test_valid_form() {
        let form = filled().validate_at(today()).unwrap();
        assert_eq!(form.dob(), "1990-03-05");
        assert_eq!(form.wallet_address, "ckt1abc");
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = FormValues::default().validate_at(today()).unwrap_err();
        assert_eq!(
            errors.issues(),
            [
                FormIssue::TelegramUsernameTooShort,
                FormIssue::WalletAddressRequired,
                FormIssue::DateOfBirthRequired,
            ]
        );
        assert_eq!(
            errors.message_for(FormField::WalletAddress).as_deref(),
            Some("Wallet address is required.")
        );
    }

    #[test]
    fn test_username_length_counts_chars() {
        let mut values = filled();
        values.telegram_username = "ab".into();
        let errors = values.validate_at(today()).unwrap_err();
        assert_eq!(errors.issues(), [FormIssue::TelegramUsernameTooShort]);
        assert_eq!(errors.to_string(), "Telegram ID must be at least 3 characters.");

        values.telegram_username = "abc".into();
        assert!(values.validate_at(today()).is_ok());
    }

    #[test]
    fn test_date_of_birth_bounds() {
        let mut values = filled();
        values.date_of_birth = NaiveDate::from_ymd_opt(1899, 12, 31);
        assert_eq!(
            values.validate_at(today()).unwrap_err().issues(),
            [FormIssue::DateOfBirthOutOfRange]
        );

        values.date_of_birth = NaiveDate::from_ymd_opt(1900, 1, 1);
        assert_eq!(values.date_of_birth, Some(EARLIEST_BIRTH_DATE));
        assert!(values.validate_at(today()).is_ok());

        values.date_of_birth = Some(today());
        assert!(values.validate_at(today()).is_ok());

        values.date_of_birth = today().succ_opt();
        assert!(values.validate_at(today()).is_err());
    }

    #[test]
    fn test_set_birthday_from_normalized() {
        let mut values = filled();
        values.set_birthday("12-31-1999");
        assert_eq!(values.date_of_birth, NaiveDate::from_ymd_opt(1999, 12, 31));

        values.set_birthday("03-005-1990");
        assert_eq!(values.date_of_birth, NaiveDate::from_ymd_opt(1990, 3, 5));

        values.set_birthday("00-00-0000");
        assert_eq!(values.date_of_birth, None);
        assert_eq!(
            values.validate_at(today()).unwrap_err().message_for(FormField::DateOfBirth).as_deref(),
            Some("A date of birth is required.")
        );
    }

    #[test]
    fn test_prefill_from_session() {
        let signer = MockSigner::connected("ckt1xyz");
        let mut session = Session::bootstrap(Some(&signer));
        session.set_telegram(telegram(9, "bob"));

        let mut values = FormValues::default();
        values.prefill(&session);
        assert_eq!(values.wallet_address, "ckt1xyz");
        assert_eq!(values.telegram_username, "bob");
    }

    #[test]
    fn test_reset_date_of_birth() {
        let mut values = filled();
        values.reset_date_of_birth();
        assert_eq!(values.date_of_birth, None);
        assert_eq!(values.telegram_username, "alice");
    }
}
