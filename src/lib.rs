//! Logic of the VeriX identity verification form.
//!
//! The user logs in with Telegram, connects a wallet, enters a date of birth
//! in a three-field [`BirthdayField`], signs `My tgid: … - My DoB: …` with the
//! wallet, and the signed payload is posted to `/users/verify`.
//!
//! Wallet, Telegram and HTTP transport stay with the host behind
//! [`WalletSigner`] and [`SubmissionService`].

mod birthday;
mod calendar;
mod config;
mod consts;
mod error;
mod form;
mod logging;
mod prelude;
mod session;
mod submit;
mod verify;

pub use birthday::{
    BirthdayField, BirthdayListener, Callbacks, Clock, DayKeying, Field, FieldError, FixedClock,
    SystemClock, Validity, digits_only, parse_normalized_date,
};
pub use calendar::{is_leap_year, max_day_for};
pub use config::{AppConfig, ConfigError, Network};
pub use consts::*;
pub use error::{Error, Result};
pub use form::{DOB_FORMAT, FormErrors, FormField, FormIssue, FormValues, ValidForm};
pub use logging::{LogFormat, init_logging, subscriber};
pub use session::{
    FormStage, Session, SignType, Signature, SignerError, TelegramIdentity, WalletSigner,
    ensure_allowed,
};
pub use submit::{SubmissionService, SubmitError, SubmitResult, VerifyRequest, VerifyResponse};
pub use verify::{
    Notice, NoticeVariant, VerifyError, VerifyFlow, sign_message_text, strip_hex_prefix,
};
