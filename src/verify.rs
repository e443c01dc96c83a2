//! Sign-and-submit flow behind the form's submit button.

use chrono::{Local, NaiveDate};
use thiserror::Error;

use crate::consts::{NOTICE_DURATION_MS, SIGNATURE_HEX_PREFIX};
use crate::form::{FormErrors, FormValues};
use crate::session::{Session, SignerError, WalletSigner, ensure_allowed};
use crate::submit::{SubmissionService, SubmitError, VerifyRequest, VerifyResponse};

/// Text the wallet signs to bind the Telegram account to the date of birth.
pub fn sign_message_text(tgid: i64, dob: &str) -> String {
    format!("My tgid: {tgid} - My DoB: {dob}")
}

/// Drops the leading `0x` of a hex signature, if present.
pub fn strip_hex_prefix(signature: &str) -> &str {
    signature.strip_prefix(SIGNATURE_HEX_PREFIX).unwrap_or(signature)
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Telegram login is required")]
    TelegramRequired,

    #[error("Wallet is not connected")]
    WalletDisconnected,

    #[error(transparent)]
    Form(#[from] FormErrors),

    #[error(transparent)]
    Signer(#[from] SignerError),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// Content of the toast shown after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub variant: NoticeVariant,
    pub title: String,
    pub description: String,
    pub duration_ms: Option<u32>,
}

impl Notice {
    pub fn success() -> Self {
        Self {
            variant: NoticeVariant::Default,
            title: "Success".into(),
            description: "You have successfully verified your account".into(),
            duration_ms: Some(NOTICE_DURATION_MS),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            variant: NoticeVariant::Destructive,
            title: "Error".into(),
            description: description.into(),
            duration_ms: None,
        }
    }
}

impl From<&VerifyError> for Notice {
    fn from(err: &VerifyError) -> Self {
        match err {
            VerifyError::Submit(SubmitError::Http { message, .. }) => Self::error(message.clone()),
            other => Self::error(other.to_string()),
        }
    }
}

/// Binds the session, the connected wallet and the backend for one form.
pub struct VerifyFlow<'a, S> {
    session: &'a Session,
    signer: &'a dyn WalletSigner,
    service: S,
}

impl<'a, S: SubmissionService> VerifyFlow<'a, S> {
    pub fn new(session: &'a Session, signer: &'a dyn WalletSigner, service: S) -> Self {
        Self {
            session,
            signer,
            service,
        }
    }

    /// Validates, signs and submits `values`, clearing the date of birth on success.
    ///
    /// # Errors
    /// Returns `VerifyError` for a missing identity, schema violations, a
    /// wallet failure, or a rejected submission.
    pub fn submit(&self, values: &mut FormValues) -> Result<VerifyResponse, VerifyError> {
        self.submit_at(values, Local::now().date_naive())
    }

    /// Same as [`VerifyFlow::submit`] with an explicit current date.
    ///
    /// # Errors
    /// See [`VerifyFlow::submit`].
    pub fn submit_at(
        &self,
        values: &mut FormValues,
        today: NaiveDate,
    ) -> Result<VerifyResponse, VerifyError> {
        let telegram = self.session.telegram().ok_or(VerifyError::TelegramRequired)?;
        if !self.session.is_logged_in() {
            return Err(VerifyError::WalletDisconnected);
        }
        let form = values.validate_at(today)?;
        let sign_type = ensure_allowed(self.signer)?;

        let dob = form.dob();
        let message = sign_message_text(telegram.id, &dob);
        tracing::debug!(tgid = telegram.id, %sign_type, "requesting signature");
        let signature = self.signer.sign_message(&message)?;

        let request = VerifyRequest {
            tgid: telegram.id,
            ckb_address: form.wallet_address,
            signature: strip_hex_prefix(&signature).to_owned(),
            sign_type,
            dob,
        };
        let response = self.service.verify(&request).inspect_err(|err| {
            tracing::warn!(tgid = request.tgid, status = ?err.status(), error = %err, "verification rejected");
        })?;

        tracing::info!(tgid = request.tgid, "verification submitted");
        values.reset_date_of_birth();
        Ok(response)
    }

    /// Runs [`VerifyFlow::submit`] and reports the outcome as a notice.
    pub fn submit_with_notice(&self, values: &mut FormValues) -> Notice {
        match self.submit(values) {
            Ok(_) => Notice::success(),
            Err(err) => Notice::from(&err),
        }
    }
}
