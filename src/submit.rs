//! Payload and transport seam for `POST /users/verify`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::SignType;

/// Body of `POST /users/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub tgid: i64,
    pub ckb_address: String,
    /// Hex signature without the `0x` prefix.
    pub signature: String,
    pub sign_type: SignType,
    /// `YYYY-MM-DD`
    pub dob: String,
}

/// Successful response; the backend body is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerifyResponse(pub serde_json::Value);

/// Error body returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The request failed before a response arrived.
    #[error("{0}")]
    Unknown(String),
}

impl SubmitError {
    /// Builds an HTTP error from a status and a raw response body.
    ///
    /// Uses the `message` field of a JSON body when there is one, else the
    /// body text itself.
    pub fn from_http_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.message)
            .unwrap_or_else(|_| body.trim().to_owned());
        Self::Http { status, message }
    }

    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Unknown(_) => None,
        }
    }
}

pub type SubmitResult = Result<VerifyResponse, SubmitError>;

/// Sends verification requests to the backend.
pub trait SubmissionService {
    /// Posts `request` to the verification endpoint.
    ///
    /// # Errors
    /// `SubmitError::Http` for error responses, `SubmitError::Unknown` for
    /// anything that prevented a response.
    fn verify(&self, request: &VerifyRequest) -> SubmitResult;
}

impl<S: SubmissionService + ?Sized> SubmissionService for &S {
    fn verify(&self, request: &VerifyRequest) -> SubmitResult {
        (**self).verify(request)
    }
}
