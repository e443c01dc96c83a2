//! Wallet and Telegram identity of the person filling the form.
//!
//! A [`Session`] is built once by the host and passed explicitly to the form
//! and the verification flow.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prelude::*;

/// Signature scheme of a connected wallet, as named by the connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum SignType {
    #[display(fmt = "BtcEcdsa")]
    BtcEcdsa,
    #[display(fmt = "CkbSecp256k1")]
    CkbSecp256k1,
    #[display(fmt = "DogeEcdsa")]
    DogeEcdsa,
    #[display(fmt = "EvmPersonal")]
    EvmPersonal,
    #[display(fmt = "JoyId")]
    JoyId,
    #[display(fmt = "NostrEvent")]
    NostrEvent,
    #[display(fmt = "Unknown")]
    Unknown,
}

impl SignType {
    /// Schemes the verification backend can check.
    pub const ALLOWED: [Self; 5] = [
        Self::BtcEcdsa,
        Self::CkbSecp256k1,
        Self::DogeEcdsa,
        Self::EvmPersonal,
        Self::JoyId,
    ];

    pub fn is_allowed(self) -> bool {
        Self::ALLOWED.contains(&self)
    }
}

/// A signature produced by a wallet, usually `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq, Deref, Display, From, Into)]
pub struct Signature(String);

impl Signature {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignerError {
    /// The wallet refused or failed to produce a signature.
    #[error("signing failed: {0}")]
    Sign(String),

    /// The wallet could not report its address.
    #[error("address unavailable: {0}")]
    Address(String),

    /// The wallet uses a scheme the backend does not accept.
    #[error("sign type {0} is not supported")]
    UnsupportedSignType(SignType),
}

/// A connected wallet.
pub trait WalletSigner {
    fn sign_type(&self) -> SignType;

    /// Address of the account the wallet signs for.
    ///
    /// # Errors
    /// Returns `SignerError::Address` if the wallet cannot report one.
    fn internal_address(&self) -> Result<String, SignerError>;

    /// Signs `message` as text.
    ///
    /// # Errors
    /// Returns `SignerError::Sign` if the wallet refuses or fails.
    fn sign_message(&self, message: &str) -> Result<Signature, SignerError>;
}

/// Rejects wallets whose scheme the backend cannot check.
///
/// # Errors
/// Returns `SignerError::UnsupportedSignType` for disallowed schemes.
pub fn ensure_allowed(signer: &dyn WalletSigner) -> Result<SignType, SignerError> {
    let sign_type = signer.sign_type();
    if sign_type.is_allowed() {
        Ok(sign_type)
    } else {
        Err(SignerError::UnsupportedSignType(sign_type))
    }
}

/// Data returned by the Telegram login widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramIdentity {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub auth_date: i64,
    #[serde(default)]
    pub hash: String,
}

/// Which part of the form the user should see next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FormStage {
    #[display(fmt = "Login telegram to continue")]
    LoginTelegram,
    #[display(fmt = "Connect wallet to continue")]
    ConnectWallet,
    #[display(fmt = "Fill in the form")]
    Fill,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    address: Option<String>,
    telegram: Option<TelegramIdentity>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the address of `signer`, if any wallet is connected.
    ///
    /// A wallet that cannot report its address is treated as disconnected.
    pub fn bootstrap(signer: Option<&dyn WalletSigner>) -> Self {
        let mut session = Self::new();
        session.refresh_wallet(signer);
        session
    }

    /// Re-reads the wallet address after the connected signer changed.
    pub fn refresh_wallet(&mut self, signer: Option<&dyn WalletSigner>) {
        let Some(signer) = signer else {
            self.address = None;
            return;
        };
        match signer.internal_address() {
            Ok(address) => {
                tracing::info!(%address, sign_type = %signer.sign_type(), "wallet connected");
                self.address = Some(address);
            }
            Err(err) => {
                tracing::warn!(error = %err, "wallet address lookup failed, disconnecting");
                self.disconnect();
            }
        }
    }

    pub fn disconnect(&mut self) {
        self.address = None;
    }

    /// Stores the identity reported by the Telegram login callback.
    pub fn set_telegram(&mut self, identity: TelegramIdentity) {
        tracing::info!(tgid = identity.id, "telegram identity received");
        self.telegram = Some(identity);
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub const fn telegram(&self) -> Option<&TelegramIdentity> {
        self.telegram.as_ref()
    }

    pub fn telegram_username(&self) -> Option<&str> {
        self.telegram
            .as_ref()
            .and_then(|t| t.username.as_deref())
            .filter(|u| !u.is_empty())
    }

    /// A wallet is connected when its address is known and non-empty.
    pub fn is_logged_in(&self) -> bool {
        self.address().is_some_and(|a| !a.is_empty())
    }

    pub fn stage(&self) -> FormStage {
        if self.telegram_username().is_none() {
            FormStage::LoginTelegram
        } else if !self.is_logged_in() {
            FormStage::ConnectWallet
        } else {
            FormStage::Fill
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory wallet used across the crate's tests.
    pub(crate) struct MockSigner {
        pub sign_type: SignType,
        pub address: Result<String, SignerError>,
        pub signature: Result<Signature, SignerError>,
        pub signed: std::cell::RefCell<Vec<String>>,
    }

    impl MockSigner {
        pub fn connected(address: &str) -> Self {
            Self {
                sign_type: SignType::CkbSecp256k1,
                address: Ok(address.to_owned()),
                signature: Ok(Signature::new("0xdeadbeef")),
                signed: std::cell::RefCell::default(),
            }
        }
    }

    impl WalletSigner for MockSigner {
        fn sign_type(&self) -> SignType {
            self.sign_type
        }

        fn internal_address(&self) -> Result<String, SignerError> {
            self.address.clone()
        }

        fn sign_message(&self, message: &str) -> Result<Signature, SignerError> {
            self.signed.borrow_mut().push(message.to_owned());
            self.signature.clone()
        }
    }

    pub(crate) fn telegram(id: i64, username: &str) -> TelegramIdentity {
        TelegramIdentity {
            id,
            username: Some(username.to_owned()),
            ..TelegramIdentity::default()
        }
    }

    #[test]
    fn test_sign_type_allowed() {
        for allowed in SignType::ALLOWED {
            assert!(allowed.is_allowed(), "{allowed} should be allowed");
        }
        assert!(!SignType::NostrEvent.is_allowed());
        assert!(!SignType::Unknown.is_allowed());
    }

    #[test]
    fn test_sign_type_serde() {
        let json = serde_json::to_string(&SignType::CkbSecp256k1).unwrap();
        assert_eq!(json, "\"CkbSecp256k1\"");
        let parsed: SignType = serde_json::from_str("\"JoyId\"").unwrap();
        assert_eq!(parsed, SignType::JoyId);
    }

    #[test]
    fn test_ensure_allowed() {
        let mut signer = MockSigner::connected("ckt1abc");
        assert_eq!(ensure_allowed(&signer), Ok(SignType::CkbSecp256k1));
        signer.sign_type = SignType::NostrEvent;
        assert_eq!(
            ensure_allowed(&signer),
            Err(SignerError::UnsupportedSignType(SignType::NostrEvent))
        );
    }

    #[test]
    fn test_bootstrap_reads_address() {
        let signer = MockSigner::connected("ckt1abc");
        let session = Session::bootstrap(Some(&signer));
        assert_eq!(session.address(), Some("ckt1abc"));
        assert!(session.is_logged_in());
    }

    #[test]
    fn test_bootstrap_failure_disconnects() {
        let mut signer = MockSigner::connected("ckt1abc");
        let mut session = Session::bootstrap(Some(&signer));
        signer.address = Err(SignerError::Address("locked".into()));
        session.refresh_wallet(Some(&signer));
        assert_eq!(session.address(), None);
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_bootstrap_without_signer() {
        let session = Session::bootstrap(None);
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_empty_address_is_not_logged_in() {
        let signer = MockSigner::connected("");
        assert!(!Session::bootstrap(Some(&signer)).is_logged_in());
    }

    #[test]
    fn test_stage_progression() {
        let signer = MockSigner::connected("ckt1abc");
        let mut session = Session::new();
        assert_eq!(session.stage(), FormStage::LoginTelegram);

        session.set_telegram(TelegramIdentity {
            id: 7,
            ..TelegramIdentity::default()
        });
        assert_eq!(session.stage(), FormStage::LoginTelegram, "no username yet");

        session.set_telegram(telegram(7, "alice"));
        assert_eq!(session.stage(), FormStage::ConnectWallet);

        session.refresh_wallet(Some(&signer));
        assert_eq!(session.stage(), FormStage::Fill);

        session.disconnect();
        assert_eq!(session.stage(), FormStage::ConnectWallet);
    }

    #[test]
    fn test_telegram_identity_from_widget_json() {
        let json = r#"{"id":42,"first_name":"Alice","username":"alice","auth_date":1700000000,"hash":"abc"}"#;
        let identity: TelegramIdentity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.id, 42);
        assert_eq!(identity.username.as_deref(), Some("alice"));
        assert_eq!(identity.last_name, None);
    }

    #[test]
    fn test_signature_deref() {
        let signature = Signature::new("0x01");
        assert!(signature.starts_with("0x"));
        assert_eq!(signature.to_string(), "0x01");
    }
}
