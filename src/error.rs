use thiserror::Error;

use crate::config::ConfigError;
use crate::verify::VerifyError;

/// Crate-level error for hosts that drive the whole form.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error("failed to initialise logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
