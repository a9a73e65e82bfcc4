//! # Wallet Errors
//!
//! One error type for the wallet core. Every provider, storage and ledger
//! failure is converted into a [`WalletError`] where it is awaited; nothing
//! escapes to the UI boundary as a panic.
//!
//! ## Error Categories
//!
//! - **Validation**: bad user input (manual address, unknown provider index).
//!   Recoverable in place, no state transition.
//! - **Provider**: connect/sign failures. Connect failures move the controller
//!   to the error state, which the UI renders as a retry affordance.
//! - **InconsistentState**: the persisted record violates its invariant. The
//!   controller clears it and carries on.
//! - **TransientFetch**: a balance query failed. Logged only.
//! - **Storage**: the key-value backend failed to read or write.
//! - **Config**: invalid environment configuration at startup.

use thiserror::Error;

/// Convenience type alias for `Result<T, WalletError>`.
pub type Result<T> = std::result::Result<T, WalletError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// Input failed validation (e.g. malformed manual address).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Wallet provider failed or lacks a required capability.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Persisted session violates the record invariant.
    #[error("Inconsistent session state: {0}")]
    InconsistentState(String),

    /// Balance query failed; the cached balance stays as it was.
    #[error("Balance fetch failed: {0}")]
    TransientFetch(String),

    /// Key-value storage read/write failure.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WalletError {
    /// Message suitable for showing next to a retry button or input field.
    pub fn user_message(&self) -> String {
        match self {
            WalletError::Validation(msg) | WalletError::Provider(msg) => msg.clone(),
            WalletError::InconsistentState(_) => {
                "Saved wallet session was invalid and has been reset".to_string()
            }
            WalletError::TransientFetch(_) => "Balance temporarily unavailable".to_string(),
            WalletError::Storage(_) | WalletError::Config(_) => {
                "An internal error occurred".to_string()
            }
        }
    }
}

impl From<std::io::Error> for WalletError {
    fn from(err: std::io::Error) -> Self {
        WalletError::Storage(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        WalletError::Storage(format!("JSON error: {}", err))
    }
}

impl From<lib_utils::envs::Error> for WalletError {
    fn from(err: lib_utils::envs::Error) -> Self {
        WalletError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = WalletError::Validation("Wallet address must start with 0x".to_string());
        assert_eq!(err.to_string(), "Validation error: Wallet address must start with 0x");
        assert_eq!(err.user_message(), "Wallet address must start with 0x");
    }

    #[test]
    fn test_internal_errors_are_not_leaked() {
        let err = WalletError::Storage("disk full at /var/data".to_string());
        assert_eq!(err.user_message(), "An internal error occurred");
    }

    #[test]
    fn test_json_error_conversion() {
        let err: WalletError = serde_json::from_str::<u64>("nope").unwrap_err().into();
        assert!(matches!(err, WalletError::Storage(_)));
    }
}
