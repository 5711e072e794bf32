//! Unified error types for ChainGuard Core
//!
//! All errors flow through this module for consistent handling
//! and serialization at the API boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all core operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl GuardError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAddress, msg)
    }

    pub fn invalid_signature(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidSignature, msg)
    }

    pub fn crypto_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::CryptoError, msg)
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, msg)
    }

    pub fn unsupported_chain(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedChain, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for GuardError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    InvalidInput,
    InvalidAddress,
    InvalidSignature,

    // Configuration errors (operator-facing, fail loud)
    ConfigError,
    UnsupportedChain,

    // Crypto errors
    CryptoError,
    SigningFailed,
    VerificationFailed,

    // Parse errors
    ParseError,
    JsonError,
    HexError,

    // Internal
    Internal,
}

/// Result type alias for core operations
pub type GuardResult<T> = Result<T, GuardError>;

// Conversions from common error types

impl From<serde_json::Error> for GuardError {
    fn from(e: serde_json::Error) -> Self {
        GuardError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<hex::FromHexError> for GuardError {
    fn from(e: hex::FromHexError) -> Self {
        GuardError::new(ErrorCode::HexError, e.to_string())
    }
}

impl From<secp256k1::Error> for GuardError {
    fn from(e: secp256k1::Error) -> Self {
        GuardError::new(ErrorCode::CryptoError, format!("Secp256k1 error: {}", e))
    }
}
