//! Wallet Adapter Abstraction
//!
//! Capability interface over chain-specific signing backends. Two
//! variants: an adapter over an externally injected signing context (a
//! browser extension or equivalent out-of-process signer) and an
//! in-process local-key adapter. Adapters are produced by the
//! [`factory::WalletAdapterFactory`] keyed on chain selector.
//!
//! Handle lifecycle: `disconnected -> connect -> connected -> disconnect`.
//! Signing or reading the address while disconnected is a usage error and
//! fails fast with [`WalletError::NotConnected`]; it is not a security
//! check.

pub mod factory;
pub mod injected;
pub mod local;

pub use factory::WalletAdapterFactory;
pub use injected::{ExternalSigner, InjectedProviderAdapter};
pub use local::{LocalKeyAdapter, SubmitReceipt};

use crate::types::Chain;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by wallet adapters and the factory
///
/// The kinds are deliberately distinct: callers retry `Network`/`Timeout`,
/// fix configuration for `MissingEndpoint`/`UnsupportedChain`/
/// `ProviderUnavailable`, and treat `NotConnected` as a programming error.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Wallet is not connected")]
    NotConnected,

    #[error("No injected signing provider available for chain {0}")]
    ProviderUnavailable(Chain),

    #[error("Unsupported chain: {0}")]
    UnsupportedChain(String),

    #[error("No RPC endpoint configured for chain {0}")]
    MissingEndpoint(Chain),

    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Transaction rejected by endpoint: {0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out waiting for confirmation")]
    Timeout,
}

pub type WalletResult<T> = Result<T, WalletError>;

/// Connection state snapshot for one adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletHandle {
    pub chain: Chain,
    pub address: String,
    pub connected: bool,
}

/// A transfer to be signed
///
/// The canonical byte encoding below is what adapters sign; both sides of
/// a transfer agree on it independent of field formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub to: String,
    /// Decimal string, display units
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl TransactionRequest {
    pub fn new(to: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            amount: amount.into(),
            memo: None,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Canonical bytes covered by the signature
    pub fn canonical_bytes(&self, chain: Chain) -> Vec<u8> {
        // Struct field order fixes the JSON key order
        #[derive(Serialize)]
        struct CanonicalTx<'a> {
            chain: Chain,
            to: &'a str,
            amount: &'a str,
            memo: &'a Option<String>,
        }

        serde_json::to_vec(&CanonicalTx {
            chain,
            to: &self.to,
            amount: &self.amount,
            memo: &self.memo,
        })
        .unwrap_or_default()
    }
}

/// A signed transfer ready for submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub chain: Chain,
    pub signer_address: String,
    /// Hex encoding of the canonical payload bytes
    pub payload_hex: String,
    /// Hex encoding of the chain-native signature
    pub signature_hex: String,
}

/// Capability interface implemented by every signing backend
pub trait WalletAdapter: Send + Sync {
    fn chain(&self) -> Chain;

    /// Establish the connection and record the signing address.
    fn connect(&mut self) -> WalletResult<WalletHandle>;

    fn disconnect(&mut self);

    fn is_connected(&self) -> bool;

    /// The signing address; only valid while connected.
    fn address(&self) -> WalletResult<String>;

    /// Sign raw message bytes with the chain's native scheme.
    fn sign_message(&self, message: &[u8]) -> WalletResult<Vec<u8>>;

    /// Sign a transfer request over its canonical byte encoding.
    fn sign_transaction(&self, request: &TransactionRequest) -> WalletResult<SignedTransaction>;
}
