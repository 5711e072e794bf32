//! ChainGuard Core Library
//!
//! Security and credential core for the ChainGuard wallet dashboard.
//! Route handlers, UI, and persistence are external collaborators that
//! call in through the interfaces here.
//!
//! # Architecture
//!
//! - **store**: case-normalized blocklist and phishing-domain sets
//! - **risk**: stateless risk checks (addresses, transactions, signatures,
//!   URLs, contracts) returning structured [`CheckResult`] verdicts
//! - **ratelimit**: fixed-window per-(identity, endpoint) request gating
//! - **token**: stateless HMAC-signed bearer tokens
//! - **vault**: time-boxed, single-retrieval storage for transient secrets
//! - **chains**: per-chain validator/verifier/signer backends behind a
//!   registry keyed on chain selector
//! - **wallet**: signing adapters (injected provider and local key) plus
//!   the factory that produces them
//!
//! # Security
//!
//! Private keys and signing secrets are held in `zeroize`-wrapped buffers
//! and cleared on drop; MAC comparisons are constant-time; the token
//! codec refuses to start without a configured secret.

pub mod chains;
pub mod config;
pub mod error;
pub mod logging;
pub mod ratelimit;
pub mod risk;
pub mod store;
pub mod token;
pub mod types;
pub mod vault;
pub mod wallet;

// Re-export key types for convenience
pub use chains::{AddressValidator, ChainRegistry, EvmBackend, SignatureVerifier, Signer, SolanaBackend};
pub use config::CoreConfig;
pub use error::{ErrorCode, GuardError, GuardResult};
pub use ratelimit::RateLimiter;
pub use risk::{RiskEngine, TransactionPolicy};
pub use store::{BlocklistStore, PhishingDomainStore};
pub use token::{TokenCodec, TokenRejection, TokenVerification};
pub use types::{Chain, CheckKind, CheckResult, RiskLevel};
pub use vault::EphemeralKeyVault;
pub use wallet::{
    ExternalSigner, InjectedProviderAdapter, LocalKeyAdapter, SignedTransaction,
    TransactionRequest, WalletAdapter, WalletAdapterFactory, WalletError, WalletHandle,
    WalletResult,
};
