//! Shared types for ChainGuard Core
//!
//! All data structures that cross module boundaries are defined here
//! for consistent serialization toward the route-handler layer.

use serde::{Deserialize, Serialize};

// =============================================================================
// Chain Types
// =============================================================================

/// Supported blockchain networks
///
/// Two families: hex-address chains signed with secp256k1 ECDSA (recoverable),
/// and base58 curve-point chains signed with Ed25519. Adding a chain means
/// registering a backend in [`crate::chains::ChainRegistry`], not editing the
/// risk engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Chain {
    Ethereum,
    EthereumSepolia,
    Bnb,
    Polygon,
    Solana,
    SolanaDevnet,
}

impl Chain {
    pub fn is_evm(&self) -> bool {
        matches!(
            self,
            Chain::Ethereum | Chain::EthereumSepolia | Chain::Bnb | Chain::Polygon
        )
    }

    pub fn is_ed25519(&self) -> bool {
        matches!(self, Chain::Solana | Chain::SolanaDevnet)
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Chain::EthereumSepolia | Chain::SolanaDevnet)
    }

    pub fn chain_id(&self) -> Option<u64> {
        match self {
            Chain::Ethereum => Some(1),
            Chain::EthereumSepolia => Some(11155111),
            Chain::Bnb => Some(56),
            Chain::Polygon => Some(137),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Chain::Ethereum | Chain::EthereumSepolia => "ETH",
            Chain::Bnb => "BNB",
            Chain::Polygon => "MATIC",
            Chain::Solana | Chain::SolanaDevnet => "SOL",
        }
    }

    /// Display decimals of the native asset
    pub fn decimals(&self) -> u8 {
        match self {
            Chain::Ethereum | Chain::EthereumSepolia | Chain::Bnb | Chain::Polygon => 18,
            Chain::Solana | Chain::SolanaDevnet => 9,
        }
    }
}

impl std::str::FromStr for Chain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "ethereum" | "eth" => Ok(Chain::Ethereum),
            "ethereum_sepolia" | "sepolia" => Ok(Chain::EthereumSepolia),
            "bnb" | "bsc" | "binance" => Ok(Chain::Bnb),
            "polygon" | "matic" => Ok(Chain::Polygon),
            "solana" | "sol" => Ok(Chain::Solana),
            "solana_devnet" | "sol_devnet" => Ok(Chain::SolanaDevnet),
            _ => Err(format!("Unknown chain: {}", s)),
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Chain::Ethereum => "ethereum",
            Chain::EthereumSepolia => "ethereum-sepolia",
            Chain::Bnb => "bnb",
            Chain::Polygon => "polygon",
            Chain::Solana => "solana",
            Chain::SolanaDevnet => "solana-devnet",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Check Results
// =============================================================================

/// Risk severity attached to every check outcome
///
/// Ordered for comparisons only; there is no arithmetic over levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
    Critical,
}

/// Which check produced a result
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    AddressValidation,
    TransactionPolicy,
    SignatureVerification,
    PhishingDetection,
    ContractRisk,
    RateLimit,
}

/// Outcome of a security check
///
/// Immutable value returned by every engine entry point. Expected failures
/// (blacklisted address, exceeded limit, bad signature) are expressed here,
/// never as errors that could crash the calling handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub success: bool,
    pub kind: CheckKind,
    pub risk_level: RiskLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CheckResult {
    /// A passing check. Passing always means `RiskLevel` at or below `Low`.
    pub fn pass(kind: CheckKind, risk_level: RiskLevel, message: impl Into<String>) -> Self {
        Self {
            success: true,
            kind,
            risk_level,
            message: message.into(),
            details: None,
        }
    }

    /// A failing check with an attached severity.
    pub fn fail(kind: CheckKind, risk_level: RiskLevel, message: impl Into<String>) -> Self {
        Self {
            success: false,
            kind,
            risk_level,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
