//! Per-Chain Capability Backends
//!
//! Chain-specific behavior lives behind one small trait per concern:
//! address validation, signature verification, and local-key signing.
//! One backend implements the three traits per chain family, and the
//! [`ChainRegistry`] selects it by chain. Supporting a new chain means
//! registering one backend here, not editing the risk engine.

pub mod evm;
pub mod solana;

pub use evm::EvmBackend;
pub use solana::SolanaBackend;

use crate::error::GuardResult;
use crate::types::Chain;
use std::collections::HashMap;
use std::sync::Arc;
use zeroize::Zeroizing;

/// Syntactic address validation for one chain family
pub trait AddressValidator: Send + Sync {
    /// Validate and return the normalized form of the address.
    ///
    /// For hex-address chains the normalized form is EIP-55 checksummed;
    /// for base58 chains it is the canonical base58 string.
    fn validate(&self, address: &str) -> GuardResult<String>;
}

/// Cryptographic signature verification for one chain family
pub trait SignatureVerifier: Send + Sync {
    /// Verify `signature` over the raw `message` bytes.
    ///
    /// `signer` is the claimed address (hex-address chains, compared against
    /// the recovered signer) or the base58 public key (ed25519 chains).
    /// Returns `Ok(false)` on a well-formed but non-matching signature and
    /// `Err` only for malformed input.
    fn verify(&self, message: &[u8], signature: &[u8], signer: &str) -> GuardResult<bool>;
}

/// Local-key signing operations for one chain family
pub trait Signer: Send + Sync {
    /// Derive the public address for a 32-byte private key.
    fn derive_address(&self, private_key: &[u8]) -> GuardResult<String>;

    /// Sign the raw message bytes with the chain's native scheme.
    fn sign_message(&self, private_key: &[u8], message: &[u8]) -> GuardResult<Vec<u8>>;

    /// Generate a fresh keypair, returning the raw private key and address.
    fn generate_keypair(&self) -> GuardResult<(Zeroizing<Vec<u8>>, String)>;
}

/// Registry selecting chain backends by chain selector
pub struct ChainRegistry {
    validators: HashMap<Chain, Arc<dyn AddressValidator>>,
    verifiers: HashMap<Chain, Arc<dyn SignatureVerifier>>,
    signers: HashMap<Chain, Arc<dyn Signer>>,
}

impl ChainRegistry {
    /// An empty registry with no chains supported
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
            verifiers: HashMap::new(),
            signers: HashMap::new(),
        }
    }

    /// Register one backend object for all three capabilities of a chain
    pub fn register<B>(&mut self, chain: Chain, backend: Arc<B>)
    where
        B: AddressValidator + SignatureVerifier + Signer + 'static,
    {
        self.validators.insert(chain, backend.clone());
        self.verifiers.insert(chain, backend.clone());
        self.signers.insert(chain, backend);
    }

    pub fn validator(&self, chain: Chain) -> Option<Arc<dyn AddressValidator>> {
        self.validators.get(&chain).cloned()
    }

    pub fn verifier(&self, chain: Chain) -> Option<Arc<dyn SignatureVerifier>> {
        self.verifiers.get(&chain).cloned()
    }

    pub fn signer(&self, chain: Chain) -> Option<Arc<dyn Signer>> {
        self.signers.get(&chain).cloned()
    }

    pub fn supports(&self, chain: Chain) -> bool {
        self.validators.contains_key(&chain)
    }
}

impl Default for ChainRegistry {
    /// Registry with both built-in families covering every `Chain` variant
    fn default() -> Self {
        let mut registry = Self::empty();

        let evm = Arc::new(EvmBackend::new());
        for chain in [
            Chain::Ethereum,
            Chain::EthereumSepolia,
            Chain::Bnb,
            Chain::Polygon,
        ] {
            registry.register(chain, evm.clone());
        }

        let solana = Arc::new(SolanaBackend::new());
        for chain in [Chain::Solana, Chain::SolanaDevnet] {
            registry.register(chain, solana.clone());
        }

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_covers_all_chains() {
        let registry = ChainRegistry::default();
        for chain in [
            Chain::Ethereum,
            Chain::EthereumSepolia,
            Chain::Bnb,
            Chain::Polygon,
            Chain::Solana,
            Chain::SolanaDevnet,
        ] {
            assert!(registry.supports(chain), "missing backend for {}", chain);
            assert!(registry.verifier(chain).is_some());
            assert!(registry.signer(chain).is_some());
        }
    }

    #[test]
    fn test_empty_registry_supports_nothing() {
        let registry = ChainRegistry::empty();
        assert!(!registry.supports(Chain::Ethereum));
        assert!(registry.validator(Chain::Solana).is_none());
    }
}
