//! Wallet Adapter Factory
//!
//! Produces adapters keyed on chain selector: injected-provider adapters
//! for chains with a registered external signing context, local-key
//! adapters for raw key material, and ephemeral adapters with a freshly
//! generated keypair whose raw key the caller is expected to route
//! through the ephemeral vault rather than hold directly.

use super::injected::{ExternalSigner, InjectedProviderAdapter};
use super::local::LocalKeyAdapter;
use super::{WalletError, WalletResult};
use crate::chains::{ChainRegistry, Signer};
use crate::types::Chain;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use zeroize::Zeroizing;

pub struct WalletAdapterFactory {
    registry: Arc<ChainRegistry>,
    providers: RwLock<HashMap<Chain, Arc<dyn ExternalSigner>>>,
    endpoints: HashMap<Chain, String>,
}

impl WalletAdapterFactory {
    pub fn new(registry: Arc<ChainRegistry>) -> Self {
        Self {
            registry,
            providers: RwLock::new(HashMap::new()),
            endpoints: HashMap::new(),
        }
    }

    /// Configure default RPC endpoints used by local adapters when the
    /// caller does not pass one explicitly.
    pub fn with_endpoints(mut self, endpoints: HashMap<Chain, String>) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Register an injected signing context for its chain.
    pub fn register_provider(&self, provider: Arc<dyn ExternalSigner>) {
        if let Ok(mut providers) = self.providers.write() {
            providers.insert(provider.chain(), provider);
        }
    }

    /// Adapter bound to the externally-provided signing context for `chain`.
    ///
    /// Fails when no such context is available in the current environment.
    pub fn create_injected(&self, chain: Chain) -> WalletResult<InjectedProviderAdapter> {
        let provider = self
            .providers
            .read()
            .ok()
            .and_then(|providers| providers.get(&chain).cloned())
            .ok_or(WalletError::ProviderUnavailable(chain))?;

        Ok(InjectedProviderAdapter::new(provider))
    }

    /// Local-key adapter from a hex-encoded private key.
    pub fn create_local(
        &self,
        private_key_hex: &str,
        chain: Chain,
        endpoint: Option<String>,
    ) -> WalletResult<LocalKeyAdapter> {
        let signer = self
            .registry
            .signer(chain)
            .ok_or_else(|| WalletError::UnsupportedChain(chain.to_string()))?;

        let private_key = Zeroizing::new(
            hex::decode(private_key_hex.trim().trim_start_matches("0x"))
                .map_err(|e| WalletError::InvalidKey(format!("Invalid hex: {}", e)))?,
        );
        let address = signer
            .derive_address(&private_key)
            .map_err(|e| WalletError::InvalidKey(e.message))?;

        let endpoint = endpoint.or_else(|| self.endpoints.get(&chain).cloned());
        Ok(LocalKeyAdapter::new(chain, signer, private_key, address, endpoint))
    }

    /// Fresh keypair wrapped in a local adapter.
    ///
    /// Returns the raw private key alongside the adapter; callers should
    /// hand it to [`crate::vault::EphemeralKeyVault`] immediately instead
    /// of keeping it in scope.
    pub fn generate_ephemeral(
        &self,
        chain: Chain,
    ) -> WalletResult<(LocalKeyAdapter, Zeroizing<Vec<u8>>)> {
        let signer = self
            .registry
            .signer(chain)
            .ok_or_else(|| WalletError::UnsupportedChain(chain.to_string()))?;

        let (private_key, address) = signer
            .generate_keypair()
            .map_err(|e| WalletError::Signing(e.message))?;

        let endpoint = self.endpoints.get(&chain).cloned();
        let adapter = LocalKeyAdapter::new(
            chain,
            signer,
            Zeroizing::new(private_key.to_vec()),
            address,
            endpoint,
        );
        Ok((adapter, private_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::injected::stub::StubProvider;
    use crate::wallet::{TransactionRequest, WalletAdapter};

    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn factory() -> WalletAdapterFactory {
        WalletAdapterFactory::new(Arc::new(ChainRegistry::default()))
    }

    #[test]
    fn test_create_injected_requires_registered_provider() {
        let factory = factory();

        assert!(matches!(
            factory.create_injected(Chain::Ethereum),
            Err(WalletError::ProviderUnavailable(Chain::Ethereum))
        ));

        factory.register_provider(Arc::new(StubProvider {
            chain: Chain::Ethereum,
            address: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".to_string(),
            fail_connect: false,
        }));

        let mut adapter = factory.create_injected(Chain::Ethereum).unwrap();
        assert!(adapter.connect().is_ok());
    }

    #[test]
    fn test_create_local_derives_address() {
        let factory = factory();
        let mut adapter = factory
            .create_local(TEST_PRIVATE_KEY, Chain::Ethereum, None)
            .unwrap();

        let handle = adapter.connect().unwrap();
        assert_eq!(
            handle.address.to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_create_local_accepts_0x_prefix() {
        let factory = factory();
        let with_prefix = format!("0x{}", TEST_PRIVATE_KEY);
        assert!(factory
            .create_local(&with_prefix, Chain::Polygon, None)
            .is_ok());
    }

    #[test]
    fn test_create_local_rejects_bad_key() {
        let factory = factory();

        assert!(matches!(
            factory.create_local("zz-not-hex", Chain::Ethereum, None),
            Err(WalletError::InvalidKey(_))
        ));
        // Valid hex but wrong length for a private key
        assert!(matches!(
            factory.create_local("abcdef", Chain::Ethereum, None),
            Err(WalletError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_unsupported_chain_error() {
        let factory = WalletAdapterFactory::new(Arc::new(ChainRegistry::empty()));

        assert!(matches!(
            factory.create_local(TEST_PRIVATE_KEY, Chain::Ethereum, None),
            Err(WalletError::UnsupportedChain(_))
        ));
        assert!(matches!(
            factory.generate_ephemeral(Chain::Solana),
            Err(WalletError::UnsupportedChain(_))
        ));
    }

    #[test]
    fn test_generate_ephemeral_key_matches_adapter() {
        let factory = factory();
        let (mut adapter, private_key) = factory.generate_ephemeral(Chain::Solana).unwrap();

        let handle = adapter.connect().unwrap();

        // The returned raw key reproduces the adapter's address
        let recreated = factory
            .create_local(&hex::encode(&*private_key), Chain::Solana, None)
            .unwrap();
        let registry = ChainRegistry::default();
        let derived = registry
            .signer(Chain::Solana)
            .unwrap()
            .derive_address(&private_key)
            .unwrap();
        assert_eq!(derived, handle.address);
        drop(recreated);
    }

    #[test]
    fn test_factory_endpoint_defaults() {
        let mut endpoints = HashMap::new();
        endpoints.insert(Chain::Ethereum, "https://rpc.example.com".to_string());
        let factory = factory().with_endpoints(endpoints);

        let adapter = factory
            .create_local(TEST_PRIVATE_KEY, Chain::Ethereum, None)
            .unwrap();
        assert_eq!(adapter.endpoint(), Some("https://rpc.example.com"));

        // Explicit endpoint wins over the configured default
        let adapter = factory
            .create_local(
                TEST_PRIVATE_KEY,
                Chain::Ethereum,
                Some("https://other.example.com".to_string()),
            )
            .unwrap();
        assert_eq!(adapter.endpoint(), Some("https://other.example.com"));
    }

    #[test]
    fn test_ephemeral_adapter_signs() {
        let factory = factory();
        let (mut adapter, _private_key) = factory.generate_ephemeral(Chain::Ethereum).unwrap();
        adapter.connect().unwrap();

        let signed = adapter
            .sign_transaction(&TransactionRequest::new("0xabc", "0.1"))
            .unwrap();
        assert!(!signed.signature_hex.is_empty());
    }
}
