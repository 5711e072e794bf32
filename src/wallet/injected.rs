//! Injected Provider Adapter
//!
//! Adapter over an externally supplied signing context - in the dashboard
//! deployment a browser extension, in tests a stub. The core only
//! specifies the interface the context must satisfy; key custody and
//! user approval live entirely on the provider's side of the boundary.

use super::{
    SignedTransaction, TransactionRequest, WalletAdapter, WalletError, WalletHandle, WalletResult,
};
use crate::logging;
use crate::types::Chain;
use std::sync::Arc;

/// Out-of-process signing context contract
///
/// Implementations are injected by the host environment. `request_accounts`
/// corresponds to the provider's connection prompt and returns the active
/// signing address.
pub trait ExternalSigner: Send + Sync {
    fn chain(&self) -> Chain;

    /// Ask the provider for access; returns the granted signing address.
    fn request_accounts(&self) -> WalletResult<String>;

    fn sign_message(&self, address: &str, message: &[u8]) -> WalletResult<Vec<u8>>;

    fn sign_transaction(
        &self,
        address: &str,
        request: &TransactionRequest,
    ) -> WalletResult<SignedTransaction>;
}

/// Wallet adapter delegating all signing to an [`ExternalSigner`]
pub struct InjectedProviderAdapter {
    provider: Arc<dyn ExternalSigner>,
    address: Option<String>,
}

impl InjectedProviderAdapter {
    pub fn new(provider: Arc<dyn ExternalSigner>) -> Self {
        Self {
            provider,
            address: None,
        }
    }

    fn connected_address(&self) -> WalletResult<&str> {
        self.address.as_deref().ok_or(WalletError::NotConnected)
    }
}

impl WalletAdapter for InjectedProviderAdapter {
    fn chain(&self) -> Chain {
        self.provider.chain()
    }

    fn connect(&mut self) -> WalletResult<WalletHandle> {
        let address = self.provider.request_accounts()?;

        logging::info("wallet", "Connected injected provider")
            .field("chain", self.provider.chain())
            .field("address", &address)
            .log();

        self.address = Some(address.clone());
        Ok(WalletHandle {
            chain: self.provider.chain(),
            address,
            connected: true,
        })
    }

    fn disconnect(&mut self) {
        self.address = None;
    }

    fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    fn address(&self) -> WalletResult<String> {
        Ok(self.connected_address()?.to_string())
    }

    fn sign_message(&self, message: &[u8]) -> WalletResult<Vec<u8>> {
        let address = self.connected_address()?;
        self.provider.sign_message(address, message)
    }

    fn sign_transaction(&self, request: &TransactionRequest) -> WalletResult<SignedTransaction> {
        let address = self.connected_address()?;
        self.provider.sign_transaction(address, request)
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use super::*;

    /// Provider stub backed by a local key, standing in for an extension
    pub struct StubProvider {
        pub chain: Chain,
        pub address: String,
        pub fail_connect: bool,
    }

    impl ExternalSigner for StubProvider {
        fn chain(&self) -> Chain {
            self.chain
        }

        fn request_accounts(&self) -> WalletResult<String> {
            if self.fail_connect {
                return Err(WalletError::Provider("User rejected the request".to_string()));
            }
            Ok(self.address.clone())
        }

        fn sign_message(&self, _address: &str, message: &[u8]) -> WalletResult<Vec<u8>> {
            // Deterministic stand-in, long enough to look like a signature
            let mut out = message.to_vec();
            out.resize(65, 0xee);
            Ok(out)
        }

        fn sign_transaction(
            &self,
            address: &str,
            request: &TransactionRequest,
        ) -> WalletResult<SignedTransaction> {
            let payload = request.canonical_bytes(self.chain);
            Ok(SignedTransaction {
                chain: self.chain,
                signer_address: address.to_string(),
                payload_hex: hex::encode(&payload),
                signature_hex: "ee".repeat(65),
            })
        }
    }
}
