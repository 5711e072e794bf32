//! Local Key Adapter
//!
//! In-process signing over raw key material. `connect` is synchronous
//! (the address derives immediately from the key), signing uses the
//! chain's native scheme via the registered [`Signer`] backend, and
//! `submit_and_confirm` optionally pushes the signed payload to a
//! configured RPC endpoint and polls for confirmation within a caller
//! supplied deadline. No lock is held during network I/O.

use super::{
    SignedTransaction, TransactionRequest, WalletAdapter, WalletError, WalletHandle, WalletResult,
};
use crate::chains::Signer;
use crate::logging;
use crate::types::Chain;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use zeroize::Zeroizing;

/// Cap on any single RPC request within the overall deadline
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Delay between confirmation polls
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Result of a submit-and-confirm cycle
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    pub tx_id: String,
    pub confirmed: bool,
}

/// Wallet adapter holding key material in-process
pub struct LocalKeyAdapter {
    chain: Chain,
    signer: Arc<dyn Signer>,
    private_key: Zeroizing<Vec<u8>>,
    address: String,
    endpoint: Option<String>,
    connected: bool,
}

impl LocalKeyAdapter {
    pub(crate) fn new(
        chain: Chain,
        signer: Arc<dyn Signer>,
        private_key: Zeroizing<Vec<u8>>,
        address: String,
        endpoint: Option<String>,
    ) -> Self {
        Self {
            chain,
            signer,
            private_key,
            address,
            endpoint,
            connected: false,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Sign a request and run [`Self::submit_and_confirm`] on the result.
    pub fn sign_and_submit(
        &self,
        request: &TransactionRequest,
        timeout: Duration,
    ) -> WalletResult<SubmitReceipt> {
        let signed = self.sign_transaction(request)?;
        self.submit_and_confirm(&signed, timeout)
    }

    /// Push a signed payload to the configured endpoint and poll until it
    /// confirms or `timeout` elapses.
    ///
    /// An absent endpoint is a configuration error, not a silent no-op.
    /// Transport failures and deadline expiry surface as `Network` /
    /// `Timeout`, distinct from an endpoint-side rejection (`Rejected`).
    pub fn submit_and_confirm(
        &self,
        signed: &SignedTransaction,
        timeout: Duration,
    ) -> WalletResult<SubmitReceipt> {
        if !self.connected {
            return Err(WalletError::NotConnected);
        }
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(WalletError::MissingEndpoint(self.chain))?;

        let deadline = Instant::now() + timeout;
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT.min(timeout))
            .connect_timeout(REQUEST_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| WalletError::Network(e.to_string()))?;

        let tx_id = self.submit(&client, endpoint, signed)?;

        logging::info("wallet", "Submitted transaction")
            .field("chain", self.chain)
            .field("tx_id", &tx_id)
            .log();

        loop {
            if self.poll_confirmation(&client, endpoint, &tx_id)? {
                return Ok(SubmitReceipt {
                    tx_id,
                    confirmed: true,
                });
            }
            if Instant::now() + POLL_INTERVAL >= deadline {
                return Err(WalletError::Timeout);
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn submit(
        &self,
        client: &reqwest::blocking::Client,
        endpoint: &str,
        signed: &SignedTransaction,
    ) -> WalletResult<String> {
        let (method, blob) = if self.chain.is_evm() {
            (
                "eth_sendRawTransaction",
                format!("0x{}{}", signed.payload_hex, signed.signature_hex),
            )
        } else {
            let mut bytes = hex::decode(&signed.payload_hex)
                .map_err(|e| WalletError::Signing(format!("Invalid payload hex: {}", e)))?;
            bytes.extend(
                hex::decode(&signed.signature_hex)
                    .map_err(|e| WalletError::Signing(format!("Invalid signature hex: {}", e)))?,
            );
            ("sendTransaction", bs58::encode(bytes).into_string())
        };

        let result = rpc_call(client, endpoint, method, json!([blob]))?;
        result
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| WalletError::Rejected("Endpoint returned no transaction id".to_string()))
    }

    fn poll_confirmation(
        &self,
        client: &reqwest::blocking::Client,
        endpoint: &str,
        tx_id: &str,
    ) -> WalletResult<bool> {
        if self.chain.is_evm() {
            let result = rpc_call(client, endpoint, "eth_getTransactionReceipt", json!([tx_id]))?;
            Ok(!result.is_null())
        } else {
            let result = rpc_call(client, endpoint, "getSignatureStatuses", json!([[tx_id]]))?;
            Ok(!result["value"][0].is_null())
        }
    }
}

impl WalletAdapter for LocalKeyAdapter {
    fn chain(&self) -> Chain {
        self.chain
    }

    fn connect(&mut self) -> WalletResult<WalletHandle> {
        self.connected = true;

        logging::info("wallet", "Connected local key adapter")
            .field("chain", self.chain)
            .field("address", &self.address)
            .log();

        Ok(WalletHandle {
            chain: self.chain,
            address: self.address.clone(),
            connected: true,
        })
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn address(&self) -> WalletResult<String> {
        if !self.connected {
            return Err(WalletError::NotConnected);
        }
        Ok(self.address.clone())
    }

    fn sign_message(&self, message: &[u8]) -> WalletResult<Vec<u8>> {
        if !self.connected {
            return Err(WalletError::NotConnected);
        }
        self.signer
            .sign_message(&self.private_key, message)
            .map_err(|e| WalletError::Signing(e.message))
    }

    fn sign_transaction(&self, request: &TransactionRequest) -> WalletResult<SignedTransaction> {
        if !self.connected {
            return Err(WalletError::NotConnected);
        }

        let payload = request.canonical_bytes(self.chain);
        let signature = self
            .signer
            .sign_message(&self.private_key, &payload)
            .map_err(|e| WalletError::Signing(e.message))?;

        Ok(SignedTransaction {
            chain: self.chain,
            signer_address: self.address.clone(),
            payload_hex: hex::encode(&payload),
            signature_hex: hex::encode(&signature),
        })
    }
}

/// One JSON-RPC 2.0 call. Endpoint-side errors map to `Rejected`,
/// transport problems to `Network`/`Timeout`.
fn rpc_call(
    client: &reqwest::blocking::Client,
    endpoint: &str,
    method: &str,
    params: Value,
) -> WalletResult<Value> {
    let body = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params,
    });

    let response = client.post(endpoint).json(&body).send().map_err(|e| {
        if e.is_timeout() {
            WalletError::Timeout
        } else {
            WalletError::Network(e.to_string())
        }
    })?;

    let value: Value = response
        .json()
        .map_err(|e| WalletError::Network(format!("Invalid RPC response: {}", e)))?;

    if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown error");
        return Err(WalletError::Rejected(message.to_string()));
    }

    Ok(value.get("result").cloned().unwrap_or(Value::Null))
}
