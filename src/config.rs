//! Core Configuration
//!
//! Explicit configuration object constructed at process start and handed
//! to the components that need it. The token-signing secret is mandatory
//! and has no default: a deployment without one fails here, loudly,
//! instead of silently issuing forgeable tokens. RPC endpoints are
//! optional and only required by the submit-and-confirm path.

use crate::error::{GuardError, GuardResult};
use crate::token::TokenCodec;
use crate::types::Chain;
use std::collections::HashMap;
use zeroize::Zeroizing;

/// Environment variable holding the token signing secret
pub const TOKEN_SECRET_VAR: &str = "CHAINGUARD_TOKEN_SECRET";
/// Prefix for per-chain RPC endpoint variables, e.g. `CHAINGUARD_RPC_ETHEREUM`
pub const RPC_ENDPOINT_PREFIX: &str = "CHAINGUARD_RPC_";

pub struct CoreConfig {
    token_secret: Zeroizing<Vec<u8>>,
    rpc_endpoints: HashMap<Chain, String>,
}

impl CoreConfig {
    /// Build a config from an explicit secret. Fails closed on empty input.
    pub fn new(token_secret: impl Into<Vec<u8>>) -> GuardResult<Self> {
        let token_secret = token_secret.into();
        if token_secret.is_empty() {
            return Err(GuardError::config_error(
                "Token signing secret is not configured",
            )
            .with_details(format!("Provide {} at startup", TOKEN_SECRET_VAR)));
        }
        Ok(Self {
            token_secret: Zeroizing::new(token_secret),
            rpc_endpoints: HashMap::new(),
        })
    }

    /// Read configuration from process environment.
    ///
    /// `CHAINGUARD_TOKEN_SECRET` is required; `CHAINGUARD_RPC_<CHAIN>`
    /// entries (chain name upper-cased, dashes as underscores) seed the
    /// endpoint table.
    pub fn from_env() -> GuardResult<Self> {
        let secret = std::env::var(TOKEN_SECRET_VAR)
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                GuardError::config_error("Token signing secret is not configured")
                    .with_details(format!("Set {} before startup", TOKEN_SECRET_VAR))
            })?;

        let mut config = Self::new(secret.into_bytes())?;

        for chain in [
            Chain::Ethereum,
            Chain::EthereumSepolia,
            Chain::Bnb,
            Chain::Polygon,
            Chain::Solana,
            Chain::SolanaDevnet,
        ] {
            let var = format!(
                "{}{}",
                RPC_ENDPOINT_PREFIX,
                chain.to_string().to_uppercase().replace('-', "_")
            );
            if let Ok(endpoint) = std::env::var(&var) {
                if !endpoint.is_empty() {
                    config.rpc_endpoints.insert(chain, endpoint);
                }
            }
        }

        Ok(config)
    }

    pub fn with_endpoint(mut self, chain: Chain, endpoint: impl Into<String>) -> Self {
        self.rpc_endpoints.insert(chain, endpoint.into());
        self
    }

    pub fn endpoint(&self, chain: Chain) -> Option<&str> {
        self.rpc_endpoints.get(&chain).map(|s| s.as_str())
    }

    pub fn endpoints(&self) -> &HashMap<Chain, String> {
        &self.rpc_endpoints
    }

    /// Token codec bound to the configured secret.
    pub fn token_codec(&self) -> GuardResult<TokenCodec> {
        TokenCodec::new(&self.token_secret)
    }
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("token_secret", &"[REDACTED]")
            .field("rpc_endpoints", &self.rpc_endpoints)
            .finish()
    }
}
