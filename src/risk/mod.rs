//! Risk Assessment Engine
//!
//! Stateless security checks over addresses, transactions, signatures,
//! URLs, and contract addresses. Every entry point returns a
//! [`CheckResult`] and is total over its input domain: expected policy
//! failures and malformed input both come back as structured results,
//! never as errors that could take down the calling handler.

pub mod amount;
pub mod phishing;

use crate::chains::ChainRegistry;
use crate::store::{BlocklistStore, PhishingDomainStore};
use crate::types::{Chain, CheckKind, CheckResult, RiskLevel};
use serde_json::json;
use std::cmp::Ordering;
use std::sync::Arc;

/// Per-transaction policy options supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct TransactionPolicy {
    /// When non-empty, the recipient must be one of these addresses
    /// (compared case-insensitively).
    pub allowed_recipients: Vec<String>,
    /// Ceiling on the amount, as a decimal string, compared exactly.
    pub max_amount: Option<String>,
}

/// Stateless risk checks backed by injectable stores and the chain registry
pub struct RiskEngine {
    blocklist: Arc<BlocklistStore>,
    phishing_domains: Arc<PhishingDomainStore>,
    registry: Arc<ChainRegistry>,
}

impl RiskEngine {
    pub fn new(
        blocklist: Arc<BlocklistStore>,
        phishing_domains: Arc<PhishingDomainStore>,
        registry: Arc<ChainRegistry>,
    ) -> Self {
        Self {
            blocklist,
            phishing_domains,
            registry,
        }
    }

    /// Validate an address: chain allowance, blocklist, then syntax.
    pub fn validate_address(
        &self,
        address: &str,
        chain: Chain,
        allowed_chains: Option<&[Chain]>,
    ) -> CheckResult {
        if let Some(allowed) = allowed_chains {
            if !allowed.contains(&chain) {
                return CheckResult::fail(
                    CheckKind::AddressValidation,
                    RiskLevel::High,
                    format!("Chain {} is not permitted for this operation", chain),
                );
            }
        }

        if self.blocklist.contains(address) {
            return CheckResult::fail(
                CheckKind::AddressValidation,
                RiskLevel::Critical,
                "Address is blacklisted",
            );
        }

        let validator = match self.registry.validator(chain) {
            Some(validator) => validator,
            None => {
                return CheckResult::fail(
                    CheckKind::AddressValidation,
                    RiskLevel::Medium,
                    format!("No address validator registered for chain {}", chain),
                );
            }
        };

        match validator.validate(address) {
            Ok(normalized) => CheckResult::pass(
                CheckKind::AddressValidation,
                RiskLevel::None,
                format!("Valid {} address", chain.symbol()),
            )
            .with_details(json!({ "normalized": normalized })),
            Err(e) => CheckResult::fail(CheckKind::AddressValidation, RiskLevel::Medium, e.message),
        }
    }

    /// Validate a transfer: both addresses, recipient allowlist, amount ceiling.
    pub fn validate_transaction(
        &self,
        from: &str,
        to: &str,
        amount: &str,
        chain: Chain,
        policy: &TransactionPolicy,
    ) -> CheckResult {
        let from_check = self.validate_address(from, chain, None);
        if !from_check.success {
            return CheckResult::fail(
                CheckKind::TransactionPolicy,
                from_check.risk_level,
                format!("Sender address rejected: {}", from_check.message),
            );
        }

        let to_check = self.validate_address(to, chain, None);
        if !to_check.success {
            return CheckResult::fail(
                CheckKind::TransactionPolicy,
                to_check.risk_level,
                format!("Recipient address rejected: {}", to_check.message),
            );
        }

        if !policy.allowed_recipients.is_empty() {
            let to_lower = to.to_lowercase();
            let allowed = policy
                .allowed_recipients
                .iter()
                .any(|recipient| recipient.to_lowercase() == to_lower);
            if !allowed {
                return CheckResult::fail(
                    CheckKind::TransactionPolicy,
                    RiskLevel::High,
                    "Recipient is not in the allowed recipients list",
                );
            }
        }

        if let Some(ref max_amount) = policy.max_amount {
            match amount::compare_decimal(amount, max_amount) {
                Ok(Ordering::Greater) => {
                    return CheckResult::fail(
                        CheckKind::TransactionPolicy,
                        RiskLevel::Medium,
                        format!("Amount {} exceeds the ceiling of {}", amount, max_amount),
                    )
                    .with_details(json!({ "amount": amount, "max_amount": max_amount }));
                }
                Ok(_) => {}
                Err(e) => {
                    return CheckResult::fail(
                        CheckKind::TransactionPolicy,
                        RiskLevel::Medium,
                        format!("Unable to compare amounts: {}", e.message),
                    );
                }
            }
        }

        CheckResult::pass(
            CheckKind::TransactionPolicy,
            RiskLevel::None,
            "Transaction passes policy checks",
        )
    }

    /// Verify a signature against the claimed signer via the chain backend.
    ///
    /// `signature_hex` is the hex-encoded signature, with or without a
    /// `0x` prefix (65 bytes r||s||v for the ECDSA family, 64 bytes for
    /// the Ed25519 family).
    pub fn verify_signature(
        &self,
        message: &str,
        signature_hex: &str,
        signer: &str,
        chain: Chain,
    ) -> CheckResult {
        let verifier = match self.registry.verifier(chain) {
            Some(verifier) => verifier,
            None => {
                return CheckResult::fail(
                    CheckKind::SignatureVerification,
                    RiskLevel::Medium,
                    format!("No signature verifier registered for chain {}", chain),
                );
            }
        };

        let signature = match hex::decode(signature_hex.trim().trim_start_matches("0x")) {
            Ok(bytes) => bytes,
            Err(_) => {
                return CheckResult::fail(
                    CheckKind::SignatureVerification,
                    RiskLevel::High,
                    "Malformed signature encoding",
                );
            }
        };

        match verifier.verify(message.as_bytes(), &signature, signer) {
            Ok(true) => CheckResult::pass(
                CheckKind::SignatureVerification,
                RiskLevel::None,
                "Signature verified",
            ),
            Ok(false) => CheckResult::fail(
                CheckKind::SignatureVerification,
                RiskLevel::High,
                "Signature does not match the claimed signer",
            ),
            Err(e) => CheckResult::fail(
                CheckKind::SignatureVerification,
                RiskLevel::High,
                format!("Signature rejected: {}", e.message),
            ),
        }
    }

    /// Score a URL and/or addresses for phishing indicators.
    ///
    /// A blocklisted address or an exact phishing-domain hit is critical
    /// regardless of how the heuristics would have scored the URL.
    pub fn detect_phishing(
        &self,
        url: Option<&str>,
        address: Option<&str>,
        contract_address: Option<&str>,
    ) -> CheckResult {
        for candidate in [address, contract_address].into_iter().flatten() {
            if self.blocklist.contains(candidate) {
                return CheckResult::fail(
                    CheckKind::PhishingDetection,
                    RiskLevel::Critical,
                    "Address is blacklisted",
                );
            }
        }

        let url = match url {
            Some(url) => url,
            None => {
                return CheckResult::pass(
                    CheckKind::PhishingDetection,
                    RiskLevel::None,
                    "No phishing indicators detected",
                );
            }
        };

        let host = match parse_host(url) {
            Ok(host) => host,
            Err(message) => {
                return CheckResult::fail(CheckKind::PhishingDetection, RiskLevel::Medium, message);
            }
        };

        if self.phishing_domains.contains(&host) {
            return CheckResult::fail(
                CheckKind::PhishingDetection,
                RiskLevel::Critical,
                format!("Domain {} is a known phishing site", host),
            );
        }

        let mut indicators: Vec<String> = Vec::new();
        if let Some(brand) = phishing::brand_impersonation(&host) {
            indicators.push(format!("impersonates {}", brand));
        }
        for keyword in phishing::keyword_hits(&url.to_lowercase()) {
            indicators.push(format!("keyword '{}'", keyword));
        }

        let score = indicators.len();
        match score {
            0 => CheckResult::pass(
                CheckKind::PhishingDetection,
                RiskLevel::None,
                "No phishing indicators detected",
            ),
            1..=2 => CheckResult::fail(
                CheckKind::PhishingDetection,
                RiskLevel::Medium,
                format!("URL has {} phishing indicator(s)", score),
            )
            .with_details(json!({ "indicators": indicators })),
            _ => CheckResult::fail(
                CheckKind::PhishingDetection,
                RiskLevel::High,
                format!("URL has {} phishing indicators", score),
            )
            .with_details(json!({ "indicators": indicators })),
        }
    }

    /// Blacklist check for a contract address.
    ///
    /// Static and historical contract analysis is an extension point for an
    /// external analyzer; this engine only consults the blocklist.
    pub fn assess_contract_risk(
        &self,
        contract_address: &str,
        chain: Chain,
        check_source: bool,
    ) -> CheckResult {
        if self.blocklist.contains(contract_address) {
            return CheckResult::fail(
                CheckKind::ContractRisk,
                RiskLevel::Critical,
                "Contract address is blacklisted",
            );
        }

        let mut message = format!(
            "No blacklist hits for {} contract; deeper static analysis is not performed here",
            chain.symbol()
        );
        if check_source {
            message.push_str("; source inspection requires an external analyzer");
        }

        CheckResult::pass(CheckKind::ContractRisk, RiskLevel::Low, message)
            .with_details(json!({ "analysis": "blacklist-only" }))
    }
}

/// Extract the lower-cased host from a URL string.
fn parse_host(raw: &str) -> Result<String, String> {
    let parsed = url::Url::parse(raw.trim()).map_err(|e| format!("Unable to parse URL: {}", e))?;
    match parsed.host_str() {
        Some(host) => Ok(host.to_lowercase()),
        None => Err("URL has no host".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::Signer;

    const GOOD_EVM: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const OTHER_EVM: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    fn engine() -> RiskEngine {
        RiskEngine::new(
            Arc::new(BlocklistStore::new()),
            Arc::new(PhishingDomainStore::new()),
            Arc::new(ChainRegistry::default()),
        )
    }

    fn engine_with_blocklist(addresses: &[&str]) -> RiskEngine {
        RiskEngine::new(
            Arc::new(BlocklistStore::seeded(addresses)),
            Arc::new(PhishingDomainStore::new()),
            Arc::new(ChainRegistry::default()),
        )
    }

    #[test]
    fn test_validate_address_success() {
        let result = engine().validate_address(GOOD_EVM, Chain::Ethereum, None);
        assert!(result.success);
        assert_eq!(result.risk_level, RiskLevel::None);
    }

    #[test]
    fn test_validate_address_blacklisted_any_case() {
        let engine = engine_with_blocklist(&[GOOD_EVM]);

        let result = engine.validate_address(&GOOD_EVM.to_lowercase(), Chain::Ethereum, None);
        assert!(!result.success);
        assert_eq!(result.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_validate_address_chain_not_allowed() {
        let result = engine().validate_address(GOOD_EVM, Chain::Ethereum, Some(&[Chain::Solana]));
        assert!(!result.success);
        assert_eq!(result.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_validate_address_unregistered_chain() {
        let engine = RiskEngine::new(
            Arc::new(BlocklistStore::new()),
            Arc::new(PhishingDomainStore::new()),
            Arc::new(ChainRegistry::empty()),
        );
        let result = engine.validate_address(GOOD_EVM, Chain::Ethereum, None);
        assert!(!result.success);
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_validate_address_bad_format() {
        let result = engine().validate_address("0x1234", Chain::Ethereum, None);
        assert!(!result.success);
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_validate_transaction_amount_ceiling() {
        let engine = engine();
        let over = TransactionPolicy {
            max_amount: Some("100.00".to_string()),
            ..Default::default()
        };

        let result = engine.validate_transaction(GOOD_EVM, OTHER_EVM, "100.50", Chain::Ethereum, &over);
        assert!(!result.success);
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert!(result.message.contains("100.00"));

        let under = TransactionPolicy {
            max_amount: Some("200.00".to_string()),
            ..Default::default()
        };
        let result =
            engine.validate_transaction(GOOD_EVM, OTHER_EVM, "100.50", Chain::Ethereum, &under);
        assert!(result.success);
        assert_eq!(result.risk_level, RiskLevel::None);
    }

    #[test]
    fn test_validate_transaction_recipient_allowlist() {
        let engine = engine();
        let policy = TransactionPolicy {
            allowed_recipients: vec![GOOD_EVM.to_string()],
            ..Default::default()
        };

        let result = engine.validate_transaction(GOOD_EVM, OTHER_EVM, "1", Chain::Ethereum, &policy);
        assert!(!result.success);
        assert_eq!(result.risk_level, RiskLevel::High);

        // Case-insensitive match against the allowlist
        let policy = TransactionPolicy {
            allowed_recipients: vec![OTHER_EVM.to_lowercase()],
            ..Default::default()
        };
        let result = engine.validate_transaction(GOOD_EVM, OTHER_EVM, "1", Chain::Ethereum, &policy);
        assert!(result.success);
    }

    #[test]
    fn test_validate_transaction_surfaces_failing_side() {
        let engine = engine();
        let policy = TransactionPolicy::default();

        let result = engine.validate_transaction("bogus", OTHER_EVM, "1", Chain::Ethereum, &policy);
        assert!(!result.success);
        assert!(result.message.contains("Sender address rejected"));

        let result = engine.validate_transaction(GOOD_EVM, "bogus", "1", Chain::Ethereum, &policy);
        assert!(!result.success);
        assert!(result.message.contains("Recipient address rejected"));
    }

    #[test]
    fn test_validate_transaction_bad_amount_is_total() {
        let engine = engine();
        let policy = TransactionPolicy {
            max_amount: Some("100".to_string()),
            ..Default::default()
        };
        let result =
            engine.validate_transaction(GOOD_EVM, OTHER_EVM, "not-a-number", Chain::Ethereum, &policy);
        assert!(!result.success);
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_verify_signature_roundtrip() {
        let engine = engine();
        let backend = crate::chains::EvmBackend::new();
        let private_key =
            hex::decode("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80").unwrap();
        let signature = backend.sign_message(&private_key, b"hello").unwrap();
        let signature_hex = format!("0x{}", hex::encode(&signature));

        let result = engine.verify_signature("hello", &signature_hex, GOOD_EVM, Chain::Ethereum);
        assert!(result.success);

        let result = engine.verify_signature("hello!", &signature_hex, GOOD_EVM, Chain::Ethereum);
        assert!(!result.success);
        assert_eq!(result.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_verify_signature_malformed_hex() {
        let result = engine().verify_signature("hello", "zz-not-hex", GOOD_EVM, Chain::Ethereum);
        assert!(!result.success);
        assert_eq!(result.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_detect_phishing_listed_domain() {
        let engine = RiskEngine::new(
            Arc::new(BlocklistStore::new()),
            Arc::new(PhishingDomainStore::seeded(&["evil-wallet.com"])),
            Arc::new(ChainRegistry::default()),
        );
        let result = engine.detect_phishing(Some("https://evil-wallet.com/login"), None, None);
        assert!(!result.success);
        assert_eq!(result.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_detect_phishing_scoring() {
        let engine = engine();

        // Brand token + several keywords
        let result = engine.detect_phishing(
            Some("https://metamask-connect-airdrop.free-bonus.com"),
            None,
            None,
        );
        assert!(!result.success);
        assert_eq!(result.risk_level, RiskLevel::High);

        // Exactly one keyword
        let result = engine.detect_phishing(Some("https://example.com/wallet"), None, None);
        assert!(!result.success);
        assert_eq!(result.risk_level, RiskLevel::Medium);

        // Clean URL
        let result = engine.detect_phishing(Some("https://example.com/docs"), None, None);
        assert!(result.success);
        assert_eq!(result.risk_level, RiskLevel::None);
    }

    #[test]
    fn test_detect_phishing_blacklisted_address_overrides() {
        let engine = engine_with_blocklist(&["0xbadbadbad"]);
        let result =
            engine.detect_phishing(Some("https://example.com/docs"), Some("0xBADBADBAD"), None);
        assert!(!result.success);
        assert_eq!(result.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_detect_phishing_unparseable_url() {
        let result = engine().detect_phishing(Some("not a url"), None, None);
        assert!(!result.success);
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_assess_contract_risk() {
        let clean = engine().assess_contract_risk(GOOD_EVM, Chain::Ethereum, false);
        assert!(clean.success);
        assert_eq!(clean.risk_level, RiskLevel::Low);

        let engine = engine_with_blocklist(&[GOOD_EVM]);
        let listed = engine.assess_contract_risk(GOOD_EVM, Chain::Ethereum, true);
        assert!(!listed.success);
        assert_eq!(listed.risk_level, RiskLevel::Critical);
    }
}
