//! Phishing Heuristics
//!
//! Lightweight URL heuristics consulted after the exact-match domain
//! blocklist: brand impersonation (a known brand token in a host that is
//! not under the brand's canonical domain) and a fixed sensitive-keyword
//! list. Each hit contributes one point to the score the engine maps to
//! a risk level.

/// Keywords frequently seen in wallet-drainer and giveaway-scam URLs
pub const SENSITIVE_KEYWORDS: [&str; 8] = [
    "wallet", "connect", "verify", "claim", "airdrop", "giveaway", "free", "bonus",
];

/// Brand tokens with the canonical domains they legitimately appear under
const BRAND_DOMAINS: [(&str, &[&str]); 8] = [
    ("metamask", &["metamask.io"]),
    ("uniswap", &["uniswap.org"]),
    ("opensea", &["opensea.io"]),
    ("phantom", &["phantom.app"]),
    ("binance", &["binance.com"]),
    ("coinbase", &["coinbase.com"]),
    ("kraken", &["kraken.com"]),
    ("pancakeswap", &["pancakeswap.finance"]),
];

/// Detect a brand token appearing in a host outside the brand's canonical
/// domains. The host must already be lower-cased.
pub fn brand_impersonation(host: &str) -> Option<&'static str> {
    for (brand, canonical) in &BRAND_DOMAINS {
        if host.contains(brand) && !under_any_domain(host, canonical) {
            return Some(brand);
        }
    }
    None
}

/// Collect the sensitive keywords present anywhere in the lower-cased URL.
pub fn keyword_hits(url: &str) -> Vec<&'static str> {
    SENSITIVE_KEYWORDS
        .iter()
        .copied()
        .filter(|keyword| url.contains(keyword))
        .collect()
}

fn under_any_domain(host: &str, domains: &[&str]) -> bool {
    domains
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_domain_is_not_impersonation() {
        assert_eq!(brand_impersonation("metamask.io"), None);
        assert_eq!(brand_impersonation("app.uniswap.org"), None);
    }

    #[test]
    fn test_lookalike_host_fires() {
        assert_eq!(brand_impersonation("metamask-login.com"), Some("metamask"));
        assert_eq!(brand_impersonation("secure.opensea.io.example.net"), Some("opensea"));
    }

    #[test]
    fn test_suffix_must_be_a_label_boundary() {
        // Ends with the canonical string but not as a registered suffix
        assert_eq!(brand_impersonation("fakemetamask.io"), Some("metamask"));
    }

    #[test]
    fn test_unrelated_host_is_clean() {
        assert_eq!(brand_impersonation("example.com"), None);
    }

    #[test]
    fn test_keyword_hits() {
        let hits = keyword_hits("https://metamask-connect-airdrop.free-bonus.com");
        assert!(hits.contains(&"connect"));
        assert!(hits.contains(&"airdrop"));
        assert!(hits.contains(&"free"));
        assert!(hits.contains(&"bonus"));

        assert!(keyword_hits("https://example.com/docs").is_empty());
    }
}
