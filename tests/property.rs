use chainguard_core::risk::amount::compare_decimal;
use chainguard_core::{EphemeralKeyVault, TokenCodec};
use proptest::prelude::*;
use std::cmp::Ordering;
use std::time::Duration;

proptest! {
    #[test]
    fn token_survives_roundtrip_but_not_tampering(
        secret in prop::collection::vec(any::<u8>(), 1..64),
        payload in "[a-zA-Z0-9 ]{0,40}",
        flip_pos in any::<prop::sample::Index>(),
    ) {
        let codec = TokenCodec::new(&secret).expect("non-empty secret");
        let token = codec
            .issue(serde_json::json!(payload), Duration::from_secs(300))
            .expect("issue");

        prop_assert!(codec.verify(&token).is_valid());

        // Flip one hex character in the signature half
        let dot = token.rfind('.').expect("token has a separator");
        let mac_start = dot + 1;
        let pos = mac_start + flip_pos.index(token.len() - mac_start);
        let mut bytes = token.into_bytes();
        bytes[pos] = if bytes[pos] == b'0' { b'1' } else { b'0' };
        let tampered = String::from_utf8(bytes).expect("still ascii");

        prop_assert!(!codec.verify(&tampered).is_valid());
    }

    #[test]
    fn vault_yields_each_secret_exactly_once(
        secrets in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..48), 1..8),
    ) {
        let vault = EphemeralKeyVault::new();
        let tokens: Vec<(String, Vec<u8>)> = secrets
            .iter()
            .map(|secret| (vault.store(secret, Duration::from_secs(60)), secret.clone()))
            .collect();

        for (token, expected) in &tokens {
            let got = vault.take(token).expect("first retrieval");
            prop_assert_eq!(got.as_slice(), expected.as_slice());
            prop_assert!(vault.take(token).is_none(), "second retrieval must be absent");
        }
        prop_assert!(vault.is_empty());
    }

    #[test]
    fn decimal_comparison_matches_scaled_integers(
        a_int in 0u64..1_000_000,
        a_frac in 0u32..1_000_000,
        b_int in 0u64..1_000_000,
        b_frac in 0u32..1_000_000,
    ) {
        let a = format!("{}.{:06}", a_int, a_frac);
        let b = format!("{}.{:06}", b_int, b_frac);

        let a_scaled = a_int as u128 * 1_000_000 + a_frac as u128;
        let b_scaled = b_int as u128 * 1_000_000 + b_frac as u128;

        prop_assert_eq!(compare_decimal(&a, &b).unwrap(), a_scaled.cmp(&b_scaled));
    }

    #[test]
    fn decimal_comparison_ignores_padding(
        int_part in 0u64..1_000_000,
        frac in 0u32..1_000,
        zeros in 0usize..4,
    ) {
        let plain = format!("{}.{:03}", int_part, frac);
        let padded = format!(
            "{}{}.{:03}{}",
            "0".repeat(zeros),
            int_part,
            frac,
            "0".repeat(zeros)
        );

        prop_assert_eq!(compare_decimal(&plain, &padded).unwrap(), Ordering::Equal);
    }
}
