//! Ephemeral Key Vault
//!
//! Time-boxed, single-retrieval storage for transient secret material
//! (typically private keys handed between process boundaries). Retrieval
//! is a single atomic check-and-delete, so two concurrent readers can
//! never both observe a secret, and an optional background sweeper
//! removes entries that expired unread. Secrets are zeroized on drop.

use crate::logging;
use rand::{rngs::OsRng, RngCore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, Instant};
use zeroize::Zeroizing;

struct VaultEntry {
    secret: Zeroizing<Vec<u8>>,
    expires_at: Instant,
}

struct VaultInner {
    entries: Mutex<HashMap<String, VaultEntry>>,
}

impl VaultInner {
    /// Delete entries that are present and already expired. Never touches
    /// live entries, so a sweep racing a `take` cannot double-free.
    fn sweep_at(&self, now: Instant) -> usize {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(_) => return 0,
        };
        let before = entries.len();
        entries.retain(|_, entry| now <= entry.expires_at);
        before - entries.len()
    }
}

/// One-shot secret store with TTL-bounded exposure
pub struct EphemeralKeyVault {
    inner: Arc<VaultInner>,
}

impl EphemeralKeyVault {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(VaultInner {
                entries: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Store a secret for at most `ttl`, returning its retrieval token.
    pub fn store(&self, secret: &[u8], ttl: Duration) -> String {
        let token = generate_token();

        if let Ok(mut entries) = self.inner.entries.lock() {
            entries.insert(
                token.clone(),
                VaultEntry {
                    secret: Zeroizing::new(secret.to_vec()),
                    expires_at: Instant::now() + ttl,
                },
            );
        }

        logging::debug("vault", "Stored ephemeral secret")
            .field("token", &token)
            .field("ttl_ms", ttl.as_millis())
            .log();

        token
    }

    /// Atomically retrieve and delete the secret for `token`.
    ///
    /// Returns `None` for unknown tokens, already-consumed tokens, and
    /// expired entries (which are deleted on the way out). Exactly one
    /// caller can ever observe a given secret.
    pub fn take(&self, token: &str) -> Option<Zeroizing<Vec<u8>>> {
        self.take_at(token, Instant::now())
    }

    fn take_at(&self, token: &str, now: Instant) -> Option<Zeroizing<Vec<u8>>> {
        let mut entries = self.inner.entries.lock().ok()?;

        // Check-and-delete under one lock acquisition
        let entry = entries.remove(token)?;
        if now > entry.expires_at {
            logging::debug("vault", "Rejected take of expired secret")
                .field("token", token)
                .log();
            return None;
        }
        Some(entry.secret)
    }

    /// Wipe all entries (e.g. on shutdown). Secrets zeroize on drop.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.inner.entries.lock() {
            entries.clear();
        }
    }

    /// Delete expired-but-unread entries. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        self.inner.sweep_at(Instant::now())
    }

    /// Number of live entries, for monitoring
    pub fn len(&self) -> usize {
        self.inner
            .entries
            .lock()
            .map(|entries| entries.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `sweep` on a background thread every `interval`.
    ///
    /// The thread holds only a weak handle and exits on its next tick
    /// after the vault is dropped.
    pub fn spawn_sweeper(&self, interval: Duration) {
        let weak: Weak<VaultInner> = Arc::downgrade(&self.inner);

        std::thread::spawn(move || loop {
            std::thread::sleep(interval);
            match weak.upgrade() {
                Some(inner) => {
                    let removed = inner.sweep_at(Instant::now());
                    if removed > 0 {
                        logging::debug("vault", "Sweeper removed expired secrets")
                            .field("count", removed)
                            .log();
                    }
                }
                None => break,
            }
        });
    }
}

impl Default for EphemeralKeyVault {
    fn default() -> Self {
        Self::new()
    }
}

/// Cryptographically-random 32-byte token, hex encoded
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn test_store_take_roundtrip() {
        let vault = EphemeralKeyVault::new();
        let token = vault.store(b"super-secret", TTL);

        let secret = vault.take(&token).expect("first take returns the secret");
        assert_eq!(&*secret, b"super-secret");
    }

    #[test]
    fn test_second_take_is_absent() {
        let vault = EphemeralKeyVault::new();
        let token = vault.store(b"one-shot", TTL);

        assert!(vault.take(&token).is_some());
        assert!(vault.take(&token).is_none());
    }

    #[test]
    fn test_unknown_token_is_absent() {
        let vault = EphemeralKeyVault::new();
        assert!(vault.take("deadbeef").is_none());
    }

    #[test]
    fn test_expired_entry_is_absent_and_deleted() {
        let vault = EphemeralKeyVault::new();
        let token = vault.store(b"short-lived", TTL);

        let past_expiry = Instant::now() + TTL + Duration::from_millis(1);
        assert!(vault.take_at(&token, past_expiry).is_none());
        assert!(vault.is_empty());
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let vault = EphemeralKeyVault::new();
        vault.store(b"expired", Duration::from_millis(0));
        let live = vault.store(b"live", TTL);

        std::thread::sleep(Duration::from_millis(5));
        let removed = vault.sweep();
        assert_eq!(removed, 1);

        assert!(vault.take(&live).is_some());
    }

    #[test]
    fn test_clear_wipes_everything() {
        let vault = EphemeralKeyVault::new();
        let t1 = vault.store(b"a", TTL);
        let t2 = vault.store(b"b", TTL);

        vault.clear();
        assert!(vault.take(&t1).is_none());
        assert!(vault.take(&t2).is_none());
    }

    #[test]
    fn test_tokens_are_unique() {
        let vault = EphemeralKeyVault::new();
        let t1 = vault.store(b"a", TTL);
        let t2 = vault.store(b"a", TTL);

        assert_ne!(t1, t2);
        assert_eq!(t1.len(), 64); // 32 random bytes, hex encoded
    }

    #[test]
    fn test_exactly_once_under_concurrency() {
        let vault = Arc::new(EphemeralKeyVault::new());
        let token = vault.store(b"contended", TTL);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let vault = vault.clone();
            let token = token.clone();
            handles.push(std::thread::spawn(move || vault.take(&token).is_some()));
        }

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&got| got)
            .count();
        assert_eq!(successes, 1);
    }
}
