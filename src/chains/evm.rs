//! EVM Chain Backend (secp256k1 / EIP-55 / EIP-191)
//!
//! Covers the hex-address chain family: 20-byte accounts rendered as
//! EIP-55 checksummed hex, personal messages prefixed per EIP-191, and
//! recoverable secp256k1 signatures verified by recovering the signer
//! address and comparing it to the claimed one.

use crate::chains::{AddressValidator, SignatureVerifier, Signer};
use crate::error::{GuardError, GuardResult};
use rand::rngs::OsRng;
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use tiny_keccak::{Hasher, Keccak};
use zeroize::Zeroizing;

/// Message prefix for personal_sign (EIP-191)
const ETH_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

pub struct EvmBackend {
    secp: Secp256k1<secp256k1::All>,
}

impl EvmBackend {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::new(),
        }
    }

    /// Hash a message with the EIP-191 personal-sign prefix
    pub fn personal_sign_hash(message: &[u8]) -> [u8; 32] {
        let prefix = format!("{}{}", ETH_MESSAGE_PREFIX, message.len());
        let mut data = Vec::with_capacity(prefix.len() + message.len());
        data.extend_from_slice(prefix.as_bytes());
        data.extend_from_slice(message);
        keccak256(&data)
    }

    /// Recover the checksummed signer address from a 65-byte signature
    pub fn recover_address(&self, message: &[u8], signature: &[u8]) -> GuardResult<String> {
        if signature.len() != 65 {
            return Err(GuardError::invalid_signature(format!(
                "Expected 65 bytes, got {}",
                signature.len()
            )));
        }

        let v = signature[64];
        let recovery_id = if v >= 27 { v - 27 } else { v };
        if recovery_id > 3 {
            return Err(GuardError::invalid_signature(format!(
                "Invalid recovery id: {}",
                recovery_id
            )));
        }

        let hash = Self::personal_sign_hash(message);
        let msg = Message::from_digest_slice(&hash)?;
        let rec_id = RecoveryId::from_i32(recovery_id as i32)?;
        let recoverable_sig = RecoverableSignature::from_compact(&signature[..64], rec_id)?;
        let public_key = self.secp.recover_ecdsa(&msg, &recoverable_sig)?;

        Ok(address_from_public_key(&public_key))
    }
}

impl Default for EvmBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressValidator for EvmBackend {
    fn validate(&self, address: &str) -> GuardResult<String> {
        let trimmed = address.trim();

        if !trimmed.starts_with("0x") || trimmed.len() != 42 {
            return Err(GuardError::invalid_address(
                "Expected 0x followed by 40 hex characters",
            ));
        }

        let hex_part = &trimmed[2..];
        if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GuardError::invalid_address("Invalid hex characters"));
        }

        let bytes = hex::decode(hex_part.to_lowercase())?;
        let checksummed = eip55_checksum(&bytes);

        // Mixed-case input carries an EIP-55 checksum and must match it exactly;
        // single-case input has no checksum and is normalized.
        let has_mixed_case = hex_part.chars().any(|c| c.is_uppercase())
            && hex_part.chars().any(|c| c.is_lowercase());
        if has_mixed_case && trimmed != checksummed {
            return Err(GuardError::invalid_address(
                "Invalid EIP-55 checksum - address may be corrupted",
            ));
        }

        Ok(checksummed)
    }
}

impl SignatureVerifier for EvmBackend {
    fn verify(&self, message: &[u8], signature: &[u8], signer: &str) -> GuardResult<bool> {
        let recovered = self.recover_address(message, signature)?;
        let expected = signer.trim_start_matches("0x").to_lowercase();
        let actual = recovered.trim_start_matches("0x").to_lowercase();
        Ok(expected == actual)
    }
}

impl Signer for EvmBackend {
    fn derive_address(&self, private_key: &[u8]) -> GuardResult<String> {
        let secret_key = secret_key_from_bytes(private_key)?;
        let public_key = PublicKey::from_secret_key(&self.secp, &secret_key);
        Ok(address_from_public_key(&public_key))
    }

    fn sign_message(&self, private_key: &[u8], message: &[u8]) -> GuardResult<Vec<u8>> {
        let secret_key = secret_key_from_bytes(private_key)?;
        let hash = Self::personal_sign_hash(message);
        let msg = Message::from_digest_slice(&hash)?;

        let sig = self.secp.sign_ecdsa_recoverable(&msg, &secret_key);
        let (recovery_id, sig_bytes) = sig.serialize_compact();

        // 65-byte wire form: r[32] || s[32] || v, with legacy v = 27 + recid
        let mut out = Vec::with_capacity(65);
        out.extend_from_slice(&sig_bytes);
        out.push(27 + recovery_id.to_i32() as u8);
        Ok(out)
    }

    fn generate_keypair(&self) -> GuardResult<(Zeroizing<Vec<u8>>, String)> {
        let secret_key = SecretKey::new(&mut OsRng);
        let public_key = PublicKey::from_secret_key(&self.secp, &secret_key);
        let private = Zeroizing::new(secret_key.secret_bytes().to_vec());
        Ok((private, address_from_public_key(&public_key)))
    }
}

fn secret_key_from_bytes(private_key: &[u8]) -> GuardResult<SecretKey> {
    if private_key.len() != 32 {
        return Err(GuardError::crypto_error(format!(
            "Expected 32-byte private key, got {}",
            private_key.len()
        )));
    }
    Ok(SecretKey::from_slice(private_key)?)
}

/// Keccak-hash the uncompressed public key and keep the last 20 bytes
fn address_from_public_key(public_key: &PublicKey) -> String {
    let pub_key_bytes = public_key.serialize_uncompressed();
    let pub_key_hash = keccak256(&pub_key_bytes[1..]);
    eip55_checksum(&pub_key_hash[12..])
}

/// EIP-55 checksum encoding of a 20-byte account
pub fn eip55_checksum(address: &[u8]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut result = String::with_capacity(42);
    result.push_str("0x");
    for (i, ch) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };

        if ch.is_ascii_digit() || nibble < 8 {
            result.push(ch);
        } else {
            result.push(ch.to_ascii_uppercase());
        }
    }
    result
}

pub(crate) fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}
