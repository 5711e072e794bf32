//! Solana Chain Backend (Ed25519 / base58)
//!
//! Covers the curve-point chain family: addresses are base58-encoded
//! Ed25519 public keys, and signatures are raw Ed25519 over the message
//! bytes with no prefix, verified directly against the public key.

use crate::chains::{AddressValidator, SignatureVerifier, Signer};
use crate::error::{GuardError, GuardResult};
use ed25519_dalek::{Signature, Signer as DalekSigner, SigningKey, Verifier, VerifyingKey};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

pub struct SolanaBackend;

impl SolanaBackend {
    pub fn new() -> Self {
        Self
    }

    /// Decode a base58 address into a validated curve point
    fn decode_public_key(address: &str) -> GuardResult<VerifyingKey> {
        let decoded = bs58::decode(address.trim())
            .into_vec()
            .map_err(|e| GuardError::invalid_address(format!("Invalid base58: {}", e)))?;

        if decoded.len() != 32 {
            return Err(GuardError::invalid_address(format!(
                "Expected 32 bytes, got {}",
                decoded.len()
            )));
        }

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&decoded);

        // Rejects byte strings that do not decompress to a curve point
        VerifyingKey::from_bytes(&bytes)
            .map_err(|_| GuardError::invalid_address("Not a valid Ed25519 curve point"))
    }
}

impl Default for SolanaBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressValidator for SolanaBackend {
    fn validate(&self, address: &str) -> GuardResult<String> {
        Self::decode_public_key(address)?;
        Ok(address.trim().to_string())
    }
}

impl SignatureVerifier for SolanaBackend {
    fn verify(&self, message: &[u8], signature: &[u8], signer: &str) -> GuardResult<bool> {
        if signature.len() != 64 {
            return Err(GuardError::invalid_signature(format!(
                "Expected 64 bytes, got {}",
                signature.len()
            )));
        }

        let verifying_key = Self::decode_public_key(signer)?;

        let sig_bytes: [u8; 64] = signature
            .try_into()
            .map_err(|_| GuardError::invalid_signature("Invalid signature length"))?;
        let sig = Signature::from_bytes(&sig_bytes);

        Ok(verifying_key.verify(message, &sig).is_ok())
    }
}

impl Signer for SolanaBackend {
    fn derive_address(&self, private_key: &[u8]) -> GuardResult<String> {
        let signing_key = signing_key_from_bytes(private_key)?;
        Ok(bs58::encode(signing_key.verifying_key().to_bytes()).into_string())
    }

    fn sign_message(&self, private_key: &[u8], message: &[u8]) -> GuardResult<Vec<u8>> {
        let signing_key = signing_key_from_bytes(private_key)?;
        Ok(signing_key.sign(message).to_bytes().to_vec())
    }

    fn generate_keypair(&self) -> GuardResult<(Zeroizing<Vec<u8>>, String)> {
        let mut seed = Zeroizing::new([0u8; 32]);
        OsRng.fill_bytes(&mut seed[..]);

        let signing_key = SigningKey::from_bytes(&seed);
        let address = bs58::encode(signing_key.verifying_key().to_bytes()).into_string();
        Ok((Zeroizing::new(seed.to_vec()), address))
    }
}

fn signing_key_from_bytes(private_key: &[u8]) -> GuardResult<SigningKey> {
    let secret_bytes: [u8; 32] = private_key.try_into().map_err(|_| {
        GuardError::crypto_error(format!(
            "Expected 32-byte private key, got {}",
            private_key.len()
        ))
    })?;
    Ok(SigningKey::from_bytes(&secret_bytes))
}
