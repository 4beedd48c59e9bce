//! Password and security-answer hashing for the library core.
//!
//! Uses Argon2id for secure one-way hashing. The hasher is a capability
//! handed to the credential engine, so tests can substitute a cheap
//! deterministic implementation.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use rand_core::OsRng;

use crate::{BiblioError, Result};

/// One-way hashing with constant-time verification.
///
/// Both password digests and security-answer digests go through this trait.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext secret, producing a self-describing digest string.
    fn hash(&self, plaintext: &str) -> Result<String>;

    /// Verify a plaintext secret against a stored digest.
    fn verify(&self, plaintext: &str, digest: &str) -> bool;
}

/// Create the Argon2 hasher with recommended parameters.
///
/// Parameters:
/// - Memory cost: 64 MB (65536 KiB)
/// - Time cost: 3 iterations
/// - Parallelism: 4 threads
fn create_argon2() -> Argon2<'static> {
    let m_cost = 65536;
    let t_cost = 3;
    let p_cost = 4;

    let params = Params::new(m_cost, t_cost, p_cost, None).expect("valid Argon2 params");
    Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
}

/// Argon2id-backed hasher.
///
/// Produces PHC-formatted digest strings that include the salt and
/// parameters, so verification reads its parameters from the digest itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let argon2 = create_argon2();
        let digest = argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| BiblioError::Hash(e.to_string()))?;

        Ok(digest.to_string())
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(h) => h,
            Err(_) => return false,
        };

        // Parameters are taken from the parsed digest, not from create_argon2()
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}
