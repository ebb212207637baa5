//! PBKDF2 password hashing
//!
//! PBKDF2-HMAC-SHA256, 310,000 iterations, 32-byte output, 16-byte random
//! salt. Hash and salt are stored hex-encoded on the user document.

use ring::rand::{SecureRandom, SystemRandom};
use ring::{digest, pbkdf2};
use sha2::{Digest, Sha256};
use shared::error::{AppError, AppResult};
use std::num::NonZeroU32;

const ITERATIONS: u32 = 310_000;
const CREDENTIAL_LEN: usize = digest::SHA256_OUTPUT_LEN;
const SALT_LEN: usize = 16;
const TEMPORARY_PASSWORD_LEN: usize = 8;

static ALGORITHM: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// Hex-encoded hash and salt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub hash: String,
    pub salt: String,
}

fn iterations() -> NonZeroU32 {
    NonZeroU32::new(ITERATIONS).unwrap_or(NonZeroU32::MIN)
}

fn random_bytes(len: usize) -> AppResult<Vec<u8>> {
    let mut buf = vec![0u8; len];
    SystemRandom::new()
        .fill(&mut buf)
        .map_err(|_| AppError::internal("Failed to generate random bytes"))?;
    Ok(buf)
}

/// Hash `password` with a fresh salt
pub fn hash_password(password: &str) -> AppResult<PasswordHash> {
    let salt = random_bytes(SALT_LEN)?;
    let mut out = [0u8; CREDENTIAL_LEN];
    pbkdf2::derive(ALGORITHM, iterations(), &salt, password.as_bytes(), &mut out);
    Ok(PasswordHash {
        hash: hex::encode(out),
        salt: hex::encode(salt),
    })
}

/// Re-derive from the stored salt and compare in constant time
pub fn verify_password(password: &str, hash_hex: &str, salt_hex: &str) -> bool {
    let (Ok(expected), Ok(salt)) = (hex::decode(hash_hex), hex::decode(salt_hex)) else {
        tracing::warn!("Stored password hash is not valid hex");
        return false;
    };
    pbkdf2::verify(ALGORITHM, iterations(), &salt, password.as_bytes(), &expected).is_ok()
}

/// Random 8-byte temporary password, hex-encoded (16 chars)
pub fn generate_temporary_password() -> AppResult<String> {
    Ok(hex::encode(random_bytes(TEMPORARY_PASSWORD_LEN)?))
}

/// Compare a supplied password with the stored temporary one.
///
/// Digests are compared so the timing does not depend on the shared prefix.
pub fn matches_temporary(stored: Option<&str>, supplied: &str) -> bool {
    match stored {
        Some(stored) if !stored.is_empty() => {
            Sha256::digest(stored.as_bytes()) == Sha256::digest(supplied.as_bytes())
        }
        _ => false,
    }
}
