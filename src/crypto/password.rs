use argon2::Argon2;
use rand::Rng;
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// Argon2id output and the salt it was derived with, as stored on a user row.
#[derive(Clone)]
pub struct Credential {
    pub hash: [u8; 32],
    pub salt: [u8; 32],
}

impl Credential {
    /// Derive a credential for `password` with a fresh random salt.
    pub fn derive(password: &str) -> Result<Self, AppError> {
        let salt: [u8; 32] = rand::thread_rng().gen();
        let hash = hash_password(password, &salt)?;
        Ok(Self { hash, salt })
    }

    pub fn from_stored(hash: &[u8], salt: &[u8]) -> Result<Self, AppError> {
        let hash = hash
            .try_into()
            .map_err(|_| AppError::Internal("Invalid stored hash".to_string()))?;
        let salt = salt
            .try_into()
            .map_err(|_| AppError::Internal("Invalid stored salt".to_string()))?;
        Ok(Self { hash, salt })
    }

    pub fn verify(&self, password: &str) -> Result<bool, AppError> {
        let computed = hash_password(password, &self.salt)?;
        Ok(computed.as_slice().ct_eq(self.hash.as_slice()).into())
    }
}

fn hash_password(password: &str, salt: &[u8]) -> Result<[u8; 32], AppError> {
    let mut hash = [0u8; 32];
    Argon2::default()
        .hash_password_into(password.as_bytes(), salt, &mut hash)
        .map_err(|e| AppError::Crypto(format!("Password hashing failed: {}", e)))?;
    Ok(hash)
}
