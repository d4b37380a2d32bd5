use crate::error::CoreError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Turns secrets into stored hashes and checks secrets against them.
pub trait CredentialVerifier: Send + Sync {
    fn hash(&self, secret: &str) -> Result<String, CoreError>;

    /// `Ok(false)` for a wrong secret, `Err` only for unusable hashes.
    fn verify(&self, secret: &str, hash: &str) -> Result<bool, CoreError>;
}

#[derive(Clone, Debug, Default)]
pub struct Argon2Verifier {
    argon2: Argon2<'static>,
}

impl Argon2Verifier {
    /// Argon2id with explicit cost parameters (memory in KiB).
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, CoreError> {
        let params =
            Params::new(m_cost, t_cost, p_cost, None).map_err(|error| CoreError::Credential(error.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, secret: &str) -> Result<String, CoreError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|error| CoreError::Credential(error.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, secret: &str, hash: &str) -> Result<bool, CoreError> {
        let hash = PasswordHash::new(hash).map_err(|error| CoreError::Credential(error.to_string()))?;
        match self.argon2.verify_password(secret.as_bytes(), &hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(CoreError::Credential(error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> Argon2Verifier {
        Argon2Verifier::with_params(1024, 1, 1).unwrap()
    }

    #[test]
    fn hash_then_verify() {
        let verifier = verifier();
        let hash = verifier.hash("correct horse").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verifier.verify("correct horse", &hash).unwrap());
        assert!(!verifier.verify("battery staple", &hash).unwrap());
    }

    #[test]
    fn salts_differ() {
        let verifier = verifier();
        assert_ne!(verifier.hash("secret").unwrap(), verifier.hash("secret").unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(matches!(verifier().verify("secret", "plain"), Err(CoreError::Credential(_))));
    }
}
