use async_trait::async_trait;
use mvc_template::application::{ApplicationResult, ports::security::PasswordHasher};

/// Deterministic hasher: `secret` hashes to `secretHashed`.
#[derive(Clone, Debug, Default)]
pub struct FakePasswordHasher;

impl FakePasswordHasher {
    pub fn hashed(password: &str) -> String {
        format!("{password}Hashed")
    }
}

#[async_trait]
impl PasswordHasher for FakePasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        Ok(Self::hashed(password))
    }

    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<bool> {
        Ok(Self::hashed(password) == expected_hash)
    }
}
