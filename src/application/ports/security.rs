use crate::application::{
    ApplicationResult,
    dto::{AuthCookie, AuthTicket},
};
use async_trait::async_trait;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> ApplicationResult<String>;
    /// `Ok(false)` for a wrong password; errors are reserved for hashes that
    /// cannot be read.
    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<bool>;
}

/// Issues and reads the signed authentication cookie.
pub trait TicketManager: Send + Sync {
    fn cookie_name(&self) -> &str;
    fn issue(&self, name: &str, persistent: bool) -> ApplicationResult<AuthCookie>;
    /// Cookie that replaces the current one and expires immediately.
    fn expire(&self) -> AuthCookie;
    fn authenticate(&self, value: &str) -> ApplicationResult<AuthTicket>;
}
