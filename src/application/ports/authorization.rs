use crate::application::ApplicationResult;
use async_trait::async_trait;

#[async_trait]
pub trait AuthorizationProvider: Send + Sync {
    fn is_authorized_for(
        &self,
        account_id: i64,
        area: Option<&str>,
        controller: &str,
        action: &str,
    ) -> bool;

    /// Reloads the account to permission mapping from the store.
    async fn refresh(&self) -> ApplicationResult<()>;
}
