use crate::application::{
    ApplicationResult,
    dto::{
        AccountCreateView, AccountEditView, AccountRecoveryView, AccountResetView, AccountView,
        AuthCookie, Principal, ProfileEditView,
    },
    error::ApplicationError,
    ports::{
        authorization::AuthorizationProvider,
        security::{PasswordHasher, TicketManager},
        time::Clock,
    },
};
use crate::domain::account::{Account, normalize_email, normalize_username};
use crate::infrastructure::persistence::{Filter, UnitOfWork, read_models};
use chrono::Duration;
use std::sync::Arc;
use uuid::Uuid;

pub const DEFAULT_RECOVERY_WINDOW_MINUTES: i64 = 30;

/// Account lifecycle on top of one unit of work.
pub struct AccountService {
    unit_of_work: UnitOfWork,
    password_hasher: Arc<dyn PasswordHasher>,
    ticket_manager: Arc<dyn TicketManager>,
    authorization: Option<Arc<dyn AuthorizationProvider>>,
    clock: Arc<dyn Clock>,
    recovery_window: Duration,
    current_account_id: Option<i64>,
}

impl AccountService {
    pub fn new(
        unit_of_work: UnitOfWork,
        password_hasher: Arc<dyn PasswordHasher>,
        ticket_manager: Arc<dyn TicketManager>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            unit_of_work,
            password_hasher,
            ticket_manager,
            authorization: None,
            clock,
            recovery_window: Duration::minutes(DEFAULT_RECOVERY_WINDOW_MINUTES),
            current_account_id: None,
        }
    }

    pub fn with_authorization(mut self, authorization: Arc<dyn AuthorizationProvider>) -> Self {
        self.authorization = Some(authorization);
        self
    }

    pub fn with_recovery_window(mut self, window: Duration) -> Self {
        self.recovery_window = window;
        self
    }

    pub fn with_current_account(mut self, account_id: Option<i64>) -> Self {
        self.current_account_id = account_id;
        self
    }

    pub fn current_account_id(&self) -> Option<i64> {
        self.current_account_id
    }

    pub async fn get<V: From<Account>>(&self, id: i64) -> ApplicationResult<Option<V>> {
        Ok(self.unit_of_work.get_as::<Account, V>(id).await?)
    }

    pub async fn get_view(&self, id: i64) -> ApplicationResult<Option<AccountView>> {
        Ok(read_models::account_view(self.unit_of_work.context(), id).await?)
    }

    pub async fn get_views(&self) -> ApplicationResult<Vec<AccountView>> {
        Ok(read_models::account_views(self.unit_of_work.context()).await?)
    }

    pub fn is_logged_in(&self, principal: &Principal) -> bool {
        principal.is_authenticated()
    }

    pub async fn is_active(&self, id: i64) -> ApplicationResult<bool> {
        Ok(self
            .unit_of_work
            .get::<Account>(id)
            .await?
            .is_some_and(|account| !account.is_locked))
    }

    /// Issues a fresh recovery token for the account with this e-mail.
    /// Returns `None` and changes nothing when no account matches.
    pub async fn recover(&mut self, view: &AccountRecoveryView) -> ApplicationResult<Option<String>> {
        let email = normalize_email(&view.email);
        let Some(mut account) = self
            .unit_of_work
            .select_where::<Account>(Filter::EqIgnoreCase("email", email))
            .await?
            .into_iter()
            .next()
        else {
            return Ok(None);
        };

        let token = Uuid::new_v4().to_string();
        account.issue_recovery_token(token.clone(), self.clock.after(self.recovery_window));

        self.unit_of_work.update(&account);
        self.unit_of_work.commit().await?;

        tracing::info!(account_id = account.id, "recovery token issued");
        tracing::debug!(account_id = account.id, %token, "recovery token");
        Ok(Some(token))
    }

    pub async fn reset(&mut self, view: &AccountResetView) -> ApplicationResult<()> {
        let mut account = self
            .unit_of_work
            .select_where::<Account>(Filter::Eq("recovery_token", view.token.clone().into()))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApplicationError::not_found("recovery token not found"))?;

        account.clear_recovery_token();
        account.passhash = self.password_hasher.hash(&view.new_password).await?;

        self.unit_of_work.update(&account);
        self.unit_of_work.commit().await?;

        tracing::info!(account_id = account.id, "password reset");
        Ok(())
    }

    pub async fn create(&mut self, view: &AccountCreateView) -> ApplicationResult<i64> {
        let passhash = self.password_hasher.hash(&view.password).await?;
        let account = Account::new(
            view.username.trim(),
            passhash,
            &view.email,
            view.role_id,
            self.clock.now(),
        );

        self.unit_of_work.insert(&account);
        let report = self.unit_of_work.commit().await?;
        let id = report
            .first_inserted_id()
            .ok_or_else(|| ApplicationError::infrastructure("account id was not assigned"))?;

        tracing::info!(account_id = id, "account created");
        self.refresh_authorization().await?;
        Ok(id)
    }

    /// Administrator edit; never touches the password or recovery state.
    pub async fn edit(&mut self, view: &AccountEditView) -> ApplicationResult<()> {
        let mut account = self.require(view.id).await?;
        account.set_username(&view.username);
        account.set_email(&view.email);
        account.is_locked = view.is_locked;
        account.role_id = view.role_id;

        self.unit_of_work.update(&account);
        self.unit_of_work.commit().await?;

        tracing::info!(account_id = account.id, "account edited");
        self.refresh_authorization().await
    }

    /// Edits the signed-in account. The password only changes when a
    /// non-blank new password is given.
    pub async fn edit_profile(&mut self, view: &ProfileEditView) -> ApplicationResult<()> {
        let account_id = self
            .current_account_id
            .ok_or_else(|| ApplicationError::unauthorized("authentication required"))?;
        let mut account = self.require(account_id).await?;

        account.set_username(&view.username);
        account.set_email(&view.email);
        if let Some(new_password) = view
            .new_password
            .as_deref()
            .filter(|password| !password.trim().is_empty())
        {
            account.passhash = self.password_hasher.hash(new_password).await?;
        }

        self.unit_of_work.update(&account);
        self.unit_of_work.commit().await?;

        tracing::info!(account_id, "profile edited");
        Ok(())
    }

    pub async fn delete(&mut self, id: i64) -> ApplicationResult<()> {
        self.unit_of_work.delete_by_id::<Account>(id);
        self.unit_of_work.commit().await?;

        tracing::info!(account_id = id, "account deleted");
        self.refresh_authorization().await
    }

    /// Authentication cookie for the account with this username, matched
    /// ignoring case.
    pub async fn login(&self, username: &str, persistent: bool) -> ApplicationResult<AuthCookie> {
        let account = self
            .unit_of_work
            .select_where::<Account>(Filter::Eq(
                "username_key",
                normalize_username(username).into(),
            ))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApplicationError::unauthorized("invalid credentials"))?;

        let cookie = self
            .ticket_manager
            .issue(&account.id.to_string(), persistent)?;
        tracing::info!(account_id = account.id, persistent, "signed in");
        Ok(cookie)
    }

    pub fn logout(&self) -> AuthCookie {
        self.ticket_manager.expire()
    }

    async fn require(&self, id: i64) -> ApplicationResult<Account> {
        self.unit_of_work
            .get::<Account>(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("account {id} not found")))
    }

    async fn refresh_authorization(&self) -> ApplicationResult<()> {
        match &self.authorization {
            Some(authorization) => authorization.refresh().await,
            None => Ok(()),
        }
    }
}
