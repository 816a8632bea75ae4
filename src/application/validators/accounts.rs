use crate::application::{
    ApplicationResult,
    dto::{
        AccountCreateView, AccountEditView, AccountLoginView, AccountRecoveryView,
        AccountResetView, ProfileEditView,
    },
    error::ApplicationError,
    ports::{security::PasswordHasher, time::Clock},
    validation::ModelState,
};
use crate::domain::account::{
    Account, EMAIL_MAX_LENGTH, USERNAME_MAX_LENGTH, normalize_email, normalize_username,
};
use crate::infrastructure::persistence::{Filter, UnitOfWork};
use std::sync::Arc;

pub const USERNAME_TAKEN: &str = "Username is already taken.";
pub const EMAIL_TAKEN: &str = "E-mail address is already in use.";
pub const INCORRECT_PASSWORD: &str = "Incorrect password.";
pub const INCORRECT_CREDENTIALS: &str = "Incorrect username or password.";
pub const ACCOUNT_LOCKED: &str = "Your account has been disabled.";
pub const EXPIRED_TOKEN: &str = "Recovery token has expired.";

pub struct AccountValidator {
    unit_of_work: UnitOfWork,
    password_hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
    current_account_id: Option<i64>,
}

impl AccountValidator {
    pub fn new(
        unit_of_work: UnitOfWork,
        password_hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            unit_of_work,
            password_hasher,
            clock,
            current_account_id: None,
        }
    }

    pub fn with_current_account(mut self, account_id: Option<i64>) -> Self {
        self.current_account_id = account_id;
        self
    }

    pub async fn can_create(&self, view: &AccountCreateView) -> ApplicationResult<ModelState> {
        let mut state = ModelState::new();
        state.required("password", Some(view.password.as_str()));
        self.check_identity(&mut state, &view.username, &view.email, None)
            .await?;
        Ok(state)
    }

    pub async fn can_edit(&self, view: &AccountEditView) -> ApplicationResult<ModelState> {
        let mut state = ModelState::new();
        self.check_identity(&mut state, &view.username, &view.email, Some(view.id))
            .await?;
        Ok(state)
    }

    pub async fn can_edit_profile(&self, view: &ProfileEditView) -> ApplicationResult<ModelState> {
        let account_id = self
            .current_account_id
            .ok_or_else(|| ApplicationError::unauthorized("authentication required"))?;

        let mut state = ModelState::new();
        self.check_identity(&mut state, &view.username, &view.email, Some(account_id))
            .await?;

        if state.required("password", Some(view.password.as_str())) {
            let account = self
                .unit_of_work
                .get::<Account>(account_id)
                .await?
                .ok_or_else(|| ApplicationError::not_found("account not found"))?;
            if !self
                .password_hasher
                .verify(&view.password, &account.passhash)
                .await?
            {
                state.add_error("password", INCORRECT_PASSWORD);
            }
        }

        Ok(state)
    }

    pub async fn can_login(&self, view: &AccountLoginView) -> ApplicationResult<ModelState> {
        let mut state = ModelState::new();
        let username_given = state.required("username", Some(view.username.as_str()));
        let password_given = state.required("password", Some(view.password.as_str()));
        if !(username_given && password_given) {
            return Ok(state);
        }

        let account = self.find_by_username(&view.username).await?;
        let authenticated = match &account {
            Some(account) => {
                self.password_hasher
                    .verify(&view.password, &account.passhash)
                    .await?
            }
            None => false,
        };

        match account {
            _ if !authenticated => state.add_error("", INCORRECT_CREDENTIALS),
            Some(account) if account.is_locked => state.add_error("", ACCOUNT_LOCKED),
            _ => {}
        }

        Ok(state)
    }

    pub async fn can_recover(&self, view: &AccountRecoveryView) -> ApplicationResult<ModelState> {
        let mut state = ModelState::new();
        if state.required("email", Some(view.email.as_str())) {
            state.email("email", Some(view.email.as_str()));
        }
        Ok(state)
    }

    pub async fn can_reset(&self, view: &AccountResetView) -> ApplicationResult<ModelState> {
        let mut state = ModelState::new();
        state.required("new_password", Some(view.new_password.as_str()));

        if state.required("token", Some(view.token.as_str())) {
            let account = self
                .unit_of_work
                .select_where::<Account>(Filter::Eq("recovery_token", view.token.clone().into()))
                .await?
                .into_iter()
                .next();
            let now = self.clock.now();
            if account.is_none_or(|account| account.is_recovery_token_expired(now)) {
                state.add_error("token", EXPIRED_TOKEN);
            }
        }

        Ok(state)
    }

    async fn check_identity(
        &self,
        state: &mut ModelState,
        username: &str,
        email: &str,
        existing_id: Option<i64>,
    ) -> ApplicationResult<()> {
        if state.required("username", Some(username))
            && state.max_length("username", Some(username.trim()), USERNAME_MAX_LENGTH)
            && !self.is_unique_username(username, existing_id).await?
        {
            state.add_error("username", USERNAME_TAKEN);
        }

        if state.required("email", Some(email))
            && state.email("email", Some(email))
            && state.max_length("email", Some(email.trim()), EMAIL_MAX_LENGTH)
            && !self.is_unique_email(email, existing_id).await?
        {
            state.add_error("email", EMAIL_TAKEN);
        }

        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> ApplicationResult<Option<Account>> {
        Ok(self
            .unit_of_work
            .select_where::<Account>(Filter::Eq(
                "username_key",
                normalize_username(username).into(),
            ))
            .await?
            .into_iter()
            .next())
    }

    async fn is_unique_username(
        &self,
        username: &str,
        existing_id: Option<i64>,
    ) -> ApplicationResult<bool> {
        Ok(self
            .find_by_username(username)
            .await?
            .is_none_or(|account| Some(account.id) == existing_id))
    }

    async fn is_unique_email(&self, email: &str, existing_id: Option<i64>) -> ApplicationResult<bool> {
        let matches = self
            .unit_of_work
            .select_where::<Account>(Filter::Eq("email", normalize_email(email).into()))
            .await?;
        Ok(matches.iter().all(|account| Some(account.id) == existing_id))
    }
}
