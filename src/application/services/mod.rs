pub mod accounts;
pub mod audit;
pub mod roles;

pub use accounts::AccountService;
pub use audit::AuditQueryService;
pub use roles::RoleService;

use crate::{
    application::{
        ApplicationResult,
        access::Access,
        dto::{AccountCreateView, Principal, RoleEditView},
        ports::{
            authorization::AuthorizationProvider,
            security::{PasswordHasher, TicketManager},
            time::Clock,
        },
        validators::{AccountValidator, RoleValidator},
    },
    domain::{
        account::Account,
        role::{Permission, Role},
    },
    infrastructure::{
        database::DataContext,
        persistence::{Filter, SqlAuditLogger, UnitOfWork},
    },
};
use chrono::Duration;
use std::sync::Arc;

pub const ADMINISTRATOR_ROLE: &str = "Sys_Admin";

/// First account created when the store has none.
#[derive(Debug, Clone)]
pub struct AdministratorSeed {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Builds per-request services around the shared ports.
pub struct ApplicationServices {
    context: DataContext,
    password_hasher: Arc<dyn PasswordHasher>,
    ticket_manager: Arc<dyn TicketManager>,
    authorization: Arc<dyn AuthorizationProvider>,
    clock: Arc<dyn Clock>,
    recovery_window: Duration,
}

impl ApplicationServices {
    pub fn new(
        context: DataContext,
        password_hasher: Arc<dyn PasswordHasher>,
        ticket_manager: Arc<dyn TicketManager>,
        authorization: Arc<dyn AuthorizationProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            context,
            password_hasher,
            ticket_manager,
            authorization,
            clock,
            recovery_window: Duration::minutes(accounts::DEFAULT_RECOVERY_WINDOW_MINUTES),
        }
    }

    pub fn with_recovery_window(mut self, window: Duration) -> Self {
        self.recovery_window = window;
        self
    }

    pub fn context(&self) -> &DataContext {
        &self.context
    }

    /// Unit of work whose commits are audited as `actor`.
    pub fn unit_of_work(&self, actor: &Principal) -> UnitOfWork {
        let logger = SqlAuditLogger::new(actor.account_id, Arc::clone(&self.clock));
        UnitOfWork::with_logger(self.context.clone(), Box::new(logger))
    }

    pub fn accounts(&self, principal: &Principal) -> AccountService {
        AccountService::new(
            self.unit_of_work(principal),
            Arc::clone(&self.password_hasher),
            Arc::clone(&self.ticket_manager),
            Arc::clone(&self.clock),
        )
        .with_authorization(Arc::clone(&self.authorization))
        .with_recovery_window(self.recovery_window)
        .with_current_account(principal.account_id)
    }

    pub fn roles(&self, principal: &Principal) -> RoleService {
        RoleService::new(self.unit_of_work(principal), Arc::clone(&self.clock))
            .with_authorization(Arc::clone(&self.authorization))
    }

    pub fn account_validator(&self, principal: &Principal) -> AccountValidator {
        AccountValidator::new(
            UnitOfWork::new(self.context.clone()),
            Arc::clone(&self.password_hasher),
            Arc::clone(&self.clock),
        )
        .with_current_account(principal.account_id)
    }

    pub fn role_validator(&self) -> RoleValidator {
        RoleValidator::new(UnitOfWork::new(self.context.clone()))
    }

    pub fn audit_logs(&self) -> AuditQueryService {
        AuditQueryService::new(self.context.clone())
    }

    pub fn access(&self, principal: Principal) -> Access {
        Access::new(principal, Arc::clone(&self.authorization))
    }

    pub fn ticket_manager(&self) -> Arc<dyn TicketManager> {
        Arc::clone(&self.ticket_manager)
    }

    pub fn authorization(&self) -> Arc<dyn AuthorizationProvider> {
        Arc::clone(&self.authorization)
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Installs permissions for the protected actions and, on an empty
    /// store, the administrator role and account.
    pub async fn seed(&self, administrator: Option<&AdministratorSeed>) -> ApplicationResult<()> {
        let system = Principal::anonymous();
        self.roles(&system).seed_permissions().await?;

        if let Some(seed) = administrator {
            let uow = UnitOfWork::new(self.context.clone());
            if uow.select::<Account>().await?.is_empty() {
                let role_id = self.administrator_role(&uow).await?;
                let id = self
                    .accounts(&system)
                    .create(&AccountCreateView {
                        username: seed.username.clone(),
                        password: seed.password.clone(),
                        email: seed.email.clone(),
                        role_id: Some(role_id),
                    })
                    .await?;
                tracing::info!(account_id = id, "administrator account created");
            }
        }

        self.authorization.refresh().await
    }

    async fn administrator_role(&self, uow: &UnitOfWork) -> ApplicationResult<i64> {
        let existing = uow
            .select_where::<Role>(Filter::EqIgnoreCase("title", ADMINISTRATOR_ROLE.into()))
            .await?;
        if let Some(role) = existing.first() {
            return Ok(role.id);
        }

        let permission_ids = uow
            .select::<Permission>()
            .await?
            .iter()
            .map(|permission| permission.id)
            .collect();
        self.roles(&Principal::anonymous())
            .create(&RoleEditView {
                id: 0,
                title: ADMINISTRATOR_ROLE.into(),
                permission_ids,
            })
            .await
    }
}
