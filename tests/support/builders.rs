use super::mocks::{FakePasswordHasher, TestClock, fixed_now};
use mvc_template::{
    application::{
        ports::{
            authorization::AuthorizationProvider,
            security::{PasswordHasher, TicketManager},
            time::Clock,
        },
        services::ApplicationServices,
    },
    domain::{
        account::Account,
        role::{Permission, PermissionKey, Role, RolePermission},
    },
    infrastructure::{
        database::{self, DataContext},
        persistence::UnitOfWork,
        security::{authorization::RolePermissionAuthorization, ticket::HmacTicketManager},
    },
};
use std::{sync::Arc, time::Duration};

pub const TICKET_SECRET: &str = "test-secret-test-secret-test-secret";
pub const COOKIE_NAME: &str = "auth";

pub async fn memory_context() -> DataContext {
    let pool = database::init_memory_pool()
        .await
        .expect("in-memory sqlite pool");
    database::run_migrations(&pool).await.expect("migrations");
    DataContext::new(pool)
}

/// Application wired against an in-memory store, the fake hasher and a
/// controllable clock.
pub struct TestApp {
    pub context: DataContext,
    pub clock: Arc<TestClock>,
    pub tickets: Arc<HmacTicketManager>,
    pub authorization: Arc<RolePermissionAuthorization>,
    pub services: Arc<ApplicationServices>,
}

impl TestApp {
    pub async fn new() -> Self {
        let context = memory_context().await;
        let clock = Arc::new(TestClock::default());
        let clock_port: Arc<dyn Clock> = clock.clone();
        let tickets = Arc::new(
            HmacTicketManager::new(
                TICKET_SECRET,
                COOKIE_NAME,
                Duration::from_secs(3600),
                Arc::clone(&clock_port),
            )
            .expect("ticket manager"),
        );
        let authorization = Arc::new(RolePermissionAuthorization::new(context.clone()));

        let hasher: Arc<dyn PasswordHasher> = Arc::new(FakePasswordHasher);
        let ticket_port: Arc<dyn TicketManager> = tickets.clone();
        let authorization_port: Arc<dyn AuthorizationProvider> = authorization.clone();
        let services = Arc::new(ApplicationServices::new(
            context.clone(),
            hasher,
            ticket_port,
            authorization_port,
            clock_port,
        ));

        Self {
            context,
            clock,
            tickets,
            authorization,
            services,
        }
    }

    pub fn unit_of_work(&self) -> UnitOfWork {
        UnitOfWork::new(self.context.clone())
    }

    /// Installs the protected-action permissions and refreshes authorization.
    pub async fn seeded(self) -> Self {
        self.services.seed(None).await.expect("seed permissions");
        self
    }

    pub async fn refresh_authorization(&self) {
        self.authorization.refresh().await.expect("refresh authorization");
    }
}

pub async fn insert_account(
    context: &DataContext,
    username: &str,
    password: &str,
    email: &str,
    role_id: Option<i64>,
) -> i64 {
    let mut uow = UnitOfWork::new(context.clone());
    uow.insert(&Account::new(
        username,
        FakePasswordHasher::hashed(password),
        email,
        role_id,
        fixed_now(),
    ));
    uow.commit()
        .await
        .expect("insert account")
        .first_inserted_id()
        .expect("account id")
}

/// Role granting exactly the given actions; missing permissions are created.
pub async fn insert_role(
    context: &DataContext,
    title: &str,
    actions: &[(Option<&str>, &str, &str)],
) -> i64 {
    let mut uow = UnitOfWork::new(context.clone());
    uow.insert(&Role::new(title, fixed_now()));
    let role_id = uow
        .commit()
        .await
        .expect("insert role")
        .first_inserted_id()
        .expect("role id");

    let existing = uow.select::<Permission>().await.expect("permissions");
    for (area, controller, action) in actions {
        let key = PermissionKey::new(*area, controller, action);
        let permission_id = match existing.iter().find(|permission| permission.key() == key) {
            Some(permission) => permission.id,
            None => {
                uow.insert(&Permission::new(&key, fixed_now()));
                uow.commit()
                    .await
                    .expect("insert permission")
                    .first_inserted_id()
                    .expect("permission id")
            }
        };
        uow.insert(&RolePermission::new(role_id, permission_id, fixed_now()));
    }
    uow.commit().await.expect("grant permissions");
    role_id
}

pub async fn load_account(context: &DataContext, id: i64) -> Option<Account> {
    UnitOfWork::new(context.clone())
        .get::<Account>(id)
        .await
        .expect("load account")
}
