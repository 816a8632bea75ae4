use crate::application::{
    ApplicationResult, access::allow_listed_actions, ports::authorization::AuthorizationProvider,
};
use crate::domain::role::PermissionKey;
use crate::infrastructure::{database::DataContext, persistence::map_sqlx};
use async_trait::async_trait;
use std::{
    collections::{HashMap, HashSet},
    sync::{PoisonError, RwLock, RwLockReadGuard},
};

type PermissionMap = HashMap<i64, HashSet<PermissionKey>>;

/// Grants each unlocked account the permissions of its role.
///
/// Locked accounts are absent from the mapping and are refused everything.
/// Allow-listed actions are granted to every account in the mapping.
pub struct RolePermissionAuthorization {
    context: DataContext,
    allow_listed: HashSet<PermissionKey>,
    permissions: RwLock<PermissionMap>,
}

impl RolePermissionAuthorization {
    pub fn new(context: DataContext) -> Self {
        Self::with_allow_list(context, allow_listed_actions())
    }

    pub fn with_allow_list(
        context: DataContext,
        allow_listed: impl IntoIterator<Item = PermissionKey>,
    ) -> Self {
        Self {
            context,
            allow_listed: allow_listed.into_iter().collect(),
            permissions: RwLock::new(HashMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, PermissionMap> {
        self.permissions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    async fn load(&self) -> ApplicationResult<PermissionMap> {
        let rows: Vec<(i64, Option<String>, Option<String>, Option<String>)> = sqlx::query_as(
            r#"
            SELECT a.id, p.area, p.controller, p.action
            FROM accounts a
            LEFT JOIN role_permissions rp ON rp.role_id = a.role_id
            LEFT JOIN permissions p ON p.id = rp.permission_id
            WHERE a.is_locked = 0
            "#,
        )
        .fetch_all(self.context.pool())
        .await
        .map_err(map_sqlx)?;

        let mut permissions = PermissionMap::new();
        for (account_id, area, controller, action) in rows {
            let granted = permissions.entry(account_id).or_default();
            if let (Some(controller), Some(action)) = (controller, action) {
                granted.insert(PermissionKey::new(area.as_deref(), &controller, &action));
            }
        }
        Ok(permissions)
    }
}

#[async_trait]
impl AuthorizationProvider for RolePermissionAuthorization {
    fn is_authorized_for(
        &self,
        account_id: i64,
        area: Option<&str>,
        controller: &str,
        action: &str,
    ) -> bool {
        let key = PermissionKey::new(area, controller, action);
        self.read()
            .get(&account_id)
            .is_some_and(|granted| self.allow_listed.contains(&key) || granted.contains(&key))
    }

    async fn refresh(&self) -> ApplicationResult<()> {
        let permissions = self.load().await?;
        let accounts = permissions.len();
        *self
            .permissions
            .write()
            .unwrap_or_else(PoisonError::into_inner) = permissions;

        tracing::debug!(accounts, "authorization refreshed");
        Ok(())
    }
}
