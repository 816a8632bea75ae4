use crate::application::{
    ApplicationResult,
    access::protected_actions,
    dto::{PermissionView, RoleEditView, RoleView},
    error::ApplicationError,
    ports::{authorization::AuthorizationProvider, time::Clock},
};
use crate::domain::{
    account::Account,
    role::{Permission, PermissionKey, Role, RolePermission},
};
use crate::infrastructure::persistence::{Filter, UnitOfWork};
use std::{collections::HashSet, sync::Arc};

pub struct RoleService {
    unit_of_work: UnitOfWork,
    authorization: Option<Arc<dyn AuthorizationProvider>>,
    clock: Arc<dyn Clock>,
}

impl RoleService {
    pub fn new(unit_of_work: UnitOfWork, clock: Arc<dyn Clock>) -> Self {
        Self {
            unit_of_work,
            authorization: None,
            clock,
        }
    }

    pub fn with_authorization(mut self, authorization: Arc<dyn AuthorizationProvider>) -> Self {
        self.authorization = Some(authorization);
        self
    }

    pub async fn get_views(&self) -> ApplicationResult<Vec<RoleView>> {
        let mut roles: Vec<RoleView> = self
            .unit_of_work
            .select::<Role>()
            .await?
            .into_iter()
            .map(|role| self.unit_of_work.to(role))
            .collect();
        roles.sort_by_key(|role| std::cmp::Reverse(role.id));
        Ok(roles)
    }

    pub async fn get_view(&self, id: i64) -> ApplicationResult<Option<RoleEditView>> {
        let Some(role) = self.unit_of_work.get::<Role>(id).await? else {
            return Ok(None);
        };

        let permission_ids = self
            .granted(id)
            .await?
            .into_iter()
            .map(|granted| granted.permission_id)
            .collect();

        Ok(Some(RoleEditView {
            id: role.id,
            title: role.title,
            permission_ids,
        }))
    }

    pub async fn permissions(&self) -> ApplicationResult<Vec<PermissionView>> {
        Ok(self
            .unit_of_work
            .select::<Permission>()
            .await?
            .into_iter()
            .map(PermissionView::from)
            .collect())
    }

    pub async fn create(&mut self, view: &RoleEditView) -> ApplicationResult<i64> {
        let now = self.clock.now();
        let role = self.unit_of_work.insert(&Role::new(view.title.trim(), now));
        let grants: Vec<RolePermission> = unique(&view.permission_ids)
            .map(|permission_id| RolePermission::new(0, permission_id, now))
            .collect();
        for grant in &grants {
            self.unit_of_work.insert_referencing(grant, "role_id", role);
        }

        let report = self.unit_of_work.commit().await?;
        let id = report
            .first_inserted_id()
            .ok_or_else(|| ApplicationError::infrastructure("role id was not assigned"))?;

        tracing::info!(role_id = id, permissions = grants.len(), "role created");
        self.refresh_authorization().await?;
        Ok(id)
    }

    /// Renames the role and replaces the permissions it grants.
    pub async fn edit(&mut self, view: &RoleEditView) -> ApplicationResult<()> {
        let mut role = self
            .unit_of_work
            .get::<Role>(view.id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("role {} not found", view.id)))?;
        role.title = view.title.trim().to_owned();
        self.unit_of_work.update(&role);

        let wanted: HashSet<i64> = view.permission_ids.iter().copied().collect();
        let granted = self.granted(role.id).await?;
        let already: HashSet<i64> = granted.iter().map(|g| g.permission_id).collect();

        let revoked: Vec<&RolePermission> = granted
            .iter()
            .filter(|g| !wanted.contains(&g.permission_id))
            .collect();
        self.unit_of_work.delete_range(revoked.iter().copied());

        let now = self.clock.now();
        let added: Vec<RolePermission> = unique(&view.permission_ids)
            .filter(|id| !already.contains(id))
            .map(|permission_id| RolePermission::new(role.id, permission_id, now))
            .collect();
        self.unit_of_work.insert_range(&added);

        self.unit_of_work.commit().await?;

        tracing::info!(role_id = role.id, "role edited");
        self.refresh_authorization().await
    }

    /// Deletes the role after detaching its accounts and grants.
    pub async fn delete(&mut self, id: i64) -> ApplicationResult<()> {
        let accounts = self
            .unit_of_work
            .select_where::<Account>(Filter::Eq("role_id", id.into()))
            .await?;
        for mut account in accounts {
            account.role_id = None;
            self.unit_of_work.update(&account);
        }

        let granted = self.granted(id).await?;
        self.unit_of_work.delete_range(&granted);
        self.unit_of_work.delete_by_id::<Role>(id);
        self.unit_of_work.commit().await?;

        tracing::info!(role_id = id, "role deleted");
        self.refresh_authorization().await
    }

    /// Inserts a permission row for every protected action that lacks one.
    pub async fn seed_permissions(&mut self) -> ApplicationResult<usize> {
        let existing: HashSet<PermissionKey> = self
            .unit_of_work
            .select::<Permission>()
            .await?
            .iter()
            .map(Permission::key)
            .collect();

        let now = self.clock.now();
        let missing: Vec<Permission> = protected_actions()
            .iter()
            .filter(|key| !existing.contains(key))
            .map(|key| Permission::new(key, now))
            .collect();
        if missing.is_empty() {
            return Ok(0);
        }

        self.unit_of_work.insert_range(&missing);
        self.unit_of_work.commit().await?;
        tracing::info!(count = missing.len(), "permissions seeded");
        Ok(missing.len())
    }

    async fn granted(&self, role_id: i64) -> ApplicationResult<Vec<RolePermission>> {
        Ok(self
            .unit_of_work
            .select_where::<RolePermission>(Filter::Eq("role_id", role_id.into()))
            .await?)
    }

    async fn refresh_authorization(&self) -> ApplicationResult<()> {
        match &self.authorization {
            Some(authorization) => authorization.refresh().await,
            None => Ok(()),
        }
    }
}

fn unique(ids: &[i64]) -> impl Iterator<Item = i64> + '_ {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(move |id| seen.insert(*id))
}
