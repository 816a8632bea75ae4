use crate::application::{
    dto::Principal,
    error::{ApplicationError, ApplicationResult},
    ports::authorization::AuthorizationProvider,
};
use crate::domain::role::PermissionKey;
use std::sync::Arc;

pub const ADMINISTRATION: &str = "Administration";

/// Actions that require a granted permission, as (area, controller, action).
pub const PROTECTED_ACTIONS: &[(Option<&str>, &str, &str)] = &[
    (Some(ADMINISTRATION), "Accounts", "Index"),
    (Some(ADMINISTRATION), "Accounts", "Details"),
    (Some(ADMINISTRATION), "Accounts", "Create"),
    (Some(ADMINISTRATION), "Accounts", "Edit"),
    (Some(ADMINISTRATION), "Accounts", "Delete"),
    (Some(ADMINISTRATION), "Roles", "Index"),
    (Some(ADMINISTRATION), "Roles", "Details"),
    (Some(ADMINISTRATION), "Roles", "Create"),
    (Some(ADMINISTRATION), "Roles", "Edit"),
    (Some(ADMINISTRATION), "Roles", "Delete"),
    (Some(ADMINISTRATION), "AuditLogs", "Index"),
];

/// Actions any signed-in, unlocked account may use.
pub const ALLOW_LISTED_ACTIONS: &[(Option<&str>, &str, &str)] = &[
    (None, "Profile", "Edit"),
    (None, "Auth", "Logout"),
];

pub fn protected_actions() -> Vec<PermissionKey> {
    to_keys(PROTECTED_ACTIONS)
}

pub fn allow_listed_actions() -> Vec<PermissionKey> {
    to_keys(ALLOW_LISTED_ACTIONS)
}

fn to_keys(actions: &[(Option<&str>, &str, &str)]) -> Vec<PermissionKey> {
    actions
        .iter()
        .map(|(area, controller, action)| PermissionKey::new(*area, controller, action))
        .collect()
}

/// Capability handed to request handlers and grid helpers: the current
/// principal plus the authorization provider to ask.
///
/// Without a provider every action is allowed.
#[derive(Clone)]
pub struct Access {
    principal: Principal,
    provider: Option<Arc<dyn AuthorizationProvider>>,
}

impl Access {
    pub fn new(principal: Principal, provider: Arc<dyn AuthorizationProvider>) -> Self {
        Self {
            principal,
            provider: Some(provider),
        }
    }

    pub fn ungated(principal: Principal) -> Self {
        Self {
            principal,
            provider: None,
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn can(&self, area: Option<&str>, controller: &str, action: &str) -> bool {
        let Some(provider) = &self.provider else {
            return true;
        };
        self.principal.account_id.is_some_and(|account_id| {
            provider.is_authorized_for(account_id, area, controller, action)
        })
    }

    /// Requires a signed-in principal allowed to run the action.
    pub fn ensure(&self, area: Option<&str>, controller: &str, action: &str) -> ApplicationResult<()> {
        if !self.principal.is_authenticated() {
            return Err(ApplicationError::unauthorized("authentication required"));
        }
        if !self.can(area, controller, action) {
            return Err(ApplicationError::forbidden(format!(
                "not authorized for {}",
                PermissionKey::new(area, controller, action)
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Access")
            .field("principal", &self.principal)
            .field("gated", &self.provider.is_some())
            .finish()
    }
}
