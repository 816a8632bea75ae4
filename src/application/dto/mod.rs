pub mod accounts;
pub mod audit;
pub mod auth;
pub mod pagination;
pub mod roles;

pub use accounts::{
    AccountCreateView, AccountEditView, AccountLoginView, AccountRecoveryView, AccountResetView,
    AccountView, ProfileEditView,
};
pub use audit::AuditLogView;
pub use auth::{AuthCookie, AuthTicket, Principal};
pub use pagination::{Page, PageRequest};
pub use roles::{PermissionView, RoleEditView, RoleView};

use crate::application::validation::property_title;

/// A view bound to one stored entity.
pub trait BaseView {
    fn id(&self) -> i64;

    /// Title shown for a property of this view.
    fn property_title(property: &str) -> String
    where
        Self: Sized,
    {
        property_title(property)
    }
}
