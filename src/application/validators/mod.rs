pub mod accounts;
pub mod roles;

pub use accounts::AccountValidator;
pub use roles::RoleValidator;
