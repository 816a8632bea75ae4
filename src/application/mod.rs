pub mod access;
pub mod dto;
pub mod error;
pub mod ports;
pub mod services;
pub mod validation;
pub mod validators;

pub use error::ApplicationResult;
