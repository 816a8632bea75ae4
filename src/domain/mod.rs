pub mod account;
pub mod audit;
pub mod errors;
pub mod model;
pub mod role;
