pub mod authorization;
pub mod password;
pub mod ticket;
