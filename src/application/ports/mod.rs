pub mod authorization;
pub mod security;
pub mod time;
