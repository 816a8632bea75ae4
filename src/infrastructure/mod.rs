pub mod database;
pub mod persistence;
pub mod security;
pub mod time;
