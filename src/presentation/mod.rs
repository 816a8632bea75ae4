pub mod grid;
pub mod http;
