pub mod audit;
pub mod authorization;
pub mod security;
pub mod time;

pub use audit::{LoggerEvent, RecordingAuditLogger};
pub use authorization::StaticAuthorization;
pub use security::FakePasswordHasher;
pub use time::{TestClock, fixed_now};
