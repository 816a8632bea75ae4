use crate::application::{
    dto::{AuthCookie, AuthTicket},
    error::{ApplicationError, ApplicationResult},
    ports::{security::TicketManager, time::Clock},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::{sync::Arc, time::Duration};

type HmacSha256 = Hmac<Sha256>;

pub const MIN_SECRET_LENGTH: usize = 32;

/// Authentication tickets signed with HMAC-SHA256.
///
/// The cookie value is `base64(payload).base64(signature)` where the payload
/// is `name|issued|expires|persistent` with unix-second timestamps.
#[derive(Clone)]
pub struct HmacTicketManager {
    key: Arc<[u8]>,
    cookie_name: String,
    ttl: ChronoDuration,
    clock: Arc<dyn Clock>,
}

impl HmacTicketManager {
    pub fn new(
        secret: &str,
        cookie_name: impl Into<String>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> ApplicationResult<Self> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(ApplicationError::infrastructure(format!(
                "ticket secret must be at least {MIN_SECRET_LENGTH} bytes"
            )));
        }
        let ttl = ChronoDuration::from_std(ttl)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        Ok(Self {
            key: Arc::from(secret.as_bytes()),
            cookie_name: cookie_name.into(),
            ttl,
            clock,
        })
    }

    fn mac(&self) -> ApplicationResult<HmacSha256> {
        HmacSha256::new_from_slice(&self.key)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))
    }
}

fn invalid() -> ApplicationError {
    ApplicationError::unauthorized("invalid authentication ticket")
}

fn timestamp(value: &str) -> ApplicationResult<DateTime<Utc>> {
    value
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(invalid)
}

impl TicketManager for HmacTicketManager {
    fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    fn issue(&self, name: &str, persistent: bool) -> ApplicationResult<AuthCookie> {
        if name.is_empty() || name.contains('|') {
            return Err(ApplicationError::validation("invalid ticket name"));
        }

        let issued_at = self.clock.now();
        let expires_at = issued_at + self.ttl;
        let payload = format!(
            "{name}|{}|{}|{}",
            issued_at.timestamp(),
            expires_at.timestamp(),
            u8::from(persistent)
        );

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = mac.finalize().into_bytes();

        let value = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(payload.as_bytes()),
            URL_SAFE_NO_PAD.encode(signature)
        );

        Ok(AuthCookie {
            name: self.cookie_name.clone(),
            value,
            expires: persistent.then_some(expires_at),
            max_age: persistent.then(|| self.ttl.num_seconds()),
        })
    }

    fn expire(&self) -> AuthCookie {
        AuthCookie {
            name: self.cookie_name.clone(),
            value: String::new(),
            expires: Some(DateTime::UNIX_EPOCH),
            max_age: Some(0),
        }
    }

    fn authenticate(&self, value: &str) -> ApplicationResult<AuthTicket> {
        let (payload, signature) = value.split_once('.').ok_or_else(invalid)?;
        let payload = URL_SAFE_NO_PAD.decode(payload).map_err(|_| invalid())?;
        let signature = URL_SAFE_NO_PAD.decode(signature).map_err(|_| invalid())?;

        let mut mac = self.mac()?;
        mac.update(&payload);
        mac.verify_slice(&signature).map_err(|_| invalid())?;

        let payload = String::from_utf8(payload).map_err(|_| invalid())?;
        let mut parts = payload.split('|');
        let (Some(name), Some(issued), Some(expires), Some(persistent), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(invalid());
        };

        let ticket = AuthTicket {
            name: name.to_owned(),
            issued_at: timestamp(issued)?,
            expires_at: timestamp(expires)?,
            persistent: persistent == "1",
        };

        if ticket.expires_at <= self.clock.now() {
            return Err(ApplicationError::unauthorized("authentication ticket expired"));
        }
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn advance(&self, by: ChronoDuration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn manager() -> (HmacTicketManager, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock(Mutex::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        )));
        let manager =
            HmacTicketManager::new(SECRET, "auth", Duration::from_secs(3600), clock.clone())
                .unwrap();
        (manager, clock)
    }

    #[test]
    fn issued_ticket_authenticates_with_its_name() {
        let (manager, _) = manager();
        let cookie = manager.issue("42", true).unwrap();

        let ticket = manager.authenticate(&cookie.value).unwrap();
        assert_eq!(ticket.name, "42");
        assert_eq!(ticket.account_id(), Some(42));
        assert!(ticket.persistent);
        assert_eq!(cookie.max_age, Some(3600));
        assert_eq!(cookie.expires, Some(ticket.expires_at));
    }

    #[test]
    fn session_ticket_has_no_cookie_expiry() {
        let (manager, _) = manager();
        let cookie = manager.issue("42", false).unwrap();

        assert!(cookie.expires.is_none());
        assert!(!manager.authenticate(&cookie.value).unwrap().persistent);
    }

    #[test]
    fn tampered_ticket_is_rejected() {
        let (manager, _) = manager();
        let cookie = manager.issue("42", false).unwrap();
        let (_, signature) = cookie.value.split_once('.').unwrap();
        let forged = format!("{}.{signature}", URL_SAFE_NO_PAD.encode("1|0|9999999999|0"));

        assert!(matches!(
            manager.authenticate(&forged),
            Err(ApplicationError::Unauthorized(_))
        ));
        assert!(manager.authenticate("garbage").is_err());
    }

    #[test]
    fn ticket_expires_after_ttl() {
        let (manager, clock) = manager();
        let cookie = manager.issue("42", true).unwrap();

        clock.advance(ChronoDuration::seconds(3601));
        assert!(manager.authenticate(&cookie.value).is_err());
    }

    #[test]
    fn expired_cookie_is_already_expired() {
        let (manager, _) = manager();
        let cookie = manager.expire();

        assert_eq!(cookie.name, "auth");
        assert!(cookie.value.is_empty());
        assert!(cookie.is_expired_at(Utc::now()));
    }

    #[test]
    fn short_secret_is_rejected() {
        let clock: Arc<dyn Clock> = Arc::new(ManualClock(Mutex::new(Utc::now())));
        assert!(HmacTicketManager::new("short", "auth", Duration::from_secs(60), clock).is_err());
    }
}
