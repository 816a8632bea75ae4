use async_trait::async_trait;
use mvc_template::application::{ApplicationResult, ports::authorization::AuthorizationProvider};
use mvc_template::domain::role::PermissionKey;
use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Fixed grants per account; counts refreshes.
#[derive(Debug, Default)]
pub struct StaticAuthorization {
    grants: Mutex<HashMap<i64, HashSet<PermissionKey>>>,
    refreshes: AtomicUsize,
}

impl StaticAuthorization {
    pub fn grant(&self, account_id: i64, area: Option<&str>, controller: &str, action: &str) {
        self.grants
            .lock()
            .unwrap()
            .entry(account_id)
            .or_default()
            .insert(PermissionKey::new(area, controller, action));
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthorizationProvider for StaticAuthorization {
    fn is_authorized_for(
        &self,
        account_id: i64,
        area: Option<&str>,
        controller: &str,
        action: &str,
    ) -> bool {
        let key = PermissionKey::new(area, controller, action);
        self.grants
            .lock()
            .unwrap()
            .get(&account_id)
            .is_some_and(|granted| granted.contains(&key))
    }

    async fn refresh(&self) -> ApplicationResult<()> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
