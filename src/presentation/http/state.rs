use crate::application::services::ApplicationServices;
use crate::presentation::grid::Culture;
use std::sync::Arc;

#[derive(Clone)]
pub struct HttpState {
    pub services: Arc<ApplicationServices>,
    pub culture: Culture,
}

impl HttpState {
    pub fn new(services: Arc<ApplicationServices>, culture: Culture) -> Self {
        Self { services, culture }
    }
}
