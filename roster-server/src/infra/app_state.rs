use std::{fmt, sync::Arc};

use roster_core::UserService;

use crate::infra::config::Config;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<UserService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(service: Arc<UserService>, config: Arc<Config>) -> Self {
        Self { service, config }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
