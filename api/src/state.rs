use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use metrics_exporter_prometheus::PrometheusHandle;

use common::config::Settings;
use common::db::DbPool;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: DbPool,
    pub config: Arc<Settings>,
    pub cookie_key: Key,
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    /// Create a new AppState instance.
    ///
    /// The cookie signing key is derived from the configured session secret;
    /// `Settings::validate` has already enforced the minimum secret length.
    pub fn new(db_pool: DbPool, config: Settings, metrics_handle: PrometheusHandle) -> Self {
        let cookie_key = Key::derive_from(config.session.secret.as_bytes());

        Self {
            db_pool,
            config: Arc::new(config),
            cookie_key,
            metrics_handle,
        }
    }
}

// Lets SignedCookieJar pull its key straight out of the state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.cookie_key.clone()
    }
}
