use eventify_catalog::Eventify;
use eventify_common::EventifyError;
use eventify_config::AppConfig;
use std::sync::Arc;

/// Everything a command needs: the loaded configuration and the facade
/// built from it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub eventify: Eventify,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, EventifyError> {
        let eventify = Eventify::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            eventify,
        })
    }
}
