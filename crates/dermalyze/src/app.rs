//! Application wiring

use std::sync::Arc;

use api_client::ApiClient;
use camera_capture::MediaSource;
use capture_guidance::{CaptureSession, LandmarkDetector};
use local_store::LocalStore;
use tracing::info;

use crate::services::{AnalysisService, AuthService, ProductService};
use crate::settings::AppConfig;
use crate::AppError;

/// Shared client state behind every screen
pub struct Dermalyze {
    config: AppConfig,
    store: Arc<LocalStore>,
    pub auth: AuthService,
    pub analysis: AnalysisService,
    pub products: ProductService,
}

impl Dermalyze {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        config.validate()?;

        let store = match &config.storage.path {
            Some(path) => {
                info!("Opening local store at {}", path.display());
                LocalStore::open(path)?
            }
            None => LocalStore::in_memory(),
        };
        let store = Arc::new(store);
        let client = Arc::new(ApiClient::new(config.api.clone())?);

        info!(
            "Backend {} ({:?})",
            config.api.base_url, config.api.environment
        );

        Ok(Self {
            auth: AuthService::new(client.clone(), store.clone()),
            analysis: AnalysisService::new(client.clone(), store.clone(), config.cache.clone()),
            products: ProductService::new(client, store.clone(), config.cache.clone()),
            store,
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<LocalStore> {
        &self.store
    }

    /// A capture session using the configured camera and guidance thresholds
    pub fn capture_session<S: MediaSource, D: LandmarkDetector>(
        &self,
        source: S,
        detector: D,
    ) -> Result<CaptureSession<S, D>, AppError> {
        Ok(CaptureSession::new(
            self.config.guidance.clone(),
            self.config.camera.clone(),
            source,
            detector,
        )?)
    }
}
