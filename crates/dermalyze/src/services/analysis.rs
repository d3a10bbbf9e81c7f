//! Skin analysis: prediction upload, history and offline copies

use std::sync::Arc;

use api_client::{AnalysisResult, ApiClient, HistoryPage, ImageUrls, PredictionRecord};
use camera_capture::StillImage;
use local_store::LocalStore;
use tracing::{debug, info, warn};

use crate::settings::CacheConfig;
use crate::AppError;

const HISTORY_KEY: &str = "analysis_history";
const RECENT_KEY: &str = "recent_analyses";

fn history_key(page: u32, limit: u32) -> String {
    format!("{}_{}_{}", HISTORY_KEY, page, limit)
}

fn detail_key(id: &str) -> String {
    format!("analysis_{}", id)
}

/// Analysis service
pub struct AnalysisService {
    client: Arc<ApiClient>,
    store: Arc<LocalStore>,
    images: ImageUrls,
    cache: CacheConfig,
}

impl AnalysisService {
    pub fn new(client: Arc<ApiClient>, store: Arc<LocalStore>, cache: CacheConfig) -> Self {
        let images = client.image_urls();
        Self {
            client,
            store,
            images,
            cache,
        }
    }

    fn to_result(&self, record: &PredictionRecord) -> AnalysisResult {
        AnalysisResult::from_record(record, &self.images)
    }

    /// Upload a captured still and classify it
    pub async fn analyze(&self, still: &StillImage) -> Result<AnalysisResult, AppError> {
        let token = self.store.token();
        info!("Starting skin type prediction ({} bytes)", still.jpeg.len());

        let record = self
            .client
            .predict(token.as_deref(), &still.file_name, still.jpeg.clone())
            .await?;
        let result = self.to_result(&record);
        info!(
            "Prediction {}: {} ({}%)",
            result.id, result.skin_type, result.confidence
        );

        self.remember(&result);
        Ok(result)
    }

    /// Keep the newest results for offline viewing
    fn remember(&self, result: &AnalysisResult) {
        let mut recent = self.recent_analyses();
        recent.retain(|r| r.id != result.id);
        recent.insert(0, result.clone());
        recent.truncate(self.cache.recent_limit);

        if let Err(e) = self.store.set_cache(RECENT_KEY, &recent) {
            warn!("Failed to cache analysis result: {}", e);
        }
    }

    /// Results cached by [`AnalysisService::analyze`], newest first
    pub fn recent_analyses(&self) -> Vec<AnalysisResult> {
        self.store
            .get_cache(RECENT_KEY, self.cache.recent_ttl())
            .unwrap_or_default()
    }

    /// One page of history.
    ///
    /// Served from a fresh cache when possible; when the backend is down the
    /// last successful page (up to a day old) is returned instead.
    pub async fn history(&self, page: u32, limit: u32) -> Result<HistoryPage, AppError> {
        let key = history_key(page, limit);
        if let Some(cached) = self.store.get_cache::<HistoryPage>(&key, self.cache.history_ttl()) {
            debug!("Returning cached history {}", key);
            return Ok(cached);
        }

        let token = self.store.token();
        match self.client.history(token.as_deref(), page, limit).await {
            Ok(fetched) => {
                for cache_key in [key.as_str(), HISTORY_KEY] {
                    if let Err(e) = self.store.set_cache(cache_key, &fetched) {
                        warn!("Failed to cache history: {}", e);
                    }
                }
                Ok(fetched)
            }
            Err(e) => {
                warn!("History fetch failed: {}", e);
                if e.is_auth() {
                    return Err(e.into());
                }
                match self
                    .store
                    .get_cache::<HistoryPage>(HISTORY_KEY, self.cache.history_fallback_ttl())
                {
                    Some(stale) => {
                        info!("Returning fallback cached history");
                        Ok(stale)
                    }
                    None => Err(e.into()),
                }
            }
        }
    }

    /// History page as display results
    pub async fn history_results(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<Vec<AnalysisResult>, AppError> {
        let page = self.history(page, limit).await?;
        Ok(page.history.iter().map(|r| self.to_result(r)).collect())
    }

    /// A single analysis, cached for the default age
    pub async fn analysis(&self, id: &str) -> Result<AnalysisResult, AppError> {
        let key = detail_key(id);
        if let Some(cached) = self.store.get_cache(&key, self.cache.history_ttl()) {
            return Ok(cached);
        }

        let token = self.store.token();
        let record = self.client.history_entry(token.as_deref(), id).await?;
        let result = self.to_result(&record);
        if let Err(e) = self.store.set_cache(&key, &result) {
            warn!("Failed to cache analysis {}: {}", id, e);
        }
        Ok(result)
    }

    /// Delete an analysis and drop every cache that might still show it
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let token = self.store.token();
        self.client.delete_history(token.as_deref(), id).await?;
        self.store.clear_cache(None)?;
        Ok(())
    }
}
