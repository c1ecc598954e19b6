use std::sync::Arc;

use crate::cache::{DatasetCache, WorkingSet};
use crate::config::Config;
use crate::error::AppResult;
use crate::models::SubscriptionRecord;
use crate::source;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: Arc<DatasetCache>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            cache: Arc::new(DatasetCache::new()),
            http: reqwest::Client::new(),
        }
    }

    /// Re-fetch from the configured source. On failure the previous dataset
    /// stays in place.
    pub async fn reload(&self) -> AppResult<usize> {
        let records = source::fetch(&self.config.source, &self.http).await?;
        let count = records.len();
        self.cache.replace(records);
        Ok(count)
    }

    pub fn working_set(&self) -> WorkingSet {
        self.cache.working_set()
    }

    pub fn table_rows(&self) -> Arc<Vec<SubscriptionRecord>> {
        self.cache.table_rows()
    }
}
