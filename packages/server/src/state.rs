use std::sync::Arc;

use axum::extract::FromRef;
use catalog_common::storage::BlobStore;
use sea_orm::DatabaseConnection;

use crate::config::{AppConfig, AuthConfig};
use crate::services::sub_category::SubCategoryService;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub blob_store: Arc<dyn BlobStore>,
    pub sub_categories: Arc<dyn SubCategoryService>,
}

impl FromRef<AppState> for AuthConfig {
    fn from_ref(state: &AppState) -> Self {
        state.config.auth.clone()
    }
}
