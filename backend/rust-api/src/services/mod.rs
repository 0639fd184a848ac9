use crate::config::Config;
use crate::services::catalog::CourseCatalog;
use crate::services::profile_store::ProfileStore;

pub struct AppState {
    pub config: Config,
    pub catalog: CourseCatalog,
    pub profiles: ProfileStore,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let catalog = CourseCatalog::load(&config.catalog_path)?;
        tracing::info!(
            courses = catalog.len(),
            path = %config.catalog_path,
            "course catalog loaded"
        );

        Ok(Self {
            config,
            catalog,
            profiles: ProfileStore::new(),
        })
    }
}

pub mod catalog;
pub mod profile_store;
pub mod progress_service;
pub mod recommendation_service;
