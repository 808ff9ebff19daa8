// src/state.rs
use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::services::{AppointmentService, ProductService, TaxonomyService};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db_pool: PgPool, config: AppConfig) -> Self {
        Self {
            db_pool,
            config: Arc::new(config),
        }
    }

    pub fn products(&self) -> ProductService {
        ProductService::new(self.db_pool.clone())
    }

    pub fn appointments(&self) -> AppointmentService {
        AppointmentService::new(self.db_pool.clone())
    }

    pub fn taxonomy(&self) -> TaxonomyService {
        TaxonomyService::new(self.db_pool.clone())
    }
}
