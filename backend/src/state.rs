//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Collaborators behind traits**: store, storage, scheduler and places are `Arc<dyn _>`
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap
//! 3. **Immutable after creation**: State is read-only during request handling

use crate::auth::JwtService;
use crate::config::{AppConfig, StoreBackend};
use crate::db;
use crate::notifications::{NotificationScheduler, TokioNotificationScheduler};
use crate::places::{GooglePlacesClient, PlacesLookup};
use crate::storage::{InMemoryObjectStorage, LocalObjectStorage, ObjectStorage};
use crate::store::{DocumentStore, InMemoryDocumentStore, PgDocumentStore};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// External collaborators the services orchestrate
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn DocumentStore>,
    pub storage: Arc<dyn ObjectStorage>,
    pub scheduler: Arc<dyn NotificationScheduler>,
    pub places: Arc<dyn PlacesLookup>,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub storage: Arc<dyn ObjectStorage>,
    pub scheduler: Arc<dyn NotificationScheduler>,
    pub places: Arc<dyn PlacesLookup>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
}

impl AppState {
    /// Assemble state from explicit collaborators
    pub fn new(collaborators: Collaborators, config: AppConfig) -> Self {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry_secs);

        Self {
            store: collaborators.store,
            storage: collaborators.storage,
            scheduler: collaborators.scheduler,
            places: collaborators.places,
            config: Arc::new(config),
            jwt,
        }
    }

    /// Build the production collaborators described by `config`
    pub async fn from_config(config: AppConfig) -> Result<Self> {
        let store: Arc<dyn DocumentStore> = match config.store.backend {
            StoreBackend::Memory => {
                info!("Using in-memory document store");
                Arc::new(InMemoryDocumentStore::new())
            }
            StoreBackend::Postgres => {
                info!("Connecting to document store database...");
                let pool = db::create_pool(&config.store).await?;
                if !AppConfig::is_production() {
                    db::run_migrations(&pool).await?;
                }
                Arc::new(PgDocumentStore::new(pool))
            }
        };

        let collaborators = Collaborators {
            store,
            storage: Arc::new(LocalObjectStorage::new(
                &config.storage.root_dir,
                &config.storage.public_base_url,
            )),
            scheduler: Arc::new(TokioNotificationScheduler::new()),
            places: Arc::new(GooglePlacesClient::new(
                &config.places.base_url,
                &config.places.api_key,
                config.places.search_radius_m,
            )),
        };

        Ok(Self::new(collaborators, config))
    }

    /// Fully in-process state; places calls go to the configured base URL
    pub fn in_memory(config: AppConfig) -> Self {
        let collaborators = Collaborators {
            store: Arc::new(InMemoryDocumentStore::new()),
            storage: Arc::new(InMemoryObjectStorage::new()),
            scheduler: Arc::new(TokioNotificationScheduler::new()),
            places: Arc::new(GooglePlacesClient::new(
                &config.places.base_url,
                &config.places.api_key,
                config.places.search_radius_m,
            )),
        };
        Self::new(collaborators, config)
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the JWT service
    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
