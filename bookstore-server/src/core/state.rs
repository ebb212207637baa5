//! Shared server state
//!
//! Cheap to clone: every field is a handle. Repositories are built on demand
//! from the store handle.

use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::{Config, Result, ServerError};
use crate::db::DocumentStore;
use crate::db::repository::{
    BookSeriesRepository, CartRepository, ContributorRepository, DeliveryRepository,
    OrderRepository, ProductRepository, ProductTypeRepository, PublisherRepository,
    ReviewRepository, SearchRepository, SectionRepository, UserRepository,
};
use crate::notify::{GatewayNotifier, SharedNotifier};
use crate::services::{AuthService, CheckoutService};
use shared::models::ContributorRole;

#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub store: DocumentStore,
    pub jwt: Arc<JwtService>,
    pub notifier: SharedNotifier,
}

impl ServerState {
    pub fn new(config: Config, store: DocumentStore, notifier: SharedNotifier) -> Self {
        let jwt = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config: Arc::new(config),
            store,
            jwt,
            notifier,
        }
    }

    /// Create the working directories, open the database and seed defaults
    pub fn initialize(config: Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        std::fs::create_dir_all(config.uploads_dir())?;

        let store = DocumentStore::open(config.database_path())?;
        tracing::info!(path = %config.database_path().display(), "Database opened");

        let notifier: SharedNotifier = Arc::new(GatewayNotifier::from_config(&config));
        let state = Self::new(config, store, notifier);
        state
            .product_types()
            .ensure_defaults()
            .map_err(|e| ServerError::Internal(anyhow::anyhow!(e.message)))?;
        Ok(state)
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.store.clone(), self.jwt.clone(), self.notifier.clone())
    }

    pub fn checkout(&self) -> CheckoutService {
        CheckoutService::new(self.store.clone(), self.notifier.clone())
    }

    pub fn contributors<R: ContributorRole>(&self) -> ContributorRepository<R> {
        ContributorRepository::new(self.store.clone())
    }

    pub fn publishers(&self) -> PublisherRepository {
        PublisherRepository::new(self.store.clone())
    }

    pub fn book_series(&self) -> BookSeriesRepository {
        BookSeriesRepository::new(self.store.clone())
    }

    pub fn sections(&self) -> SectionRepository {
        SectionRepository::new(self.store.clone())
    }

    pub fn product_types(&self) -> ProductTypeRepository {
        ProductTypeRepository::new(self.store.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.store.clone())
    }

    pub fn reviews(&self) -> ReviewRepository {
        ReviewRepository::new(self.store.clone())
    }

    pub fn search(&self) -> SearchRepository {
        SearchRepository::new(self.store.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.store.clone())
    }

    pub fn carts(&self) -> CartRepository {
        CartRepository::new(self.store.clone())
    }

    pub fn delivery(&self) -> DeliveryRepository {
        DeliveryRepository::new(self.store.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.store.clone())
    }
}
