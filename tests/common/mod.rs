use std::sync::Arc;

use procurement_api::{
    config::AppConfig,
    db,
    entities::vendors,
    events::{self, Event},
    services::vendors::CreateVendorRequest,
    AppState,
};
use tokio::sync::mpsc;

/// Buyer home state used by every test.
pub const HOME_STATE: &str = "KL";

/// Helper harness wiring the full service set over an in-memory SQLite
/// database with the real migrations applied.
pub struct TestApp {
    pub state: AppState,
    events: mpsc::Receiver<Event>,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new("sqlite::memory:", HOME_STATE);
        // A single pooled connection keeps every session on the same
        // in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let (sender, receiver) = events::channel(256);
        let state = AppState::new(Arc::new(pool), cfg, sender);

        Self {
            state,
            events: receiver,
        }
    }

    /// Creates a vendor registered in the given state.
    pub async fn seed_vendor(&self, name: &str, state_code: &str) -> vendors::Model {
        self.state
            .vendors
            .create_vendor(CreateVendorRequest {
                name: name.to_string(),
                gstin: None,
                state_code: state_code.to_string(),
                phone: None,
                email: None,
                address: None,
            })
            .await
            .expect("failed to seed vendor")
    }

    /// Drains every event emitted so far.
    #[allow(dead_code)]
    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }
}
