use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use tempfile::TempDir;
use tokio::sync::mpsc;
use uuid::Uuid;

use marketplace_core::{
    config::AppConfig,
    db,
    entities::ProductBase,
    events::{self, EventSender},
    services::{CreateCategoryInput, CreateUserInput},
    AppServices, AppState,
};

/// Helper harness spinning up application state backed by a throwaway SQLite
/// database.
pub struct TestApp {
    pub state: AppState,
    _tmp: TempDir,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir for test database");
        let db_file = tmp.path().join("marketplace_test.db");

        let mut cfg = AppConfig::new(format!("sqlite://{}?mode=rwc", db_file.display()), "test");
        cfg.auto_migrate = true;
        // One connection keeps SQLite writes serialized in tests.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        // Referential actions only hold with foreign keys enforced.
        pool.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "PRAGMA foreign_keys = ON;".to_string(),
        ))
        .await
        .expect("enable sqlite foreign keys");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        Self {
            state,
            _tmp: tmp,
            _event_task: event_task,
        }
    }

    #[allow(dead_code)]
    pub fn services(&self) -> &AppServices {
        &self.state.services
    }

    /// Seed a user with a unique email.
    #[allow(dead_code)]
    pub async fn seed_user(&self) -> Uuid {
        self.state
            .services
            .users
            .create_user(CreateUserInput {
                name: "Test User".to_string(),
                email: format!("{}@example.com", Uuid::new_v4()),
            })
            .await
            .expect("seed user for tests")
            .id
    }

    /// Seed a category.
    #[allow(dead_code)]
    pub async fn seed_category(&self, description: &str) -> Uuid {
        self.state
            .services
            .catalog
            .create_category(CreateCategoryInput {
                description: description.to_string(),
            })
            .await
            .expect("seed category for tests")
            .id
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// Shared product input fixture.
#[allow(dead_code)]
pub fn product_base(barcode: &str, title: &str, price: Decimal, category_id: Uuid) -> ProductBase {
    ProductBase {
        barcode: barcode.to_string(),
        title: title.to_string(),
        description: format!("{} description", title),
        image: format!("products/{}.png", barcode),
        price,
        category_id,
    }
}
