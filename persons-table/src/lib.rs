//! # persons-table: a browsable table of person records
//!
//! `persons-table` serves a small server-rendered web application over a single PostgreSQL
//! table of people. The table can be paged through, added to by hand, edited, trimmed, and
//! repopulated in bulk from the [randomuser.me](https://randomuser.me) API.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer and
//! PostgreSQL (through `sqlx`) for persistence. Pages are rendered from `minijinja` templates
//! compiled into the binary.
//!
//! ### Request Flow
//!
//! A handler in [`api::handlers`] decodes the request and validates any submitted form, then
//! makes exactly one call on the [`store::PersonStore`]. The store runs the SQL through the
//! [`db::handlers::Persons`] repository on a pooled connection or transaction, and the handler
//! either renders a page or redirects back to the listing with a one-shot [`flash`] message.
//!
//! ### Resize
//!
//! The listing page carries a form asking for a number of entries. Submitting it makes the
//! table hold exactly that many rows: surplus rows are deleted from the highest ids down, and
//! missing rows are fetched from randomuser.me (see [`random_user`]) and inserted in one
//! transaction. The same operation populates the table on startup.
//!
//! ## Configuration
//!
//! See [`config`] for the YAML file and `PERSONS_*` environment variables.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod flash;
pub mod images;
pub mod random_user;
mod static_assets;
pub mod store;
pub mod telemetry;
pub mod templates;
#[cfg(test)]
pub mod test_utils;
pub mod types;

use crate::{
    api::handlers::{persons, static_assets::serve_static},
    images::ImageProbe,
    random_user::{FetchPeople, RandomUserClient},
    store::{PersonStore, ResizeOutcome},
};
use axum::{Router, routing::get};
use bon::Builder;
pub use config::Config;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument};

/// Application state shared across all request handlers.
///
/// # Example
///
/// ```ignore
/// let state = AppState::builder()
///     .store(store)
///     .config(config)
///     .image_probe(image_probe)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub store: PersonStore,
    pub config: Config,
    pub image_probe: ImageProbe,
}

/// Get the persons-table database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

fn optional_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Connect the pool and bring the schema up to date
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let settings = &config.database.pool;
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .idle_timeout(optional_secs(settings.idle_timeout_secs))
        .max_lifetime(optional_secs(settings.max_lifetime_secs))
        .connect(&config.database.url)
        .await?;

    migrator().run(&pool).await?;
    Ok(pool)
}

/// Bring the table to `quantity` rows before serving.
///
/// Idempotent: a table that already holds `quantity` rows is left alone.
#[instrument(skip(store), err)]
pub async fn seed_persons_table(store: &PersonStore, quantity: i64) -> anyhow::Result<()> {
    match store.resize(quantity).await? {
        ResizeOutcome::Unchanged => debug!("Persons table already holds {} rows", quantity),
        outcome => info!("Seeded persons table to {} rows: {:?}", quantity, outcome),
    }
    Ok(())
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(persons::index).post(persons::resize))
        .route("/index", get(persons::index).post(persons::resize))
        .route("/index/{page}", get(persons::index_page).post(persons::resize_on_page))
        .route("/new_person", get(persons::new_person_form).post(persons::create_person))
        .route("/person/{id}", get(persons::show_person))
        .route(
            "/person/{id}/edit",
            get(persons::edit_person_form).post(persons::update_person),
        )
        .route(
            "/person/{id}/delete",
            get(persons::delete_person).post(persons::delete_person),
        )
        // Older link shapes, still in bookmarks
        .route(
            "/edit-person/{id}",
            get(persons::edit_person_form).post(persons::update_person),
        )
        .route("/delete-person/{id}", get(persons::delete_person))
        .route("/random", get(persons::random_person))
        .route("/healthz", get(|| async { "OK" }))
        .route("/static/{*path}", get(serve_static))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Main application struct that owns all resources.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects the pool, runs migrations and seeds the table
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and starts handling requests
/// 3. **Shutdown**: When the shutdown signal is received, closes the pool and flushes telemetry
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting persons-table with configuration: {:#?}", config);

        let pool = setup_database(&config).await?;
        Self::new_with_pool(config, pool).await
    }

    /// As [`Application::new`], over an already migrated pool
    pub async fn new_with_pool(config: Config, pool: PgPool) -> anyhow::Result<Self> {
        let fetcher = Arc::new(RandomUserClient::new(&config.random_user)?);
        Self::new_with_fetcher(config, pool, fetcher).await
    }

    /// As [`Application::new_with_pool`], taking new persons from `fetcher`
    pub async fn new_with_fetcher(config: Config, pool: PgPool, fetcher: Arc<dyn FetchPeople>) -> anyhow::Result<Self> {
        let store = PersonStore::new(pool.clone(), fetcher);

        if config.seed.enabled {
            seed_persons_table(&store, config.seed.quantity).await?;
        }

        let app_state = AppState::builder()
            .store(store)
            .config(config.clone())
            .image_probe(ImageProbe::new(config.image_probe.request_timeout)?)
            .build();

        Ok(Self {
            router: build_router(app_state),
            config,
            pool,
        })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "persons-table listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
