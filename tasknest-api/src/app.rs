/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use tasknest_api::{app::{AppState, build_router}, config::Config};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::from_config(config).await?;
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::{Config, StorageBackend};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tasknest_shared::{
    auth::{
        middleware::{token_auth_middleware, AUTH_HEADER},
        password::PasswordConfig,
    },
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::{create_pool, DatabaseConfig},
    },
    store::{memory::MemoryStore, postgres::PgStore, Store},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler via Axum's `State` extractor; both fields are
/// `Arc`s, so clones are cheap.
#[derive(Clone)]
pub struct AppState {
    /// Users and tasks
    pub store: Arc<dyn Store>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Connects the configured backend and builds the state
    ///
    /// For Postgres this creates the pool and applies pending migrations.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn Store> = match config.storage.backend {
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
            StorageBackend::Postgres => {
                let url = config
                    .storage
                    .database_url
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for postgres"))?;

                ensure_database_exists(&url).await?;
                let pool = create_pool(DatabaseConfig {
                    url,
                    max_connections: config.storage.max_connections,
                    ..Default::default()
                })
                .await?;
                run_migrations(&pool).await?;

                Arc::new(PgStore::new(pool))
            }
        };

        tracing::info!(backend = store.backend_name(), "Store ready");
        Ok(Self::new(store, config))
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    pub fn password_config(&self) -> &PasswordConfig {
        &self.config.password
    }
}

/// Builds the complete router
///
/// ```text
/// /
/// ├── GET /health                 # public
/// └── /api/
///     ├── POST   /register        # public
///     ├── POST   /login           # public
///     ├── GET    /tasks           # x-auth-token
///     ├── POST   /tasks           # x-auth-token
///     └── DELETE /tasks/:id       # x-auth-token
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let task_routes = Router::new()
        .route("/tasks", get(routes::tasks::list_tasks).post(routes::tasks::create_task))
        .route("/tasks/:id", delete(routes::tasks::delete_task))
        .layer(axum::middleware::from_fn_with_state(
            Arc::<str>::from(state.jwt_secret()),
            token_auth_middleware,
        ));

    let api_routes = Router::new().merge(auth_routes).merge(task_routes);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(AUTH_HEADER)])
        .max_age(std::time::Duration::from_secs(3600))
}
