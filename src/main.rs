use axum::{http::HeaderValue, routing::get, Router};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod middleware;

/// Data-access context handed to every handler. Constructed once at startup,
/// dropped on shutdown; there is no process-global connection state.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jotter_api=info,tower_http=info".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting Jotter API in {:?} mode", config.environment);

    // Connection readiness gates server start: no pool, no listener.
    let pool = db::connect(config).await?;
    sqlx::migrate!().run(&pool).await?;

    let app = app(AppState { pool });

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Jotter API listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/health", get(health))
        .merge(user_routes())
        // Protected API
        .merge(api_routes())
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::users;

    Router::new()
        .route("/api/users/register", post(users::register))
        .route("/api/users/login", post(users::login))
}

fn api_routes() -> Router<AppState> {
    use handlers::{notes, projects, tasks, users};

    Router::new()
        .route("/api/users/me", get(users::me))
        .route("/api/notes", get(notes::list).post(notes::create))
        .route(
            "/api/notes/:id",
            get(notes::get_one).put(notes::update).delete(notes::remove),
        )
        .route("/api/project", get(projects::list).post(projects::create))
        .route(
            "/api/project/:id",
            get(projects::get_one)
                .put(projects::update)
                .delete(projects::remove),
        )
        .route(
            "/api/project/:id/tasks",
            get(tasks::list).post(tasks::create),
        )
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = config::config()
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match db::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                axum::response::Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
