use std::sync::Arc;

use axum::{
    http::{HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::SharedRepository;
use crate::handlers::{protected, public};

/// Dependencies handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub repository: SharedRepository,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(repository: SharedRepository, config: AppConfig) -> Self {
        Self {
            repository,
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    let router = Router::new()
        // Public
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .merge(comment_routes())
        .layer(TraceLayer::new_for_http());

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
    .with_state(state)
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        // GET is public; POST and DELETE require a token via the AuthUser extractor
        .route(
            "/api/comments",
            get(public::comments::list).post(protected::comments::create),
        )
        .route(
            "/api/comments/:id",
            get(public::comments::get).delete(protected::comments::delete),
        )
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(base_cors().allow_origin(AllowOrigin::any()));
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(base_cors().allow_origin(AllowOrigin::list(origins)))
}

fn base_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static("x-auth-token"),
        ])
        .max_age(std::time::Duration::from_secs(3600))
}
