pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod rules;
pub mod services;
pub mod types;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::AppConfig;
use crate::database::EmployeeRepository;
use crate::services::{AuthService, EmployeeService};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repository: Arc<dyn EmployeeRepository>,
    pub employees: EmployeeService,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(config: AppConfig, repository: Arc<dyn EmployeeRepository>) -> Self {
        Self {
            employees: EmployeeService::new(repository.clone()),
            auth: AuthService::new(repository.clone(), config.security.clone()),
            config: Arc::new(config),
            repository,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        // Public
        .route("/", get(handlers::public::root_get))
        .route("/health", get(handlers::public::health_get))
        .route("/auth/login", post(handlers::public::login_post))
        // Protected
        .merge(employee_routes(state.clone()))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .with_state(state);

    if let Some(cors) = cors_layer(&config) {
        router = router.layer(cors);
    }
    if config.api.enable_request_logging {
        router = router.layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );
    }
    router
}

fn employee_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::employees;

    Router::new()
        .route(
            "/employees",
            get(employees::employee_list).post(employees::employee_create),
        )
        .route(
            "/employees/:id",
            get(employees::employee_show)
                .put(employees::employee_update)
                .delete(employees::employee_delete),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::jwt_auth_middleware,
        ))
}

fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    if !config.security.enable_cors {
        return None;
    }

    let origin = if config.security.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        if origins.is_empty() {
            return None;
        }
        AllowOrigin::list(origins)
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600)),
    )
}
