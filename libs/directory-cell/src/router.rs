// libs/directory-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_database::Database;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn patient_routes(config: Arc<AppConfig>, db: Arc<Database>) -> Router {
    Router::new()
        .route("/create", post(handlers::create_patient))
        .route("/", get(handlers::list_patients))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(db)
}

pub fn staff_routes(config: Arc<AppConfig>, db: Arc<Database>) -> Router {
    Router::new()
        .route("/create", post(handlers::create_staff))
        .route("/", get(handlers::list_staff))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(db)
}
