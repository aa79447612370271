// libs/tenant-cell/src/router.rs
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

pub fn tenant_routes(config: Arc<AppConfig>, db: Arc<Database>) -> Router {
    let protected = Router::new()
        .route("/me", get(handlers::get_own_tenant))
        .layer(middleware::from_fn_with_state(config, auth_middleware));

    Router::new()
        .route("/register", post(handlers::register_tenant))
        .merge(protected)
        .with_state(db)
}
