// libs/billing-cell/src/router.rs
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

pub fn billing_routes(config: Arc<AppConfig>, db: Arc<Database>) -> Router {
    Router::new()
        .route("/create", post(handlers::create_bill))
        .route("/", get(handlers::get_bills))
        .route("/patient/{patient_id}", get(handlers::get_patient_bills))
        .route("/{bill_id}/pay", post(handlers::add_payment))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(db)
}
