use std::sync::Arc;

use axum::{routing::get, Router};

use billing_cell::router::billing_routes;
use directory_cell::router::{patient_routes, staff_routes};
use scheduling_cell::router::appointment_routes;
use shared_config::AppConfig;
use shared_database::Database;
use tenant_cell::router::tenant_routes;

pub fn create_router(config: Arc<AppConfig>, db: Arc<Database>) -> Router {
    Router::new()
        .route("/", get(|| async { "Hospital administration API is running!" }))
        .nest("/tenants", tenant_routes(config.clone(), db.clone()))
        .nest("/patients", patient_routes(config.clone(), db.clone()))
        .nest("/staff", staff_routes(config.clone(), db.clone()))
        .nest("/appointments", appointment_routes(config.clone(), db.clone()))
        .nest("/bills", billing_routes(config, db))
}
