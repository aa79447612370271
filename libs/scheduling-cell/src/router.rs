// libs/scheduling-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_database::Database;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn appointment_routes(config: Arc<AppConfig>, db: Arc<Database>) -> Router {
    Router::new()
        .route("/create", post(handlers::create_appointment))
        .route("/", get(handlers::list_appointments))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}", put(handlers::edit_appointment))
        .route(
            "/{appointment_id}/status",
            put(handlers::update_appointment_status),
        )
        .route("/{appointment_id}", delete(handlers::delete_appointment))
        .route("/doctor/{doctor_id}", get(handlers::get_doctor_appointments))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(db)
}
