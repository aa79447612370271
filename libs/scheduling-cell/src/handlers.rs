// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::Database;
use shared_models::auth::AuthContext;
use shared_models::error::AppError;

use crate::models::{
    AppointmentFilter, CreateAppointmentRequest, EditAppointmentRequest, UpdateStatusRequest,
};
use crate::services::booking::AppointmentBookingService;

#[axum::debug_handler]
pub async fn create_appointment(
    State(db): State<Arc<Database>>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(db);

    let appointment = booking_service
        .create_appointment(ctx.tenant_id, request)
        .await?;

    Ok(Json(json!({
        "message": "Appointment booked successfully",
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(db): State<Arc<Database>>,
    Extension(ctx): Extension<AuthContext>,
    Query(filter): Query<AppointmentFilter>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(db);

    let appointments = booking_service
        .list_appointments(ctx.tenant_id, &filter)
        .await;

    Ok(Json(json!({ "appointments": appointments })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(db): State<Arc<Database>>,
    Path(appointment_id): Path<Uuid>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(db);

    let appointment = booking_service
        .get_appointment(ctx.tenant_id, appointment_id)
        .await
        .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

    Ok(Json(json!({ "appointment": appointment })))
}

#[axum::debug_handler]
pub async fn edit_appointment(
    State(db): State<Arc<Database>>,
    Path(appointment_id): Path<Uuid>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<EditAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(db);

    let appointment = booking_service
        .edit_appointment(ctx.tenant_id, appointment_id, request)
        .await?;

    Ok(Json(json!({
        "message": "Appointment updated",
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(db): State<Arc<Database>>,
    Path(appointment_id): Path<Uuid>,
    Extension(ctx): Extension<AuthContext>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(db);

    let appointment = booking_service
        .update_status(ctx.tenant_id, appointment_id, &request.status)
        .await?;

    Ok(Json(json!({
        "message": "Appointment status updated",
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(db): State<Arc<Database>>,
    Path(appointment_id): Path<Uuid>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(db);

    booking_service
        .delete_appointment(ctx.tenant_id, appointment_id)
        .await?;

    Ok(Json(json!({ "message": "Appointment deleted successfully" })))
}

#[axum::debug_handler]
pub async fn get_doctor_appointments(
    State(db): State<Arc<Database>>,
    Path(doctor_id): Path<Uuid>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<Value>, AppError> {
    let booking_service = AppointmentBookingService::new(db);

    let appointments = booking_service
        .doctor_appointments(ctx.tenant_id, doctor_id)
        .await;

    Ok(Json(json!({ "appointments": appointments })))
}
