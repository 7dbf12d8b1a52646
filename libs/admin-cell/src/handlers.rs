use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;
use shared_utils::jwt::sign_token;

use crate::models::{
    AddDoctorForm, CancelAppointmentRequest, ChangeAvailabilityRequest, LoginRequest,
    UploadedImage,
};
use crate::services::{AppointmentService, DashboardService, DoctorService};

pub const LOGIN_MISSING_FIELDS: &str = "Something went wrong";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

// Malformed bodies still answer with the JSON envelope
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
    }
}

fn parse_id(raw: Option<String>, missing: &str, not_found: &str) -> Result<Uuid, AppError> {
    let raw = raw
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::ValidationError(missing.to_string()))?;

    // An id that cannot exist is reported the same way as one that does not
    Uuid::parse_str(&raw).map_err(|_| AppError::NotFound(not_found.to_string()))
}

async fn read_doctor_form(mut multipart: Multipart) -> Result<AddDoctorForm, AppError> {
    let mut form = AddDoctorForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;

            if !bytes.is_empty() {
                form.image = Some(UploadedImage {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        form.set_field(&name, value);
    }

    Ok(form)
}

// ==============================================================================
// AUTHENTICATION
// ==============================================================================

#[axum::debug_handler]
pub async fn admin_login(
    State(state): State<Arc<AppConfig>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let request = json_body(payload)?;

    let (Some(email), Some(password)) = (
        request.email.filter(|e| !e.is_empty()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::ValidationError(LOGIN_MISSING_FIELDS.to_string()));
    };

    if email != state.admin_email || password != state.admin_password {
        debug!("Admin login rejected");
        return Err(AppError::Auth(INVALID_CREDENTIALS.to_string()));
    }

    let token = sign_token(&format!("{}{}", email, password), &state.jwt_secret)
        .map_err(AppError::Internal)?;

    info!("Admin logged in");
    Ok(Json(json!({
        "success": true,
        "token": token
    })))
}

// ==============================================================================
// DOCTORS
// ==============================================================================

#[axum::debug_handler]
pub async fn add_doctor(
    State(state): State<Arc<AppConfig>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, AppError> {
    let multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let form = read_doctor_form(multipart).await?;

    let doctor_service = DoctorService::new(&state);
    doctor_service.add_doctor(form).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Doctor added"
    })))
}

#[axum::debug_handler]
pub async fn all_doctors(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let doctor_service = DoctorService::new(&state);

    let doctors = doctor_service.list_doctors().await?;

    Ok(Json(json!({
        "success": true,
        "doctors": doctors
    })))
}

#[axum::debug_handler]
pub async fn change_availability(
    State(state): State<Arc<AppConfig>>,
    payload: Result<Json<ChangeAvailabilityRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let request = json_body(payload)?;
    let doctor_id = parse_id(request.doc_id, "Missing doctor id", "Doctor not found")?;

    let doctor_service = DoctorService::new(&state);
    doctor_service.change_availability(doctor_id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Availability Changed"
    })))
}

// ==============================================================================
// APPOINTMENTS
// ==============================================================================

#[axum::debug_handler]
pub async fn appointments_admin(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let appointment_service = AppointmentService::new(&state);

    let appointments = appointment_service.list_appointments().await?;

    Ok(Json(json!({
        "success": true,
        "appointments": appointments
    })))
}

#[axum::debug_handler]
pub async fn appointment_cancel(
    State(state): State<Arc<AppConfig>>,
    payload: Result<Json<CancelAppointmentRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let request = json_body(payload)?;
    let appointment_id = parse_id(
        request.appointment_id,
        "Missing appointment id",
        "Appointment not found",
    )?;

    let appointment_service = AppointmentService::new(&state);
    appointment_service.cancel_appointment(appointment_id).await?;

    info!("Appointment {} cancelled by admin", appointment_id);
    Ok(Json(json!({
        "success": true,
        "message": "Appointment Cancelled"
    })))
}

// ==============================================================================
// DASHBOARD
// ==============================================================================

#[axum::debug_handler]
pub async fn admin_dashboard(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let dashboard_service = DashboardService::new(&state);

    let dash_data = dashboard_service.dashboard().await?;

    Ok(Json(json!({
        "success": true,
        "dashData": dash_data
    })))
}
