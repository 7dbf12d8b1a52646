use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::error::AdminError;
use crate::models::Appointment;
use crate::services::doctor::DoctorService;

pub struct AppointmentService {
    supabase: SupabaseClient,
    doctors: DoctorService,
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            doctors: DoctorService::new(config),
        }
    }

    /// Every appointment, oldest first.
    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, AdminError> {
        let appointments: Vec<Appointment> = self.supabase.request_with_query(
            Method::GET,
            "/rest/v1/appointments",
            &[("order", "date.asc".to_string())],
            None,
            None,
        ).await?;

        debug!("Fetched {} appointments", appointments.len());
        Ok(appointments)
    }

    pub async fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AdminError> {
        let rows: Vec<Appointment> = self.supabase.request_with_query(
            Method::GET,
            "/rest/v1/appointments",
            &[("id", format!("eq.{}", appointment_id))],
            None,
            None,
        ).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| AdminError::NotFound("Appointment not found".to_string()))
    }

    /// Marks the appointment cancelled, then frees its slot on the doctor.
    ///
    /// Cancelling twice succeeds both times. The two writes are independent:
    /// if freeing the slot fails the appointment stays cancelled.
    pub async fn cancel_appointment(&self, appointment_id: Uuid) -> Result<(), AdminError> {
        let appointment = self.get_appointment(appointment_id).await?;

        let _: Option<Value> = self.supabase.request_with_query(
            Method::PATCH,
            "/rest/v1/appointments",
            &[("id", format!("eq.{}", appointment_id))],
            Some(json!({ "cancelled": true })),
            None,
        ).await?;

        debug!("Appointment {} marked cancelled", appointment_id);

        self.doctors
            .release_booked_slot(appointment.doc_id, &appointment.slot_date, &appointment.slot_time)
            .await
    }
}
