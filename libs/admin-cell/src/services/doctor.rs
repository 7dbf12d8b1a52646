use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::error::AdminError;
use crate::models::{
    release_slot, AddDoctorForm, Address, Doctor, DoctorAvailability, DoctorSlots, NewDoctor,
    SlotsBooked, DOCTOR_COLUMNS, DOCTOR_SLOT_COLUMNS,
};
use crate::services::image::ImageUploadService;
use crate::services::password::PasswordService;
use crate::services::validation::validate_new_doctor;

/// Attempts at the compare-and-swap slot update before giving up.
pub const SLOT_UPDATE_ATTEMPTS: usize = 3;

pub struct DoctorService {
    supabase: SupabaseClient,
    images: ImageUploadService,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            images: ImageUploadService::new(config),
        }
    }

    /// Validates the submission, hashes the password, uploads the image and
    /// inserts one doctor row. Nothing is written if any input is rejected.
    pub async fn add_doctor(&self, form: AddDoctorForm) -> Result<(), AdminError> {
        validate_new_doctor(&form)?;

        let image = form
            .image
            .as_ref()
            .ok_or_else(|| AdminError::Validation("Image file is required".to_string()))?;

        let fees_raw = form.fees.as_deref().unwrap_or_default();
        let fees: f64 = fees_raw
            .trim()
            .parse()
            .map_err(|_| AdminError::Validation(format!("Invalid fees: {}", fees_raw)))?;

        let address: Address = serde_json::from_str(form.address.as_deref().unwrap_or_default())
            .map_err(|e| AdminError::Validation(format!("Invalid address: {}", e)))?;

        let email = form.email.clone().unwrap_or_default();
        debug!("Adding doctor: {}", email);

        let password = PasswordService::hash_password(form.password.as_deref().unwrap_or_default())?;
        let image_url = self.images.upload_image(image).await?;

        let doctor = NewDoctor {
            name: form.name.unwrap_or_default(),
            email,
            image: image_url,
            password,
            speciality: form.speciality.unwrap_or_default(),
            degree: form.degree.unwrap_or_default(),
            experience: form.experience.unwrap_or_default(),
            about: form.about.unwrap_or_default(),
            available: true,
            fees,
            address,
            date: Utc::now().timestamp_millis(),
            slots_booked: SlotsBooked::new(),
        };

        let _: Option<Value> = self.supabase.request(
            Method::POST,
            "/rest/v1/doctors",
            Some(serde_json::to_value(&doctor)?),
        ).await?;

        debug!("Doctor {} added", doctor.email);
        Ok(())
    }

    /// All doctors in store order, without password hashes.
    pub async fn list_doctors(&self) -> Result<Vec<Doctor>, AdminError> {
        let doctors: Vec<Doctor> = self.supabase.request_with_query(
            Method::GET,
            "/rest/v1/doctors",
            &[("select", DOCTOR_COLUMNS.to_string())],
            None,
            None,
        ).await?;

        debug!("Fetched {} doctors", doctors.len());
        Ok(doctors)
    }

    pub async fn change_availability(&self, doctor_id: Uuid) -> Result<bool, AdminError> {
        let rows: Vec<DoctorAvailability> = self.supabase.request_with_query(
            Method::GET,
            "/rest/v1/doctors",
            &[
                ("id", format!("eq.{}", doctor_id)),
                ("select", "id,available".to_string()),
            ],
            None,
            None,
        ).await?;

        let current = rows
            .into_iter()
            .next()
            .ok_or_else(|| AdminError::NotFound("Doctor not found".to_string()))?;

        // Conditional on the value read so two toggles cannot collapse into one
        let updated: Vec<Value> = self.supabase.request_with_query(
            Method::PATCH,
            "/rest/v1/doctors",
            &[
                ("id", format!("eq.{}", current.id)),
                ("available", format!("eq.{}", current.available)),
            ],
            Some(json!({ "available": !current.available })),
            Some(SupabaseClient::representation_headers()),
        ).await?;

        if updated.is_empty() {
            return Err(AdminError::Conflict(format!("doctor {}", doctor_id)));
        }

        debug!("Doctor {} availability set to {}", doctor_id, !current.available);
        Ok(!current.available)
    }

    async fn get_doctor_slots(&self, doctor_id: Uuid) -> Result<DoctorSlots, AdminError> {
        let rows: Vec<DoctorSlots> = self.supabase.request_with_query(
            Method::GET,
            "/rest/v1/doctors",
            &[
                ("id", format!("eq.{}", doctor_id)),
                ("select", DOCTOR_SLOT_COLUMNS.to_string()),
            ],
            None,
            None,
        ).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| AdminError::NotFound("Doctor not found".to_string()))
    }

    /// Frees a booked slot with a compare-and-swap on `slots_version`.
    ///
    /// The PATCH only matches while the row still carries the version that was
    /// read, and bumps it alongside the new map. An empty result means another
    /// writer got there first, so the read-modify-write runs again.
    pub async fn release_booked_slot(
        &self,
        doctor_id: Uuid,
        slot_date: &str,
        slot_time: &str,
    ) -> Result<(), AdminError> {
        for attempt in 1..=SLOT_UPDATE_ATTEMPTS {
            let doctor = self.get_doctor_slots(doctor_id).await?;

            let mut slots_booked = doctor.slots_booked.clone();
            release_slot(&mut slots_booked, slot_date, slot_time)?;

            if slots_booked == doctor.slots_booked {
                debug!("Slot {} {} already free for doctor {}", slot_date, slot_time, doctor_id);
                return Ok(());
            }

            let updated: Vec<Value> = self.supabase.request_with_query(
                Method::PATCH,
                "/rest/v1/doctors",
                &[
                    ("id", format!("eq.{}", doctor_id)),
                    ("slots_version", format!("eq.{}", doctor.slots_version)),
                ],
                Some(json!({
                    "slots_booked": slots_booked,
                    "slots_version": doctor.slots_version + 1,
                })),
                Some(SupabaseClient::representation_headers()),
            ).await?;

            if !updated.is_empty() {
                debug!("Released slot {} {} for doctor {}", slot_date, slot_time, doctor_id);
                return Ok(());
            }

            warn!(
                "Slots of doctor {} changed concurrently (attempt {}/{})",
                doctor_id, attempt, SLOT_UPDATE_ATTEMPTS
            );
        }

        Err(AdminError::Conflict(format!("slots of doctor {}", doctor_id)))
    }
}
