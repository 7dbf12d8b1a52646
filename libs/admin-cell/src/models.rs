use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::AdminError;

/// Booked times per date, e.g. `{"24_10_2026": ["10:00 AM", "10:30 AM"]}`.
pub type SlotsBooked = BTreeMap<String, Vec<String>>;

// ==============================================================================
// DOCTOR MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    #[serde(default)]
    pub line2: String,
}

/// A doctor as the admin panel sees it. There is no password field, so no
/// listing can leak the stored hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    #[serde(default = "default_available")]
    pub available: bool,
    pub fees: f64,
    pub address: Address,
    pub date: i64,
    #[serde(default)]
    pub slots_booked: SlotsBooked,
}

/// Columns selected for [`Doctor`]; `password` is never requested.
pub const DOCTOR_COLUMNS: &str =
    "id,name,email,image,speciality,degree,experience,about,available,fees,address,date,slots_booked";

fn default_available() -> bool {
    true
}

/// Row written by `add-doctor`.
#[derive(Debug, Clone, Serialize)]
pub struct NewDoctor {
    pub name: String,
    pub email: String,
    pub image: String,
    pub password: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    pub available: bool,
    pub fees: f64,
    pub address: Address,
    pub date: i64,
    pub slots_booked: SlotsBooked,
}

/// Just enough of a doctor row to rewrite its booked slots.
#[derive(Debug, Clone, Deserialize)]
pub struct DoctorSlots {
    pub id: Uuid,
    #[serde(default)]
    pub slots_booked: SlotsBooked,
    #[serde(default)]
    pub slots_version: i64,
}

/// Columns selected for [`DoctorSlots`].
pub const DOCTOR_SLOT_COLUMNS: &str = "id,slots_booked,slots_version";

#[derive(Debug, Clone, Deserialize)]
pub struct DoctorAvailability {
    pub id: Uuid,
    pub available: bool,
}

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn mime_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or("image/png")
    }
}

/// Multipart fields of an `add-doctor` submission, as received.
#[derive(Debug, Clone, Default)]
pub struct AddDoctorForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub speciality: Option<String>,
    pub degree: Option<String>,
    pub experience: Option<String>,
    pub about: Option<String>,
    pub fees: Option<String>,
    pub address: Option<String>,
    pub image: Option<UploadedImage>,
}

impl AddDoctorForm {
    /// Unknown field names are ignored.
    pub fn set_field(&mut self, name: &str, value: String) {
        let slot = match name {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "password" => &mut self.password,
            "speciality" => &mut self.speciality,
            "degree" => &mut self.degree,
            "experience" => &mut self.experience,
            "about" => &mut self.about,
            "fees" => &mut self.fees,
            "address" => &mut self.address,
            _ => return,
        };
        *slot = Some(value);
    }
}

/// Removes `slot_time` from the booked times of `slot_date`.
///
/// Every matching entry goes; other times on that date keep their order. The
/// date entry stays even when it ends up empty.
pub fn release_slot(
    slots_booked: &mut SlotsBooked,
    slot_date: &str,
    slot_time: &str,
) -> Result<(), AdminError> {
    let times = slots_booked
        .get_mut(slot_date)
        .ok_or_else(|| AdminError::NotFound(format!("No booked slots on {}", slot_date)))?;

    times.retain(|t| t != slot_time);
    Ok(())
}

// ==============================================================================
// APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub doc_id: Uuid,
    pub slot_date: String,
    pub slot_time: String,
    #[serde(default)]
    pub user_data: Value,
    #[serde(default)]
    pub doc_data: Value,
    pub amount: f64,
    pub date: i64,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub payment: bool,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub doctors: usize,
    pub appointments: usize,
    pub patients: usize,
    pub latest_appointments: Vec<Appointment>,
}

pub const LATEST_APPOINTMENTS: usize = 5;

impl DashboardData {
    /// `appointments` must be in insertion order, oldest first.
    pub fn from_collections(doctors: usize, patients: usize, appointments: Vec<Appointment>) -> Self {
        let total = appointments.len();
        let latest_appointments = appointments
            .into_iter()
            .rev()
            .take(LATEST_APPOINTMENTS)
            .collect();

        Self {
            doctors,
            appointments: total,
            patients,
            latest_appointments,
        }
    }
}

// ==============================================================================
// REQUEST BODIES
// ==============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAppointmentRequest {
    #[serde(default)]
    pub appointment_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeAvailabilityRequest {
    #[serde(default)]
    pub doc_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn appointment(n: i64) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            doc_id: Uuid::new_v4(),
            slot_date: "24_10_2026".to_string(),
            slot_time: "10:00 AM".to_string(),
            user_data: Value::Null,
            doc_data: Value::Null,
            amount: 50.0,
            date: n,
            cancelled: false,
            payment: false,
            is_completed: false,
        }
    }

    #[test]
    fn release_slot_keeps_other_times() {
        let mut slots = SlotsBooked::new();
        slots.insert(
            "24_10_2026".to_string(),
            vec!["10:00 AM".to_string(), "10:30 AM".to_string(), "11:00 AM".to_string()],
        );
        slots.insert("25_10_2026".to_string(), vec!["10:30 AM".to_string()]);

        release_slot(&mut slots, "24_10_2026", "10:30 AM").unwrap();

        assert_eq!(slots["24_10_2026"], vec!["10:00 AM", "11:00 AM"]);
        assert_eq!(slots["25_10_2026"], vec!["10:30 AM"]);
    }

    #[test]
    fn release_slot_leaves_empty_date_entry() {
        let mut slots = SlotsBooked::new();
        slots.insert("24_10_2026".to_string(), vec!["10:00 AM".to_string()]);

        release_slot(&mut slots, "24_10_2026", "10:00 AM").unwrap();

        assert!(slots["24_10_2026"].is_empty());
    }

    #[test]
    fn release_slot_on_unknown_date_fails() {
        let mut slots = SlotsBooked::new();

        assert_matches!(
            release_slot(&mut slots, "24_10_2026", "10:00 AM"),
            Err(AdminError::NotFound(_))
        );
    }

    #[test]
    fn dashboard_takes_five_most_recent() {
        let appointments: Vec<Appointment> = (1..=8).map(appointment).collect();

        let data = DashboardData::from_collections(3, 12, appointments);

        assert_eq!(data.appointments, 8);
        assert_eq!(data.latest_appointments.len(), 5);
        let dates: Vec<i64> = data.latest_appointments.iter().map(|a| a.date).collect();
        assert_eq!(dates, vec![8, 7, 6, 5, 4]);
    }

    #[test]
    fn dashboard_with_few_appointments_returns_all() {
        let data = DashboardData::from_collections(1, 1, vec![appointment(1), appointment(2)]);

        assert_eq!(data.latest_appointments.len(), 2);
        assert_eq!(data.latest_appointments[0].date, 2);
    }

    #[test]
    fn dashboard_serializes_camel_case() {
        let data = DashboardData::from_collections(0, 0, vec![]);
        let value = serde_json::to_value(&data).unwrap();

        assert_eq!(value, json!({
            "doctors": 0,
            "appointments": 0,
            "patients": 0,
            "latestAppointments": []
        }));
    }

    #[test]
    fn form_ignores_unknown_fields() {
        let mut form = AddDoctorForm::default();
        form.set_field("name", "Dr. Emily Larson".to_string());
        form.set_field("nickname", "Em".to_string());

        assert_eq!(form.name.as_deref(), Some("Dr. Emily Larson"));
        assert!(form.email.is_none());
    }

    #[test]
    fn doctor_listing_has_no_password_field() {
        let doctor: Doctor = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "name": "Dr. Richard James",
            "email": "richard@example.com",
            "password": "$2b$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy",
            "image": "https://res.cloudinary.com/demo/image/upload/doc1.png",
            "speciality": "General physician",
            "degree": "MBBS",
            "experience": "4 Years",
            "about": "About",
            "fees": 50,
            "address": { "line1": "17th Cross", "line2": "Richmond" },
            "date": 1
        })).unwrap();

        let value = serde_json::to_value(&doctor).unwrap();

        assert!(value.get("password").is_none());
        assert_eq!(value["available"], true);
        assert_eq!(value["slots_booked"], json!({}));
    }
}
