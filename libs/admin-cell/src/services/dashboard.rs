use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::error::AdminError;
use crate::models::DashboardData;
use crate::services::appointment::AppointmentService;

pub struct DashboardService {
    supabase: SupabaseClient,
    appointments: AppointmentService,
}

impl DashboardService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            appointments: AppointmentService::new(config),
        }
    }

    async fn count_rows(&self, collection: &str) -> Result<usize, AdminError> {
        let rows: Vec<Value> = self.supabase.request_with_query(
            Method::GET,
            &format!("/rest/v1/{}", collection),
            &[("select", "id".to_string())],
            None,
            None,
        ).await?;

        Ok(rows.len())
    }

    pub async fn dashboard(&self) -> Result<DashboardData, AdminError> {
        let (doctors, patients, appointments) = tokio::try_join!(
            self.count_rows("doctors"),
            self.count_rows("users"),
            self.appointments.list_appointments(),
        )?;

        debug!(
            "Dashboard: {} doctors, {} patients, {} appointments",
            doctors, patients, appointments.len()
        );

        Ok(DashboardData::from_collections(doctors, patients, appointments))
    }
}
