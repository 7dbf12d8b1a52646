use std::env;
use tracing::warn;

/// Process configuration, read once at startup and shared read-only as router state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub admin_email: String,
    pub admin_password: String,
    pub jwt_secret: String,
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: String,
    pub cloudinary_base_url: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_EMAIL not set, using empty value");
                    String::new()
                }),
            admin_password: env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_PASSWORD not set, using empty value");
                    String::new()
                }),
            // The deployed environment spells it JWT_SERCET
            jwt_secret: env::var("JWT_SERCET")
                .or_else(|_| env::var("JWT_SECRET"))
                .unwrap_or_else(|_| {
                    warn!("JWT_SERCET not set, using empty value");
                    String::new()
                }),
            cloudinary_cloud_name: env::var("CLOUDINARY_CLOUD_NAME")
                .unwrap_or_else(|_| {
                    warn!("CLOUDINARY_CLOUD_NAME not set, using empty value");
                    String::new()
                }),
            cloudinary_api_key: env::var("CLOUDINARY_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("CLOUDINARY_API_KEY not set, using empty value");
                    String::new()
                }),
            cloudinary_api_secret: env::var("CLOUDINARY_API_SECRET")
                .unwrap_or_else(|_| {
                    warn!("CLOUDINARY_API_SECRET not set, using empty value");
                    String::new()
                }),
            cloudinary_base_url: env::var("CLOUDINARY_BASE_URL")
                .unwrap_or_else(|_| "https://api.cloudinary.com/v1_1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        if !config.is_image_store_configured() {
            warn!("Image store not configured - adding doctors will fail");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_service_key.is_empty()
            && !self.admin_email.is_empty()
            && !self.admin_password.is_empty()
            && !self.jwt_secret.is_empty()
    }

    pub fn is_image_store_configured(&self) -> bool {
        !self.cloudinary_cloud_name.is_empty()
            && !self.cloudinary_api_key.is_empty()
            && !self.cloudinary_api_secret.is_empty()
    }

    /// The payload an admin token must carry.
    pub fn admin_token_payload(&self) -> String {
        format!("{}{}", self.admin_email, self.admin_password)
    }
}
