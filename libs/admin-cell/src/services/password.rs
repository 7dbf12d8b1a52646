use tracing::instrument;

use crate::error::AdminError;

/// Work factor shared with the doctor-facing login, which verifies these hashes.
pub const BCRYPT_COST: u32 = 10;

pub struct PasswordService;

impl PasswordService {
    /// Salted bcrypt hash in modular crypt form (`$2b$10$...`).
    #[instrument(skip(password))]
    pub fn hash_password(password: &str) -> Result<String, AdminError> {
        bcrypt::hash(password, BCRYPT_COST).map_err(|e| AdminError::Hashing(e.to_string()))
    }
}
