use std::sync::LazyLock;

use regex::Regex;

use crate::error::AdminError;
use crate::models::AddDoctorForm;

pub const MISSING_DETAILS: &str = "Missing details";
pub const INVALID_EMAIL: &str = "Invalid email";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
pub const MIN_PASSWORD_LENGTH: usize = 8;

// Local part per RFC 5322 atoms; dotted domain ending in an alphabetic TLD of 2+ chars
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,63}$",
    )
    .expect("email pattern compiles")
});

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, _)) = email.split_once('@') else {
        return false;
    };

    local.len() <= 64
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && EMAIL_PATTERN.is_match(email)
}

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.is_empty())
}

/// Required fields, then email syntax, then password length. First failure wins.
pub fn validate_new_doctor(form: &AddDoctorForm) -> Result<(), AdminError> {
    let required = [
        &form.name,
        &form.email,
        &form.password,
        &form.speciality,
        &form.degree,
        &form.experience,
        &form.about,
        &form.fees,
        &form.address,
    ];

    if !required.iter().all(|field| present(field)) {
        return Err(AdminError::Validation(MISSING_DETAILS.to_string()));
    }

    if !is_valid_email(form.email.as_deref().unwrap_or_default()) {
        return Err(AdminError::Validation(INVALID_EMAIL.to_string()));
    }

    // Counted in UTF-16 code units, as browser-side checks count them
    if form.password.as_deref().unwrap_or_default().encode_utf16().count() < MIN_PASSWORD_LENGTH {
        return Err(AdminError::Validation(PASSWORD_TOO_SHORT.to_string()));
    }

    Ok(())
}
