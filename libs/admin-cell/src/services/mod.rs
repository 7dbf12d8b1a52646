pub mod appointment;
pub mod dashboard;
pub mod doctor;
pub mod image;
pub mod password;
pub mod validation;

pub use appointment::AppointmentService;
pub use dashboard::DashboardService;
pub use doctor::DoctorService;
pub use image::ImageUploadService;
pub use password::PasswordService;
