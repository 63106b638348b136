//! Business logic services
//!
//! Services validate input with the shared rules, orchestrate the external
//! collaborators, and map their failures into API errors.

pub mod health_records;
pub mod places;
pub mod profile;
pub mod recovery;
pub mod reminders;

pub use health_records::HealthRecordService;
pub use places::PlacesService;
pub use profile::ProfileService;
pub use recovery::RecoveryService;
pub use reminders::ReminderService;
