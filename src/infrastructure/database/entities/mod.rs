//! Sea-ORM entity definitions
//!
//! These map the register's domain models to database tables.

pub mod activity_log;
pub mod attendance;
pub mod certificate;
pub mod tanah_garapan;
pub mod user;

// Re-export all entities
pub use activity_log::Entity as ActivityLog;
pub use attendance::Entity as Attendance;
pub use certificate::Entity as Certificate;
pub use tanah_garapan::Entity as TanahGarapan;
pub use user::Entity as User;

// Re-export active models for easy access
pub use activity_log::ActiveModel as ActivityLogActive;
pub use attendance::ActiveModel as AttendanceActive;
pub use certificate::ActiveModel as CertificateActive;
pub use tanah_garapan::ActiveModel as TanahGarapanActive;
pub use user::ActiveModel as UserActive;
