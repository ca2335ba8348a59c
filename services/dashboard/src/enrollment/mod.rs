pub mod ddb_repository;
pub mod repository;
pub mod types;

pub use repository::{
    CreateEnrollmentError, EnrollmentsRepository, ProgressUpdate, UpdateEnrollmentError,
};
pub use types::{Enrollment, ResolvedEnrollment};
