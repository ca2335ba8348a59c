use async_trait::async_trait;
use service_core::ddb::store_error::StoreError;
use thiserror::Error;
use uuid::Uuid;

use crate::enrollment::Enrollment;

#[derive(Debug, Error)]
pub enum CreateEnrollmentError {
    #[error("The student is already enrolled in this course.")]
    AlreadyEnrolled,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum UpdateEnrollmentError {
    #[error("Enrollment not found.")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone, Debug)]
pub struct ProgressUpdate {
    pub progress: f64,
    pub completed_lessons: Vec<String>,
}

#[async_trait]
pub trait EnrollmentsRepository {
    /// Writes a new enrollment. Fails with `AlreadyEnrolled` when a record
    /// for the same course and student already exists.
    async fn create_enrollment(&self, enrollment: &Enrollment) -> Result<(), CreateEnrollmentError>;

    async fn get_enrollment(&self, enrollment_id: &Uuid) -> Result<Option<Enrollment>, StoreError>;

    /// Lists a student's enrollments, oldest first.
    async fn list_for_student(&self, student_id: &Uuid) -> Result<Vec<Enrollment>, StoreError>;

    /// Walks the whole enrollments table. Aggregation only.
    async fn list_all(&self) -> Result<Vec<Enrollment>, StoreError>;

    /// Replaces the progress fields of an enrollment and stamps
    /// `lastAccessed`.
    async fn update_progress(
        &self,
        enrollment_id: &Uuid,
        update: &ProgressUpdate,
    ) -> Result<(), UpdateEnrollmentError>;
}
