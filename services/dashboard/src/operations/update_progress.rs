use service_core::endpoint_error::EndpointError;
use service_core::operation_error::{ErrorCode, OperationError};
use thiserror::Error;
use uuid::Uuid;

use crate::enrollment::{
    EnrollmentsRepository, ProgressUpdate, UpdateEnrollmentError as RepositoryError,
};

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum UpdateProgressError {
    #[error("Enrollment not found.")]
    EnrollmentNotFound,

    #[error("Only the enrolled student may record progress.")]
    AccessDenied,
}

/// Records a student's progress on an enrollment.
///
/// A student may only touch their own enrollments; `requester_student_id` of
/// `None` skips the ownership check for administrators.
pub(crate) async fn update_progress(
    enrollments_repository: &impl EnrollmentsRepository,
    enrollment_id: &Uuid,
    requester_student_id: Option<&Uuid>,
    update: &ProgressUpdate,
) -> Result<(), EndpointError<UpdateProgressError>> {
    if !(0.0..=100.0).contains(&update.progress) {
        return Err(EndpointError::validation(
            "Progress must be between 0 and 100.",
        ));
    }

    if let Some(student_id) = requester_student_id {
        let enrollment = enrollments_repository
            .get_enrollment(enrollment_id)
            .await
            .map_err(|err| {
                log::error!("Reading enrollment {} failed: {:?}", enrollment_id, err);
                EndpointError::internal()
            })?
            .ok_or_else(|| EndpointError::operation(UpdateProgressError::EnrollmentNotFound))?;
        if &enrollment.student_id != student_id {
            return Err(EndpointError::operation(UpdateProgressError::AccessDenied));
        }
    }

    enrollments_repository
        .update_progress(enrollment_id, update)
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound => {
                EndpointError::operation(UpdateProgressError::EnrollmentNotFound)
            }
            RepositoryError::Store(err) => {
                log::error!("Updating enrollment {} failed: {:?}", enrollment_id, err);
                EndpointError::internal()
            }
        })
}

impl OperationError for UpdateProgressError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::EnrollmentNotFound => ErrorCode::NotFound,
            Self::AccessDenied => ErrorCode::PermissionDenied,
        }
    }
}
