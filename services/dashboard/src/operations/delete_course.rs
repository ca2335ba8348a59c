use service_core::endpoint_error::EndpointError;
use service_core::operation_error::{ErrorCode, OperationError};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::CoursesRepository;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DeleteCourseError {
    #[error("Only the course's teacher may delete it.")]
    AccessDenied,
}

/// Deletes a course. Deleting a course that does not exist succeeds, so the
/// operation is idempotent.
pub(crate) async fn delete_course(
    courses_repository: &impl CoursesRepository,
    course_id: &Uuid,
    requester_teacher_id: Option<&Uuid>,
) -> Result<(), EndpointError<DeleteCourseError>> {
    if let Some(teacher_id) = requester_teacher_id {
        let course = courses_repository
            .get_course(course_id)
            .await
            .map_err(|err| {
                log::error!("Reading course {} failed: {:?}", course_id, err);
                EndpointError::internal()
            })?;
        match course {
            // Nothing to delete.
            None => return Ok(()),
            Some(course) if &course.teacher_id != teacher_id => {
                return Err(EndpointError::operation(DeleteCourseError::AccessDenied));
            }
            Some(_) => {}
        }
    }

    courses_repository
        .delete_course(course_id)
        .await
        .map_err(|err| {
            log::error!("Deleting course {} failed: {:?}", course_id, err);
            EndpointError::internal()
        })
}

impl OperationError for DeleteCourseError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::AccessDenied => ErrorCode::PermissionDenied,
        }
    }
}
