use service_core::endpoint_error::EndpointError;
use service_core::operation_error::{ErrorCode, OperationError};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::repository;
use crate::catalog::{CourseUpdate, CoursesRepository};

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum UpdateCourseError {
    #[error("Course not found.")]
    CourseNotFound,

    #[error("Only the course's teacher may change it.")]
    AccessDenied,
}

/// Applies an update to a course.
///
/// A teacher may only change their own courses; `requester_teacher_id` of
/// `None` skips the ownership check for administrators.
pub(crate) async fn update_course(
    courses_repository: &impl CoursesRepository,
    course_id: &Uuid,
    requester_teacher_id: Option<&Uuid>,
    update: &CourseUpdate,
) -> Result<(), EndpointError<UpdateCourseError>> {
    if let Some(title) = &update.title {
        if title.trim().is_empty() {
            return Err(EndpointError::validation("Title cannot be empty."));
        }
    }
    if let Some(price) = update.price {
        if price < 0.0 {
            return Err(EndpointError::validation("Price cannot be negative."));
        }
    }

    if let Some(teacher_id) = requester_teacher_id {
        let course = courses_repository
            .get_course(course_id)
            .await
            .map_err(|err| {
                log::error!("Reading course {} failed: {:?}", course_id, err);
                EndpointError::internal()
            })?
            .ok_or_else(|| EndpointError::operation(UpdateCourseError::CourseNotFound))?;
        if &course.teacher_id != teacher_id {
            return Err(EndpointError::operation(UpdateCourseError::AccessDenied));
        }
    }

    courses_repository
        .update_course(course_id, update)
        .await
        .map_err(|err| match err {
            repository::UpdateCourseError::NotFound => {
                EndpointError::operation(UpdateCourseError::CourseNotFound)
            }
            repository::UpdateCourseError::Store(err) => {
                log::error!("Updating course {} failed: {:?}", course_id, err);
                EndpointError::internal()
            }
        })
}

impl OperationError for UpdateCourseError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::CourseNotFound => ErrorCode::NotFound,
            Self::AccessDenied => ErrorCode::PermissionDenied,
        }
    }
}
