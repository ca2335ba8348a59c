use service_core::endpoint_error::EndpointError;
use service_core::operation_error::{ErrorCode, OperationError};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::{Course, CoursesRepository};

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DescribeCourseError {
    #[error("Course not found.")]
    CourseNotFound,
}

pub(crate) async fn describe_course(
    courses_repository: &impl CoursesRepository,
    course_id: &Uuid,
) -> Result<Course, EndpointError<DescribeCourseError>> {
    courses_repository
        .get_course(course_id)
        .await
        .map_err(|err| {
            log::error!("Reading course {} failed: {:?}", course_id, err);
            EndpointError::internal()
        })?
        .ok_or_else(|| EndpointError::operation(DescribeCourseError::CourseNotFound))
}

impl OperationError for DescribeCourseError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::CourseNotFound => ErrorCode::NotFound,
        }
    }
}
