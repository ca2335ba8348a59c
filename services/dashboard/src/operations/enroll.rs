use service_core::endpoint_error::EndpointError;
use service_core::operation_error::{ErrorCode, OperationError};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::CoursesRepository;
use crate::enrollment::{CreateEnrollmentError, Enrollment, EnrollmentsRepository};
use crate::user_profile::ProfilesRepository;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EnrollError {
    #[error("Course not found.")]
    CourseNotFound,

    #[error("Student not found.")]
    StudentNotFound,

    #[error("The student is already enrolled in this course.")]
    AlreadyEnrolled,
}

/// Enrolls a student in a course and bumps the course's enrollment counter.
pub(crate) async fn enroll(
    courses_repository: &impl CoursesRepository,
    profiles_repository: &impl ProfilesRepository,
    enrollments_repository: &impl EnrollmentsRepository,
    course_id: &Uuid,
    student_id: &Uuid,
) -> Result<Enrollment, EndpointError<EnrollError>> {
    courses_repository
        .get_course(course_id)
        .await
        .map_err(|err| {
            log::error!("Reading course {} failed: {:?}", course_id, err);
            EndpointError::internal()
        })?
        .ok_or_else(|| EndpointError::operation(EnrollError::CourseNotFound))?;
    profiles_repository
        .get_profile(student_id)
        .await
        .map_err(|err| {
            log::error!("Reading profile {} failed: {:?}", student_id, err);
            EndpointError::internal()
        })?
        .ok_or_else(|| EndpointError::operation(EnrollError::StudentNotFound))?;

    let enrollment = Enrollment::builder()
        .course_id(*course_id)
        .student_id(*student_id)
        .build();
    enrollments_repository
        .create_enrollment(&enrollment)
        .await
        .map_err(|err| match err {
            CreateEnrollmentError::AlreadyEnrolled => {
                EndpointError::operation(EnrollError::AlreadyEnrolled)
            }
            CreateEnrollmentError::Store(err) => {
                log::error!("Writing enrollment failed: {:?}", err);
                EndpointError::internal()
            }
        })?;

    // Counter bump is a separate write; a failure here leaves the enrollment
    // in place with a stale counter.
    if let Err(err) = courses_repository
        .increment_students_enrolled(course_id, 1)
        .await
    {
        log::error!(
            "Enrollment counter bump for course {} failed: {:?}",
            course_id,
            err
        );
    }

    Ok(enrollment)
}

impl OperationError for EnrollError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::CourseNotFound | Self::StudentNotFound => ErrorCode::NotFound,
            Self::AlreadyEnrolled => ErrorCode::AlreadyExists,
        }
    }
}
