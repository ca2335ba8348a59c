use std::collections::BTreeSet;

use service_core::ddb::store_error::StoreError;
use uuid::Uuid;

use crate::catalog::CoursesRepository;
use crate::enrollment::{Enrollment, ResolvedEnrollment};

/// Joins enrollments with their course documents in one batched read.
///
/// Enrollments pointing at a course that no longer exists are dropped from
/// the result rather than surfaced as errors; a deleted course should not
/// take down a student's whole dashboard.
pub(crate) async fn resolve_enrollments(
    courses_repository: &impl CoursesRepository,
    enrollments: Vec<Enrollment>,
) -> Result<Vec<ResolvedEnrollment>, StoreError> {
    let course_ids: Vec<Uuid> = enrollments
        .iter()
        .map(|enrollment| enrollment.course_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let courses = courses_repository.batch_get_courses(&course_ids).await?;

    Ok(enrollments
        .into_iter()
        .filter_map(|enrollment| {
            let course = courses.get(&enrollment.course_id).cloned()?;
            Some(ResolvedEnrollment {
                enrollment_id: enrollment.enrollment_id,
                course,
                progress: enrollment.progress,
                enrolled_at: enrollment.enrolled_at,
                completed_lessons: enrollment.completed_lessons,
            })
        })
        .collect())
}
