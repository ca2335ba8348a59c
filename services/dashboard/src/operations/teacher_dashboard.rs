use std::convert::Infallible;

use service_core::endpoint_error::EndpointError;
use uuid::Uuid;

use crate::analytics::reducers::teacher_rollup;
use crate::analytics::TeacherAnalytics;
use crate::catalog::{Course, CourseFilters, CoursesRepository};

pub struct TeacherDashboardOutput {
    pub analytics: TeacherAnalytics,
    pub courses: Vec<Course>,
}

/// Builds a teacher's dashboard from their course counters, recomputed on
/// every read.
pub(crate) async fn teacher_dashboard(
    courses_repository: &impl CoursesRepository,
    teacher_id: &Uuid,
) -> Result<TeacherDashboardOutput, EndpointError<Infallible>> {
    let filters = CourseFilters {
        teacher_id: Some(*teacher_id),
        ..CourseFilters::default()
    };
    let courses = courses_repository
        .list_courses(&filters)
        .await
        .map_err(|err| {
            log::error!("Listing courses for {} failed: {:?}", teacher_id, err);
            EndpointError::internal()
        })?;

    Ok(TeacherDashboardOutput {
        analytics: teacher_rollup(&courses),
        courses,
    })
}
