use std::convert::Infallible;

use service_core::endpoint_error::EndpointError;
use uuid::Uuid;

use crate::analytics::reducers::{average_progress, completed_count};
use crate::analytics::{Metric, StudentAnalytics};
use crate::catalog::CoursesRepository;
use crate::enrollment::{EnrollmentsRepository, ResolvedEnrollment};
use crate::operations::resolve_enrollments::resolve_enrollments;

pub struct StudentDashboardOutput {
    pub analytics: StudentAnalytics,
    pub courses: Vec<ResolvedEnrollment>,
}

/// Builds a student's dashboard from their enrollments, recomputed on every
/// read.
pub(crate) async fn student_dashboard(
    courses_repository: &impl CoursesRepository,
    enrollments_repository: &impl EnrollmentsRepository,
    student_id: &Uuid,
) -> Result<StudentDashboardOutput, EndpointError<Infallible>> {
    let enrollments = enrollments_repository
        .list_for_student(student_id)
        .await
        .map_err(|err| {
            log::error!("Listing enrollments for {} failed: {:?}", student_id, err);
            EndpointError::internal()
        })?;

    let analytics = StudentAnalytics {
        total_courses: enrollments.len() as i64,
        completed_courses: completed_count(&enrollments),
        average_progress: average_progress(&enrollments),
        // Nothing tracks watch time, so hours stay unavailable.
        total_hours: Metric::Unavailable,
    };

    let courses = resolve_enrollments(courses_repository, enrollments)
        .await
        .map_err(|err| {
            log::error!("Resolving courses for {} failed: {:?}", student_id, err);
            EndpointError::internal()
        })?;

    Ok(StudentDashboardOutput { analytics, courses })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Course, CourseLevel};
    use crate::enrollment::Enrollment;
    use crate::testing::{InMemoryCourses, InMemoryEnrollments};

    fn course(title: &str) -> Course {
        Course::builder()
            .title(title)
            .description("...")
            .category("Systems")
            .level(CourseLevel::Beginner)
            .duration("2 weeks")
            .teacher_id(Uuid::new_v4())
            .teacher_name("Grace")
            .build()
    }

    #[tokio::test]
    async fn aggregates_progress_and_joins_courses() {
        let student_id = Uuid::new_v4();
        let queues = course("Queues");
        let compilers = course("Compilers");
        let enrollments = InMemoryEnrollments::with([
            Enrollment::builder()
                .course_id(queues.course_id)
                .student_id(student_id)
                .progress(100.0)
                .build(),
            Enrollment::builder()
                .course_id(compilers.course_id)
                .student_id(student_id)
                .progress(50.0)
                .build(),
            // Another student's enrollment stays out of the rollup.
            Enrollment::builder()
                .course_id(queues.course_id)
                .student_id(Uuid::new_v4())
                .progress(10.0)
                .build(),
        ]);
        let courses = InMemoryCourses::with([queues, compilers]);

        let dashboard = student_dashboard(&courses, &enrollments, &student_id)
            .await
            .unwrap();

        assert_eq!(dashboard.analytics.total_courses, 2);
        assert_eq!(dashboard.analytics.completed_courses, 1);
        assert_eq!(dashboard.analytics.average_progress, 75.0);
        assert_eq!(dashboard.analytics.total_hours, Metric::Unavailable);
        assert_eq!(dashboard.courses.len(), 2);
    }

    #[tokio::test]
    async fn an_unenrolled_student_gets_an_empty_dashboard() {
        let dashboard = student_dashboard(
            &InMemoryCourses::default(),
            &InMemoryEnrollments::default(),
            &Uuid::new_v4(),
        )
        .await
        .unwrap();

        assert_eq!(dashboard.analytics.total_courses, 0);
        assert_eq!(dashboard.analytics.average_progress, 0.0);
        assert!(dashboard.courses.is_empty());
    }
}
