use std::convert::Infallible;

use service_core::endpoint_error::EndpointError;

use crate::catalog::{Course, CourseFilters, CoursesRepository};

pub(crate) async fn list_courses(
    courses_repository: &impl CoursesRepository,
    filters: &CourseFilters,
) -> Result<Vec<Course>, EndpointError<Infallible>> {
    if let Some(limit) = filters.limit {
        if limit <= 0 {
            return Err(EndpointError::validation("Limit must be positive."));
        }
    }

    courses_repository
        .list_courses(filters)
        .await
        .map_err(|err| {
            log::error!("Listing courses failed: {:?}", err);
            EndpointError::internal()
        })
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::catalog::CourseLevel;
    use crate::testing::InMemoryCourses;

    fn course(title: &str, category: &str, is_published: bool) -> Course {
        Course::builder()
            .title(title)
            .description("...")
            .category(category)
            .level(CourseLevel::Beginner)
            .duration("2 weeks")
            .is_published(is_published)
            .teacher_id(Uuid::new_v4())
            .teacher_name("Grace")
            .build()
    }

    #[tokio::test]
    async fn filters_are_passed_through() {
        let courses = InMemoryCourses::with([
            course("Queues", "Systems", true),
            course("Watercolors", "Art", true),
            course("Compilers", "Systems", false),
        ]);
        let filters = CourseFilters {
            category: Some("Systems".to_string()),
            is_published: Some(true),
            ..CourseFilters::default()
        };

        let listed = list_courses(&courses, &filters).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Queues");
    }

    #[tokio::test]
    async fn rejects_a_non_positive_limit() {
        let courses = InMemoryCourses::default();
        let filters = CourseFilters {
            limit: Some(0),
            ..CourseFilters::default()
        };

        let result = list_courses(&courses, &filters).await;

        assert!(matches!(result, Err(EndpointError::Validation(_))));
    }
}
