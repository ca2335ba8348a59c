use std::convert::Infallible;

use async_graphql::InputObject;
use service_core::endpoint_error::EndpointError;
use uuid::Uuid;

use crate::catalog::{Course, CourseLevel, CoursesRepository};

#[derive(Clone, Debug, InputObject)]
pub struct CreateCourseInput {
    pub title: String,
    pub description: String,
    pub thumbnail: Option<String>,
    pub category: String,
    pub level: CourseLevel,
    pub duration: String,
    pub price: f64,
    #[graphql(default = false)]
    pub is_published: bool,
}

pub(crate) async fn create_course(
    courses_repository: &impl CoursesRepository,
    teacher_id: Uuid,
    teacher_name: &str,
    input: CreateCourseInput,
) -> Result<Course, EndpointError<Infallible>> {
    if input.title.trim().is_empty() {
        return Err(EndpointError::validation("Title is required."));
    }
    if input.price < 0.0 {
        return Err(EndpointError::validation("Price cannot be negative."));
    }

    let course = Course::builder()
        .title(input.title)
        .description(input.description)
        .thumbnail(input.thumbnail)
        .category(input.category)
        .level(input.level)
        .duration(input.duration)
        .price(input.price)
        .is_published(input.is_published)
        .teacher_id(teacher_id)
        .teacher_name(teacher_name)
        .build();

    courses_repository
        .create_course(&course)
        .await
        .map_err(|err| {
            log::error!("Writing course failed: {:?}", err);
            EndpointError::internal()
        })?;

    Ok(course)
}
