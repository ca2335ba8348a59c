use std::collections::HashMap;

use async_graphql::InputObject;
use async_trait::async_trait;
use service_core::ddb::store_error::StoreError;
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::{Course, CourseLevel};

#[derive(Debug, Error)]
pub enum UpdateCourseError {
    #[error("Course not found.")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fields a course author may change. `None` leaves the stored attribute
/// untouched.
#[derive(Clone, Debug, Default, InputObject)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub category: Option<String>,
    pub level: Option<CourseLevel>,
    pub duration: Option<String>,
    pub price: Option<f64>,
    pub is_published: Option<bool>,
}

#[derive(Clone, Debug, Default, InputObject)]
pub struct CourseFilters {
    pub teacher_id: Option<Uuid>,
    pub category: Option<String>,
    pub level: Option<CourseLevel>,
    pub is_published: Option<bool>,
    pub limit: Option<i32>,
}

#[async_trait]
pub trait CoursesRepository {
    async fn create_course(&self, course: &Course) -> Result<(), StoreError>;

    async fn get_course(&self, course_id: &Uuid) -> Result<Option<Course>, StoreError>;

    /// Lists courses matching the filters, newest first.
    async fn list_courses(&self, filters: &CourseFilters) -> Result<Vec<Course>, StoreError>;

    /// Walks the whole courses table. Aggregation only.
    async fn list_all(&self) -> Result<Vec<Course>, StoreError>;

    async fn update_course(
        &self,
        course_id: &Uuid,
        update: &CourseUpdate,
    ) -> Result<(), UpdateCourseError>;

    /// Removes a course. Deleting an absent course is not an error.
    async fn delete_course(&self, course_id: &Uuid) -> Result<(), StoreError>;

    /// Atomically adds `delta` to the course's `studentsEnrolled` counter.
    async fn increment_students_enrolled(
        &self,
        course_id: &Uuid,
        delta: i64,
    ) -> Result<(), UpdateCourseError>;

    /// Fetches many courses in one round trip. Unknown ids are simply
    /// absent from the result.
    async fn batch_get_courses(
        &self,
        course_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Course>, StoreError>;

    async fn count_courses(&self) -> Result<i64, StoreError>;
}
