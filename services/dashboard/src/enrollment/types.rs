use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Enrollment record stored in the enrollments table, keyed by
/// `courseId` + `studentId`. One record exists per student per course.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SimpleObject, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    #[builder(default = Uuid::new_v4())]
    pub enrollment_id: Uuid,

    pub course_id: Uuid,

    pub student_id: Uuid,

    #[builder(default = Utc::now())]
    pub enrolled_at: DateTime<Utc>,

    #[serde(default)]
    #[builder(default)]
    pub progress: f64,

    #[serde(default)]
    #[builder(default)]
    pub completed_lessons: Vec<String>,

    /// Absent until the student first records progress.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub last_accessed: Option<DateTime<Utc>>,
}

/// An enrollment joined with its course document.
#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "EnrolledCourse")]
pub struct ResolvedEnrollment {
    pub enrollment_id: Uuid,
    pub course: crate::catalog::Course,
    pub progress: f64,
    pub enrolled_at: DateTime<Utc>,
    pub completed_lessons: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_attribute_names() {
        let enrollment = Enrollment::builder()
            .course_id(Uuid::new_v4())
            .student_id(Uuid::new_v4())
            .progress(42.5)
            .completed_lessons(vec!["l1".to_string()])
            .build();

        let value = serde_json::to_value(&enrollment).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("enrollmentId"));
        assert!(object.contains_key("courseId"));
        assert!(object.contains_key("studentId"));
        assert!(object.contains_key("enrolledAt"));
        assert!(object.contains_key("completedLessons"));
        // Not written until the first progress update.
        assert!(!object.contains_key("lastAccessed"));
        assert_eq!(value["progress"], 42.5);
    }

    #[test]
    fn fresh_enrollments_start_at_zero_progress() {
        let enrollment = Enrollment::builder()
            .course_id(Uuid::new_v4())
            .student_id(Uuid::new_v4())
            .build();

        assert_eq!(enrollment.progress, 0.0);
        assert!(enrollment.completed_lessons.is_empty());
        assert!(enrollment.last_accessed.is_none());
    }
}
