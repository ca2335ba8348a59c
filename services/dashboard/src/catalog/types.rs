use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Course document stored in the courses table, keyed by `courseId`.
///
/// Lessons are embedded in the document. The dashboard reads them for
/// display; authoring lesson content happens in a separate pipeline.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SimpleObject, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[builder(default = Uuid::new_v4())]
    pub course_id: Uuid,

    #[builder(setter(into))]
    pub title: String,

    #[builder(setter(into))]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub thumbnail: Option<String>,

    #[builder(setter(into))]
    pub category: String,

    pub level: CourseLevel,

    #[builder(setter(into))]
    pub duration: String,

    #[serde(default)]
    #[builder(default)]
    pub students_enrolled: i64,

    #[serde(default)]
    #[builder(default)]
    pub rating: f64,

    #[serde(default)]
    #[builder(default)]
    pub price: f64,

    #[serde(default)]
    #[builder(default)]
    pub is_published: bool,

    pub teacher_id: Uuid,

    #[builder(setter(into))]
    pub teacher_name: String,

    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,

    #[builder(default = Utc::now())]
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    #[builder(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Clone, Copy, Debug, Deserialize, Enum, Eq, PartialEq, Serialize)]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// A lesson embedded in a course document, with its materials, assignments
/// and quizzes nested inside. The dashboard reads these shapes as stored;
/// nothing here has a write path.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub quizzes: Vec<Quiz>,
    pub order: i32,
    /// Minutes.
    pub duration: i32,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    #[graphql(name = "type")]
    pub kind: MaterialKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, Enum, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Pdf,
    Doc,
    Video,
    Link,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub max_points: i32,
    #[serde(default)]
    pub submissions: Vec<Submission>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub student_id: Uuid,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, Enum, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Submitted,
    Graded,
    Pending,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    pub time_limit: i32,
    pub attempts: i32,
    pub passing_score: i32,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    #[graphql(name = "type")]
    pub kind: QuestionKind,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    // Correct answers never leave the store through the dashboard surface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[graphql(skip)]
    pub correct_answer: Option<CorrectAnswer>,
    pub points: i32,
}

#[derive(Clone, Copy, Debug, Deserialize, Enum, Eq, PartialEq, Serialize)]
pub enum QuestionKind {
    #[serde(rename = "mcq")]
    Mcq,
    #[serde(rename = "subjective")]
    Subjective,
    #[serde(rename = "true-false")]
    TrueFalse,
}

/// Multiple-choice answers are stored as the option index, subjective and
/// true/false answers as text.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Index(i64),
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_attribute_names() {
        let course = Course::builder()
            .title("Rust for Embedded")
            .description("Bare-metal Rust")
            .category("Systems")
            .level(CourseLevel::Advanced)
            .duration("8 weeks")
            .teacher_id(Uuid::new_v4())
            .teacher_name("Ada")
            .is_published(true)
            .build();

        let value = serde_json::to_value(&course).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("courseId"));
        assert!(object.contains_key("studentsEnrolled"));
        assert!(object.contains_key("isPublished"));
        assert!(object.contains_key("teacherId"));
        assert!(object.contains_key("createdAt"));
        assert_eq!(value["level"], "Advanced");
    }

    #[test]
    fn deserializes_documents_missing_counters() {
        let course: Course = serde_json::from_value(serde_json::json!({
            "courseId": "0d4cfd49-bf36-468f-9ebc-fb94e9e54acd",
            "title": "Intro to Queues",
            "description": "FIFO fundamentals",
            "category": "Systems",
            "level": "Beginner",
            "duration": "2 weeks",
            "teacherId": "31b6a683-2af4-4be8-90f4-9bda96a49b1b",
            "teacherName": "Grace",
            "createdAt": "2024-02-01T00:00:00Z",
            "updatedAt": "2024-02-01T00:00:00Z",
        }))
        .unwrap();

        assert_eq!(course.students_enrolled, 0);
        assert_eq!(course.rating, 0.0);
        assert!(!course.is_published);
        assert!(course.lessons.is_empty());
    }

    #[test]
    fn material_kind_round_trips_through_its_wire_names() {
        let material: Material = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "title": "Slides",
            "type": "pdf",
            "url": "https://example.com/slides.pdf",
        }))
        .unwrap();

        assert_eq!(material.kind, MaterialKind::Pdf);
        assert!(material.size.is_none());
        let value = serde_json::to_value(&material).unwrap();
        assert_eq!(value["type"], "pdf");
    }

    #[test]
    fn deserializes_a_lesson_with_nested_assignments_and_quizzes() {
        let lesson: Lesson = serde_json::from_value(serde_json::json!({
            "id": "l1",
            "title": "Ownership",
            "description": "Moves and borrows",
            "order": 1,
            "duration": 45,
            "materials": [],
            "assignments": [{
                "id": "a1",
                "title": "Borrow checker drills",
                "description": "Fix the programs",
                "dueDate": "2024-03-01T00:00:00Z",
                "maxPoints": 100,
                "createdAt": "2024-02-01T00:00:00Z",
                "submissions": [{
                    "id": "s1",
                    "studentId": "f5e114fd-a814-4ec4-8477-5b4e809ac405",
                    "content": "Done",
                    "submittedAt": "2024-02-20T00:00:00Z",
                    "status": "graded",
                    "grade": 92.5,
                }],
            }],
            "quizzes": [{
                "id": "q1",
                "title": "Lifetimes",
                "timeLimit": 15,
                "attempts": 2,
                "passingScore": 70,
                "questions": [{
                    "id": "q1-1",
                    "type": "true-false",
                    "question": "A shared reference can outlive its referent.",
                    "correctAnswer": "false",
                    "points": 5,
                }, {
                    "id": "q1-2",
                    "type": "mcq",
                    "question": "Which trait moves values between threads?",
                    "options": ["Send", "Sync", "Copy"],
                    "correctAnswer": 0,
                    "points": 5,
                }],
            }],
        }))
        .unwrap();

        assert_eq!(lesson.assignments[0].submissions[0].status, SubmissionStatus::Graded);
        assert_eq!(lesson.assignments[0].submissions[0].grade, Some(92.5));
        let questions = &lesson.quizzes[0].questions;
        assert_eq!(questions[0].kind, QuestionKind::TrueFalse);
        assert_eq!(
            questions[0].correct_answer,
            Some(CorrectAnswer::Text("false".to_string()))
        );
        assert_eq!(questions[1].correct_answer, Some(CorrectAnswer::Index(0)));
    }
}
