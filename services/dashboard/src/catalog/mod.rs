pub mod ddb_repository;
pub mod repository;
pub mod types;

pub use repository::{CourseFilters, CourseUpdate, CoursesRepository, UpdateCourseError};
pub use types::{
    Assignment, CorrectAnswer, Course, CourseLevel, Lesson, Material, MaterialKind, Question,
    QuestionKind, Quiz, Submission, SubmissionStatus,
};
