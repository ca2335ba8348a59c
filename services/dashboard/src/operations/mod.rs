pub mod admin_dashboard;
pub mod create_course;
pub mod delete_course;
pub mod describe_course;
pub mod describe_user;
pub mod enroll;
pub mod list_courses;
pub mod list_users;
pub mod refresh_session;
pub mod resolve_enrollments;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod student_dashboard;
pub mod teacher_dashboard;
pub mod update_course;
pub mod update_profile;
pub mod update_progress;
