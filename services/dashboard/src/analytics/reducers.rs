use crate::analytics::types::{CoursePopularity, TeacherAnalytics};
use crate::catalog::Course;
use crate::enrollment::Enrollment;

/// Progress at or above this counts as a completed course.
pub const COMPLETION_THRESHOLD: f64 = 100.0;

/// Flat per-student price used for the teacher revenue estimate until a
/// payments ledger exists.
pub const ASSUMED_COURSE_PRICE: f64 = 50.0;

/// Share of enrollments at full progress, as a percentage. Zero when there
/// are no enrollments.
pub fn completion_rate(enrollments: &[Enrollment]) -> f64 {
    if enrollments.is_empty() {
        return 0.0;
    }
    completed_count(enrollments) as f64 / enrollments.len() as f64 * 100.0
}

pub fn completed_count(enrollments: &[Enrollment]) -> i64 {
    enrollments
        .iter()
        .filter(|enrollment| enrollment.progress >= COMPLETION_THRESHOLD)
        .count() as i64
}

/// Mean progress across enrollments. Zero when there are no enrollments.
pub fn average_progress(enrollments: &[Enrollment]) -> f64 {
    if enrollments.is_empty() {
        return 0.0;
    }
    enrollments
        .iter()
        .map(|enrollment| enrollment.progress)
        .sum::<f64>()
        / enrollments.len() as f64
}

/// Courses ranked by their enrollment counter, largest first, capped at
/// `top` entries.
pub fn course_popularity(courses: &[Course], top: usize) -> Vec<CoursePopularity> {
    let mut ranked: Vec<CoursePopularity> = courses
        .iter()
        .map(|course| CoursePopularity {
            course: course.title.clone(),
            enrollments: course.students_enrolled,
        })
        .collect();
    ranked.sort_by(|a, b| b.enrollments.cmp(&a.enrollments));
    ranked.truncate(top);
    ranked
}

/// Rolls a teacher's courses up into their dashboard counters. Unrated
/// courses drag the average down as zeroes, matching how the counters are
/// presented elsewhere.
pub fn teacher_rollup(courses: &[Course]) -> TeacherAnalytics {
    let total_students: i64 = courses.iter().map(|course| course.students_enrolled).sum();
    let average_rating = if courses.is_empty() {
        0.0
    } else {
        courses.iter().map(|course| course.rating).sum::<f64>() / courses.len() as f64
    };

    TeacherAnalytics {
        total_courses: courses.len() as i64,
        published_courses: courses.iter().filter(|course| course.is_published).count() as i64,
        total_students,
        average_rating,
        estimated_revenue: total_students as f64 * ASSUMED_COURSE_PRICE,
    }
}
