/// A value computed by the aggregation layer, or a marker that no truthful
/// source for it exists yet.
///
/// Metrics the platform cannot compute from its stores are reported as
/// `Unavailable` rather than fabricated, and the presentation layer turns
/// them into explicit nulls.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Metric<T> {
    Reported(T),
    Unavailable,
}

impl<T> Metric<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Metric::Reported(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Metric::Reported(value) => Some(value),
            Metric::Unavailable => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CoursePopularity {
    pub course: String,
    pub enrollments: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyCount {
    pub month: String,
    pub count: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
}

/// Platform-wide rollup backing the admin dashboard.
#[derive(Clone, Debug, PartialEq)]
pub struct PlatformAnalytics {
    pub total_users: i64,
    pub total_courses: i64,
    pub active_users: i64,
    pub course_completion_rate: f64,
    pub course_popularity: Vec<CoursePopularity>,
    pub total_revenue: Metric<f64>,
    pub user_growth: Metric<Vec<MonthlyCount>>,
    pub revenue_history: Metric<Vec<MonthlyRevenue>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StudentAnalytics {
    pub total_courses: i64,
    pub completed_courses: i64,
    pub average_progress: f64,
    pub total_hours: Metric<i64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TeacherAnalytics {
    pub total_courses: i64,
    pub published_courses: i64,
    pub total_students: i64,
    pub average_rating: f64,
    pub estimated_revenue: f64,
}
