use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::analytics::PlatformAnalytics;
use crate::catalog::Course;
use crate::enrollment::ResolvedEnrollment;
use crate::identity::{AuthEvent, AuthState};
use crate::operations::student_dashboard::StudentDashboardOutput;
use crate::operations::teacher_dashboard::TeacherDashboardOutput;

#[derive(Debug, SimpleObject)]
pub struct PopularityEntry {
    pub course: String,
    pub enrollments: i64,
}

#[derive(Debug, SimpleObject)]
pub struct GrowthPoint {
    pub month: String,
    pub users: i64,
}

#[derive(Debug, SimpleObject)]
pub struct RevenuePoint {
    pub month: String,
    pub revenue: f64,
}

/// Platform rollup served to administrators. Metrics without a data source
/// render as nulls rather than numbers nobody measured.
#[derive(Debug, SimpleObject)]
pub struct AdminDashboard {
    pub total_users: i64,
    pub total_courses: i64,
    pub active_users: i64,
    pub course_completion_rate: f64,
    pub course_popularity: Vec<PopularityEntry>,
    pub total_revenue: Option<f64>,
    pub user_growth: Option<Vec<GrowthPoint>>,
    pub revenue_history: Option<Vec<RevenuePoint>>,
}

impl From<PlatformAnalytics> for AdminDashboard {
    fn from(analytics: PlatformAnalytics) -> Self {
        AdminDashboard {
            total_users: analytics.total_users,
            total_courses: analytics.total_courses,
            active_users: analytics.active_users,
            course_completion_rate: analytics.course_completion_rate,
            course_popularity: analytics
                .course_popularity
                .into_iter()
                .map(|entry| PopularityEntry {
                    course: entry.course,
                    enrollments: entry.enrollments,
                })
                .collect(),
            total_revenue: analytics.total_revenue.into_option(),
            user_growth: analytics.user_growth.into_option().map(|points| {
                points
                    .into_iter()
                    .map(|point| GrowthPoint {
                        month: point.month,
                        users: point.count,
                    })
                    .collect()
            }),
            revenue_history: analytics.revenue_history.into_option().map(|points| {
                points
                    .into_iter()
                    .map(|point| RevenuePoint {
                        month: point.month,
                        revenue: point.revenue,
                    })
                    .collect()
            }),
        }
    }
}

#[derive(Debug, SimpleObject)]
pub struct StudentDashboard {
    pub total_courses: i64,
    pub completed_courses: i64,
    pub average_progress: f64,
    pub total_hours: Option<i64>,
    pub courses: Vec<ResolvedEnrollment>,
}

impl From<StudentDashboardOutput> for StudentDashboard {
    fn from(output: StudentDashboardOutput) -> Self {
        StudentDashboard {
            total_courses: output.analytics.total_courses,
            completed_courses: output.analytics.completed_courses,
            average_progress: output.analytics.average_progress,
            total_hours: output.analytics.total_hours.into_option(),
            courses: output.courses,
        }
    }
}

#[derive(Debug, SimpleObject)]
pub struct TeacherDashboard {
    pub total_courses: i64,
    pub published_courses: i64,
    pub total_students: i64,
    pub average_rating: f64,
    pub estimated_revenue: f64,
    pub courses: Vec<Course>,
}

impl From<TeacherDashboardOutput> for TeacherDashboard {
    fn from(output: TeacherDashboardOutput) -> Self {
        TeacherDashboard {
            total_courses: output.analytics.total_courses,
            published_courses: output.analytics.published_courses,
            total_students: output.analytics.total_students,
            average_rating: output.analytics.average_rating,
            estimated_revenue: output.analytics.estimated_revenue,
            courses: output.courses,
        }
    }
}

/// A session state change pushed to subscribers.
#[derive(Clone, Debug, SimpleObject)]
pub struct SessionEvent {
    pub user_id: Option<Uuid>,
    pub state: AuthState,
    pub at: DateTime<Utc>,
}

impl SessionEvent {
    /// Initial event describing the subscriber's state at connect time.
    pub(crate) fn snapshot(user_id: Option<Uuid>) -> Self {
        SessionEvent {
            state: if user_id.is_some() {
                AuthState::SignedIn
            } else {
                AuthState::SignedOut
            },
            user_id,
            at: Utc::now(),
        }
    }
}

impl From<AuthEvent> for SessionEvent {
    fn from(event: AuthEvent) -> Self {
        SessionEvent {
            user_id: Some(event.user_id),
            state: event.state,
            at: event.at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{CoursePopularity, Metric};

    #[test]
    fn unavailable_metrics_render_as_nulls() {
        let analytics = PlatformAnalytics {
            total_users: 12,
            total_courses: 3,
            active_users: 7,
            course_completion_rate: 25.0,
            course_popularity: vec![CoursePopularity {
                course: "Queues".to_string(),
                enrollments: 9,
            }],
            total_revenue: Metric::Unavailable,
            user_growth: Metric::Unavailable,
            revenue_history: Metric::Unavailable,
        };

        let dashboard = AdminDashboard::from(analytics);

        assert_eq!(dashboard.total_users, 12);
        assert_eq!(dashboard.course_popularity[0].course, "Queues");
        assert!(dashboard.total_revenue.is_none());
        assert!(dashboard.user_growth.is_none());
        assert!(dashboard.revenue_history.is_none());
    }

    #[test]
    fn snapshots_reflect_the_token_state() {
        let user_id = Uuid::new_v4();

        let signed_in = SessionEvent::snapshot(Some(user_id));
        let anonymous = SessionEvent::snapshot(None);

        assert_eq!(signed_in.state, AuthState::SignedIn);
        assert_eq!(signed_in.user_id, Some(user_id));
        assert_eq!(anonymous.state, AuthState::SignedOut);
        assert!(anonymous.user_id.is_none());
    }
}
