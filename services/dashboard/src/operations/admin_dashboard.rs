use std::convert::Infallible;

use chrono::{Duration, Utc};
use service_core::endpoint_error::EndpointError;

use crate::analytics::reducers::{completion_rate, course_popularity};
use crate::analytics::{Metric, PlatformAnalytics};
use crate::catalog::CoursesRepository;
use crate::enrollment::EnrollmentsRepository;
use crate::user_profile::ProfilesRepository;

/// Accounts seen inside this window count as active.
const ACTIVE_WINDOW_DAYS: i64 = 30;
/// Popularity chart length.
const POPULARITY_TOP: usize = 10;

/// Builds the platform-wide rollup for the admin dashboard, recomputed on
/// every read.
pub(crate) async fn admin_dashboard(
    profiles_repository: &impl ProfilesRepository,
    courses_repository: &impl CoursesRepository,
    enrollments_repository: &impl EnrollmentsRepository,
) -> Result<PlatformAnalytics, EndpointError<Infallible>> {
    let total_users = profiles_repository.count_profiles().await.map_err(|err| {
        log::error!("Counting profiles failed: {:?}", err);
        EndpointError::internal()
    })?;
    let since = Utc::now() - Duration::days(ACTIVE_WINDOW_DAYS);
    let active_users = profiles_repository
        .count_active_profiles(since)
        .await
        .map_err(|err| {
            log::error!("Counting active profiles failed: {:?}", err);
            EndpointError::internal()
        })?;
    let total_courses = courses_repository.count_courses().await.map_err(|err| {
        log::error!("Counting courses failed: {:?}", err);
        EndpointError::internal()
    })?;
    let courses = courses_repository.list_all().await.map_err(|err| {
        log::error!("Walking the courses table failed: {:?}", err);
        EndpointError::internal()
    })?;
    let enrollments = enrollments_repository.list_all().await.map_err(|err| {
        log::error!("Walking the enrollments table failed: {:?}", err);
        EndpointError::internal()
    })?;

    Ok(PlatformAnalytics {
        total_users,
        total_courses,
        active_users,
        course_completion_rate: completion_rate(&enrollments),
        course_popularity: course_popularity(&courses, POPULARITY_TOP),
        // No billing pipeline reports into the dashboard yet.
        total_revenue: Metric::Unavailable,
        revenue_history: Metric::Unavailable,
        // Sign-up timestamps exist, but no month-bucketed rollup does.
        user_growth: Metric::Unavailable,
    })
}
