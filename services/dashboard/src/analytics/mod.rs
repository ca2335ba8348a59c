pub mod reducers;
pub mod types;

pub use types::{
    CoursePopularity, Metric, MonthlyCount, MonthlyRevenue, PlatformAnalytics, StudentAnalytics,
    TeacherAnalytics,
};
