use std::sync::Arc;

use async_graphql::{Context, Object};
use uuid::Uuid;

use crate::catalog::{Course, CourseFilters};
use crate::context::AppContext;
use crate::enrollment::ResolvedEnrollment;
use crate::operations::admin_dashboard::admin_dashboard;
use crate::operations::describe_course::describe_course;
use crate::operations::describe_user::describe_user;
use crate::operations::list_courses::list_courses;
use crate::operations::list_users::{list_users, ListUsersInput, ListUsersOutput};
use crate::operations::student_dashboard::student_dashboard;
use crate::operations::teacher_dashboard::teacher_dashboard;
use crate::schema::auth::{caller, check_self_or_admin, require_role};
use crate::schema::types::{AdminDashboard, StudentDashboard, TeacherDashboard};
use crate::user_profile::{Role, UserProfile};

pub struct Query;

#[Object]
impl Query {
    async fn api_version(&self) -> u32 {
        1
    }

    /// Profile of the signed-in caller.
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<UserProfile> {
        let session = caller(ctx)?;
        let app = ctx.data_unchecked::<Arc<AppContext>>();

        Ok(describe_user(&app.profiles, &session.user_id).await?)
    }

    /// Profile of a single user. Callers may look up themselves;
    /// administrators may look up anyone.
    async fn user(&self, ctx: &Context<'_>, user_id: Uuid) -> async_graphql::Result<UserProfile> {
        let session = caller(ctx)?;
        check_self_or_admin(session, &user_id)?;
        let app = ctx.data_unchecked::<Arc<AppContext>>();

        Ok(describe_user(&app.profiles, &user_id).await?)
    }

    async fn users(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] input: ListUsersInput,
    ) -> async_graphql::Result<ListUsersOutput> {
        require_role(ctx, Role::Admin)?;
        let app = ctx.data_unchecked::<Arc<AppContext>>();

        Ok(list_users(&app.profiles, &input).await?)
    }

    async fn courses(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] filters: CourseFilters,
    ) -> async_graphql::Result<Vec<Course>> {
        caller(ctx)?;
        let app = ctx.data_unchecked::<Arc<AppContext>>();

        Ok(list_courses(&app.courses, &filters).await?)
    }

    async fn course(&self, ctx: &Context<'_>, course_id: Uuid) -> async_graphql::Result<Course> {
        caller(ctx)?;
        let app = ctx.data_unchecked::<Arc<AppContext>>();

        Ok(describe_course(&app.courses, &course_id).await?)
    }

    /// The caller's enrollments with their course documents attached.
    async fn my_enrollments(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<ResolvedEnrollment>> {
        let session = require_role(ctx, Role::Student)?;
        let app = ctx.data_unchecked::<Arc<AppContext>>();
        let output = student_dashboard(&app.courses, &app.enrollments, &session.user_id).await?;

        Ok(output.courses)
    }

    async fn student_dashboard(&self, ctx: &Context<'_>) -> async_graphql::Result<StudentDashboard> {
        let session = require_role(ctx, Role::Student)?;
        let app = ctx.data_unchecked::<Arc<AppContext>>();
        let output = student_dashboard(&app.courses, &app.enrollments, &session.user_id).await?;

        Ok(output.into())
    }

    async fn teacher_dashboard(&self, ctx: &Context<'_>) -> async_graphql::Result<TeacherDashboard> {
        let session = require_role(ctx, Role::Teacher)?;
        let app = ctx.data_unchecked::<Arc<AppContext>>();
        let output = teacher_dashboard(&app.courses, &session.user_id).await?;

        Ok(output.into())
    }

    async fn admin_dashboard(&self, ctx: &Context<'_>) -> async_graphql::Result<AdminDashboard> {
        require_role(ctx, Role::Admin)?;
        let app = ctx.data_unchecked::<Arc<AppContext>>();
        let analytics = admin_dashboard(&app.profiles, &app.courses, &app.enrollments).await?;

        Ok(analytics.into())
    }
}
