use std::sync::Arc;

use async_graphql::{Context, Object};
use uuid::Uuid;

use crate::catalog::{Course, CourseUpdate};
use crate::context::AppContext;
use crate::enrollment::{Enrollment, ProgressUpdate};
use crate::operations::create_course::{create_course, CreateCourseInput};
use crate::operations::delete_course::delete_course;
use crate::operations::enroll::enroll;
use crate::operations::refresh_session::{refresh_session, RefreshSessionInput, RefreshSessionOutput};
use crate::operations::sign_in::{sign_in, SignInInput, SignInOutput};
use crate::operations::sign_out::sign_out;
use crate::operations::sign_up::{sign_up, SignUpInput};
use crate::operations::update_course::update_course;
use crate::operations::update_profile::update_profile;
use crate::operations::update_progress::update_progress;
use crate::schema::auth::{caller, require_role, student_scope, teacher_scope};
use crate::user_profile::{ProfileUpdate, Role, UserProfile};

pub struct Mutation;

#[Object]
impl Mutation {
    async fn sign_up(&self, ctx: &Context<'_>, input: SignUpInput) -> async_graphql::Result<UserProfile> {
        let app = ctx.data_unchecked::<Arc<AppContext>>();

        Ok(sign_up(&app.identity, &app.profiles, input).await?)
    }

    async fn sign_in(&self, ctx: &Context<'_>, input: SignInInput) -> async_graphql::Result<SignInOutput> {
        let app = ctx.data_unchecked::<Arc<AppContext>>();

        Ok(sign_in(
            &app.identity,
            &app.profiles,
            &app.sessions,
            &app.auth_events,
            app.access_token_secret.as_str(),
            input,
        )
        .await?)
    }

    async fn sign_out(&self, ctx: &Context<'_>, refresh_token: String) -> async_graphql::Result<bool> {
        let app = ctx.data_unchecked::<Arc<AppContext>>();
        sign_out(&app.sessions, &app.auth_events, refresh_token.as_str()).await?;

        Ok(true)
    }

    async fn refresh_session(
        &self,
        ctx: &Context<'_>,
        input: RefreshSessionInput,
    ) -> async_graphql::Result<RefreshSessionOutput> {
        let app = ctx.data_unchecked::<Arc<AppContext>>();

        Ok(refresh_session(
            &app.profiles,
            &app.sessions,
            app.access_token_secret.as_str(),
            input,
        )
        .await?)
    }

    /// Updates the caller's own profile.
    async fn update_profile(&self, ctx: &Context<'_>, update: ProfileUpdate) -> async_graphql::Result<bool> {
        let session = caller(ctx)?;
        let app = ctx.data_unchecked::<Arc<AppContext>>();
        update_profile(&app.profiles, &session.user_id, &update).await?;

        Ok(true)
    }

    async fn create_course(&self, ctx: &Context<'_>, input: CreateCourseInput) -> async_graphql::Result<Course> {
        let session = require_role(ctx, Role::Teacher)?;
        let app = ctx.data_unchecked::<Arc<AppContext>>();

        Ok(create_course(&app.courses, session.user_id, session.name.as_str(), input).await?)
    }

    async fn update_course(
        &self,
        ctx: &Context<'_>,
        course_id: Uuid,
        update: CourseUpdate,
    ) -> async_graphql::Result<bool> {
        let session = caller(ctx)?;
        let scope = teacher_scope(session)?;
        let app = ctx.data_unchecked::<Arc<AppContext>>();
        update_course(&app.courses, &course_id, scope, &update).await?;

        Ok(true)
    }

    async fn delete_course(&self, ctx: &Context<'_>, course_id: Uuid) -> async_graphql::Result<bool> {
        let session = caller(ctx)?;
        let scope = teacher_scope(session)?;
        let app = ctx.data_unchecked::<Arc<AppContext>>();
        delete_course(&app.courses, &course_id, scope).await?;

        Ok(true)
    }

    /// Enrolls the caller in a course.
    async fn enroll(&self, ctx: &Context<'_>, course_id: Uuid) -> async_graphql::Result<Enrollment> {
        let session = require_role(ctx, Role::Student)?;
        let app = ctx.data_unchecked::<Arc<AppContext>>();

        Ok(enroll(
            &app.courses,
            &app.profiles,
            &app.enrollments,
            &course_id,
            &session.user_id,
        )
        .await?)
    }

    async fn update_progress(
        &self,
        ctx: &Context<'_>,
        enrollment_id: Uuid,
        progress: f64,
        completed_lessons: Vec<String>,
    ) -> async_graphql::Result<bool> {
        let session = caller(ctx)?;
        let scope = student_scope(session)?;
        let app = ctx.data_unchecked::<Arc<AppContext>>();
        let update = ProgressUpdate {
            progress,
            completed_lessons,
        };
        update_progress(&app.enrollments, &enrollment_id, scope, &update).await?;

        Ok(true)
    }
}
