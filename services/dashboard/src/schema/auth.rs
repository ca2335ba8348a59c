use actix_web::HttpRequest;
use async_graphql::{Context, ErrorExtensions};
use service_core::operation_error::ErrorCode;
use thiserror::Error;
use uuid::Uuid;

use crate::identity::{decode_access_token, Claims};
use crate::user_profile::Role;

/// The authenticated caller of a request, decoded from its access token.
#[derive(Clone, Debug)]
pub struct CallerSession {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum ExtractSessionError {
    #[error("Invalid token.")]
    InvalidToken,
}

impl CallerSession {
    /// Reads the `Authorization: Bearer` header. A missing header is an
    /// anonymous request, not an error.
    pub fn try_from_req(
        req: &HttpRequest,
        access_token_secret: &str,
    ) -> Result<Option<Self>, ExtractSessionError> {
        let Some(header) = req.headers().get("Authorization") else {
            return Ok(None);
        };
        let header = header.to_str().unwrap_or_default();
        let Some(token) = header.strip_prefix("Bearer ") else {
            return Err(ExtractSessionError::InvalidToken);
        };
        let claims = decode_access_token(access_token_secret, token).map_err(|err| {
            log::warn!("Failed decoding token: {:?}", err);
            ExtractSessionError::InvalidToken
        })?;
        Self::from_claims(&claims)
            .map(Some)
            .ok_or(ExtractSessionError::InvalidToken)
    }

    pub fn from_claims(claims: &Claims) -> Option<Self> {
        let user_id = Uuid::parse_str(claims.sub.as_str()).ok()?;
        Some(CallerSession {
            user_id,
            email: claims.email.clone(),
            name: claims.name.clone(),
            role: claims.role,
        })
    }
}

/// Session of the signed-in caller, or an `UNAUTHENTICATED` error.
pub(crate) fn caller<'ctx>(ctx: &Context<'ctx>) -> async_graphql::Result<&'ctx CallerSession> {
    let session = ctx
        .data::<Option<CallerSession>>()
        .ok()
        .and_then(|session| session.as_ref());
    check_caller(session)
}

pub(crate) fn require_role<'ctx>(
    ctx: &Context<'ctx>,
    role: Role,
) -> async_graphql::Result<&'ctx CallerSession> {
    let session = caller(ctx)?;
    check_role(session, role)?;
    Ok(session)
}

pub(crate) fn check_caller(
    session: Option<&CallerSession>,
) -> async_graphql::Result<&CallerSession> {
    session.ok_or_else(|| coded_error("Not signed in.", ErrorCode::Unauthenticated))
}

pub(crate) fn check_role(session: &CallerSession, role: Role) -> async_graphql::Result<()> {
    if session.role == role {
        Ok(())
    } else {
        Err(coded_error("Permission denied.", ErrorCode::PermissionDenied))
    }
}

/// A caller may read their own profile; administrators may read anyone's.
pub(crate) fn check_self_or_admin(
    session: &CallerSession,
    user_id: &Uuid,
) -> async_graphql::Result<()> {
    if session.role == Role::Admin || &session.user_id == user_id {
        Ok(())
    } else {
        Err(coded_error("Permission denied.", ErrorCode::PermissionDenied))
    }
}

/// Ownership scope for course mutations: teachers are pinned to their own
/// courses, administrators are unscoped, students are denied.
pub(crate) fn teacher_scope(session: &CallerSession) -> async_graphql::Result<Option<&Uuid>> {
    match session.role {
        Role::Admin => Ok(None),
        Role::Teacher => Ok(Some(&session.user_id)),
        Role::Student => Err(coded_error(
            "Permission denied.",
            ErrorCode::PermissionDenied,
        )),
    }
}

/// Ownership scope for progress updates: students are pinned to their own
/// enrollments, administrators are unscoped, teachers are denied.
pub(crate) fn student_scope(session: &CallerSession) -> async_graphql::Result<Option<&Uuid>> {
    match session.role {
        Role::Admin => Ok(None),
        Role::Student => Ok(Some(&session.user_id)),
        Role::Teacher => Err(coded_error(
            "Permission denied.",
            ErrorCode::PermissionDenied,
        )),
    }
}

fn coded_error(message: &str, code: ErrorCode) -> async_graphql::Error {
    async_graphql::Error::new(message).extend_with(|_, ext| ext.set("code", code.as_ref()))
}
