use async_graphql::{InputObject, SimpleObject};
use chrono::Duration;
use service_core::endpoint_error::EndpointError;
use uuid::Uuid;

use crate::identity::{
    issue_access_token, AuthError, SessionStore, REFRESH_TOKEN_TTL_HOURS,
};
use crate::user_profile::ProfilesRepository;

#[derive(Clone, Debug, InputObject)]
pub struct RefreshSessionInput {
    pub user_id: Uuid,
    pub refresh_token: String,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct RefreshSessionOutput {
    pub access_token: String,
    pub refresh_token: String,
}

pub(crate) async fn refresh_session(
    profiles_repository: &impl ProfilesRepository,
    session_store: &impl SessionStore,
    access_token_secret: &str,
    input: RefreshSessionInput,
) -> Result<RefreshSessionOutput, EndpointError<AuthError>> {
    let owner = session_store
        .take(input.refresh_token.as_str())
        .map_err(|e| {
            log::error!("Taking refresh token failed: {:?}", e);
            EndpointError::internal()
        })?;
    let Some(owner) = owner else {
        return Err(EndpointError::operation(AuthError::SessionExpired));
    };
    if owner != input.user_id {
        // Wrong-owner redemptions read the same as revoked tokens.
        return Err(EndpointError::operation(AuthError::SessionExpired));
    }

    let profile = profiles_repository
        .get_profile(&owner)
        .await
        .map_err(|err| {
            log::error!("Loading profile {} failed: {:?}", owner, err);
            EndpointError::internal()
        })?
        .ok_or_else(|| EndpointError::operation(AuthError::ProfileMissing))?;

    let access_token = issue_access_token(access_token_secret, &profile).map_err(|e| {
        log::error!("Failed encoding the JWT access token: {:?}", e);
        EndpointError::internal()
    })?;
    let refresh_token = Uuid::new_v4();
    let ttl = Duration::hours(REFRESH_TOKEN_TTL_HOURS).num_seconds() as u32;
    session_store
        .put(&refresh_token, &profile.user_id, ttl)
        .map_err(|e| {
            log::error!("Storing refresh token failed: {:?}", e);
            EndpointError::internal()
        })?;

    Ok(RefreshSessionOutput {
        access_token,
        refresh_token: refresh_token.to_string(),
    })
}
