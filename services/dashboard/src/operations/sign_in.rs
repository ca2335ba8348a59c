use async_graphql::{InputObject, SimpleObject};
use chrono::Duration;
use service_core::endpoint_error::EndpointError;
use uuid::Uuid;
use validator::validate_email;
use zeroize::Zeroize;

use crate::identity::{
    issue_access_token, AuthError, AuthEvent, AuthEventBus, IdentityProvider, SessionStore,
    REFRESH_TOKEN_TTL_HOURS,
};
use crate::user_profile::{ProfilesRepository, UserProfile};

#[derive(Clone, Debug, InputObject)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, SimpleObject)]
pub struct SignInOutput {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

pub(crate) async fn sign_in(
    identity_provider: &impl IdentityProvider,
    profiles_repository: &(impl ProfilesRepository + Sync),
    session_store: &impl SessionStore,
    auth_events: &AuthEventBus,
    access_token_secret: &str,
    mut input: SignInInput,
) -> Result<SignInOutput, EndpointError<AuthError>> {
    if !validate_email(&input.email) {
        return Err(EndpointError::validation("Email address is invalid."));
    }

    let verify_result = identity_provider
        .verify_credentials(&input.email, &input.password)
        .await;
    input.password.zeroize();
    let identity = verify_result.map_err(|err| match err {
        AuthError::IdentityNotFound => EndpointError::operation(AuthError::IdentityNotFound),
        AuthError::InvalidCredentials => EndpointError::operation(AuthError::InvalidCredentials),
        err => {
            log::error!("Verifying credentials failed: {:?}", err);
            EndpointError::internal()
        }
    })?;

    // An identity without a profile document is a half-created account.
    let profile = profiles_repository
        .get_profile(&identity.user_id)
        .await
        .map_err(|err| {
            log::error!("Loading profile {} failed: {:?}", identity.user_id, err);
            EndpointError::internal()
        })?
        .ok_or_else(|| EndpointError::operation(AuthError::ProfileMissing))?;

    profiles_repository
        .touch_last_active(&profile.user_id)
        .await
        .map_err(|err| {
            log::error!(
                "Stamping lastActive for {} failed: {:?}",
                profile.user_id,
                err
            );
            EndpointError::internal()
        })?;

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

    auth_events.publish(AuthEvent::signed_in(profile.user_id));

    Ok(SignInOutput {
        access_token,
        refresh_token: refresh_token.to_string(),
        user: profile,
    })
}
