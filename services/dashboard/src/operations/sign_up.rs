use async_graphql::InputObject;
use service_core::endpoint_error::EndpointError;
use validator::validate_email;
use zeroize::Zeroize;

use crate::identity::{AuthError, IdentityProvider};
use crate::user_profile::{ProfilesRepository, Role, UserProfile};

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Clone, Debug, InputObject)]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

pub(crate) async fn sign_up(
    identity_provider: &impl IdentityProvider,
    profiles_repository: &impl ProfilesRepository,
    mut input: SignUpInput,
) -> Result<UserProfile, EndpointError<AuthError>> {
    if !validate_email(&input.email) {
        return Err(EndpointError::validation("Email address is invalid."));
    }
    if input.password.len() < MIN_PASSWORD_LENGTH {
        return Err(EndpointError::validation(
            "Password must be at least 8 characters long.",
        ));
    }
    if input.name.trim().is_empty() {
        return Err(EndpointError::validation("Name is required."));
    }
    if input.role == Role::Admin {
        return Err(EndpointError::validation(
            "Administrator accounts cannot be self-registered.",
        ));
    }

    let create_result = identity_provider
        .create_identity(&input.email, &input.password, &input.name)
        .await;
    input.password.zeroize();
    let identity = create_result.map_err(|err| match err {
        AuthError::DuplicateIdentity => EndpointError::operation(AuthError::DuplicateIdentity),
        err => {
            log::error!("Creating identity failed: {:?}", err);
            EndpointError::internal()
        }
    })?;

    let profile = UserProfile::builder()
        .user_id(identity.user_id)
        .email(identity.email)
        .name(identity.display_name)
        .role(input.role)
        .build();

    // The identity already exists at this point. If the profile write fails
    // the account is left half-created and sign-in reports ProfileMissing;
    // there is no rollback of the identity.
    profiles_repository
        .create_profile(&profile)
        .await
        .map_err(|err| {
            log::error!("Writing profile for {} failed: {:?}", profile.user_id, err);
            EndpointError::internal()
        })?;

    Ok(profile)
}
