use service_core::endpoint_error::EndpointError;
use uuid::Uuid;

use crate::identity::AuthError;
use crate::user_profile::{ProfileUpdate, ProfilesRepository, UpdateProfileError};

pub(crate) async fn update_profile(
    profiles_repository: &impl ProfilesRepository,
    user_id: &Uuid,
    update: &ProfileUpdate,
) -> Result<(), EndpointError<AuthError>> {
    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(EndpointError::validation("Name cannot be empty."));
        }
    }

    profiles_repository
        .update_profile(user_id, update)
        .await
        .map_err(|err| match err {
            UpdateProfileError::NotFound => EndpointError::operation(AuthError::ProfileMissing),
            UpdateProfileError::Store(e) => {
                log::error!("Updating profile {} failed: {:?}", user_id, e);
                EndpointError::internal()
            }
        })
}
