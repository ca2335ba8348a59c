use service_core::endpoint_error::EndpointError;
use service_core::operation_error::{ErrorCode, OperationError};
use thiserror::Error;
use uuid::Uuid;

use crate::user_profile::{ProfilesRepository, UserProfile};

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DescribeUserError {
    #[error("User not found.")]
    UserNotFound,
}

pub(crate) async fn describe_user(
    profiles_repository: &impl ProfilesRepository,
    user_id: &Uuid,
) -> Result<UserProfile, EndpointError<DescribeUserError>> {
    profiles_repository
        .get_profile(user_id)
        .await
        .map_err(|err| {
            log::error!("Reading profile {} failed: {:?}", user_id, err);
            EndpointError::internal()
        })?
        .ok_or_else(|| EndpointError::operation(DescribeUserError::UserNotFound))
}

impl OperationError for DescribeUserError {
    fn code(&self) -> ErrorCode {
        match self {
            Self::UserNotFound => ErrorCode::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryProfiles;

    #[tokio::test]
    async fn returns_the_profile() {
        let profile = UserProfile::builder()
            .email("ada@example.com")
            .name("Ada")
            .build();
        let user_id = profile.user_id;
        let profiles = InMemoryProfiles::with([profile.clone()]);

        let found = describe_user(&profiles, &user_id).await.unwrap();

        assert_eq!(found, profile);
    }

    #[tokio::test]
    async fn an_unknown_user_is_not_found() {
        let result = describe_user(&InMemoryProfiles::default(), &Uuid::new_v4()).await;

        assert!(matches!(
            result,
            Err(EndpointError::Operation(DescribeUserError::UserNotFound))
        ));
    }
}
