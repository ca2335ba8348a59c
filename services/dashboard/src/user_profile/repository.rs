use async_graphql::InputObject;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use service_core::ddb::store_error::StoreError;
use thiserror::Error;
use uuid::Uuid;

use crate::user_profile::UserProfile;

#[derive(Debug, Error)]
pub enum UpdateProfileError {
    #[error("Profile not found.")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fields a caller may change on their own profile. `None` leaves the
/// stored attribute untouched.
#[derive(Clone, Debug, Default, InputObject)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ProfilePage {
    pub page_size: i32,
    pub start_after: Option<Uuid>,
}

#[derive(Clone, Debug)]
pub struct ProfileListing {
    pub profiles: Vec<UserProfile>,
    pub next: Option<Uuid>,
}

#[async_trait]
pub trait ProfilesRepository {
    async fn create_profile(&self, profile: &UserProfile) -> Result<(), StoreError>;

    async fn get_profile(&self, user_id: &Uuid) -> Result<Option<UserProfile>, StoreError>;

    /// Merges the provided fields into the stored profile and stamps
    /// `lastActive`.
    async fn update_profile(
        &self,
        user_id: &Uuid,
        update: &ProfileUpdate,
    ) -> Result<(), UpdateProfileError>;

    /// Stamps `lastActive` without touching anything else.
    async fn touch_last_active(&self, user_id: &Uuid) -> Result<(), UpdateProfileError> {
        self.update_profile(user_id, &ProfileUpdate::default()).await
    }

    async fn list_profiles(&self, page: &ProfilePage) -> Result<ProfileListing, StoreError>;

    async fn count_profiles(&self) -> Result<i64, StoreError>;

    /// Counts profiles whose `lastActive` falls at or after `since`.
    async fn count_active_profiles(&self, since: DateTime<Utc>) -> Result<i64, StoreError>;
}
