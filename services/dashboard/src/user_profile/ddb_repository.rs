use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, Select};
use chrono::{DateTime, Utc};
use common_macros::hash_map;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, from_items, to_attribute_value, to_item};
use service_core::ddb::batch_get_item::BatchGetItem;
use service_core::ddb::delete_item::DeleteItem;
use service_core::ddb::get_item::{GetItem, GetItemInput};
use service_core::ddb::put_item::{PutItem, PutItemInput};
use service_core::ddb::query::Query;
use service_core::ddb::scan::{Scan, ScanInput};
use service_core::ddb::store_error::StoreError;
use service_core::ddb::update_expression::SetUpdate;
use service_core::ddb::update_item::{UpdateItem, UpdateItemInput};
use uuid::Uuid;

use crate::user_profile::{
    ProfileListing, ProfilePage, ProfileUpdate, ProfilesRepository, UpdateProfileError, UserProfile,
};

pub trait ThreadSafeDdbClient:
    PutItem + GetItem + UpdateItem + DeleteItem + Query + Scan + BatchGetItem + Send + Sync
{
}

impl<T> ThreadSafeDdbClient for T where
    T: PutItem + GetItem + UpdateItem + DeleteItem + Query + Scan + BatchGetItem + Send + Sync
{
}

const COUNT_PAGE_SIZE: i32 = 1000;

pub struct DdbProfilesRepository<T: ThreadSafeDdbClient> {
    ddb: T,
    users_table_name: String,
}

impl<T: ThreadSafeDdbClient> DdbProfilesRepository<T> {
    pub fn new(ddb: T, users_table_name: impl Into<String>) -> Self {
        DdbProfilesRepository {
            ddb,
            users_table_name: users_table_name.into(),
        }
    }

    fn profile_key(&self, user_id: &Uuid) -> HashMap<String, AttributeValue> {
        hash_map! {
            "userId".to_string() => AttributeValue::S(user_id.to_string()),
        }
    }
}

#[async_trait]
impl<T: ThreadSafeDdbClient> ProfilesRepository for DdbProfilesRepository<T> {
    async fn create_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let item = to_item(profile).map_err(StoreError::from_source)?;
        let put_item_input = PutItemInput::builder()
            .table_name(self.users_table_name.as_str())
            .item(item)
            .condition_expression("attribute_not_exists(userId)")
            .build();

        self.ddb
            .put_item(put_item_input)
            .await
            .map_err(StoreError::from_source)?;
        Ok(())
    }

    async fn get_profile(&self, user_id: &Uuid) -> Result<Option<UserProfile>, StoreError> {
        let get_item_input = GetItemInput::builder()
            .table_name(self.users_table_name.as_str())
            .key(self.profile_key(user_id))
            .build();
        let output = self
            .ddb
            .get_item(get_item_input)
            .await
            .map_err(StoreError::from_source)?;

        match output.item {
            None => Ok(None),
            Some(item) => Ok(Some(from_item(item).map_err(StoreError::from_source)?)),
        }
    }

    async fn update_profile(
        &self,
        user_id: &Uuid,
        update: &ProfileUpdate,
    ) -> Result<(), UpdateProfileError> {
        let mut set = SetUpdate::new();
        if let Some(name) = &update.name {
            set.set("name", AttributeValue::S(name.clone()));
        }
        if let Some(avatar) = &update.avatar {
            set.set("avatar", AttributeValue::S(avatar.clone()));
        }
        if let Some(bio) = &update.bio {
            set.set("bio", AttributeValue::S(bio.clone()));
        }
        set.set(
            "lastActive",
            to_attribute_value(Utc::now()).map_err(StoreError::from_source)?,
        );

        let pk = set.alias("userId");
        let condition_expression = format!("attribute_exists({pk})");
        let (update_expression, names, values) = set.into_parts();
        let update_item_input = UpdateItemInput::builder()
            .table_name(self.users_table_name.as_str())
            .key(self.profile_key(user_id))
            .update_expression(update_expression)
            .condition_expression(condition_expression)
            .expression_attribute_names(names)
            .expression_attribute_values(values)
            .build();

        self.ddb
            .update_item(update_item_input)
            .await
            .map_err(|err| {
                let service_err = err.into_service_error();
                if service_err.is_conditional_check_failed_exception() {
                    UpdateProfileError::NotFound
                } else {
                    UpdateProfileError::Store(StoreError::from_source(service_err))
                }
            })?;
        Ok(())
    }

    async fn list_profiles(&self, page: &ProfilePage) -> Result<ProfileListing, StoreError> {
        let exclusive_start_key = page
            .start_after
            .as_ref()
            .map(|user_id| self.profile_key(user_id));
        let scan_input = ScanInput::builder()
            .table_name(self.users_table_name.as_str())
            .limit(page.page_size)
            .exclusive_start_key(exclusive_start_key)
            .build();
        let output = self
            .ddb
            .scan(scan_input)
            .await
            .map_err(StoreError::from_source)?;

        let next = match output.last_evaluated_key {
            None => None,
            Some(key) => {
                let user_id = key
                    .get("userId")
                    .and_then(|attr| attr.as_s().ok())
                    .ok_or_else(|| StoreError::new("LastEvaluatedKey is missing userId"))?;
                Some(Uuid::parse_str(user_id).map_err(StoreError::from_source)?)
            }
        };

        let profiles = match output.items {
            None => vec![],
            Some(items) => from_items(items).map_err(StoreError::from_source)?,
        };

        Ok(ProfileListing { profiles, next })
    }

    async fn count_profiles(&self) -> Result<i64, StoreError> {
        let mut total: i64 = 0;
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let scan_input = ScanInput::builder()
                .table_name(self.users_table_name.as_str())
                .select(Select::Count)
                .limit(COUNT_PAGE_SIZE)
                .exclusive_start_key(start_key.take())
                .build();
            let output = self
                .ddb
                .scan(scan_input)
                .await
                .map_err(StoreError::from_source)?;
            total += output.count as i64;
            match output.last_evaluated_key {
                Some(key) => start_key = Some(key),
                None => break,
            }
        }
        Ok(total)
    }

    async fn count_active_profiles(&self, since: DateTime<Utc>) -> Result<i64, StoreError> {
        let since = to_attribute_value(since).map_err(StoreError::from_source)?;
        let mut total: i64 = 0;
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let scan_input = ScanInput::builder()
                .table_name(self.users_table_name.as_str())
                .select(Select::Count)
                .limit(COUNT_PAGE_SIZE)
                .filter_expression("lastActive >= :since".to_string())
                .expression_attribute_values(Some(hash_map! {
                    ":since".to_string() => since.clone(),
                }))
                .exclusive_start_key(start_key.take())
                .build();
            let output = self
                .ddb
                .scan(scan_input)
                .await
                .map_err(StoreError::from_source)?;
            total += output.count as i64;
            match output.last_evaluated_key {
                Some(key) => start_key = Some(key),
                None => break,
            }
        }
        Ok(total)
    }
}
