use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use common_macros::hash_map;
use serde::{Deserialize, Serialize};
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, to_item};
use service_core::ddb::get_item::{GetItem, GetItemInput};
use service_core::ddb::put_item::{PutItem, PutItemInput};
use service_core::ddb::store_error::StoreError;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::identity::password::{hash_password, verify_password};
use crate::identity::provider::{IdentityProvider, ProviderIdentity};
use crate::identity::AuthError;

/// Credential record stored in the credentials table, keyed by email.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialRecord {
    email: String,
    user_id: Uuid,
    password_hash: String,
    display_name: String,
    created_at: DateTime<Utc>,
}

pub struct DdbIdentityProvider<T: PutItem + GetItem + Send + Sync> {
    ddb: T,
    credentials_table_name: String,
}

impl<T: PutItem + GetItem + Send + Sync> DdbIdentityProvider<T> {
    pub fn new(ddb: T, credentials_table_name: impl Into<String>) -> Self {
        DdbIdentityProvider {
            ddb,
            credentials_table_name: credentials_table_name.into(),
        }
    }
}

#[async_trait]
impl<T: PutItem + GetItem + Send + Sync> IdentityProvider for DdbIdentityProvider<T> {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<ProviderIdentity, AuthError> {
        let password_hash = hash_password(password).map_err(|e| {
            log::error!("Hashing password failed: {:?}", e);
            AuthError::Store(StoreError::new("password hashing failed"))
        })?;

        let record = CredentialRecord {
            email: email.to_string(),
            user_id: Uuid::new_v4(),
            password_hash,
            display_name: display_name.to_string(),
            created_at: Utc::now(),
        };

        let item = to_item(&record).map_err(StoreError::from_source)?;
        let put_item_input = PutItemInput::builder()
            .table_name(self.credentials_table_name.as_str())
            .item(item)
            .condition_expression("attribute_not_exists(email)")
            .build();

        self.ddb.put_item(put_item_input).await.map_err(|err| {
            let service_err = err.into_service_error();
            if service_err.is_conditional_check_failed_exception() {
                AuthError::DuplicateIdentity
            } else {
                AuthError::Store(StoreError::from_source(service_err))
            }
        })?;

        Ok(ProviderIdentity {
            user_id: record.user_id,
            email: record.email,
            display_name: record.display_name,
        })
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderIdentity, AuthError> {
        let get_item_input = GetItemInput::builder()
            .table_name(self.credentials_table_name.as_str())
            .key(hash_map! {
                "email".to_string() => AttributeValue::S(email.to_string()),
            })
            .consistent_read(true)
            .build();
        let item = self
            .ddb
            .get_item(get_item_input)
            .await
            .map_err(StoreError::from_source)?
            .item
            .ok_or(AuthError::IdentityNotFound)?;

        let mut record: CredentialRecord = from_item(item).map_err(StoreError::from_source)?;

        let verify_result = verify_password(password, &record.password_hash);
        record.password_hash.zeroize();
        verify_result.map_err(|e| match e {
            argon2::password_hash::Error::Password => AuthError::InvalidCredentials,
            e => {
                log::error!("Password verification failed: {:?}", e);
                AuthError::Store(StoreError::new("password verification failed"))
            }
        })?;

        Ok(ProviderIdentity {
            user_id: record.user_id,
            email: record.email,
            display_name: record.display_name,
        })
    }
}
