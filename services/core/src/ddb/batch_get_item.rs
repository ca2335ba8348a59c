use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::batch_get_item::{BatchGetItemError, BatchGetItemOutput};
use aws_sdk_dynamodb::types::KeysAndAttributes;
use typed_builder::TypedBuilder;

use super::adapter::Adapter;

/// One round trip of `BatchGetItem`, keyed by table name.
///
/// Callers are responsible for staying within the service limit of 100 keys
/// per request and for draining `unprocessed_keys` from the output.
#[derive(Clone, Debug, TypedBuilder)]
pub struct BatchGetItemInput {
    pub request_items: HashMap<String, KeysAndAttributes>,
}

#[async_trait]
pub trait BatchGetItem {
    async fn batch_get_item(
        &self,
        input: BatchGetItemInput,
    ) -> Result<BatchGetItemOutput, SdkError<BatchGetItemError>>;
}

#[async_trait]
impl BatchGetItem for Adapter {
    async fn batch_get_item(
        &self,
        input: BatchGetItemInput,
    ) -> Result<BatchGetItemOutput, SdkError<BatchGetItemError>> {
        self.raw
            .batch_get_item()
            .set_request_items(Some(input.request_items))
            .send()
            .await
    }
}
