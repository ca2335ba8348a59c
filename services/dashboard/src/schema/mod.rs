pub mod auth;
pub mod mutation;
pub mod query;
pub mod subscription;
pub mod types;

use std::sync::Arc;

use async_graphql::Schema;

use crate::context::AppContext;
use mutation::Mutation;
use query::Query;
use subscription::Subscription;

pub type AppSchema = Schema<Query, Mutation, Subscription>;

pub fn create_schema_with_context(ctx: Arc<AppContext>) -> AppSchema {
    Schema::build(Query, Mutation, Subscription).data(ctx).finish()
}
