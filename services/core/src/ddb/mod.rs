pub mod adapter;
pub mod batch_get_item;
pub mod delete_item;
pub mod get_item;
pub mod put_item;
pub mod query;
pub mod scan;
pub mod store_error;
pub mod update_expression;
pub mod update_item;

pub use adapter::Adapter;
