pub mod analytics;
pub mod catalog;
pub mod context;
pub mod enrollment;
pub mod identity;
pub mod operations;
pub mod schema;
pub mod user_profile;

#[cfg(test)]
pub(crate) mod testing;
