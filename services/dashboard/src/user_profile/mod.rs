pub mod ddb_repository;
pub mod repository;
pub mod types;

pub use repository::{
    ProfileListing, ProfilePage, ProfileUpdate, ProfilesRepository, UpdateProfileError,
};
pub use types::{Badge, Role, UserProfile};
