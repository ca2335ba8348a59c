use std::convert::Infallible;

use async_graphql::{InputObject, SimpleObject};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use service_core::endpoint_error::EndpointError;
use uuid::Uuid;

use crate::user_profile::{ProfilePage, ProfilesRepository, UserProfile};

const DEFAULT_PAGE_SIZE: i32 = 32;
const PARSE_ERR_MSG: &str = "Could not parse startingToken.";

#[derive(Clone, Debug, Default, InputObject)]
pub struct ListUsersInput {
    pub page_size: Option<i32>,
    /// Opaque cursor from a previous page.
    pub starting_token: Option<String>,
}

#[derive(Debug, SimpleObject)]
pub struct ListUsersOutput {
    pub users: Vec<UserProfile>,
    pub next_token: Option<String>,
}

pub(crate) async fn list_users(
    profiles_repository: &impl ProfilesRepository,
    input: &ListUsersInput,
) -> Result<ListUsersOutput, EndpointError<Infallible>> {
    let page_size = input
        .page_size
        .filter(|size| *size > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE);
    let start_after = match &input.starting_token {
        None => None,
        Some(token) => {
            let token = STANDARD
                .decode(token)
                .map_err(|_| EndpointError::validation(PARSE_ERR_MSG))?;
            let token = String::from_utf8(token)
                .map_err(|_| EndpointError::validation(PARSE_ERR_MSG))?;
            Some(Uuid::parse_str(&token).map_err(|_| EndpointError::validation(PARSE_ERR_MSG))?)
        }
    };

    let listing = profiles_repository
        .list_profiles(&ProfilePage {
            page_size,
            start_after,
        })
        .await
        .map_err(|err| {
            log::error!("Listing profiles failed: {:?}", err);
            EndpointError::internal()
        })?;

    Ok(ListUsersOutput {
        users: listing.profiles,
        next_token: listing.next.map(|id| STANDARD.encode(id.to_string())),
    })
}
