use std::convert::Infallible;

use service_core::endpoint_error::EndpointError;

use crate::identity::{AuthEvent, AuthEventBus, SessionStore};

pub(crate) async fn sign_out(
    session_store: &impl SessionStore,
    auth_events: &AuthEventBus,
    refresh_token: &str,
) -> Result<(), EndpointError<Infallible>> {
    let owner = session_store.take(refresh_token).map_err(|e| {
        log::error!("Revoking refresh token failed: {:?}", e);
        EndpointError::internal()
    })?;

    // Signing out an already-revoked session is a no-op, not an error.
    if let Some(user_id) = owner {
        auth_events.publish(AuthEvent::signed_out(user_id));
    }

    Ok(())
}
