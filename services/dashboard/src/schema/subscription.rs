use std::sync::Arc;

use async_graphql::{Context, Subscription};
use futures_util::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::context::AppContext;
use crate::identity::{decode_access_token, AuthEventBus};
use crate::schema::auth::CallerSession;
use crate::schema::types::SessionEvent;

pub struct Subscription;

#[Subscription]
impl Subscription {
    /// Emits the caller's session state once at connect time, then an event
    /// for every later sign-in or sign-out of the same user.
    ///
    /// The access token arrives as an argument because websocket transports
    /// carry no request headers. Without a valid token the stream watches
    /// nobody and only the signed-out snapshot is delivered.
    async fn auth_state(
        &self,
        ctx: &Context<'_>,
        token: Option<String>,
    ) -> impl Stream<Item = SessionEvent> {
        let app = ctx.data_unchecked::<Arc<AppContext>>();
        let watched = token
            .as_deref()
            .and_then(|token| decode_access_token(app.access_token_secret.as_str(), token).ok())
            .and_then(|claims| CallerSession::from_claims(&claims))
            .map(|session| session.user_id);

        session_events(&app.auth_events, watched)
    }
}

/// Snapshot of the watched user's state followed by their live events.
///
/// Dropping the stream drops the broadcast receiver, which detaches the
/// subscriber from the bus.
fn session_events(bus: &AuthEventBus, watched: Option<Uuid>) -> impl Stream<Item = SessionEvent> {
    let snapshot = SessionEvent::snapshot(watched);
    let live = stream::unfold(bus.subscribe(), |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => return Some((event, rx)),
                // A lagged receiver resumes at the oldest retained event.
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    })
    .filter_map(move |event| async move {
        if Some(event.user_id) == watched {
            Some(SessionEvent::from(event))
        } else {
            None
        }
    });

    stream::once(async move { snapshot }).chain(live)
}
