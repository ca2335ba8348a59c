use async_graphql::Enum;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use uuid::Uuid;

const DEFAULT_BUS_CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub enum AuthState {
    SignedIn,
    SignedOut,
}

#[derive(Clone, Debug)]
pub struct AuthEvent {
    pub user_id: Uuid,
    pub state: AuthState,
    pub at: DateTime<Utc>,
}

impl AuthEvent {
    pub fn signed_in(user_id: Uuid) -> Self {
        AuthEvent {
            user_id,
            state: AuthState::SignedIn,
            at: Utc::now(),
        }
    }

    pub fn signed_out(user_id: Uuid) -> Self {
        AuthEvent {
            user_id,
            state: AuthState::SignedOut,
            at: Utc::now(),
        }
    }
}

/// Broadcast fan-out of session changes to subscription resolvers.
#[derive(Clone, Debug)]
pub struct AuthEventBus {
    tx: broadcast::Sender<AuthEvent>,
}

impl AuthEventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        AuthEventBus { tx }
    }

    /// Publishes an event. Delivery is best-effort: an event published
    /// while no subscriber is connected is dropped.
    pub fn publish(&self, event: AuthEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }
}

impl Default for AuthEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = AuthEventBus::default();
        let mut rx = bus.subscribe();
        let user_id = Uuid::new_v4();

        bus.publish(AuthEvent::signed_in(user_id));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.user_id, user_id);
        assert_eq!(event.state, AuthState::SignedIn);
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_a_no_op() {
        let bus = AuthEventBus::default();

        bus.publish(AuthEvent::signed_out(Uuid::new_v4()));
    }

    #[tokio::test]
    async fn every_subscriber_sees_every_event() {
        let bus = AuthEventBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        let user_id = Uuid::new_v4();

        bus.publish(AuthEvent::signed_out(user_id));

        assert_eq!(first.recv().await.unwrap().user_id, user_id);
        assert_eq!(second.recv().await.unwrap().user_id, user_id);
    }
}
