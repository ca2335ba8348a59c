pub mod ddb_provider;
pub mod error;
pub mod events;
pub mod password;
pub mod provider;
pub mod session;
pub mod token;

pub use error::AuthError;
pub use events::{AuthEvent, AuthEventBus, AuthState};
pub use password::{hash_password, verify_password};
pub use provider::{IdentityProvider, ProviderIdentity};
pub use session::{MemcacheConnPool, MemcacheSessionStore, SessionStore, REFRESH_TOKEN_TTL_HOURS};
pub use token::{decode_access_token, issue_access_token, Claims};
