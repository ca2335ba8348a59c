use core::fmt;
use std::env;
use std::sync::Arc;

use aws_config::BehaviorVersion;
use service_core::ddb::Adapter;
use thiserror::Error;

use crate::catalog::ddb_repository::DdbCoursesRepository;
use crate::enrollment::ddb_repository::DdbEnrollmentsRepository;
use crate::identity::ddb_provider::DdbIdentityProvider;
use crate::identity::{AuthEventBus, MemcacheConnPool, MemcacheSessionStore};
use crate::user_profile::ddb_repository::DdbProfilesRepository;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8001";

pub(crate) enum ContextKey {
    DynamoDbEndpoint,
    UsersTableName,
    CoursesTableName,
    EnrollmentsTableName,
    CredentialsTableName,
    SessionStoreUrl,
    AccessTokenSecret,
    BindAddress,
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::DynamoDbEndpoint => write!(f, "DYNAMODB_ENDPOINT"),
            Self::UsersTableName => write!(f, "USERS_TABLE_NAME"),
            Self::CoursesTableName => write!(f, "COURSES_TABLE_NAME"),
            Self::EnrollmentsTableName => write!(f, "ENROLLMENTS_TABLE_NAME"),
            Self::CredentialsTableName => write!(f, "CREDENTIALS_TABLE_NAME"),
            Self::SessionStoreUrl => write!(f, "SESSION_STORE_URL"),
            Self::AccessTokenSecret => write!(f, "ACCESS_TOKEN_SECRET"),
            Self::BindAddress => write!(f, "BIND_ADDRESS"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Missing environment variable {0}.")]
    MissingKey(String),

    #[error("Invalid session store URL: {0}.")]
    SessionStore(String),
}

/// Everything the endpoint handlers need, wired up once at startup and
/// shared behind an `Arc`.
pub struct AppContext {
    pub profiles: DdbProfilesRepository<Adapter>,
    pub courses: DdbCoursesRepository<Adapter>,
    pub enrollments: DdbEnrollmentsRepository<Adapter>,
    pub identity: DdbIdentityProvider<Adapter>,
    pub sessions: MemcacheSessionStore,
    pub auth_events: AuthEventBus,
    pub access_token_secret: String,
    pub bind_address: String,
}

impl AppContext {
    pub async fn from_env() -> Result<Arc<Self>, ContextError> {
        let shared_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        let dynamodb_config = match Self::key(&ContextKey::DynamoDbEndpoint) {
            Some(endpoint) => {
                log::info!("Using DynamoDB with endpoint: {}.", endpoint);
                aws_sdk_dynamodb::config::Builder::from(&shared_config)
                    .endpoint_url(endpoint)
                    .build()
            }
            None => aws_sdk_dynamodb::config::Config::new(&shared_config),
        };
        let ddb: Adapter = aws_sdk_dynamodb::Client::from_conf(dynamodb_config).into();

        let session_store_url = Self::require_key(&ContextKey::SessionStoreUrl)?;
        let manager = memcache::Url::parse(session_store_url.as_str())
            .map(memcache::ConnectionManager::new)
            .map_err(|err| ContextError::SessionStore(err.to_string()))?;
        // Connections are established lazily; a cold cache must not keep the
        // service from starting.
        let pool: MemcacheConnPool = r2d2::Pool::builder().build_unchecked(manager);

        Ok(Arc::new(AppContext {
            profiles: DdbProfilesRepository::new(
                ddb.clone(),
                Self::require_key(&ContextKey::UsersTableName)?,
            ),
            courses: DdbCoursesRepository::new(
                ddb.clone(),
                Self::require_key(&ContextKey::CoursesTableName)?,
            ),
            enrollments: DdbEnrollmentsRepository::new(
                ddb.clone(),
                Self::require_key(&ContextKey::EnrollmentsTableName)?,
            ),
            identity: DdbIdentityProvider::new(
                ddb,
                Self::require_key(&ContextKey::CredentialsTableName)?,
            ),
            sessions: MemcacheSessionStore::new(pool),
            auth_events: AuthEventBus::default(),
            access_token_secret: Self::require_key(&ContextKey::AccessTokenSecret)?,
            bind_address: Self::key(&ContextKey::BindAddress)
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
        }))
    }

    pub(crate) fn key(key: &ContextKey) -> Option<String> {
        env::var(key.to_string()).ok()
    }

    fn require_key(key: &ContextKey) -> Result<String, ContextError> {
        Self::key(key).ok_or_else(|| ContextError::MissingKey(key.to_string()))
    }
}
