use memcache::Client;
use service_core::ddb::store_error::StoreError;
use uuid::Uuid;

pub type MemcacheConnPool = r2d2::Pool<memcache::ConnectionManager>;

pub const REFRESH_TOKEN_TTL_HOURS: i64 = 10;

/// Refresh token storage. Tokens are single-use: `take` removes the token
/// and returns its owner in one step, so a token can never be redeemed
/// twice.
pub trait SessionStore: Send + Sync {
    fn put(&self, token: &Uuid, owner: &Uuid, ttl_seconds: u32) -> Result<(), StoreError>;

    fn take(&self, token: &str) -> Result<Option<Uuid>, StoreError>;
}

pub struct MemcacheSessionStore {
    pool: MemcacheConnPool,
}

impl MemcacheSessionStore {
    pub fn new(pool: MemcacheConnPool) -> Self {
        MemcacheSessionStore { pool }
    }

    fn client(&self) -> Result<Client, StoreError> {
        Client::with_pool(self.pool.clone()).map_err(StoreError::from_source)
    }
}

impl SessionStore for MemcacheSessionStore {
    fn put(&self, token: &Uuid, owner: &Uuid, ttl_seconds: u32) -> Result<(), StoreError> {
        self.client()?
            .set(
                token.to_string().as_str(),
                owner.as_bytes().as_slice(),
                ttl_seconds,
            )
            .map_err(StoreError::from_source)
    }

    fn take(&self, token: &str) -> Result<Option<Uuid>, StoreError> {
        let client = self.client()?;
        let owner: Option<Vec<u8>> = client.get(token).map_err(StoreError::from_source)?;
        let Some(owner) = owner else {
            return Ok(None);
        };
        client.delete(token).map_err(StoreError::from_source)?;

        let owner = Uuid::from_slice(owner.as_slice()).map_err(StoreError::from_source)?;
        Ok(Some(owner))
    }
}
