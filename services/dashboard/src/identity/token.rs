use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

use crate::user_profile::{Role, UserProfile};

/// Claims carried by a dashboard access token.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub exp: i64,
}

pub(crate) const ACCESS_TOKEN_LIFETIME_HOURS: i64 = 10;

/// Signs an HS256 access token for the given profile. The secret is the
/// base64 encoding of the signing key.
pub fn issue_access_token(
    secret: &str,
    profile: &UserProfile,
) -> jsonwebtoken::errors::Result<String> {
    let expires_at = Utc::now() + Duration::hours(ACCESS_TOKEN_LIFETIME_HOURS);
    let claims = Claims {
        sub: profile.user_id.to_string(),
        email: profile.email.clone(),
        name: profile.name.clone(),
        role: profile.role,
        exp: expires_at.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_base64_secret(secret)?,
    )
}

/// Validates signature and expiry, returning the embedded claims.
pub fn decode_access_token(secret: &str, token: &str) -> jsonwebtoken::errors::Result<Claims> {
    let token_data: TokenData<Claims> = decode(
        token,
        &DecodingKey::from_base64_secret(secret)?,
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}
