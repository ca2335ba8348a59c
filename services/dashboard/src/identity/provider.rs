use async_trait::async_trait;
use uuid::Uuid;

use crate::identity::AuthError;

/// A verified identity as reported by the credential store.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderIdentity {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
}

/// Credential side of the identity gateway.
///
/// Implementations own credential records and nothing else. Profile
/// documents live in their own repository, so a sign-up can create the
/// identity and still fail to write the profile.
#[async_trait]
pub trait IdentityProvider {
    /// Registers a new identity. The password is hashed before it is
    /// persisted anywhere.
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<ProviderIdentity, AuthError>;

    /// Checks the password against the stored credential.
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderIdentity, AuthError>;
}
