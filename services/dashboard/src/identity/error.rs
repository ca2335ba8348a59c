use service_core::ddb::store_error::StoreError;
use service_core::operation_error::{ErrorCode, OperationError};
use thiserror::Error;

/// Failures shared by the identity gateway operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("An identity with this email already exists.")]
    DuplicateIdentity,

    #[error("Provided credentials are invalid.")]
    InvalidCredentials,

    #[error("Identity not found.")]
    IdentityNotFound,

    #[error("The identity exists but has no profile document.")]
    ProfileMissing,

    #[error("The session is expired or has been revoked.")]
    SessionExpired,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OperationError for AuthError {
    fn code(&self) -> ErrorCode {
        match self {
            AuthError::DuplicateIdentity => ErrorCode::AlreadyExists,
            AuthError::InvalidCredentials => ErrorCode::InvalidArgument,
            AuthError::IdentityNotFound => ErrorCode::NotFound,
            AuthError::ProfileMissing => ErrorCode::FailedPrecondition,
            AuthError::SessionExpired => ErrorCode::Unauthenticated,
            AuthError::Store(_) => ErrorCode::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AuthError::DuplicateIdentity, ErrorCode::AlreadyExists)]
    #[case(AuthError::InvalidCredentials, ErrorCode::InvalidArgument)]
    #[case(AuthError::IdentityNotFound, ErrorCode::NotFound)]
    #[case(AuthError::ProfileMissing, ErrorCode::FailedPrecondition)]
    #[case(AuthError::SessionExpired, ErrorCode::Unauthenticated)]
    #[case(AuthError::Store(StoreError::new("boom")), ErrorCode::Internal)]
    fn maps_to_the_expected_error_code(#[case] error: AuthError, #[case] code: ErrorCode) {
        assert_eq!(error.code(), code);
    }
}
