use std::convert::Infallible;
use std::error::Error;

use strum::AsRefStr;

/// Classification attached to every operation failure.
///
/// The variants mirror the gRPC status space, which keeps transports able to
/// translate a failure without bespoke per-operation mappings.
#[derive(AsRefStr, Clone, Copy, Debug, Eq, PartialEq)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    PermissionDenied,
    Unauthenticated,
    FailedPrecondition,
    Unavailable,
    Internal,
}

/// Trait to be implemented by errors returned by the different operations of services.
pub trait OperationError: Error {
    /// Code corresponding to this error.
    fn code(&self) -> ErrorCode;
}

impl OperationError for Infallible {
    fn code(&self) -> ErrorCode {
        match *self {}
    }
}
