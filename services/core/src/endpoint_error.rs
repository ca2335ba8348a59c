use std::error::Error;
use std::fmt::Display;

use async_graphql::ErrorExtensions;
use strum::AsRefStr;

use crate::operation_error::{ErrorCode, OperationError};

#[derive(Debug, AsRefStr)]
pub enum EndpointError<E: OperationError> {
    Validation(String),
    Internal,
    Operation(E),
}

impl<E: OperationError> EndpointError<E> {
    pub fn validation(msg: impl Into<String>) -> Self {
        EndpointError::Validation(msg.into())
    }

    pub fn internal() -> Self {
        EndpointError::Internal
    }

    pub fn operation(err: E) -> Self {
        EndpointError::Operation(err)
    }
}

impl<E: OperationError> OperationError for EndpointError<E> {
    fn code(&self) -> ErrorCode {
        match self {
            EndpointError::Validation(_) => ErrorCode::InvalidArgument,
            EndpointError::Internal => ErrorCode::Internal,
            EndpointError::Operation(e) => e.code(),
        }
    }
}

impl<E: OperationError> Error for EndpointError<E> {}

impl<E: OperationError> Display for EndpointError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind: &str = self.as_ref();
        let msg = match self {
            EndpointError::Validation(msg) => msg.clone(),
            EndpointError::Internal => String::from("Internal server error."),
            EndpointError::Operation(err) => err.to_string(),
        };

        write!(f, "{}: {}", kind, msg)
    }
}

impl<E: OperationError> From<EndpointError<E>> for async_graphql::Error {
    fn from(err: EndpointError<E>) -> Self {
        let code = err.code();
        async_graphql::Error::new(err.to_string()).extend_with(|_, ext| ext.set("code", code.as_ref()))
    }
}
