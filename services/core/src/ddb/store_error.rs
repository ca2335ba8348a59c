use std::error::Error;

use thiserror::Error;

/// Opaque failure raised by the document store or one of its codecs.
///
/// Repositories normalize SDK errors, serialization errors and malformed
/// records into this type so operations never match on transport details.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StoreError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        StoreError {
            message: message.into(),
            source: None,
        }
    }

    pub fn from_source(source: impl Error + Send + Sync + 'static) -> Self {
        StoreError {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    pub fn with_message(message: impl Into<String>, source: impl Error + Send + Sync + 'static) -> Self {
        StoreError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
