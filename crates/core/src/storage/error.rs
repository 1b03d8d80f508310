use thiserror::Error;

use crate::codec::{DecodingError, EncodingError};
use crate::table::EntityType;

/// Errors that can occur when constructing a date range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("Invalid date range: start date must be before or equal to end date")]
    InvalidRange,
}

/// Errors that can occur during repository operations.
///
/// Codec failures surface directly: an encoding failure refuses the write,
/// a decoding failure is scoped to the single item being read. The
/// repository never retries and never returns partially decoded data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Decoding(#[from] DecodingError),
    #[error("reserved prefixes collide for {0:?} and {1:?}")]
    PrefixCollision(EntityType, EntityType),
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
