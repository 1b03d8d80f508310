use thiserror::Error;

/// Errors raised when a field value cannot be embedded in the physical
/// key layout.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodingError {
    #[error("value {value:?} contains the reserved key delimiter")]
    ReservedDelimiter { value: String },
    #[error("required key field {field} is empty")]
    EmptyKeyField { field: &'static str },
    #[error("points value {points} is outside the encodable range")]
    PointsOutOfRange { points: f64 },
}

/// Errors raised when a physical item cannot be decoded back into a
/// logical record.
///
/// Decoding never returns partial data: a failure is scoped to the single
/// item being processed and surfaces one of these variants instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodingError {
    #[error("composite key {key:?} has no segment at position {index}")]
    MissingSegment { key: String, index: usize },
    #[error("key segment {value:?} is not a valid {expected}")]
    MalformedSegment { value: String, expected: &'static str },
    #[error("{value:?} is not a sortable points encoding")]
    MalformedPoints { value: String },
    #[error("key {key:?} does not start with a registered entity prefix")]
    UnknownEntityPrefix { key: String },
    #[error("item is missing attribute {attribute:?}")]
    MissingAttribute { attribute: &'static str },
    #[error("attribute {attribute:?} is malformed: {reason}")]
    MalformedAttribute { attribute: String, reason: String },
}
