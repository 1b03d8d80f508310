//! Key codec primitives.
//!
//! Composite keys join an entity prefix and an ordered list of segments with
//! a reserved delimiter; ranking points are encoded as fixed-width strings
//! whose lexicographic order matches numeric order. Everything here is pure
//! and entity-agnostic.

mod composite;
mod error;
mod points;

pub use composite::{
    build_composite_key, destruct_composite_key, parse_segment, Segment, KEY_DELIMITER,
};
pub use error::{DecodingError, EncodingError};
pub use points::{decode_points, encode_points};
