//! Core of the podium rankings store: the single-table attribute encoding
//! layer and the repository contracts built on top of it.
//!
//! One physical wide-column table hosts every logical entity type. Entities
//! are disambiguated by reserved key prefixes, and their fields are folded
//! into four fixed key columns (`PK`, `SK_GSI`, `LSI`, `GSI_SK`) plus
//! passthrough attributes. This crate owns that mapping in both directions:
//!
//! - [`codec`]: composite-key join/split and the order-preserving points
//!   encoding. Pure functions, no entity knowledge.
//! - [`domain`]: domain records and the enumerations embedded in keys.
//! - [`table`]: the physical layout types, the [`table::EntityCodec`]
//!   trait, one codec per entity, and range-query/cursor construction.
//! - [`storage`]: repository traits and errors for the I/O layer that
//!   wraps the codecs.

pub mod codec;
pub mod domain;
pub mod storage;
pub mod table;
