//! The single-table attribute layout and the per-entity codecs over it.
//!
//! Every item in the physical table carries the same four key columns
//! ([`ATTR_PK`], [`ATTR_SK_GSI`], [`ATTR_LSI`], [`ATTR_GSI_SK`]) plus
//! passthrough attributes. [`EntityCodec`] is the bidirectional mapping
//! between one logical entity and that layout; the concrete codecs in this
//! module are declarative wirings of prefixes and segment positions, with
//! all cross-cutting behavior (delimiter handling, sortable encoding,
//! round-trip guarantees) in [`crate::codec`] and the shared base here.

mod attrs;
mod contest;
mod entity;
mod paging;
mod ranking;
mod result;

pub use attrs::{
    KeyAttrs, PhysicalItem, PrimaryKey, ATTR_GSI_SK, ATTR_LSI, ATTR_PK, ATTR_SK_GSI,
};
pub use contest::ContestCodec;
pub use entity::{find_prefix_collision, EntityCodec, EntityType};
pub use paging::{
    athlete_points_query, AthleteResultsScope, ContestCursor, ContestScope, ExclusiveStartKey,
    LeaderboardCursor, QueryKey, RankingScope, ResultCursor, SortCondition, TargetIndex,
};
pub use ranking::RankingCodec;
pub use result::ResultCodec;
