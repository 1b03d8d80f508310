//! The entity prefix registry and the codec trait.

use crate::codec::{destruct_composite_key, DecodingError, EncodingError, KEY_DELIMITER};

use super::attrs::PhysicalItem;

/// Logical entity types sharing the physical table.
///
/// Each entity owns a pair of reserved key prefixes. PK prefixes are unique
/// per entity type so that no two entities can ever produce the same `PK`
/// value; [`find_prefix_collision`] verifies this once at repository
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Ranking,
    Contest,
    ContestResult,
}

impl EntityType {
    pub const ALL: [EntityType; 3] = [Self::Ranking, Self::Contest, Self::ContestResult];

    /// Reserved partition key prefix.
    pub fn pk_prefix(self) -> &'static str {
        match self {
            Self::Ranking => "Athlete",
            Self::Contest => "Contest",
            Self::ContestResult => "Results",
        }
    }

    /// Reserved sort key prefix.
    pub fn sk_prefix(self) -> &'static str {
        match self {
            Self::Ranking => "Rankings",
            Self::Contest => "Discipline",
            Self::ContestResult => "Contests",
        }
    }

    /// Identifies the entity a physical partition key belongs to.
    pub fn from_pk(pk: &str) -> Result<Self, DecodingError> {
        let prefix = pk.split(KEY_DELIMITER).next().unwrap_or(pk);
        Self::ALL
            .into_iter()
            .find(|entity| entity.pk_prefix() == prefix)
            .ok_or_else(|| DecodingError::UnknownEntityPrefix { key: pk.to_string() })
    }
}

/// Returns the first pair of entities whose reserved PK prefixes collide.
pub fn find_prefix_collision() -> Option<(EntityType, EntityType)> {
    for (position, first) in EntityType::ALL.iter().enumerate() {
        for second in &EntityType::ALL[position + 1..] {
            if first.pk_prefix() == second.pk_prefix() {
                return Some((*first, *second));
            }
        }
    }
    None
}

/// Bidirectional mapping between one logical entity and the physical
/// attribute layout.
///
/// Implementations are stateless pure mappings; the reserved prefixes are
/// their only configuration. Both directions must round-trip exactly:
/// `to_record(to_attrs(r))` reproduces `r`, and `to_attrs(to_record(item))`
/// reproduces `item`.
pub trait EntityCodec {
    /// The logical record shape this codec maps.
    type Record;

    /// The entity owning this codec's reserved prefixes.
    fn entity(&self) -> EntityType;

    /// Encodes a record into the physical attribute layout.
    ///
    /// Fails only when a field value cannot be safely embedded in a key
    /// segment (reserved delimiter, empty required field, out-of-range
    /// points).
    fn to_attrs(&self, record: &Self::Record) -> Result<PhysicalItem, EncodingError>;

    /// Decodes a physical item back into a record, recovering every field
    /// folded into a composite key.
    fn to_record(&self, item: &PhysicalItem) -> Result<Self::Record, DecodingError>;
}

/// Rejects keys that do not carry the entity's reserved prefix.
pub(crate) fn expect_prefix(key: &str, prefix: &str) -> Result<(), DecodingError> {
    match key.split(KEY_DELIMITER).next() {
        Some(found) if found == prefix => Ok(()),
        _ => Err(DecodingError::UnknownEntityPrefix {
            key: key.to_string(),
        }),
    }
}

/// Rejects empty values for required key-bearing fields.
pub(crate) fn require_key_field(field: &'static str, value: &str) -> Result<(), EncodingError> {
    if value.is_empty() {
        return Err(EncodingError::EmptyKeyField { field });
    }
    Ok(())
}

/// Destructures the `index`-th segment of `key` and maps it through an
/// enum's discriminant table.
pub(crate) fn enum_segment<T>(
    key: &str,
    index: usize,
    expected: &'static str,
    from_u8: fn(u8) -> Option<T>,
) -> Result<T, DecodingError> {
    let raw = destruct_composite_key(key, index)?;
    raw.parse::<u8>()
        .ok()
        .and_then(from_u8)
        .ok_or_else(|| DecodingError::MalformedSegment {
            value: raw.to_string(),
            expected,
        })
}
