//! Composite key construction and destructuring.
//!
//! A composite key is an entity prefix followed by an ordered sequence of
//! segments, joined with [`KEY_DELIMITER`]. Segment positions are fixed for
//! the lifetime of the schema: an absent optional field still occupies its
//! position as an empty segment, so the segment count never varies.

use std::str::FromStr;

use super::error::{DecodingError, EncodingError};

/// Reserved delimiter joining composite key segments.
///
/// Guaranteed absent from athlete ids, contest ids, enum discriminants,
/// years and ISO dates; [`build_composite_key`] rejects any value that
/// contains it rather than escaping, since escaping would break
/// lexicographic prefix queries.
pub const KEY_DELIMITER: char = '#';

/// One position inside a composite key.
///
/// Absent optional fields encode as an empty segment, not an omitted one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Value(String),
    Absent,
}

impl Segment {
    /// Creates a segment from any displayable value.
    pub fn new(value: impl ToString) -> Self {
        Self::Value(value.to_string())
    }

    /// Creates a segment from an optional value, mapping `None` to
    /// [`Segment::Absent`].
    pub fn opt(value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => Self::new(value),
            None => Self::Absent,
        }
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Value(value) => value,
            Self::Absent => "",
        }
    }
}

/// Joins a prefix and ordered segments into a composite key.
///
/// Fails with [`EncodingError::ReservedDelimiter`] if the prefix or any
/// segment value contains [`KEY_DELIMITER`].
pub fn build_composite_key(prefix: &str, segments: &[Segment]) -> Result<String, EncodingError> {
    check_delimiter_free(prefix)?;
    let mut key = String::from(prefix);
    for segment in segments {
        check_delimiter_free(segment.as_str())?;
        key.push(KEY_DELIMITER);
        key.push_str(segment.as_str());
    }
    Ok(key)
}

/// Returns the `index`-th segment of a composite key.
///
/// `index` is 1-based and counts from the first segment after the prefix,
/// so `destruct_composite_key("Athlete#A123", 1)` yields `"A123"`. Fails
/// with [`DecodingError::MissingSegment`] when the key has fewer segments.
pub fn destruct_composite_key(key: &str, index: usize) -> Result<&str, DecodingError> {
    key.split(KEY_DELIMITER)
        .nth(index)
        .ok_or_else(|| DecodingError::MissingSegment {
            key: key.to_string(),
            index,
        })
}

/// Destructures the `index`-th segment and parses it into `T`.
pub fn parse_segment<T: FromStr>(
    key: &str,
    index: usize,
    expected: &'static str,
) -> Result<T, DecodingError> {
    let raw = destruct_composite_key(key, index)?;
    raw.parse().map_err(|_| DecodingError::MalformedSegment {
        value: raw.to_string(),
        expected,
    })
}

fn check_delimiter_free(value: &str) -> Result<(), EncodingError> {
    if value.contains(KEY_DELIMITER) {
        return Err(EncodingError::ReservedDelimiter {
            value: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_composite_key() {
        let key = build_composite_key("Athlete", &[Segment::new("A123")]).unwrap();
        assert_eq!(key, "Athlete#A123");
    }

    #[test]
    fn test_build_composite_key_multiple_segments() {
        let key = build_composite_key(
            "Rankings",
            &[
                Segment::new(1),
                Segment::new(2024),
                Segment::new(3),
                Segment::new(0),
                Segment::new(0),
            ],
        )
        .unwrap();
        assert_eq!(key, "Rankings#1#2024#3#0#0");
    }

    #[test]
    fn test_absent_segment_keeps_its_position() {
        let key = build_composite_key(
            "Rankings",
            &[Segment::new(1), Segment::Absent, Segment::new(3)],
        )
        .unwrap();
        assert_eq!(key, "Rankings#1##3");
        assert_eq!(key.split(KEY_DELIMITER).count(), 4);
    }

    #[test]
    fn test_opt_segment() {
        assert_eq!(Segment::opt(Some(42)), Segment::new(42));
        assert_eq!(Segment::opt(None::<u16>), Segment::Absent);
    }

    #[test]
    fn test_build_rejects_delimiter_in_segment() {
        let result = build_composite_key("Athlete", &[Segment::new("A#123")]);
        assert_eq!(
            result,
            Err(EncodingError::ReservedDelimiter {
                value: "A#123".to_string()
            })
        );
    }

    #[test]
    fn test_build_rejects_delimiter_in_prefix() {
        let result = build_composite_key("Ath#lete", &[Segment::new("A123")]);
        assert!(matches!(
            result,
            Err(EncodingError::ReservedDelimiter { .. })
        ));
    }

    #[test]
    fn test_destruct_composite_key() {
        assert_eq!(destruct_composite_key("Athlete#A123", 1).unwrap(), "A123");
        assert_eq!(
            destruct_composite_key("Rankings#1#2024#3#0#0", 2).unwrap(),
            "2024"
        );
        assert_eq!(
            destruct_composite_key("Rankings#1#2024#3#0#0", 5).unwrap(),
            "0"
        );
    }

    #[test]
    fn test_destruct_empty_segment() {
        assert_eq!(destruct_composite_key("Rankings#1##3", 2).unwrap(), "");
    }

    #[test]
    fn test_destruct_out_of_range() {
        let result = destruct_composite_key("Athlete#A123", 2);
        assert_eq!(
            result,
            Err(DecodingError::MissingSegment {
                key: "Athlete#A123".to_string(),
                index: 2
            })
        );
    }

    #[test]
    fn test_parse_segment() {
        let year: u16 = parse_segment("Rankings#1#2024", 2, "year").unwrap();
        assert_eq!(year, 2024);
    }

    #[test]
    fn test_parse_segment_malformed() {
        let result: Result<u16, _> = parse_segment("Rankings#1#20x4", 2, "year");
        assert_eq!(
            result,
            Err(DecodingError::MalformedSegment {
                value: "20x4".to_string(),
                expected: "year"
            })
        );
    }

    #[test]
    fn test_round_trip_every_segment() {
        let segments = [Segment::new("A1"), Segment::Absent, Segment::new(7)];
        let key = build_composite_key("Results", &segments).unwrap();
        assert_eq!(destruct_composite_key(&key, 1).unwrap(), "A1");
        assert_eq!(destruct_composite_key(&key, 2).unwrap(), "");
        assert_eq!(destruct_composite_key(&key, 3).unwrap(), "7");
    }
}
