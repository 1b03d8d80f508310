//! Codec for athlete ranking rows.
//!
//! Layout:
//! - `PK = Athlete#<athleteId>`
//! - `SK_GSI = Rankings#<rankingType>#<year>#<discipline>#<gender>#<ageCategory>`
//! - `GSI_SK = <encoded points>` (the overloaded GSI sorts leaderboards)
//! - `LSI` absent

use crate::codec::{
    build_composite_key, decode_points, destruct_composite_key, encode_points, parse_segment,
    DecodingError, EncodingError, Segment,
};
use crate::domain::{AgeCategory, AthleteRanking, Discipline, Gender, RankingType};

use super::attrs::{KeyAttrs, PhysicalItem, PrimaryKey, ATTR_GSI_SK};
use super::entity::{enum_segment, expect_prefix, require_key_field, EntityCodec, EntityType};

const ATTR_COUNTRY: &str = "country";
const ATTR_UPDATED_AT: &str = "updatedAt";

/// Stateless codec for [`AthleteRanking`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingCodec;

impl RankingCodec {
    /// Builds the table primary key from key-bearing fields only, for point
    /// lookups and deletes that have no full record at hand.
    pub fn primary_key(
        athlete_id: &str,
        ranking_type: RankingType,
        year: u16,
        discipline: Discipline,
        gender: Gender,
        age_category: AgeCategory,
    ) -> Result<PrimaryKey, EncodingError> {
        require_key_field("athleteId", athlete_id)?;
        Ok(PrimaryKey {
            pk: build_composite_key(
                EntityType::Ranking.pk_prefix(),
                &[Segment::new(athlete_id)],
            )?,
            sk_gsi: Self::sort_key(ranking_type, year, discipline, gender, age_category)?,
        })
    }

    /// The full `SK_GSI` for one ranking scope. Doubles as the overloaded
    /// GSI partition selecting that scope's leaderboard.
    pub fn sort_key(
        ranking_type: RankingType,
        year: u16,
        discipline: Discipline,
        gender: Gender,
        age_category: AgeCategory,
    ) -> Result<String, EncodingError> {
        build_composite_key(
            EntityType::Ranking.sk_prefix(),
            &[
                Segment::new(ranking_type.as_u8()),
                Segment::new(year),
                Segment::new(discipline.as_u8()),
                Segment::new(gender.as_u8()),
                Segment::new(age_category.as_u8()),
            ],
        )
    }
}

impl EntityCodec for RankingCodec {
    type Record = AthleteRanking;

    fn entity(&self) -> EntityType {
        EntityType::Ranking
    }

    fn to_attrs(&self, record: &AthleteRanking) -> Result<PhysicalItem, EncodingError> {
        let primary = Self::primary_key(
            &record.athlete_id,
            record.ranking_type,
            record.year,
            record.discipline,
            record.gender,
            record.age_category,
        )?;
        let mut item = PhysicalItem::new(KeyAttrs {
            pk: primary.pk,
            sk_gsi: primary.sk_gsi,
            lsi: None,
            gsi_sk: Some(encode_points(record.points)?),
        });
        if let Some(country) = &record.country {
            item.set(ATTR_COUNTRY, country.as_str());
        }
        if let Some(updated_at) = record.updated_at {
            item.set(ATTR_UPDATED_AT, updated_at.to_rfc3339());
        }
        Ok(item)
    }

    fn to_record(&self, item: &PhysicalItem) -> Result<AthleteRanking, DecodingError> {
        expect_prefix(&item.keys.pk, EntityType::Ranking.pk_prefix())?;
        let sort_key = &item.keys.sk_gsi;
        let encoded_points =
            item.keys
                .gsi_sk
                .as_deref()
                .ok_or(DecodingError::MissingAttribute {
                    attribute: ATTR_GSI_SK,
                })?;
        Ok(AthleteRanking {
            athlete_id: destruct_composite_key(&item.keys.pk, 1)?.to_string(),
            ranking_type: enum_segment(sort_key, 1, "ranking type", RankingType::from_u8)?,
            year: parse_segment(sort_key, 2, "year")?,
            discipline: enum_segment(sort_key, 3, "discipline", Discipline::from_u8)?,
            gender: enum_segment(sort_key, 4, "gender", Gender::from_u8)?,
            age_category: enum_segment(sort_key, 5, "age category", AgeCategory::from_u8)?,
            points: decode_points(encoded_points)?,
            country: item.opt_str_attr(ATTR_COUNTRY)?.map(str::to_string),
            updated_at: item.opt_datetime_attr(ATTR_UPDATED_AT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn sample_ranking() -> AthleteRanking {
        AthleteRanking {
            athlete_id: "A123".to_string(),
            ranking_type: RankingType::Points,
            year: 2024,
            discipline: Discipline::Highline,
            gender: Gender::All,
            age_category: AgeCategory::All,
            points: 1500.25,
            country: Some("AT".to_string()),
            updated_at: Some(
                DateTime::parse_from_rfc3339("2024-06-15T10:30:00+00:00")
                    .unwrap()
                    .with_timezone(&Utc),
            ),
        }
    }

    #[test]
    fn test_encodes_expected_keys() {
        let item = RankingCodec.to_attrs(&sample_ranking()).unwrap();
        assert_eq!(item.keys.pk, "Athlete#A123");
        assert_eq!(item.keys.sk_gsi, "Rankings#1#2024#3#0#0");
        assert_eq!(item.keys.lsi, None);
        assert_eq!(
            item.keys.gsi_sk.as_deref(),
            Some(encode_points(1500.25).unwrap().as_str())
        );
    }

    #[test]
    fn test_round_trip() {
        let ranking = sample_ranking();
        let item = RankingCodec.to_attrs(&ranking).unwrap();
        let decoded = RankingCodec.to_record(&item).unwrap();
        assert_eq!(decoded, ranking);
        // And back again: the re-encoded item is byte-identical.
        assert_eq!(RankingCodec.to_attrs(&decoded).unwrap(), item);
    }

    #[test]
    fn test_round_trip_without_passthrough() {
        let ranking = AthleteRanking {
            country: None,
            updated_at: None,
            ..sample_ranking()
        };
        let item = RankingCodec.to_attrs(&ranking).unwrap();
        assert!(item.rest.is_empty());
        assert_eq!(RankingCodec.to_record(&item).unwrap(), ranking);
    }

    #[test]
    fn test_primary_key_matches_encoded_item() {
        let ranking = sample_ranking();
        let item = RankingCodec.to_attrs(&ranking).unwrap();
        let primary = RankingCodec::primary_key(
            &ranking.athlete_id,
            ranking.ranking_type,
            ranking.year,
            ranking.discipline,
            ranking.gender,
            ranking.age_category,
        )
        .unwrap();
        assert_eq!(primary, item.primary_key());
    }

    #[test]
    fn test_decodes_normative_example() {
        let item = PhysicalItem::new(KeyAttrs {
            pk: "Athlete#A123".to_string(),
            sk_gsi: "Rankings#1#2024#3#0#0".to_string(),
            lsi: None,
            gsi_sk: Some(encode_points(0.0).unwrap()),
        });
        let decoded = RankingCodec.to_record(&item).unwrap();
        assert_eq!(decoded.athlete_id, "A123");
        assert_eq!(decoded.ranking_type, RankingType::Points);
        assert_eq!(decoded.year, 2024);
        assert_eq!(decoded.discipline, Discipline::Highline);
        assert_eq!(decoded.gender, Gender::All);
        assert_eq!(decoded.age_category, AgeCategory::All);
    }

    #[test]
    fn test_rejects_delimiter_in_athlete_id() {
        let ranking = AthleteRanking {
            athlete_id: "A#123".to_string(),
            ..sample_ranking()
        };
        assert!(matches!(
            RankingCodec.to_attrs(&ranking),
            Err(EncodingError::ReservedDelimiter { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_athlete_id() {
        let ranking = AthleteRanking {
            athlete_id: String::new(),
            ..sample_ranking()
        };
        assert_eq!(
            RankingCodec.to_attrs(&ranking),
            Err(EncodingError::EmptyKeyField { field: "athleteId" })
        );
    }

    #[test]
    fn test_decode_rejects_foreign_prefix() {
        let mut item = RankingCodec.to_attrs(&sample_ranking()).unwrap();
        item.keys.pk = "Contest#C42".to_string();
        assert!(matches!(
            RankingCodec.to_record(&item),
            Err(DecodingError::UnknownEntityPrefix { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_sort_key() {
        let mut item = RankingCodec.to_attrs(&sample_ranking()).unwrap();
        item.keys.sk_gsi = "Rankings#1#2024".to_string();
        assert!(matches!(
            RankingCodec.to_record(&item),
            Err(DecodingError::MissingSegment { index: 3, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_missing_points() {
        let mut item = RankingCodec.to_attrs(&sample_ranking()).unwrap();
        item.keys.gsi_sk = None;
        assert_eq!(
            RankingCodec.to_record(&item),
            Err(DecodingError::MissingAttribute {
                attribute: ATTR_GSI_SK
            })
        );
    }
}
