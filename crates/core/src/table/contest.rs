//! Codec for discipline contests.
//!
//! Layout:
//! - `PK = Contest#<contestId>`
//! - `SK_GSI = Discipline#<discipline>#<year>`
//! - `GSI_SK = <date>` as `YYYY-MM-DD` (ISO dates are already ordered
//!   lexicographically, so the overloaded GSI sorts a season's contests by
//!   date)
//! - `LSI` absent

use crate::codec::{
    build_composite_key, destruct_composite_key, parse_segment, DecodingError, EncodingError,
    Segment,
};
use crate::domain::{ContestSize, Discipline, DisciplineContest};
use chrono::NaiveDate;

use super::attrs::{format_date, parse_date, KeyAttrs, PhysicalItem, PrimaryKey, ATTR_GSI_SK};
use super::entity::{enum_segment, expect_prefix, require_key_field, EntityCodec, EntityType};

const ATTR_NAME: &str = "name";
const ATTR_CITY: &str = "city";
const ATTR_COUNTRY: &str = "country";
const ATTR_PRIZE: &str = "prize";
const ATTR_SIZE: &str = "size";
const ATTR_CREATED_AT: &str = "createdAt";

/// Stateless codec for [`DisciplineContest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ContestCodec;

impl ContestCodec {
    /// Builds the table primary key from key-bearing fields only.
    pub fn primary_key(
        contest_id: &str,
        discipline: Discipline,
        year: u16,
    ) -> Result<PrimaryKey, EncodingError> {
        require_key_field("contestId", contest_id)?;
        Ok(PrimaryKey {
            pk: build_composite_key(
                EntityType::Contest.pk_prefix(),
                &[Segment::new(contest_id)],
            )?,
            sk_gsi: Self::sort_key(discipline, year)?,
        })
    }

    /// The `SK_GSI` for one discipline season. Doubles as the overloaded
    /// GSI partition holding that season's contests in date order.
    pub fn sort_key(discipline: Discipline, year: u16) -> Result<String, EncodingError> {
        build_composite_key(
            EntityType::Contest.sk_prefix(),
            &[Segment::new(discipline.as_u8()), Segment::new(year)],
        )
    }

    /// The `GSI_SK` value for a contest date.
    pub fn date_key(date: NaiveDate) -> String {
        format_date(date)
    }
}

impl EntityCodec for ContestCodec {
    type Record = DisciplineContest;

    fn entity(&self) -> EntityType {
        EntityType::Contest
    }

    fn to_attrs(&self, record: &DisciplineContest) -> Result<PhysicalItem, EncodingError> {
        let primary = Self::primary_key(&record.contest_id, record.discipline, record.year)?;
        let mut item = PhysicalItem::new(KeyAttrs {
            pk: primary.pk,
            sk_gsi: primary.sk_gsi,
            lsi: None,
            gsi_sk: Some(Self::date_key(record.date)),
        });
        item.set(ATTR_NAME, record.name.as_str());
        item.set(ATTR_CITY, record.city.as_str());
        item.set(ATTR_COUNTRY, record.country.as_str());
        item.set(ATTR_PRIZE, record.prize.as_str());
        item.set(ATTR_SIZE, record.size.as_u8());
        item.set(ATTR_CREATED_AT, record.created_at.to_rfc3339());
        Ok(item)
    }

    fn to_record(&self, item: &PhysicalItem) -> Result<DisciplineContest, DecodingError> {
        expect_prefix(&item.keys.pk, EntityType::Contest.pk_prefix())?;
        let sort_key = &item.keys.sk_gsi;
        let date_key = item
            .keys
            .gsi_sk
            .as_deref()
            .ok_or(DecodingError::MissingAttribute {
                attribute: ATTR_GSI_SK,
            })?;
        let date = parse_date(date_key).map_err(|reason| DecodingError::MalformedAttribute {
            attribute: ATTR_GSI_SK.to_string(),
            reason,
        })?;
        let size = ContestSize::from_u8(item.u8_attr(ATTR_SIZE)?).ok_or_else(|| {
            DecodingError::MalformedAttribute {
                attribute: ATTR_SIZE.to_string(),
                reason: "unknown contest size".to_string(),
            }
        })?;
        Ok(DisciplineContest {
            contest_id: destruct_composite_key(&item.keys.pk, 1)?.to_string(),
            discipline: enum_segment(sort_key, 1, "discipline", Discipline::from_u8)?,
            year: parse_segment(sort_key, 2, "year")?,
            date,
            name: item.str_attr(ATTR_NAME)?.to_string(),
            city: item.str_attr(ATTR_CITY)?.to_string(),
            country: item.str_attr(ATTR_COUNTRY)?.to_string(),
            prize: item.str_attr(ATTR_PRIZE)?.to_string(),
            size,
            created_at: item.datetime_attr(ATTR_CREATED_AT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn sample_contest() -> DisciplineContest {
        DisciplineContest {
            contest_id: "C42".to_string(),
            discipline: Discipline::Highline,
            year: 2024,
            date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            name: "Alpine Open".to_string(),
            city: "Innsbruck".to_string(),
            country: "AT".to_string(),
            prize: "5000 EUR".to_string(),
            size: ContestSize::International,
            created_at: DateTime::parse_from_rfc3339("2024-01-15T10:30:00+00:00")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_encodes_expected_keys() {
        let item = ContestCodec.to_attrs(&sample_contest()).unwrap();
        assert_eq!(item.keys.pk, "Contest#C42");
        assert_eq!(item.keys.sk_gsi, "Discipline#3#2024");
        assert_eq!(item.keys.gsi_sk.as_deref(), Some("2024-06-15"));
        assert_eq!(item.keys.lsi, None);
    }

    #[test]
    fn test_round_trip() {
        let contest = sample_contest();
        let item = ContestCodec.to_attrs(&contest).unwrap();
        let decoded = ContestCodec.to_record(&item).unwrap();
        assert_eq!(decoded, contest);
        assert_eq!(ContestCodec.to_attrs(&decoded).unwrap(), item);
    }

    #[test]
    fn test_primary_key_matches_encoded_item() {
        let contest = sample_contest();
        let item = ContestCodec.to_attrs(&contest).unwrap();
        let primary =
            ContestCodec::primary_key(&contest.contest_id, contest.discipline, contest.year)
                .unwrap();
        assert_eq!(primary, item.primary_key());
    }

    #[test]
    fn test_date_keys_sort_chronologically() {
        let earlier = ContestCodec::date_key(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        let later = ContestCodec::date_key(NaiveDate::from_ymd_opt(2024, 11, 2).unwrap());
        assert!(earlier < later);
    }

    #[test]
    fn test_decode_rejects_malformed_date() {
        let mut item = ContestCodec.to_attrs(&sample_contest()).unwrap();
        item.keys.gsi_sk = Some("15/06/2024".to_string());
        assert!(matches!(
            ContestCodec.to_record(&item),
            Err(DecodingError::MalformedAttribute { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_size() {
        let mut item = ContestCodec.to_attrs(&sample_contest()).unwrap();
        item.set(ATTR_SIZE, 9);
        assert!(matches!(
            ContestCodec.to_record(&item),
            Err(DecodingError::MalformedAttribute { .. })
        ));
    }

    #[test]
    fn test_pk_never_collides_with_ranking_pk() {
        let contest_item = ContestCodec.to_attrs(&sample_contest()).unwrap();
        assert!(contest_item.keys.pk.starts_with("Contest#"));
        assert!(!contest_item.keys.pk.starts_with("Athlete#"));
    }
}
