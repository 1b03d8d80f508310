//! Codec for per-athlete contest results.
//!
//! Layout:
//! - `PK = Results#<athleteId>`
//! - `SK_GSI = Contests#<year>#<date>#<discipline>#<contestId>` (the table
//!   sort key itself orders one athlete's season by date)
//! - `LSI = <encoded points>` (re-sorts the same partition by points)
//! - `GSI_SK` absent

use crate::codec::{
    build_composite_key, decode_points, destruct_composite_key, encode_points, parse_segment,
    DecodingError, EncodingError, Segment,
};
use crate::domain::{ContestResult, Discipline};
use chrono::NaiveDate;

use super::attrs::{format_date, KeyAttrs, PhysicalItem, PrimaryKey, ATTR_LSI};
use super::entity::{enum_segment, expect_prefix, require_key_field, EntityCodec, EntityType};

const ATTR_PLACE: &str = "place";

/// Stateless codec for [`ContestResult`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultCodec;

impl ResultCodec {
    /// Builds the table primary key from key-bearing fields only.
    pub fn primary_key(
        athlete_id: &str,
        contest_id: &str,
        discipline: Discipline,
        year: u16,
        date: NaiveDate,
    ) -> Result<PrimaryKey, EncodingError> {
        require_key_field("athleteId", athlete_id)?;
        require_key_field("contestId", contest_id)?;
        Ok(PrimaryKey {
            pk: Self::partition_key(athlete_id)?,
            sk_gsi: Self::sort_key(year, date, discipline, contest_id)?,
        })
    }

    /// The `PK` holding every result of one athlete.
    pub fn partition_key(athlete_id: &str) -> Result<String, EncodingError> {
        build_composite_key(
            EntityType::ContestResult.pk_prefix(),
            &[Segment::new(athlete_id)],
        )
    }

    /// The `SK_GSI` prefix shared by one season's results.
    pub fn season_prefix(year: u16) -> Result<String, EncodingError> {
        build_composite_key(EntityType::ContestResult.sk_prefix(), &[Segment::new(year)])
    }

    /// The full `SK_GSI` for one result. Date precedes discipline and
    /// contest id so a season prefix query returns results in date order.
    pub fn sort_key(
        year: u16,
        date: NaiveDate,
        discipline: Discipline,
        contest_id: &str,
    ) -> Result<String, EncodingError> {
        build_composite_key(
            EntityType::ContestResult.sk_prefix(),
            &[
                Segment::new(year),
                Segment::new(format_date(date)),
                Segment::new(discipline.as_u8()),
                Segment::new(contest_id),
            ],
        )
    }
}

impl EntityCodec for ResultCodec {
    type Record = ContestResult;

    fn entity(&self) -> EntityType {
        EntityType::ContestResult
    }

    fn to_attrs(&self, record: &ContestResult) -> Result<PhysicalItem, EncodingError> {
        let primary = Self::primary_key(
            &record.athlete_id,
            &record.contest_id,
            record.discipline,
            record.year,
            record.date,
        )?;
        let mut item = PhysicalItem::new(KeyAttrs {
            pk: primary.pk,
            sk_gsi: primary.sk_gsi,
            lsi: Some(encode_points(record.points)?),
            gsi_sk: None,
        });
        item.set(ATTR_PLACE, record.place);
        Ok(item)
    }

    fn to_record(&self, item: &PhysicalItem) -> Result<ContestResult, DecodingError> {
        expect_prefix(&item.keys.pk, EntityType::ContestResult.pk_prefix())?;
        let sort_key = &item.keys.sk_gsi;
        let encoded_points = item
            .keys
            .lsi
            .as_deref()
            .ok_or(DecodingError::MissingAttribute { attribute: ATTR_LSI })?;
        let raw_date = destruct_composite_key(sort_key, 2)?;
        let date = raw_date
            .parse::<NaiveDate>()
            .map_err(|_| DecodingError::MalformedSegment {
                value: raw_date.to_string(),
                expected: "date",
            })?;
        Ok(ContestResult {
            athlete_id: destruct_composite_key(&item.keys.pk, 1)?.to_string(),
            contest_id: destruct_composite_key(sort_key, 4)?.to_string(),
            discipline: enum_segment(sort_key, 3, "discipline", Discipline::from_u8)?,
            year: parse_segment(sort_key, 1, "year")?,
            date,
            points: decode_points(encoded_points)?,
            place: item.u32_attr(ATTR_PLACE)?,
        })
    }
}
