//! Range-query key construction and pagination cursors.
//!
//! A [`QueryKey`] is everything the store needs to run one range query:
//! which index to address, the partition value, an optional sort-key
//! condition, and the traversal direction. Cursors carry the key-bearing
//! fields of the last-seen item and rebuild the exclusive start position
//! through the same codecs that wrote the item, so repeated queries form a
//! total, gap-free, duplicate-free traversal whose order depends only on
//! key values, never on write order.

use chrono::NaiveDate;

use crate::codec::{encode_points, EncodingError, KEY_DELIMITER};
use crate::domain::{
    AgeCategory, AthleteRanking, ContestResult, Discipline, DisciplineContest, Gender, RankingType,
};

use super::attrs::PrimaryKey;
use super::contest::ContestCodec;
use super::ranking::RankingCodec;
use super::result::ResultCodec;

/// Which index a range query addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetIndex {
    /// The table itself: partition `PK`, sort `SK_GSI`.
    Table,
    /// The overloaded GSI: partition `SK_GSI`, sort `GSI_SK`.
    OverloadedGsi,
    /// The points LSI: partition `PK`, sort `LSI`.
    PointsLsi,
}

/// Constraint on the sort key of a range query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortCondition {
    /// Sort keys beginning with the given prefix.
    Prefix(String),
    /// Sort keys greater than or equal to the given value.
    AtLeast(String),
    /// Sort keys within an inclusive range.
    Between { start: String, end: String },
}

/// One range query against the table or one of its indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryKey {
    pub index: TargetIndex,
    pub partition: String,
    pub sort: Option<SortCondition>,
    pub descending: bool,
}

/// Resume position for a paginated query: the primary key of the last-seen
/// item plus, for index queries, its index sort value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusiveStartKey {
    pub primary: PrimaryKey,
    pub index_sort: Option<String>,
}

// ============================================================================
// Leaderboards
// ============================================================================

/// Filter fields selecting one leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingScope {
    pub ranking_type: RankingType,
    pub year: u16,
    pub discipline: Discipline,
    pub gender: Gender,
    pub age_category: AgeCategory,
}

impl RankingScope {
    /// The overloaded-GSI partition holding this scope's leaderboard: the
    /// full ranking sort key.
    pub fn partition(&self) -> Result<String, EncodingError> {
        RankingCodec::sort_key(
            self.ranking_type,
            self.year,
            self.discipline,
            self.gender,
            self.age_category,
        )
    }

    /// Leaderboard query, highest points first.
    pub fn leaderboard_query(&self) -> Result<QueryKey, EncodingError> {
        Ok(QueryKey {
            index: TargetIndex::OverloadedGsi,
            partition: self.partition()?,
            sort: None,
            descending: true,
        })
    }
}

/// Resume point for a leaderboard traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardCursor {
    pub athlete_id: String,
    pub points: f64,
}

impl LeaderboardCursor {
    /// Captures the key-bearing fields of the last-seen ranking row.
    pub fn from_record(record: &AthleteRanking) -> Self {
        Self {
            athlete_id: record.athlete_id.clone(),
            points: record.points,
        }
    }

    /// The exclusive start position for resuming within `scope`.
    pub fn exclusive_start(&self, scope: &RankingScope) -> Result<ExclusiveStartKey, EncodingError> {
        let primary = RankingCodec::primary_key(
            &self.athlete_id,
            scope.ranking_type,
            scope.year,
            scope.discipline,
            scope.gender,
            scope.age_category,
        )?;
        Ok(ExclusiveStartKey {
            primary,
            index_sort: Some(encode_points(self.points)?),
        })
    }
}

// ============================================================================
// Contest lists
// ============================================================================

/// Filter fields selecting one discipline season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContestScope {
    pub discipline: Discipline,
    pub year: u16,
}

impl ContestScope {
    /// The overloaded-GSI partition holding this season's contests.
    pub fn partition(&self) -> Result<String, EncodingError> {
        ContestCodec::sort_key(self.discipline, self.year)
    }

    /// Contests in date order, optionally restricted to dates on or after
    /// `since`.
    pub fn by_date_query(&self, since: Option<NaiveDate>) -> Result<QueryKey, EncodingError> {
        Ok(QueryKey {
            index: TargetIndex::OverloadedGsi,
            partition: self.partition()?,
            sort: since.map(|date| SortCondition::AtLeast(ContestCodec::date_key(date))),
            descending: false,
        })
    }
}

/// Resume point for a contest-list traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContestCursor {
    pub contest_id: String,
    pub date: NaiveDate,
}

impl ContestCursor {
    /// Captures the key-bearing fields of the last-seen contest.
    pub fn from_record(record: &DisciplineContest) -> Self {
        Self {
            contest_id: record.contest_id.clone(),
            date: record.date,
        }
    }

    /// The exclusive start position for resuming within `scope`.
    pub fn exclusive_start(&self, scope: &ContestScope) -> Result<ExclusiveStartKey, EncodingError> {
        let primary = ContestCodec::primary_key(&self.contest_id, scope.discipline, scope.year)?;
        Ok(ExclusiveStartKey {
            primary,
            index_sort: Some(ContestCodec::date_key(self.date)),
        })
    }
}

// ============================================================================
// Athlete results
// ============================================================================

/// Filter fields selecting one athlete's season.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AthleteResultsScope {
    pub athlete_id: String,
    pub year: u16,
}

impl AthleteResultsScope {
    /// The table partition holding every result of this athlete.
    pub fn partition(&self) -> Result<String, EncodingError> {
        ResultCodec::partition_key(&self.athlete_id)
    }

    /// The season's results in date order, via a sort-key prefix on the
    /// table itself.
    pub fn by_date_query(&self) -> Result<QueryKey, EncodingError> {
        let mut prefix = ResultCodec::season_prefix(self.year)?;
        prefix.push(KEY_DELIMITER);
        Ok(QueryKey {
            index: TargetIndex::Table,
            partition: self.partition()?,
            sort: Some(SortCondition::Prefix(prefix)),
            descending: false,
        })
    }

    /// The season's results restricted to an inclusive date range.
    pub fn date_range_query(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<QueryKey, EncodingError> {
        let season = ResultCodec::season_prefix(self.year)?;
        // '~' sorts above every id character, closing the range after `to`.
        let start = format!("{season}{KEY_DELIMITER}{}", ContestCodec::date_key(from));
        let end = format!("{season}{KEY_DELIMITER}{}{KEY_DELIMITER}~", ContestCodec::date_key(to));
        Ok(QueryKey {
            index: TargetIndex::Table,
            partition: self.partition()?,
            sort: Some(SortCondition::Between { start, end }),
            descending: false,
        })
    }

}

/// One athlete's results ordered by points, highest first, via the LSI.
///
/// The points index re-sorts the athlete's whole partition, so results from
/// every season rank together; there is no per-year filter on this path.
pub fn athlete_points_query(athlete_id: &str) -> Result<QueryKey, EncodingError> {
    Ok(QueryKey {
        index: TargetIndex::PointsLsi,
        partition: ResultCodec::partition_key(athlete_id)?,
        sort: None,
        descending: true,
    })
}

/// Resume point for an athlete-results traversal in date order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCursor {
    pub contest_id: String,
    pub discipline: Discipline,
    pub date: NaiveDate,
}

impl ResultCursor {
    /// Captures the key-bearing fields of the last-seen result.
    pub fn from_record(record: &ContestResult) -> Self {
        Self {
            contest_id: record.contest_id.clone(),
            discipline: record.discipline,
            date: record.date,
        }
    }

    /// The exclusive start position for resuming within `scope`.
    pub fn exclusive_start(
        &self,
        scope: &AthleteResultsScope,
    ) -> Result<ExclusiveStartKey, EncodingError> {
        let primary = ResultCodec::primary_key(
            &scope.athlete_id,
            &self.contest_id,
            self.discipline,
            scope.year,
            self.date,
        )?;
        Ok(ExclusiveStartKey {
            primary,
            index_sort: None,
        })
    }
}
