use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{AgeCategory, ContestSize, Discipline, Gender, RankingType};

/// One athlete's ranking row for a single scope.
///
/// The scope fields (`ranking_type`, `year`, `discipline`, `gender`,
/// `age_category`) and `athlete_id` are key-bearing; `points` is routed
/// through the sortable encoder; the rest are passthrough attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteRanking {
    pub athlete_id: String,
    pub ranking_type: RankingType,
    pub year: u16,
    pub discipline: Discipline,
    pub gender: Gender,
    pub age_category: AgeCategory,
    pub points: f64,
    pub country: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A contest within one discipline and season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisciplineContest {
    pub contest_id: String,
    pub discipline: Discipline,
    pub year: u16,
    pub date: NaiveDate,
    pub name: String,
    pub city: String,
    pub country: String,
    pub prize: String,
    pub size: ContestSize,
    pub created_at: DateTime<Utc>,
}

/// One athlete's result in one contest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestResult {
    pub athlete_id: String,
    pub contest_id: String,
    pub discipline: Discipline,
    pub year: u16,
    pub date: NaiveDate,
    pub points: f64,
    pub place: u32,
}
