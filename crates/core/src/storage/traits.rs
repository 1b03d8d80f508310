use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{AthleteRanking, ContestResult, Discipline, DisciplineContest};
use crate::table::{
    AthleteResultsScope, ContestCursor, ContestScope, LeaderboardCursor, RankingScope,
    ResultCursor,
};

use super::{DateRange, Result};

/// Repository for athlete ranking rows and leaderboard queries.
#[async_trait]
pub trait RankingRepository: Send + Sync {
    /// Gets one athlete's ranking row for a scope.
    async fn get_ranking(
        &self,
        athlete_id: &str,
        scope: &RankingScope,
    ) -> Result<Option<AthleteRanking>>;

    /// Writes a ranking row, replacing any previous row under the same key.
    async fn put_ranking(&self, record: &AthleteRanking) -> Result<()>;

    /// Deletes one athlete's ranking row for a scope.
    async fn delete_ranking(&self, athlete_id: &str, scope: &RankingScope) -> Result<()>;

    /// Queries a scope's leaderboard, highest points first. Pass the last
    /// returned row's [`LeaderboardCursor`] to fetch the next page.
    async fn query_leaderboard(
        &self,
        scope: &RankingScope,
        limit: usize,
        after: Option<&LeaderboardCursor>,
    ) -> Result<Vec<AthleteRanking>>;
}

/// Repository for contests within a discipline season.
#[async_trait]
pub trait ContestRepository: Send + Sync {
    /// Gets a contest by its key-bearing fields.
    async fn get_contest(
        &self,
        contest_id: &str,
        discipline: Discipline,
        year: u16,
    ) -> Result<Option<DisciplineContest>>;

    /// Writes a contest, replacing any previous item under the same key.
    async fn put_contest(&self, record: &DisciplineContest) -> Result<()>;

    /// Deletes a contest.
    async fn delete_contest(
        &self,
        contest_id: &str,
        discipline: Discipline,
        year: u16,
    ) -> Result<()>;

    /// Queries a season's contests in date order, optionally restricted to
    /// dates on or after `since`.
    async fn query_contests_by_date(
        &self,
        scope: &ContestScope,
        since: Option<NaiveDate>,
        limit: usize,
        after: Option<&ContestCursor>,
    ) -> Result<Vec<DisciplineContest>>;
}

/// Repository for per-athlete contest results.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Gets one result by its key-bearing fields.
    async fn get_result(
        &self,
        athlete_id: &str,
        contest_id: &str,
        discipline: Discipline,
        year: u16,
        date: NaiveDate,
    ) -> Result<Option<ContestResult>>;

    /// Writes a result, replacing any previous item under the same key.
    async fn put_result(&self, record: &ContestResult) -> Result<()>;

    /// Deletes a result.
    async fn delete_result(
        &self,
        athlete_id: &str,
        contest_id: &str,
        discipline: Discipline,
        year: u16,
        date: NaiveDate,
    ) -> Result<()>;

    /// Queries one athlete's season in date order.
    async fn query_results_by_date(
        &self,
        scope: &AthleteResultsScope,
        limit: usize,
        after: Option<&ResultCursor>,
    ) -> Result<Vec<ContestResult>>;

    /// Queries one athlete's results within a date range, in date order.
    async fn query_results_in_range(
        &self,
        scope: &AthleteResultsScope,
        range: DateRange,
        limit: usize,
    ) -> Result<Vec<ContestResult>>;

    /// Queries one athlete's results ordered by points, highest first.
    /// The points index re-sorts the athlete's whole partition, so results
    /// from every season rank together.
    async fn query_results_by_points(
        &self,
        athlete_id: &str,
        limit: usize,
    ) -> Result<Vec<ContestResult>>;
}
