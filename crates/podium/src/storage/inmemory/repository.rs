//! In-memory repository implementation.
//!
//! Items live in a `BTreeMap` keyed by `(PK, SK_GSI)` and the secondary
//! indexes are emulated over the encoded key columns, so queries and
//! cursors run against the same lexicographic order the real store uses.
//! Data is not persisted and is lost when the repository is dropped.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use podium_core::domain::{AthleteRanking, ContestResult, Discipline, DisciplineContest};
use podium_core::storage::{
    ContestRepository, DateRange, RankingRepository, RepositoryError, Result, ResultRepository,
};
use podium_core::table::{
    athlete_points_query, find_prefix_collision, AthleteResultsScope, ContestCodec,
    ContestCursor, ContestScope, EntityCodec, ExclusiveStartKey, LeaderboardCursor, PhysicalItem,
    PrimaryKey, QueryKey, RankingCodec, RankingScope, ResultCodec, ResultCursor, SortCondition,
    TargetIndex,
};

/// In-memory storage backend for testing.
///
/// Thread-safe via `Arc<RwLock<_>>`; clones share the same store.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    items: Arc<RwLock<BTreeMap<(String, String), PhysicalItem>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository. Validates the entity
    /// prefix registry once, like the DynamoDB backend.
    pub fn new() -> Result<Self> {
        if let Some((first, second)) = find_prefix_collision() {
            return Err(RepositoryError::PrefixCollision(first, second));
        }
        Ok(Self {
            items: Arc::new(RwLock::new(BTreeMap::new())),
        })
    }

    async fn get_physical(&self, key: &PrimaryKey) -> Option<PhysicalItem> {
        let items = self.items.read().await;
        items.get(&(key.pk.clone(), key.sk_gsi.clone())).cloned()
    }

    async fn put_physical(&self, item: PhysicalItem) {
        let key = (item.keys.pk.clone(), item.keys.sk_gsi.clone());
        self.items.write().await.insert(key, item);
    }

    async fn delete_physical(
        &self,
        key: &PrimaryKey,
        entity_type: &'static str,
        id: &str,
    ) -> Result<()> {
        let removed = self
            .items
            .write()
            .await
            .remove(&(key.pk.clone(), key.sk_gsi.clone()));
        if removed.is_none() {
            return Err(RepositoryError::NotFound {
                entity_type,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn run_query(
        &self,
        query: &QueryKey,
        limit: usize,
        start: Option<ExclusiveStartKey>,
    ) -> Vec<PhysicalItem> {
        let items = self.items.read().await;

        // Rows addressed by the index: (sort value, tie-breaking table key,
        // item). Items missing the index sort column are invisible to that
        // index, matching sparse-index semantics.
        let mut rows: Vec<(&str, &str, &PhysicalItem)> = match query.index {
            TargetIndex::Table => items
                .iter()
                .filter(|((pk, _), _)| *pk == query.partition)
                .map(|((_, sk_gsi), item)| (sk_gsi.as_str(), item.keys.pk.as_str(), item))
                .collect(),
            TargetIndex::OverloadedGsi => items
                .values()
                .filter(|item| item.keys.sk_gsi == query.partition)
                .filter_map(|item| {
                    item.keys
                        .gsi_sk
                        .as_deref()
                        .map(|sort| (sort, item.keys.pk.as_str(), item))
                })
                .collect(),
            TargetIndex::PointsLsi => items
                .values()
                .filter(|item| item.keys.pk == query.partition)
                .filter_map(|item| {
                    item.keys
                        .lsi
                        .as_deref()
                        .map(|sort| (sort, item.keys.sk_gsi.as_str(), item))
                })
                .collect(),
        };

        rows.sort_by(|left, right| (left.0, left.1).cmp(&(right.0, right.1)));
        if query.descending {
            rows.reverse();
        }

        let start_position = start.map(|start| match query.index {
            TargetIndex::Table => (start.primary.sk_gsi, start.primary.pk),
            TargetIndex::OverloadedGsi => {
                (start.index_sort.unwrap_or_default(), start.primary.pk)
            }
            TargetIndex::PointsLsi => {
                (start.index_sort.unwrap_or_default(), start.primary.sk_gsi)
            }
        });

        rows.into_iter()
            .filter(|(sort, _, _)| match &query.sort {
                None => true,
                Some(SortCondition::Prefix(prefix)) => sort.starts_with(prefix.as_str()),
                Some(SortCondition::AtLeast(bound)) => *sort >= bound.as_str(),
                Some(SortCondition::Between { start, end }) => {
                    *sort >= start.as_str() && *sort <= end.as_str()
                }
            })
            .skip_while(|(sort, tie, _)| match &start_position {
                None => false,
                Some((start_sort, start_tie)) => {
                    let position = (*sort, *tie);
                    let cursor = (start_sort.as_str(), start_tie.as_str());
                    if query.descending {
                        position >= cursor
                    } else {
                        position <= cursor
                    }
                }
            })
            .take(limit)
            .map(|(_, _, item)| item.clone())
            .collect()
    }
}

// ============================================================================
// RankingRepository implementation
// ============================================================================

#[async_trait]
impl RankingRepository for InMemoryRepository {
    async fn get_ranking(
        &self,
        athlete_id: &str,
        scope: &RankingScope,
    ) -> Result<Option<AthleteRanking>> {
        let key = RankingCodec::primary_key(
            athlete_id,
            scope.ranking_type,
            scope.year,
            scope.discipline,
            scope.gender,
            scope.age_category,
        )?;
        match self.get_physical(&key).await {
            Some(item) => Ok(Some(RankingCodec.to_record(&item)?)),
            None => Ok(None),
        }
    }

    async fn put_ranking(&self, record: &AthleteRanking) -> Result<()> {
        self.put_physical(RankingCodec.to_attrs(record)?).await;
        Ok(())
    }

    async fn delete_ranking(&self, athlete_id: &str, scope: &RankingScope) -> Result<()> {
        let key = RankingCodec::primary_key(
            athlete_id,
            scope.ranking_type,
            scope.year,
            scope.discipline,
            scope.gender,
            scope.age_category,
        )?;
        self.delete_physical(&key, "AthleteRanking", athlete_id)
            .await
    }

    async fn query_leaderboard(
        &self,
        scope: &RankingScope,
        limit: usize,
        after: Option<&LeaderboardCursor>,
    ) -> Result<Vec<AthleteRanking>> {
        let query = scope.leaderboard_query()?;
        let start = after
            .map(|cursor| cursor.exclusive_start(scope))
            .transpose()?;
        self.run_query(&query, limit, start)
            .await
            .iter()
            .map(|item| Ok(RankingCodec.to_record(item)?))
            .collect()
    }
}

// ============================================================================
// ContestRepository implementation
// ============================================================================

#[async_trait]
impl ContestRepository for InMemoryRepository {
    async fn get_contest(
        &self,
        contest_id: &str,
        discipline: Discipline,
        year: u16,
    ) -> Result<Option<DisciplineContest>> {
        let key = ContestCodec::primary_key(contest_id, discipline, year)?;
        match self.get_physical(&key).await {
            Some(item) => Ok(Some(ContestCodec.to_record(&item)?)),
            None => Ok(None),
        }
    }

    async fn put_contest(&self, record: &DisciplineContest) -> Result<()> {
        self.put_physical(ContestCodec.to_attrs(record)?).await;
        Ok(())
    }

    async fn delete_contest(
        &self,
        contest_id: &str,
        discipline: Discipline,
        year: u16,
    ) -> Result<()> {
        let key = ContestCodec::primary_key(contest_id, discipline, year)?;
        self.delete_physical(&key, "DisciplineContest", contest_id)
            .await
    }

    async fn query_contests_by_date(
        &self,
        scope: &ContestScope,
        since: Option<NaiveDate>,
        limit: usize,
        after: Option<&ContestCursor>,
    ) -> Result<Vec<DisciplineContest>> {
        let query = scope.by_date_query(since)?;
        let start = after
            .map(|cursor| cursor.exclusive_start(scope))
            .transpose()?;
        self.run_query(&query, limit, start)
            .await
            .iter()
            .map(|item| Ok(ContestCodec.to_record(item)?))
            .collect()
    }
}

// ============================================================================
// ResultRepository implementation
// ============================================================================

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn get_result(
        &self,
        athlete_id: &str,
        contest_id: &str,
        discipline: Discipline,
        year: u16,
        date: NaiveDate,
    ) -> Result<Option<ContestResult>> {
        let key = ResultCodec::primary_key(athlete_id, contest_id, discipline, year, date)?;
        match self.get_physical(&key).await {
            Some(item) => Ok(Some(ResultCodec.to_record(&item)?)),
            None => Ok(None),
        }
    }

    async fn put_result(&self, record: &ContestResult) -> Result<()> {
        self.put_physical(ResultCodec.to_attrs(record)?).await;
        Ok(())
    }

    async fn delete_result(
        &self,
        athlete_id: &str,
        contest_id: &str,
        discipline: Discipline,
        year: u16,
        date: NaiveDate,
    ) -> Result<()> {
        let key = ResultCodec::primary_key(athlete_id, contest_id, discipline, year, date)?;
        self.delete_physical(&key, "ContestResult", contest_id).await
    }

    async fn query_results_by_date(
        &self,
        scope: &AthleteResultsScope,
        limit: usize,
        after: Option<&ResultCursor>,
    ) -> Result<Vec<ContestResult>> {
        let query = scope.by_date_query()?;
        let start = after
            .map(|cursor| cursor.exclusive_start(scope))
            .transpose()?;
        self.run_query(&query, limit, start)
            .await
            .iter()
            .map(|item| Ok(ResultCodec.to_record(item)?))
            .collect()
    }

    async fn query_results_in_range(
        &self,
        scope: &AthleteResultsScope,
        range: DateRange,
        limit: usize,
    ) -> Result<Vec<ContestResult>> {
        let query = scope.date_range_query(range.start, range.end)?;
        self.run_query(&query, limit, None)
            .await
            .iter()
            .map(|item| Ok(ResultCodec.to_record(item)?))
            .collect()
    }

    async fn query_results_by_points(
        &self,
        athlete_id: &str,
        limit: usize,
    ) -> Result<Vec<ContestResult>> {
        let query = athlete_points_query(athlete_id)?;
        self.run_query(&query, limit, None)
            .await
            .iter()
            .map(|item| Ok(ResultCodec.to_record(item)?))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use podium_core::domain::{AgeCategory, ContestSize, Gender, RankingType};

    fn sample_scope() -> RankingScope {
        RankingScope {
            ranking_type: RankingType::Points,
            year: 2024,
            discipline: Discipline::Highline,
            gender: Gender::All,
            age_category: AgeCategory::All,
        }
    }

    fn ranking(athlete_id: &str, points: f64) -> AthleteRanking {
        let scope = sample_scope();
        AthleteRanking {
            athlete_id: athlete_id.to_string(),
            ranking_type: scope.ranking_type,
            year: scope.year,
            discipline: scope.discipline,
            gender: scope.gender,
            age_category: scope.age_category,
            points,
            country: None,
            updated_at: None,
        }
    }

    fn contest(contest_id: &str, month: u32, day: u32) -> DisciplineContest {
        DisciplineContest {
            contest_id: contest_id.to_string(),
            discipline: Discipline::Highline,
            year: 2024,
            date: NaiveDate::from_ymd_opt(2024, month, day).unwrap(),
            name: format!("Contest {contest_id}"),
            city: "Innsbruck".to_string(),
            country: "AT".to_string(),
            prize: "1000 EUR".to_string(),
            size: ContestSize::International,
            created_at: DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    fn result(contest_id: &str, month: u32, day: u32, points: f64, place: u32) -> ContestResult {
        ContestResult {
            athlete_id: "A123".to_string(),
            contest_id: contest_id.to_string(),
            discipline: Discipline::Highline,
            year: 2024,
            date: NaiveDate::from_ymd_opt(2024, month, day).unwrap(),
            points,
            place,
        }
    }

    async fn seeded_leaderboard() -> InMemoryRepository {
        let repo = InMemoryRepository::new().unwrap();
        for (athlete_id, points) in [
            ("A1", 1500.25),
            ("A2", 980.0),
            ("A3", 2100.5),
            ("A4", 980.0),
            ("A5", -3.5),
            ("A6", 0.0),
        ] {
            repo.put_ranking(&ranking(athlete_id, points)).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_get_put_delete_round_trip() {
        let repo = InMemoryRepository::new().unwrap();
        let scope = sample_scope();
        let record = ranking("A123", 1500.25);

        assert_eq!(repo.get_ranking("A123", &scope).await.unwrap(), None);
        repo.put_ranking(&record).await.unwrap();
        assert_eq!(
            repo.get_ranking("A123", &scope).await.unwrap(),
            Some(record.clone())
        );

        // Re-running the full transform-and-write replaces the row.
        let updated = AthleteRanking {
            points: 1600.0,
            ..record
        };
        repo.put_ranking(&updated).await.unwrap();
        assert_eq!(
            repo.get_ranking("A123", &scope).await.unwrap().unwrap().points,
            1600.0
        );

        repo.delete_ranking("A123", &scope).await.unwrap();
        assert_eq!(repo.get_ranking("A123", &scope).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let repo = InMemoryRepository::new().unwrap();
        let error = repo
            .delete_ranking("A123", &sample_scope())
            .await
            .unwrap_err();
        assert_eq!(
            error,
            RepositoryError::NotFound {
                entity_type: "AthleteRanking",
                id: "A123".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_leaderboard_orders_by_points_descending() {
        let repo = seeded_leaderboard().await;
        let rows = repo
            .query_leaderboard(&sample_scope(), 10, None)
            .await
            .unwrap();
        let points: Vec<f64> = rows.iter().map(|row| row.points).collect();
        assert_eq!(points, vec![2100.5, 1500.25, 980.0, 980.0, 0.0, -3.5]);
        // Equal points tie-break on the athlete partition key, reversed
        // along with the rest of the traversal.
        assert_eq!(rows[2].athlete_id, "A4");
        assert_eq!(rows[3].athlete_id, "A2");
    }

    #[tokio::test]
    async fn test_leaderboard_cursor_continuity() {
        let repo = seeded_leaderboard().await;
        let scope = sample_scope();

        let full = repo.query_leaderboard(&scope, 6, None).await.unwrap();

        // Page through two at a time; the pages must tile the full result
        // with no overlap and no gap.
        let mut paged = Vec::new();
        let mut cursor: Option<LeaderboardCursor> = None;
        loop {
            let page = repo
                .query_leaderboard(&scope, 2, cursor.as_ref())
                .await
                .unwrap();
            if page.is_empty() {
                break;
            }
            cursor = page.last().map(LeaderboardCursor::from_record);
            paged.extend(page);
        }
        assert_eq!(paged, full);
    }

    #[tokio::test]
    async fn test_leaderboard_scope_isolation() {
        let repo = seeded_leaderboard().await;
        let other_scope = RankingScope {
            gender: Gender::Women,
            ..sample_scope()
        };
        let rows = repo
            .query_leaderboard(&other_scope, 10, None)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_contests_by_date_with_since_and_cursor() {
        let repo = InMemoryRepository::new().unwrap();
        for (contest_id, month, day) in [
            ("C1", 3, 10),
            ("C2", 6, 15),
            ("C3", 6, 15),
            ("C4", 9, 1),
            ("C5", 11, 20),
        ] {
            repo.put_contest(&contest(contest_id, month, day))
                .await
                .unwrap();
        }
        let scope = ContestScope {
            discipline: Discipline::Highline,
            year: 2024,
        };

        let all = repo
            .query_contests_by_date(&scope, None, 10, None)
            .await
            .unwrap();
        let ids: Vec<&str> = all.iter().map(|row| row.contest_id.as_str()).collect();
        assert_eq!(ids, vec!["C1", "C2", "C3", "C4", "C5"]);

        let since = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let filtered = repo
            .query_contests_by_date(&scope, Some(since), 10, None)
            .await
            .unwrap();
        let ids: Vec<&str> = filtered.iter().map(|row| row.contest_id.as_str()).collect();
        assert_eq!(ids, vec!["C2", "C3", "C4", "C5"]);

        // Resume after the first page; same-date contests must not repeat.
        let first_page = repo
            .query_contests_by_date(&scope, None, 2, None)
            .await
            .unwrap();
        let cursor = ContestCursor::from_record(first_page.last().unwrap());
        let second_page = repo
            .query_contests_by_date(&scope, None, 2, Some(&cursor))
            .await
            .unwrap();
        let ids: Vec<&str> = second_page
            .iter()
            .map(|row| row.contest_id.as_str())
            .collect();
        assert_eq!(ids, vec!["C3", "C4"]);
    }

    #[tokio::test]
    async fn test_contest_get_is_isolated_from_rankings() {
        let repo = seeded_leaderboard().await;
        repo.put_contest(&contest("A1", 6, 15)).await.unwrap();

        // A contest sharing an id with an athlete lives under its own
        // prefix and never shadows the ranking row.
        let fetched = repo
            .get_contest("A1", Discipline::Highline, 2024)
            .await
            .unwrap();
        assert_eq!(fetched.unwrap().contest_id, "A1");
        assert!(repo
            .get_ranking("A1", &sample_scope())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_results_by_date_cursor_continuity() {
        let repo = InMemoryRepository::new().unwrap();
        for (contest_id, month, day, points, place) in [
            ("C1", 3, 10, 120.0, 4),
            ("C2", 5, 2, 380.5, 2),
            ("C3", 6, 15, 80.25, 9),
            ("C4", 9, 1, 510.0, 1),
            ("C5", 11, 20, 260.0, 3),
        ] {
            repo.put_result(&result(contest_id, month, day, points, place))
                .await
                .unwrap();
        }
        // A different season must stay invisible to the 2024 queries.
        repo.put_result(&ContestResult {
            year: 2023,
            date: NaiveDate::from_ymd_opt(2023, 8, 5).unwrap(),
            ..result("C9", 8, 5, 300.0, 2)
        })
        .await
        .unwrap();

        let scope = AthleteResultsScope {
            athlete_id: "A123".to_string(),
            year: 2024,
        };

        let full = repo.query_results_by_date(&scope, 10, None).await.unwrap();
        let ids: Vec<&str> = full.iter().map(|row| row.contest_id.as_str()).collect();
        assert_eq!(ids, vec!["C1", "C2", "C3", "C4", "C5"]);

        let mut paged = Vec::new();
        let mut cursor: Option<ResultCursor> = None;
        loop {
            let page = repo
                .query_results_by_date(&scope, 2, cursor.as_ref())
                .await
                .unwrap();
            if page.is_empty() {
                break;
            }
            cursor = page.last().map(ResultCursor::from_record);
            paged.extend(page);
        }
        assert_eq!(paged, full);
    }

    #[tokio::test]
    async fn test_results_in_range_bounds_are_inclusive() {
        let repo = InMemoryRepository::new().unwrap();
        for (contest_id, month, day, points, place) in [
            ("C1", 3, 10, 120.0, 4),
            ("C2", 5, 2, 380.5, 2),
            ("C3", 6, 15, 80.25, 9),
            ("C4", 9, 1, 510.0, 1),
            ("C5", 11, 20, 260.0, 3),
        ] {
            repo.put_result(&result(contest_id, month, day, points, place))
                .await
                .unwrap();
        }
        let scope = AthleteResultsScope {
            athlete_id: "A123".to_string(),
            year: 2024,
        };
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
        )
        .unwrap();
        let rows = repo.query_results_in_range(&scope, range, 10).await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|row| row.contest_id.as_str()).collect();
        assert_eq!(ids, vec!["C2", "C3", "C4"]);

        let season = repo
            .query_results_in_range(&scope, DateRange::season(2024), 10)
            .await
            .unwrap();
        assert_eq!(season.len(), 5);
    }

    #[tokio::test]
    async fn test_results_by_points_ranks_every_season_together() {
        let repo = InMemoryRepository::new().unwrap();
        for (contest_id, month, day, points, place) in [
            ("C1", 3, 10, 120.0, 4),
            ("C2", 5, 2, 380.5, 2),
            ("C3", 6, 15, 80.25, 9),
            ("C4", 9, 1, 510.0, 1),
        ] {
            repo.put_result(&result(contest_id, month, day, points, place))
                .await
                .unwrap();
        }
        // The points index re-sorts the athlete's whole partition, so a
        // result from another season ranks alongside the 2024 ones.
        repo.put_result(&ContestResult {
            year: 2023,
            date: NaiveDate::from_ymd_opt(2023, 8, 5).unwrap(),
            ..result("C9", 8, 5, 400.0, 2)
        })
        .await
        .unwrap();

        let rows = repo.query_results_by_points("A123", 4).await.unwrap();
        let points: Vec<f64> = rows.iter().map(|row| row.points).collect();
        assert_eq!(points, vec![510.0, 400.0, 380.5, 120.0]);
        assert_eq!(rows[1].year, 2023);
    }

    #[tokio::test]
    async fn test_results_by_date_excludes_other_athletes() {
        let repo = InMemoryRepository::new().unwrap();
        repo.put_result(&result("C1", 3, 10, 120.0, 4)).await.unwrap();
        repo.put_result(&ContestResult {
            athlete_id: "A999".to_string(),
            ..result("C2", 5, 2, 380.5, 2)
        })
        .await
        .unwrap();

        let scope = AthleteResultsScope {
            athlete_id: "A123".to_string(),
            year: 2024,
        };
        let rows = repo.query_results_by_date(&scope, 10, None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].contest_id, "C1");
    }
}
