//! DynamoDB repository implementation.
//!
//! Implements the repository traits from `podium_core::storage` against the
//! single physical table. Every key and query parameter is built by the
//! codecs in `podium_core`; this module only moves attribute maps across
//! the wire.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use chrono::NaiveDate;

use podium_core::domain::{AthleteRanking, ContestResult, Discipline, DisciplineContest};
use podium_core::storage::{
    ContestRepository, DateRange, RankingRepository, RepositoryError, Result, ResultRepository,
};
use podium_core::table::{
    athlete_points_query, find_prefix_collision, AthleteResultsScope, ContestCodec,
    ContestCursor, ContestScope, EntityCodec, ExclusiveStartKey, LeaderboardCursor, PhysicalItem,
    PrimaryKey, QueryKey, RankingCodec, RankingScope, ResultCodec, ResultCursor, SortCondition,
    TargetIndex, ATTR_GSI_SK, ATTR_LSI, ATTR_PK, ATTR_SK_GSI,
};

use super::convert::{attribute_values_to_item, item_to_attribute_values};
use super::error::{
    map_delete_item_error, map_get_item_error, map_put_item_error, map_query_error,
};
use crate::config::Config;

/// DynamoDB-based repository implementation.
///
/// Provides async access to the single-table store for all entity types.
pub struct DynamoDbRepository {
    client: Client,
    config: Config,
}

impl DynamoDbRepository {
    /// Creates a new repository with the given DynamoDB client and
    /// configuration. Validates the entity prefix registry once.
    pub fn new(client: Client, config: Config) -> Result<Self> {
        if let Some((first, second)) = find_prefix_collision() {
            return Err(RepositoryError::PrefixCollision(first, second));
        }
        Ok(Self { client, config })
    }

    /// Creates a new repository from environment configuration.
    ///
    /// Uses the AWS SDK default credential chain and reads the table and
    /// index names from the `PODIUM_*` environment variables.
    pub async fn from_env() -> Result<Self> {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&sdk_config), Config::from_env())
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.config.table_name
    }

    async fn get_physical(
        &self,
        key: &PrimaryKey,
        entity_type: &'static str,
    ) -> Result<Option<PhysicalItem>> {
        tracing::debug!(pk = %key.pk, sk_gsi = %key.sk_gsi, "GetItem");
        let result = self
            .client
            .get_item()
            .table_name(&self.config.table_name)
            .key(ATTR_PK, AttributeValue::S(key.pk.clone()))
            .key(ATTR_SK_GSI, AttributeValue::S(key.sk_gsi.clone()))
            .send()
            .await
            .map_err(|err| map_get_item_error(err, entity_type, key.pk.clone()))?;

        match result.item {
            Some(attrs) => Ok(Some(attribute_values_to_item(&attrs)?)),
            None => Ok(None),
        }
    }

    async fn put_physical(&self, item: &PhysicalItem) -> Result<()> {
        tracing::debug!(pk = %item.keys.pk, sk_gsi = %item.keys.sk_gsi, "PutItem");
        self.client
            .put_item()
            .table_name(&self.config.table_name)
            .set_item(Some(item_to_attribute_values(item)))
            .send()
            .await
            .map_err(map_put_item_error)?;

        Ok(())
    }

    async fn delete_physical(&self, key: &PrimaryKey, entity_type: &'static str) -> Result<()> {
        tracing::debug!(pk = %key.pk, sk_gsi = %key.sk_gsi, "DeleteItem");
        self.client
            .delete_item()
            .table_name(&self.config.table_name)
            .key(ATTR_PK, AttributeValue::S(key.pk.clone()))
            .key(ATTR_SK_GSI, AttributeValue::S(key.sk_gsi.clone()))
            .condition_expression("attribute_exists(PK)")
            .send()
            .await
            .map_err(|err| map_delete_item_error(err, entity_type, key.pk.clone()))?;

        Ok(())
    }

    async fn run_query(
        &self,
        query: &QueryKey,
        limit: usize,
        start: Option<ExclusiveStartKey>,
    ) -> Result<Vec<PhysicalItem>> {
        let (partition_attr, sort_attr) = index_attrs(query.index);
        tracing::debug!(partition = %query.partition, index = ?query.index, limit, "Query");

        let mut request = self.client.query().table_name(&self.config.table_name);
        match query.index {
            TargetIndex::Table => {}
            TargetIndex::OverloadedGsi => {
                request = request.index_name(&self.config.overloaded_index);
            }
            TargetIndex::PointsLsi => {
                request = request.index_name(&self.config.points_index);
            }
        }

        let mut condition = "#partition = :partition".to_string();
        request = request
            .expression_attribute_names("#partition", partition_attr)
            .expression_attribute_values(":partition", AttributeValue::S(query.partition.clone()));
        match &query.sort {
            None => {}
            Some(SortCondition::Prefix(prefix)) => {
                condition.push_str(" AND begins_with(#sort, :sort)");
                request = request
                    .expression_attribute_names("#sort", sort_attr)
                    .expression_attribute_values(":sort", AttributeValue::S(prefix.clone()));
            }
            Some(SortCondition::AtLeast(bound)) => {
                condition.push_str(" AND #sort >= :sort");
                request = request
                    .expression_attribute_names("#sort", sort_attr)
                    .expression_attribute_values(":sort", AttributeValue::S(bound.clone()));
            }
            Some(SortCondition::Between { start, end }) => {
                condition.push_str(" AND #sort BETWEEN :start AND :end");
                request = request
                    .expression_attribute_names("#sort", sort_attr)
                    .expression_attribute_values(":start", AttributeValue::S(start.clone()))
                    .expression_attribute_values(":end", AttributeValue::S(end.clone()));
            }
        }

        request = request
            .key_condition_expression(condition)
            .scan_index_forward(!query.descending)
            .limit(limit.min(i32::MAX as usize) as i32);

        if let Some(start) = start {
            request =
                request.set_exclusive_start_key(Some(start_key_attrs(query.index, sort_attr, &start)));
        }

        let result = request.send().await.map_err(map_query_error)?;
        result
            .items
            .unwrap_or_default()
            .iter()
            .map(attribute_values_to_item)
            .collect()
    }
}

/// The (partition, sort) attribute names addressed by each index.
fn index_attrs(index: TargetIndex) -> (&'static str, &'static str) {
    match index {
        TargetIndex::Table => (ATTR_PK, ATTR_SK_GSI),
        TargetIndex::OverloadedGsi => (ATTR_SK_GSI, ATTR_GSI_SK),
        TargetIndex::PointsLsi => (ATTR_PK, ATTR_LSI),
    }
}

/// Builds the `ExclusiveStartKey` attribute map. Index queries need the
/// table primary key plus the index sort value.
fn start_key_attrs(
    index: TargetIndex,
    sort_attr: &str,
    start: &ExclusiveStartKey,
) -> HashMap<String, AttributeValue> {
    let mut attrs = HashMap::new();
    attrs.insert(
        ATTR_PK.to_string(),
        AttributeValue::S(start.primary.pk.clone()),
    );
    attrs.insert(
        ATTR_SK_GSI.to_string(),
        AttributeValue::S(start.primary.sk_gsi.clone()),
    );
    if index != TargetIndex::Table {
        if let Some(index_sort) = &start.index_sort {
            attrs.insert(sort_attr.to_string(), AttributeValue::S(index_sort.clone()));
        }
    }
    attrs
}

// ============================================================================
// RankingRepository implementation
// ============================================================================

#[async_trait]
impl RankingRepository for DynamoDbRepository {
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
        match self.get_physical(&key, "AthleteRanking").await? {
            Some(item) => Ok(Some(RankingCodec.to_record(&item)?)),
            None => Ok(None),
        }
    }

    async fn put_ranking(&self, record: &AthleteRanking) -> Result<()> {
        self.put_physical(&RankingCodec.to_attrs(record)?).await
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
        self.delete_physical(&key, "AthleteRanking").await
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
        let items = self.run_query(&query, limit, start).await?;
        items
            .iter()
            .map(|item| Ok(RankingCodec.to_record(item)?))
            .collect()
    }
}

// ============================================================================
// ContestRepository implementation
// ============================================================================

#[async_trait]
impl ContestRepository for DynamoDbRepository {
    async fn get_contest(
        &self,
        contest_id: &str,
        discipline: Discipline,
        year: u16,
    ) -> Result<Option<DisciplineContest>> {
        let key = ContestCodec::primary_key(contest_id, discipline, year)?;
        match self.get_physical(&key, "DisciplineContest").await? {
            Some(item) => Ok(Some(ContestCodec.to_record(&item)?)),
            None => Ok(None),
        }
    }

    async fn put_contest(&self, record: &DisciplineContest) -> Result<()> {
        self.put_physical(&ContestCodec.to_attrs(record)?).await
    }

    async fn delete_contest(
        &self,
        contest_id: &str,
        discipline: Discipline,
        year: u16,
    ) -> Result<()> {
        let key = ContestCodec::primary_key(contest_id, discipline, year)?;
        self.delete_physical(&key, "DisciplineContest").await
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
        let items = self.run_query(&query, limit, start).await?;
        items
            .iter()
            .map(|item| Ok(ContestCodec.to_record(item)?))
            .collect()
    }
}

// ============================================================================
// ResultRepository implementation
// ============================================================================

#[async_trait]
impl ResultRepository for DynamoDbRepository {
    async fn get_result(
        &self,
        athlete_id: &str,
        contest_id: &str,
        discipline: Discipline,
        year: u16,
        date: NaiveDate,
    ) -> Result<Option<ContestResult>> {
        let key = ResultCodec::primary_key(athlete_id, contest_id, discipline, year, date)?;
        match self.get_physical(&key, "ContestResult").await? {
            Some(item) => Ok(Some(ResultCodec.to_record(&item)?)),
            None => Ok(None),
        }
    }

    async fn put_result(&self, record: &ContestResult) -> Result<()> {
        self.put_physical(&ResultCodec.to_attrs(record)?).await
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
        self.delete_physical(&key, "ContestResult").await
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
        let items = self.run_query(&query, limit, start).await?;
        items
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
        let items = self.run_query(&query, limit, None).await?;
        items
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
        let items = self.run_query(&query, limit, None).await?;
        items
            .iter()
            .map(|item| Ok(ResultCodec.to_record(item)?))
            .collect()
    }
}
