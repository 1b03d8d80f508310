use std::env;

/// Store configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Physical table name (default: "podium")
    pub table_name: String,
    /// Name of the overloaded GSI partitioned on `SK_GSI` and sorted on
    /// `GSI_SK` (default: "OverloadedIndex")
    pub overloaded_index: String,
    /// Name of the LSI sorted on `LSI` (default: "PointsIndex")
    pub points_index: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PODIUM_TABLE_NAME` - Physical table name (default: "podium")
    /// - `PODIUM_OVERLOADED_INDEX` - Overloaded GSI name (default: "OverloadedIndex")
    /// - `PODIUM_POINTS_INDEX` - Points LSI name (default: "PointsIndex")
    pub fn from_env() -> Self {
        Self {
            table_name: env::var("PODIUM_TABLE_NAME").unwrap_or_else(|_| "podium".to_string()),
            overloaded_index: env::var("PODIUM_OVERLOADED_INDEX")
                .unwrap_or_else(|_| "OverloadedIndex".to_string()),
            points_index: env::var("PODIUM_POINTS_INDEX")
                .unwrap_or_else(|_| "PointsIndex".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
