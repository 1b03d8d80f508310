mod error;
mod traits;
mod types;

pub use error::{DateRangeError, RepositoryError, Result};
pub use traits::{ContestRepository, RankingRepository, ResultRepository};
pub use types::DateRange;
