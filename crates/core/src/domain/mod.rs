mod enums;
mod records;

pub use enums::{AgeCategory, ContestSize, Discipline, Gender, RankingType, YEAR_ALL};
pub use records::{AthleteRanking, ContestResult, DisciplineContest};
