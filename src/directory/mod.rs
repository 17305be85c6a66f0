/// Directory records and the query engine that searches and ranks them
pub mod models;
pub mod query;
pub mod ranking;
pub mod validation;

pub use models::{Actor, Profile};
pub use query::{leaderboard, query, TOP_N};
pub use ranking::{rank, RankKey, Ranked, LEADERBOARD_RANKING, SEARCH_RANKING};
pub use validation::{validate_profile, ValidationError, ValidationResult};
