/// Profile search and leaderboard endpoints
use crate::{context::AppContext, directory, error::DirectoryResult};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Build profile routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/profiles", get(search_profiles))
        .route("/api/profiles/leaderboard", get(get_leaderboard))
}

/// Query parameters for the search endpoint
#[derive(Debug, Default, PartialEq)]
pub struct SearchParams {
    /// Substring matched against username and display name; absent means empty
    pub username: Option<String>,
}

impl SearchParams {
    /// Pick parameters out of the raw query pairs.
    ///
    /// A repeated `username` uses its first value; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let username = pairs
            .into_iter()
            .find(|(key, _)| key == "username")
            .map(|(_, value)| value);
        Self { username }
    }
}

/// Response envelope shared by both endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfilesResponse {
    pub data: ProfilesData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfilesData {
    /// Stored records, unchanged, in ranked order
    pub values: Vec<Value>,
}

impl From<Vec<Value>> for ProfilesResponse {
    fn from(values: Vec<Value>) -> Self {
        Self {
            data: ProfilesData { values },
        }
    }
}

/// Search profiles by username or name
///
/// An empty term returns the top ten by invites available.
pub async fn search_profiles(
    State(ctx): State<AppContext>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> DirectoryResult<Json<ProfilesResponse>> {
    let term = SearchParams::from_pairs(pairs).username.unwrap_or_default();
    let records = ctx.store.load().await?;

    let values = directory::query(&records, &term);
    tracing::debug!(
        term = %term,
        records = records.len(),
        returned = values.len(),
        "search_profiles"
    );

    Ok(Json(values.into()))
}

/// Top ten by invites available, ties broken by score
pub async fn get_leaderboard(
    State(ctx): State<AppContext>,
) -> DirectoryResult<Json<ProfilesResponse>> {
    let records = ctx.store.load().await?;

    let values = directory::leaderboard(&records);
    tracing::debug!(returned = values.len(), "get_leaderboard");

    Ok(Json(values.into()))
}
