/// Directory record models
///
/// A read-only typed view over a stored record. Only the fields the query
/// engine depends on are strictly typed. Every other field is optional and
/// tolerant: a missing or wrong-typed value is treated as absent instead of
/// rejecting the whole record. Responses carry the stored record itself, never
/// a re-serialized view.
use crate::directory::validation;
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::{Number, Value};

/// Identity information for a directory participant
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    #[serde(default, deserialize_with = "lenient")]
    pub userkey: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub avatar: Option<String>,
    pub name: String,
    pub username: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub score_xp_multiplier: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub profile_id: Option<i64>,
    /// Opaque address string, never parsed
    #[serde(default, deserialize_with = "lenient")]
    pub primary_address: Option<String>,
}

/// A directory entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub archived: Option<bool>,
    /// Epoch milliseconds
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<i64>,
    /// Epoch milliseconds
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<i64>,
    pub invites_available: Number,
    #[serde(default, deserialize_with = "lenient")]
    pub invited_by: Option<i64>,
    pub actor: Actor,
    #[serde(default, deserialize_with = "lenient")]
    pub inviter_actor: Option<Actor>,
}

/// Deserialize an optional field, mapping any type mismatch to `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl Actor {
    /// Score as a float; a missing score ranks as zero
    pub fn score_value(&self) -> f64 {
        self.score.as_ref().and_then(Number::as_f64).unwrap_or(0.0)
    }

    /// Case-insensitive substring match on username or display name.
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        self.username.to_lowercase().contains(needle) || self.name.to_lowercase().contains(needle)
    }
}

impl Profile {
    /// Build a profile from a raw dataset record, or `None` if the record fails
    /// the shape check
    pub fn from_record(record: &Value) -> Option<Self> {
        if let Err(errors) = validation::validate_profile(record) {
            tracing::trace!(errors = errors.len(), "dropping invalid profile record");
            return None;
        }

        match Profile::deserialize(record) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::trace!(error = %e, "dropping undecodable profile record");
                None
            }
        }
    }

    pub fn invites_value(&self) -> f64 {
        self.invites_available.as_f64().unwrap_or(0.0)
    }
}
