/// Profile ranking
///
/// One ranking function, parameterized by an ordered list of descending sort
/// keys. Later keys only break ties left by earlier ones. The sort is stable, so
/// records that tie on every key keep their dataset order.
use crate::directory::models::Profile;
use std::cmp::Ordering;

/// A descending sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankKey {
    InvitesAvailable,
    Score,
}

/// Anything that exposes the ranking keys of a profile
pub trait Ranked {
    fn profile(&self) -> &Profile;
}

impl Ranked for Profile {
    fn profile(&self) -> &Profile {
        self
    }
}

impl RankKey {
    fn value(self, profile: &Profile) -> f64 {
        match self {
            RankKey::InvitesAvailable => profile.invites_value(),
            RankKey::Score => profile.actor.score_value(),
        }
    }
}

/// Ranking used by the search endpoint
pub const SEARCH_RANKING: &[RankKey] = &[RankKey::InvitesAvailable];

/// Ranking used by the leaderboard view
pub const LEADERBOARD_RANKING: &[RankKey] = &[RankKey::InvitesAvailable, RankKey::Score];

/// Compare two profiles under `keys`, highest first
pub fn compare(a: &Profile, b: &Profile, keys: &[RankKey]) -> Ordering {
    keys.iter().fold(Ordering::Equal, |ord, key| {
        ord.then_with(|| key.value(b).total_cmp(&key.value(a)))
    })
}

/// Sort in place, highest first
pub fn rank<T: Ranked>(items: &mut [T], keys: &[RankKey]) {
    items.sort_by(|a, b| compare(a.profile(), b.profile(), keys));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(username: &str, invites: u64, score: u64) -> Profile {
        Profile::from_record(&json!({
            "invitesAvailable": invites,
            "actor": { "username": username, "name": username, "score": score }
        }))
        .unwrap()
    }

    fn usernames(profiles: &[Profile]) -> Vec<&str> {
        profiles.iter().map(|p| p.actor.username.as_str()).collect()
    }

    #[test]
    fn test_search_ranking_ignores_score() {
        let mut profiles = vec![profile("alice", 5, 10), profile("bob", 5, 20), profile("carol", 9, 0)];
        rank(&mut profiles, SEARCH_RANKING);

        // Stable sort keeps alice ahead of bob
        assert_eq!(usernames(&profiles), vec!["carol", "alice", "bob"]);
    }

    #[test]
    fn test_leaderboard_ranking_breaks_ties_on_score() {
        let mut profiles = vec![profile("alice", 5, 10), profile("bob", 5, 20)];
        rank(&mut profiles, LEADERBOARD_RANKING);

        assert_eq!(usernames(&profiles), vec!["bob", "alice"]);
    }

    #[test]
    fn test_missing_score_ranks_as_zero() {
        let unscored = Profile::from_record(&json!({
            "invitesAvailable": 1,
            "actor": { "username": "dave", "name": "Dave" }
        }))
        .unwrap();
        let mut profiles = vec![unscored, profile("erin", 1, 3)];
        rank(&mut profiles, LEADERBOARD_RANKING);

        assert_eq!(usernames(&profiles), vec!["erin", "dave"]);
    }

    #[test]
    fn test_fractional_invites_compare_numerically() {
        let fractional = Profile::from_record(&json!({
            "invitesAvailable": 2.5,
            "actor": { "username": "frank", "name": "Frank" }
        }))
        .unwrap();
        let mut profiles = vec![profile("gina", 2, 0), fractional];
        rank(&mut profiles, SEARCH_RANKING);

        assert_eq!(usernames(&profiles), vec!["frank", "gina"]);
    }
}
