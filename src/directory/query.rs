/// Query engine over the full directory snapshot
///
/// Pure functions: no I/O, and the input records are never mutated. Results are
/// the stored records themselves, unchanged, in ranked order; the typed
/// [`Profile`] view is only used to filter and sort them.
use crate::directory::{
    models::Profile,
    ranking::{rank, Ranked, LEADERBOARD_RANKING, SEARCH_RANKING},
};
use serde_json::Value;

/// Size of the unfiltered result and of the leaderboard
pub const TOP_N: usize = 10;

/// A valid record paired with its typed view
struct Entry<'a> {
    profile: Profile,
    record: &'a Value,
}

impl Ranked for Entry<'_> {
    fn profile(&self) -> &Profile {
        &self.profile
    }
}

fn valid_entries(records: &[Value]) -> Vec<Entry<'_>> {
    records
        .iter()
        .filter_map(|record| Profile::from_record(record).map(|profile| Entry { profile, record }))
        .collect()
}

fn search_entries<'a>(records: &'a [Value], search_term: &str) -> Vec<Entry<'a>> {
    let mut entries = valid_entries(records);

    if !search_term.is_empty() {
        let needle = search_term.to_lowercase();
        entries.retain(|entry| entry.profile.actor.matches(&needle));
    }

    rank(&mut entries, SEARCH_RANKING);

    if search_term.is_empty() {
        entries.truncate(TOP_N);
    }

    entries
}

fn into_records(entries: Vec<Entry<'_>>) -> Vec<Value> {
    entries.into_iter().map(|entry| entry.record.clone()).collect()
}

/// Validate, filter, rank and truncate the dataset for one search term.
///
/// An empty term returns the top [`TOP_N`] valid records by invites. A
/// non-empty term returns every valid record whose username or name contains
/// it, case-insensitively, with no truncation.
pub fn query(records: &[Value], search_term: &str) -> Vec<Value> {
    into_records(search_entries(records, search_term))
}

/// Top records by invites, ties broken by actor score.
///
/// Re-ranks the unfiltered query result, so the candidate set is exactly what
/// an empty search returns.
pub fn leaderboard(records: &[Value]) -> Vec<Value> {
    let mut top = search_entries(records, "");
    rank(&mut top, LEADERBOARD_RANKING);
    top.truncate(TOP_N);
    into_records(top)
}
