//! Joins a party's candidate list with its results and keeps active candidates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One candidate's result, as emitted by the crawler.
///
/// `ranking`, `name` and `votes` are copied from the API without coercion; a
/// field the API left out is `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub party: String,
    pub ranking: Value,
    pub name: Value,
    pub votes: Value,
}

/// Merges `candidate_list` with `results` by candidate key and returns the
/// records of candidates whose merged `vk` flag is the string `"1"`.
///
/// Candidates are visited in list order. For each one the first result entry
/// holding that key is merged over the candidate's attributes, result fields
/// taking precedence. Candidates without a result entry are dropped.
pub fn merge_candidates(
    candidate_list: &Map<String, Value>,
    results: &[Value],
    party_name: &str,
) -> Vec<ResultRecord> {
    merge_by_key(candidate_list, results)
        .values()
        .filter(|merged| is_active(merged))
        .map(|merged| ResultRecord {
            party: party_name.to_string(),
            ranking: field(merged, "vv"),
            name: field(merged, "nm"),
            votes: field(merged, "ns"),
        })
        .collect()
}

/// The join half of [`merge_candidates`], keyed by candidate id.
pub fn merge_by_key(
    candidate_list: &Map<String, Value>,
    results: &[Value],
) -> Map<String, Value> {
    let mut merged_records = Map::new();
    for (candidate_key, attrs) in candidate_list {
        let Some(attrs) = attrs.as_object() else {
            tracing::debug!(
                candidate_key = %candidate_key,
                "candidate attributes are not an object"
            );
            continue;
        };
        let Some(result) = first_result_for(results, candidate_key) else {
            continue;
        };
        let mut merged = attrs.clone();
        for (name, value) in result {
            merged.insert(name.clone(), value.clone());
        }
        merged_records.insert(candidate_key.clone(), Value::Object(merged));
    }
    merged_records
}

fn first_result_for<'a>(
    results: &'a [Value],
    candidate_key: &str,
) -> Option<&'a Map<String, Value>> {
    results
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|entry| entry.get(candidate_key))
        .find_map(Value::as_object)
}

/// Exact string comparison; `1` or `"01"` are not active.
fn is_active(merged: &Value) -> bool {
    matches!(merged.get("vk"), Some(Value::String(flag)) if flag == "1")
}

fn field(merged: &Value, name: &str) -> Value {
    merged.get(name).cloned().unwrap_or(Value::Null)
}
