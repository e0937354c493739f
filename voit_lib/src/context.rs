//! Per-chain crawl state carried from one stage to the next.

use serde_json::{Map, Value};
use vlaanderenkiest_api::Endpoints;

/// State of one municipality (and, after stage 1, one party) crawl chain.
///
/// A context only ever gains fields. Every party found in stage 1 gets its own
/// owned copy, so branches never share state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CrawlContext {
    pub municipality_id: String,
    /// Key the party's entry was stored under in the stage 1 response.
    pub party_key: Option<String>,
    /// Numeric party list id (`nr`).
    pub party_id: Option<i64>,
    /// Party list name (`nm`).
    pub party_name: Option<String>,
    /// Candidate attributes keyed by candidate id, from stage 2.
    pub candidate_list: Option<Map<String, Value>>,
}

impl CrawlContext {
    /// Seeds a chain for one municipality.
    pub fn new(municipality_id: impl Into<String>) -> Self {
        Self {
            municipality_id: municipality_id.into(),
            ..Self::default()
        }
    }

    /// Derives the branch context for one party, leaving `self` untouched.
    pub fn with_party(&self, party_key: &str, party_id: i64, party_name: &str) -> Self {
        let mut branch = self.clone();
        branch.party_key = Some(party_key.to_string());
        branch.party_id = Some(party_id);
        branch.party_name = Some(party_name.to_string());
        branch
    }

    pub fn with_candidate_list(mut self, candidate_list: Map<String, Value>) -> Self {
        self.candidate_list = Some(candidate_list);
        self
    }

    /// Stage 1 URL.
    pub fn party_lists_url(&self, endpoints: &Endpoints) -> String {
        endpoints.party_lists(&self.municipality_id)
    }

    /// Stage 2 URL, or `None` before a party has been assigned.
    pub fn candidate_list_url(&self, endpoints: &Endpoints) -> Option<String> {
        self.party_id
            .map(|party_id| endpoints.candidate_list(&self.municipality_id, party_id))
    }

    /// Stage 3 URL, or `None` before a party has been assigned.
    pub fn candidate_results_url(&self, endpoints: &Endpoints) -> Option<String> {
        self.party_id
            .map(|party_id| endpoints.candidate_results(&self.municipality_id, party_id))
    }
}
