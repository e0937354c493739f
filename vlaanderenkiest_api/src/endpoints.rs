//! Endpoint URL templates for the three crawl stages.

/// Base path shared by every municipality endpoint of the 2018 local elections.
pub const DEFAULT_BASE_URL: &str =
    "https://vlaanderenkiest.be/verkiezingen2018/api/2018/lv/gemeente";

/// Builds the endpoint URLs for a municipality and, where needed, a party.
///
/// Ids are interpolated as-is. A malformed id simply yields a URL that fails
/// at fetch time.
#[derive(Clone, Debug)]
pub struct Endpoints {
    base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new()
    }
}

impl Endpoints {
    /// Endpoints on the production API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Endpoints under a custom base. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stage 1: the party lists running in a municipality.
    pub fn party_lists(&self, municipality_id: &str) -> String {
        format!("{}/{}/entiteitLijsten.json", self.base_url, municipality_id)
    }

    /// Stage 2: the candidates on one party list.
    pub fn candidate_list(&self, municipality_id: &str, party_id: i64) -> String {
        format!("{}/{}/{}/lijst.json", self.base_url, municipality_id, party_id)
    }

    /// Stage 3: the per-candidate results of one party list.
    pub fn candidate_results(&self, municipality_id: &str, party_id: i64) -> String {
        format!("{}/{}/{}/uitslag.json", self.base_url, municipality_id, party_id)
    }
}
