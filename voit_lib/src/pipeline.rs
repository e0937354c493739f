//! Three-stage crawl: party lists → candidate list → candidate results.
//!
//! Each municipality seeds one chain. Stage 1 fans out into one branch per
//! party; every branch then runs stages 2 and 3 on its own and streams its
//! records to the caller. A failing chain is abandoned without touching any
//! other chain.
//!
//! Uses JoinSet + Semaphore + mpsc: one task per municipality, a nested task
//! per party, a shared semaphore bounding requests in flight.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::client::PoliteClient;
use crate::config::{CrawlConfig, MAX_CONCURRENCY};
use crate::context::CrawlContext;
use crate::error::CrawlError;
use crate::merge::{merge_candidates, ResultRecord};
use crate::search::{find_by_key, kind};

/// Key holding the party lists in the stage 1 response.
pub const PARTY_LISTS_KEY: &str = "G";
/// Key holding the per-candidate results in the stage 3 response.
pub const CANDIDATE_RESULTS_KEY: &str = "kd";

/// Crawl stage a chain is waiting on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    AwaitingPartyList,
    AwaitingCandidateList,
    AwaitingCandidateResults,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AwaitingPartyList => "party-list",
            Self::AwaitingCandidateList => "candidate-list",
            Self::AwaitingCandidateResults => "candidate-results",
        };
        f.write_str(name)
    }
}

/// Why a chain stopped before producing records. Never fatal to the crawl.
#[derive(thiserror::Error, Debug)]
pub enum Abandon {
    #[error("fetch failed: {0}")]
    Fetch(#[source] CrawlError),
    #[error("response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("value not found for key {0}")]
    MissingKey(String),
    #[error("value under key {key} is a {found}, expected {expected}")]
    UnexpectedShape {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("invalid document: {0}")]
    InvalidDocument(#[source] CrawlError),
    #[error("no party id to build the URL from")]
    MissingPartyId,
}

/// Stage 1: turns a party-lists body into one branch context per valid party.
///
/// Parties whose `nr` or `nm` is missing or falsy are skipped.
pub fn parse_party_lists(ctx: &CrawlContext, body: &str) -> Result<Vec<CrawlContext>, Abandon> {
    let doc: Value = serde_json::from_str(body)?;
    let parties = lookup(&doc, PARTY_LISTS_KEY)?;
    let parties = parties
        .as_object()
        .ok_or_else(|| shape(PARTY_LISTS_KEY, "object", parties))?;

    let mut branches = Vec::with_capacity(parties.len());
    for (party_key, descriptor) in parties {
        let party_id = descriptor.get("nr").and_then(party_id);
        let party_name = descriptor.get("nm").and_then(party_name);
        match (party_id, party_name) {
            (Some(id), Some(name)) => branches.push(ctx.with_party(party_key, id, name)),
            _ => tracing::debug!(
                municipality_id = %ctx.municipality_id,
                party_key = %party_key,
                "skipping party with incomplete descriptor"
            ),
        }
    }
    Ok(branches)
}

/// Stage 2: extracts the candidate list stored under the branch's party key.
pub fn parse_candidate_list(
    ctx: &CrawlContext,
    body: &str,
) -> Result<Map<String, Value>, Abandon> {
    let doc: Value = serde_json::from_str(body)?;
    let key = ctx.party_key.as_deref().unwrap_or_default();
    let candidates = lookup(&doc, key)?;
    candidates
        .as_object()
        .cloned()
        .ok_or_else(|| shape(key, "object", candidates))
}

/// Stage 3: merges the candidate results with the branch's candidate list.
pub fn parse_candidate_results(
    ctx: &CrawlContext,
    body: &str,
) -> Result<Vec<ResultRecord>, Abandon> {
    let doc: Value = serde_json::from_str(body)?;
    let results = lookup(&doc, CANDIDATE_RESULTS_KEY)?;
    let results = results
        .as_array()
        .ok_or_else(|| shape(CANDIDATE_RESULTS_KEY, "array", results))?;

    let empty = Map::new();
    let candidate_list = ctx.candidate_list.as_ref().unwrap_or(&empty);
    let party_name = ctx.party_name.as_deref().unwrap_or_default();
    Ok(merge_candidates(candidate_list, results, party_name))
}

fn lookup<'a>(doc: &'a Value, key: &str) -> Result<&'a Value, Abandon> {
    find_by_key(doc, key)
        .map_err(Abandon::InvalidDocument)?
        .ok_or_else(|| Abandon::MissingKey(key.to_string()))
}

fn shape(key: &str, expected: &'static str, found: &Value) -> Abandon {
    Abandon::UnexpectedShape {
        key: key.to_string(),
        expected,
        found: kind(found),
    }
}

/// `nr` as a non-zero integer, given as a number or a digit string.
///
/// Digit strings are parsed, so `"007"` yields 7 and URLs carry `/7/`.
fn party_id(value: &Value) -> Option<i64> {
    let id = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    id.filter(|id| *id != 0)
}

fn party_name(value: &Value) -> Option<&str> {
    value.as_str().filter(|name| !name.is_empty())
}

/// Counters of a finished crawl.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pub municipalities: usize,
    pub parties: usize,
    pub chains_completed: usize,
    pub chains_abandoned: usize,
    pub records: usize,
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} municipalities, {} parties, {} chains completed, {} abandoned, {} records",
            self.municipalities,
            self.parties,
            self.chains_completed,
            self.chains_abandoned,
            self.records
        )
    }
}

#[derive(Default)]
struct CrawlStats {
    municipalities: AtomicUsize,
    parties: AtomicUsize,
    chains_completed: AtomicUsize,
    chains_abandoned: AtomicUsize,
    records: AtomicUsize,
}

impl CrawlStats {
    fn report(&self) -> CrawlReport {
        CrawlReport {
            municipalities: self.municipalities.load(Ordering::Relaxed),
            parties: self.parties.load(Ordering::Relaxed),
            chains_completed: self.chains_completed.load(Ordering::Relaxed),
            chains_abandoned: self.chains_abandoned.load(Ordering::Relaxed),
            records: self.records.load(Ordering::Relaxed),
        }
    }
}

/// Records and counters of a collected crawl.
#[derive(Debug)]
pub struct CrawlOutput {
    pub records: Vec<ResultRecord>,
    pub report: CrawlReport,
}

/// Runs crawl chains for a list of municipalities.
pub struct Crawler {
    client: Arc<PoliteClient>,
    concurrency: usize,
}

impl Crawler {
    /// Builds a crawler and its HTTP client from `config`.
    pub fn new(config: &CrawlConfig) -> Result<Self, CrawlError> {
        let client = PoliteClient::new(config)?;
        Ok(Self::with_client(client, config.effective_concurrency()))
    }

    /// Concurrency is clamped to `1..=MAX_CONCURRENCY`.
    pub fn with_client(client: PoliteClient, concurrency: usize) -> Self {
        Self {
            client: Arc::new(client),
            concurrency: concurrency.clamp(1, MAX_CONCURRENCY),
        }
    }

    /// Crawls every municipality and collects the records.
    ///
    /// Record order is unspecified.
    pub async fn collect(&self, municipality_ids: Vec<String>) -> CrawlOutput {
        let (tx, mut rx) = mpsc::channel::<ResultRecord>(self.concurrency.saturating_mul(2));
        let receive = async {
            let mut records = Vec::new();
            while let Some(record) = rx.recv().await {
                records.push(record);
            }
            records
        };
        let (report, records) = tokio::join!(self.crawl(municipality_ids, tx), receive);
        CrawlOutput { records, report }
    }

    /// Crawls every municipality, sending records to `tx` as they are produced.
    ///
    /// Returns once every chain has finished or been abandoned.
    pub async fn crawl(
        &self,
        municipality_ids: Vec<String>,
        tx: mpsc::Sender<ResultRecord>,
    ) -> CrawlReport {
        let chain = Chain {
            client: Arc::clone(&self.client),
            permits: Arc::new(Semaphore::new(self.concurrency)),
            stats: Arc::new(CrawlStats::default()),
            tx,
        };
        tracing::info!(
            municipalities = municipality_ids.len(),
            concurrency = self.concurrency,
            "starting crawl"
        );

        let mut join_set = JoinSet::new();
        for municipality_id in municipality_ids {
            join_set.spawn(
                chain
                    .clone()
                    .run_municipality(CrawlContext::new(municipality_id)),
            );
        }
        let stats = Arc::clone(&chain.stats);
        drop(chain);

        while let Some(joined) = join_set.join_next().await {
            if let Err(e) = joined {
                tracing::error!("municipality task failed: {}", e);
            }
        }

        let report = stats.report();
        tracing::info!("crawl finished: {}", report);
        report
    }
}

/// Shared handles one chain needs; cheap to clone per branch.
#[derive(Clone)]
struct Chain {
    client: Arc<PoliteClient>,
    permits: Arc<Semaphore>,
    stats: Arc<CrawlStats>,
    tx: mpsc::Sender<ResultRecord>,
}

impl Chain {
    async fn fetch(&self, url: Option<String>) -> Result<String, Abandon> {
        let url = url.ok_or(Abandon::MissingPartyId)?;
        let _permit = self.permits.acquire().await.expect("semaphore closed");
        tracing::debug!(url = %url, "fetching");
        self.client.fetch(&url).await.map_err(Abandon::Fetch)
    }

    async fn run_municipality(self, ctx: CrawlContext) {
        self.stats.municipalities.fetch_add(1, Ordering::Relaxed);

        let url = ctx.party_lists_url(self.client.endpoints());
        let branches = match self.fetch(Some(url)).await {
            Ok(body) => parse_party_lists(&ctx, &body),
            Err(abandon) => Err(abandon),
        };
        let branches = match branches {
            Ok(branches) => branches,
            Err(abandon) => return self.abandon(&ctx, Stage::AwaitingPartyList, &abandon),
        };
        self.stats
            .parties
            .fetch_add(branches.len(), Ordering::Relaxed);
        tracing::debug!(
            municipality_id = %ctx.municipality_id,
            parties = branches.len(),
            "party lists found"
        );

        let mut join_set = JoinSet::new();
        for branch in branches {
            join_set.spawn(self.clone().run_party(branch));
        }
        while let Some(joined) = join_set.join_next().await {
            if let Err(e) = joined {
                tracing::error!(
                    municipality_id = %ctx.municipality_id,
                    "party task failed: {}",
                    e
                );
            }
        }
    }

    async fn run_party(self, ctx: CrawlContext) {
        let url = ctx.candidate_list_url(self.client.endpoints());
        let candidate_list = match self.fetch(url).await {
            Ok(body) => parse_candidate_list(&ctx, &body),
            Err(abandon) => Err(abandon),
        };
        let ctx = match candidate_list {
            Ok(list) => ctx.with_candidate_list(list),
            Err(abandon) => return self.abandon(&ctx, Stage::AwaitingCandidateList, &abandon),
        };

        // Every failure to obtain or decode the body abandons the branch, not
        // only JSON syntax errors.
        let url = ctx.candidate_results_url(self.client.endpoints());
        let records = match self.fetch(url).await {
            Ok(body) => parse_candidate_results(&ctx, &body),
            Err(abandon) => Err(abandon),
        };
        let records = match records {
            Ok(records) => records,
            Err(abandon) => {
                return self.abandon(&ctx, Stage::AwaitingCandidateResults, &abandon)
            }
        };

        for record in records {
            if self.tx.send(record).await.is_err() {
                tracing::debug!("record receiver dropped, stopping chain");
                return;
            }
            self.stats.records.fetch_add(1, Ordering::Relaxed);
        }
        self.stats.chains_completed.fetch_add(1, Ordering::Relaxed);
    }

    fn abandon(&self, ctx: &CrawlContext, stage: Stage, abandon: &Abandon) {
        self.stats.chains_abandoned.fetch_add(1, Ordering::Relaxed);
        let party_key = ctx.party_key.as_deref().unwrap_or("-");
        match abandon {
            Abandon::Fetch(_) | Abandon::Parse(_) => tracing::debug!(
                municipality_id = %ctx.municipality_id,
                party_key,
                %stage,
                "chain abandoned: {}",
                abandon
            ),
            Abandon::MissingKey(_) | Abandon::UnexpectedShape { .. } | Abandon::MissingPartyId => {
                tracing::warn!(
                    municipality_id = %ctx.municipality_id,
                    party_key,
                    party_id = ?ctx.party_id,
                    %stage,
                    "{}",
                    abandon
                )
            }
            Abandon::InvalidDocument(_) => tracing::error!(
                municipality_id = %ctx.municipality_id,
                party_key,
                %stage,
                "chain abandoned: {}",
                abandon
            ),
        }
    }
}
