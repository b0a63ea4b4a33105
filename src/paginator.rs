//! Walks paged CAIC collection endpoints.
//!
//! The API pages two ways. The v2 endpoints return a bare array and the
//! walk ends on the first short page. The legacy endpoint returns
//! `meta`/`links`/`data` and reports its page count. Both go through the
//! same loop, retry budget and page ceiling.
//!
//! A walk never fails: once the retry budget is spent it returns whatever
//! was accumulated. An empty result can mean "no data" or "every request
//! failed"; only the logs tell them apart.

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::legacy::{ObservationShape, V1AvyResponse};
use crate::models::{AvalancheObservation, Record};
use crate::query::Params;
use crate::transport::Transport;

/// Page size and retry budgets for paged queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    /// Items requested per page (`per`).
    pub per: u32,
    /// Retries of one page before skipping ahead to the next.
    pub retries: u32,
    /// Failed attempts allowed over the whole walk.
    pub total_retries: u32,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            per: 1000,
            retries: 2,
            total_retries: 10,
        }
    }
}

/// Ceiling on the number of pages one walk fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLimit {
    Pages(u32),
    Unlimited,
}

impl PageLimit {
    /// Zero or a negative count disables the ceiling.
    pub fn from_count(count: i64) -> Self {
        if count <= 0 {
            PageLimit::Unlimited
        } else {
            PageLimit::Pages(u32::try_from(count).unwrap_or(u32::MAX))
        }
    }

    fn reached(&self, page: u32) -> bool {
        match self {
            PageLimit::Pages(limit) => page >= *limit,
            PageLimit::Unlimited => false,
        }
    }
}

/// Page-count info from the metadata-bearing shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageMeta {
    pub(crate) current_page: u32,
    pub(crate) total_pages: u32,
}

/// One validated page.
#[derive(Debug)]
pub(crate) struct Page<T> {
    /// Raw item count, before any item was dropped.
    pub(crate) raw_len: usize,
    pub(crate) items: Vec<T>,
    pub(crate) meta: Option<PageMeta>,
}

/// Decodes a bare JSON array of records. Any invalid item fails the page.
pub(crate) fn flat_page<T: Record>(value: Value) -> Result<Page<T>> {
    let Value::Array(raw) = value else {
        return Err(Error::Validation(format!(
            "expected a JSON array of {} objects",
            T::NAME
        )));
    };
    let raw_len = raw.len();
    let items = raw
        .into_iter()
        .map(T::from_value)
        .collect::<Result<Vec<T>>>()?;
    Ok(Page {
        raw_len,
        items,
        meta: None,
    })
}

/// Decodes a legacy avalanche observation page. The envelope must be valid;
/// items that fail conversion are logged and dropped.
pub(crate) fn legacy_avalanche_page(value: Value) -> Result<Page<AvalancheObservation>> {
    let resp: V1AvyResponse = serde_json::from_value(value)
        .map_err(|e| Error::Validation(format!("legacy avalanche observation page: {}", e)))?;

    let raw_len = resp.data.len();
    let mut items = Vec::with_capacity(raw_len);
    for item in resp.data {
        match ObservationShape::detect(item).and_then(AvalancheObservation::from_shape) {
            Ok(obs) => items.push(obs),
            Err(err) => warn!(error = %err, "dropping an avalanche observation that failed validation"),
        }
    }

    Ok(Page {
        raw_len,
        items,
        meta: Some(PageMeta {
            current_page: resp.meta.current_page,
            total_pages: resp.meta.total_pages,
        }),
    })
}

/// Why a walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Termination {
    /// A page came back shorter than `per`.
    LastPage,
    /// The page ceiling was hit; data may be missing.
    PageLimit,
    /// The metadata reported the current page as the last one.
    MetadataComplete,
    /// The page counter passed the reported total without equality.
    MetadataMismatch,
    /// The total retry budget ran out.
    Aborted,
}

impl Termination {
    pub(crate) fn is_aborted(&self) -> bool {
        matches!(self, Termination::Aborted)
    }
}

#[derive(Debug)]
pub(crate) struct Walk<T> {
    pub(crate) records: Vec<T>,
    pub(crate) termination: Termination,
    pub(crate) requests: u32,
}

/// Page and retry counters for one walk.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cursor {
    page: u32,
    page_retries: u32,
    total_retries: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterFailure {
    RetrySamePage,
    SkipAhead,
}

impl Cursor {
    fn new() -> Self {
        Self {
            page: 1,
            page_retries: 0,
            total_retries: 0,
        }
    }

    /// Charges one failure to both budgets. Once this page has used up its
    /// own retries the cursor moves on to the next page.
    fn record_failure(&mut self, policy: &PaginationPolicy) -> AfterFailure {
        self.total_retries += 1;
        if self.page_retries >= policy.retries {
            self.page += 1;
            self.page_retries = 0;
            AfterFailure::SkipAhead
        } else {
            self.page_retries += 1;
            AfterFailure::RetrySamePage
        }
    }

    fn advance(&mut self) {
        self.page += 1;
        self.page_retries = 0;
    }

    fn budget_spent(&self, policy: &PaginationPolicy) -> bool {
        self.total_retries >= policy.total_retries
    }
}

enum State<T> {
    Fetching,
    Validating(Value),
    Advancing(Page<T>),
    Finished(Termination),
}

pub(crate) struct Paginator<'a, Tr: Transport + ?Sized> {
    transport: &'a Tr,
    url: String,
    policy: PaginationPolicy,
    progress: bool,
}

impl<'a, Tr: Transport + ?Sized> Paginator<'a, Tr> {
    pub(crate) fn new(transport: &'a Tr, url: String, policy: PaginationPolicy) -> Self {
        Self {
            transport,
            url,
            policy,
            progress: false,
        }
    }

    pub(crate) fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Fetches pages in order until one of the termination conditions holds.
    /// `page` and `per` are set on top of `params` for every request.
    pub(crate) async fn walk<T, F>(&self, params: &Params, limit: PageLimit, decode: F) -> Walk<T>
    where
        F: Fn(Value) -> Result<Page<T>>,
    {
        let policy = self.policy;
        let per = policy.per.max(1);
        let mut cursor = Cursor::new();
        let mut records: Vec<T> = Vec::new();
        let mut requests = 0u32;
        let pb = self.progress_bar();

        let mut state = State::Fetching;
        let termination = loop {
            state = match state {
                State::Fetching => {
                    if cursor.budget_spent(&policy) {
                        State::Finished(Termination::Aborted)
                    } else {
                        let mut page_params = params.clone();
                        page_params.set("page", cursor.page);
                        page_params.set("per", per);
                        requests += 1;

                        match self.transport.get_json(&self.url, &page_params).await {
                            Ok(value) => State::Validating(value),
                            Err(err) => {
                                error!(
                                    endpoint = %self.url,
                                    page = cursor.page,
                                    error = %err,
                                    "failed to request the CAIC endpoint"
                                );
                                self.after_failure(&mut cursor, limit)
                            }
                        }
                    }
                }
                State::Validating(value) => match decode(value) {
                    Ok(page) => State::Advancing(page),
                    Err(err) => {
                        warn!(
                            endpoint = %self.url,
                            page = cursor.page,
                            query = ?params.to_pairs(),
                            error = %err,
                            "unable to validate response"
                        );
                        self.after_failure(&mut cursor, limit)
                    }
                },
                State::Advancing(page) => {
                    records.extend(page.items);
                    if let Some(pb) = &pb {
                        pb.set_message(format!("page {} ({} records)", cursor.page, records.len()));
                        pb.tick();
                    }

                    if page.raw_len < per as usize {
                        info!(endpoint = %self.url, page = cursor.page, "got all the results for the query");
                        State::Finished(Termination::LastPage)
                    } else if limit.reached(cursor.page) {
                        warn!(
                            endpoint = %self.url,
                            page = cursor.page,
                            "reached the page limit before all pages were downloaded"
                        );
                        State::Finished(Termination::PageLimit)
                    } else if let Some(meta) = page.meta.filter(|m| m.current_page == m.total_pages) {
                        debug!(page = meta.current_page, "metadata reports the last page");
                        State::Finished(Termination::MetadataComplete)
                    } else if let Some(meta) = page.meta.filter(|m| cursor.page >= m.total_pages) {
                        debug!(
                            endpoint = %self.url,
                            page = cursor.page,
                            current_page = meta.current_page,
                            total_pages = meta.total_pages,
                            "pagination mismatch"
                        );
                        State::Finished(Termination::MetadataMismatch)
                    } else {
                        cursor.advance();
                        State::Fetching
                    }
                }
                State::Finished(termination) => break termination,
            };
        };

        if termination.is_aborted() {
            if records.is_empty() {
                error!(
                    severity = "critical",
                    endpoint = %self.url,
                    retries = cursor.total_retries,
                    "all queries failed"
                );
            } else {
                error!(
                    endpoint = %self.url,
                    retries = cursor.total_retries,
                    records = records.len(),
                    "reached the maximum number of query retries, returning partial results"
                );
            }
        }

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        Walk {
            records,
            termination,
            requests,
        }
    }

    fn after_failure<T>(&self, cursor: &mut Cursor, limit: PageLimit) -> State<T> {
        let skipped = cursor.page;
        match cursor.record_failure(&self.policy) {
            AfterFailure::RetrySamePage => State::Fetching,
            AfterFailure::SkipAhead if limit.reached(skipped) => {
                warn!(
                    endpoint = %self.url,
                    page = skipped,
                    "gave up on the last page allowed by the page limit"
                );
                State::Finished(Termination::PageLimit)
            }
            AfterFailure::SkipAhead => {
                warn!(endpoint = %self.url, page = skipped, "skipping a page after repeated failures");
                State::Fetching
            }
        }
    }

    fn progress_bar(&self) -> Option<ProgressBar> {
        if !self.progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]") {
            pb.set_style(style);
        }
        pb.set_message("page 1");
        Some(pb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::capture_logs;
    use crate::transport::testing::ScriptedTransport;
    use serde_json::json;

    fn obs_page(start: usize, n: usize) -> Value {
        Value::Array(
            (start..start + n)
                .map(|i| json!({"id": format!("obs-{i}"), "type": "avalanche_observation"}))
                .collect(),
        )
    }

    fn legacy_page(current: u32, total: u32, start: usize, n: usize) -> Value {
        let data: Vec<Value> = (start..start + n)
            .map(|i| {
                json!({
                    "id": format!("v1-{i}"),
                    "type": "avalanche_observation",
                    "attributes": {"aspect": "N"},
                    "relationships": {}
                })
            })
            .collect();
        json!({
            "meta": {"current_page": current, "page_items": n, "total_pages": total, "total_count": 0},
            "links": {},
            "data": data
        })
    }

    fn policy(per: u32) -> PaginationPolicy {
        PaginationPolicy {
            per,
            ..PaginationPolicy::default()
        }
    }

    fn ids(records: &[AvalancheObservation]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[tokio::test]
    async fn full_pages_then_short_page_is_done() {
        let transport = ScriptedTransport::new(vec![
            Ok(obs_page(0, 3)),
            Ok(obs_page(3, 3)),
            Ok(obs_page(6, 1)),
        ]);
        let paginator = Paginator::new(&transport, "https://api.test/x".into(), policy(3));
        let walk = paginator
            .walk(&Params::new(), PageLimit::Unlimited, flat_page::<AvalancheObservation>)
            .await;

        assert_eq!(walk.termination, Termination::LastPage);
        assert_eq!(
            ids(&walk.records),
            (0..7).map(|i| format!("obs-{i}")).collect::<Vec<_>>()
        );
        assert_eq!(walk.requests, 3);

        let pages: Vec<String> = transport
            .calls()
            .iter()
            .map(|(_, q)| q.iter().find(|(k, _)| k == "page").unwrap().1.clone())
            .collect();
        assert_eq!(pages, vec!["1", "2", "3"]);
        assert!(transport.calls()[0].1.contains(&("per".to_string(), "3".to_string())));
    }

    #[tokio::test]
    async fn metadata_last_page_ends_walk_even_when_full() {
        let transport = ScriptedTransport::new(vec![
            Ok(legacy_page(1, 2, 0, 2)),
            Ok(legacy_page(2, 2, 2, 2)),
            Ok(legacy_page(3, 2, 4, 2)),
        ]);
        let paginator = Paginator::new(&transport, "https://api.test/v1".into(), policy(2));
        let walk = paginator
            .walk(&Params::new(), PageLimit::Unlimited, legacy_avalanche_page)
            .await;

        assert_eq!(walk.termination, Termination::MetadataComplete);
        assert_eq!(walk.records.len(), 4);
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn metadata_that_never_matches_still_stops() {
        // Server keeps reporting current_page 1 of 2.
        let transport = ScriptedTransport::new(vec![
            Ok(legacy_page(1, 2, 0, 2)),
            Ok(legacy_page(1, 2, 2, 2)),
            Ok(legacy_page(1, 2, 4, 2)),
        ]);
        let paginator = Paginator::new(&transport, "https://api.test/v1".into(), policy(2));
        let walk = paginator
            .walk(&Params::new(), PageLimit::Unlimited, legacy_avalanche_page)
            .await;

        assert_eq!(walk.termination, Termination::MetadataMismatch);
        assert_eq!(walk.records.len(), 4);
    }

    #[tokio::test]
    async fn page_limit_cuts_the_walk_short() {
        let transport = ScriptedTransport::new(vec![
            Ok(obs_page(0, 2)),
            Ok(obs_page(2, 2)),
            Ok(obs_page(4, 2)),
            Ok(obs_page(6, 1)),
        ]);
        let (logs, _guard) = capture_logs();
        let paginator = Paginator::new(&transport, "https://api.test/x".into(), policy(2));
        let walk = paginator
            .walk(&Params::new(), PageLimit::Pages(2), flat_page::<AvalancheObservation>)
            .await;

        assert_eq!(walk.termination, Termination::PageLimit);
        assert_eq!(walk.records.len(), 4);
        assert!(walk.records.len() < 7);
        assert_eq!(transport.calls().len(), 2);

        let logs = logs.contents();
        assert!(logs.contains("WARN"), "{logs}");
        assert!(
            logs.contains("reached the page limit before all pages were downloaded"),
            "{logs}"
        );
    }

    #[tokio::test]
    async fn persistent_failure_returns_empty_after_total_budget() {
        let transport = ScriptedTransport::failing();
        let (logs, _guard) = capture_logs();
        let paginator = Paginator::new(&transport, "https://api.test/x".into(), policy(10));
        let walk = paginator
            .walk(&Params::new(), PageLimit::Unlimited, flat_page::<AvalancheObservation>)
            .await;

        assert_eq!(walk.termination, Termination::Aborted);
        assert!(walk.records.is_empty());
        assert_eq!(walk.requests, PaginationPolicy::default().total_retries);

        let logs = logs.contents();
        assert!(logs.contains("severity=\"critical\""), "{logs}");
        assert!(logs.contains("all queries failed"), "{logs}");
        assert!(!logs.contains("returning partial results"), "{logs}");
    }

    #[tokio::test]
    async fn failures_retry_then_skip_ahead() {
        let fail = || Err(Error::Request("HTTP 502".into()));
        let transport = ScriptedTransport::new(vec![
            Ok(obs_page(0, 2)),
            fail(),
            fail(),
            fail(),
            Ok(obs_page(10, 1)),
        ]);
        let paginator = Paginator::new(&transport, "https://api.test/x".into(), policy(2));
        let walk = paginator
            .walk(&Params::new(), PageLimit::Unlimited, flat_page::<AvalancheObservation>)
            .await;

        assert_eq!(walk.termination, Termination::LastPage);
        assert_eq!(ids(&walk.records), vec!["obs-0", "obs-1", "obs-10"]);
        let pages: Vec<String> = transport
            .calls()
            .iter()
            .map(|(_, q)| q.iter().find(|(k, _)| k == "page").unwrap().1.clone())
            .collect();
        assert_eq!(pages, vec!["1", "2", "2", "2", "3"]);
    }

    #[tokio::test]
    async fn invalid_pages_count_against_the_budget_and_keep_partial_results() {
        let transport = ScriptedTransport::new(
            std::iter::once(Ok(obs_page(0, 2)))
                .chain(std::iter::repeat_with(|| Ok(json!({"not": "an array"}))).take(20))
                .collect(),
        );
        let policy = PaginationPolicy {
            per: 2,
            retries: 1,
            total_retries: 4,
        };
        let (logs, _guard) = capture_logs();
        let paginator = Paginator::new(&transport, "https://api.test/x".into(), policy);
        let walk = paginator
            .walk(&Params::new(), PageLimit::Unlimited, flat_page::<AvalancheObservation>)
            .await;

        assert_eq!(walk.termination, Termination::Aborted);
        assert_eq!(ids(&walk.records), vec!["obs-0", "obs-1"]);
        assert_eq!(walk.requests, 5);

        let logs = logs.contents();
        assert!(logs.contains("returning partial results"), "{logs}");
        assert!(!logs.contains("critical"), "{logs}");
        assert!(!logs.contains("all queries failed"), "{logs}");
    }

    #[tokio::test]
    async fn bad_legacy_items_are_dropped_not_retried() {
        let mut page = legacy_page(1, 1, 0, 2);
        page["data"]
            .as_array_mut()
            .unwrap()
            .push(json!({"id": "bad", "type": "avalanche_observation", "attributes": {"latitude": "x"}}));
        let transport = ScriptedTransport::new(vec![Ok(page)]);
        let paginator = Paginator::new(&transport, "https://api.test/v1".into(), policy(3));
        let walk = paginator
            .walk(&Params::new(), PageLimit::Unlimited, legacy_avalanche_page)
            .await;

        assert_eq!(walk.records.len(), 2);
        assert_eq!(walk.termination, Termination::MetadataComplete);
        assert_eq!(transport.calls().len(), 1);
    }

    #[test]
    fn page_limit_from_count() {
        assert_eq!(PageLimit::from_count(-1), PageLimit::Unlimited);
        assert_eq!(PageLimit::from_count(0), PageLimit::Unlimited);
        assert_eq!(PageLimit::from_count(5), PageLimit::Pages(5));
    }

    #[test]
    fn cursor_skips_after_page_retries() {
        let policy = PaginationPolicy {
            per: 10,
            retries: 1,
            total_retries: 10,
        };
        let mut cursor = Cursor::new();
        assert_eq!(cursor.record_failure(&policy), AfterFailure::RetrySamePage);
        assert_eq!(cursor.record_failure(&policy), AfterFailure::SkipAhead);
        assert_eq!(
            cursor,
            Cursor {
                page: 2,
                page_retries: 0,
                total_retries: 2
            }
        );
    }
}
