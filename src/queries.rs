//! Parameters for the bulk (paged) queries.

use crate::codes::{BackcountryZoneTitle, CollapsingObs, CrackingObs};
use crate::error::{Error, Result};
use crate::query::Params;
use crate::util::cache_buster;

/// Avalanche observations observed within a time window.
///
/// `start` and `end` are ISO-8601 date-times (`YYYY-MM-DD HH:mm:ss` works
/// too).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvyObsQuery {
    pub start: String,
    pub end: String,
    /// Page ceiling; zero or negative disables it.
    pub page_limit: i64,
    /// Use the legacy `/api/avalanche_observations` endpoint. The CAIC
    /// website still does, since it reports page counts.
    pub legacy: bool,
}

impl AvyObsQuery {
    pub const DEFAULT_PAGE_LIMIT: i64 = 1000;

    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            page_limit: Self::DEFAULT_PAGE_LIMIT,
            legacy: false,
        }
    }

    pub fn page_limit(mut self, page_limit: i64) -> Self {
        self.page_limit = page_limit;
        self
    }

    pub fn legacy(mut self, legacy: bool) -> Self {
        self.legacy = legacy;
        self
    }

    pub(crate) fn to_params(&self) -> Params {
        Params::new()
            .with("observed_after", self.start.as_str())
            .with("observed_before", self.end.as_str())
            .with("t", cache_buster())
    }
}

/// A field report search, as on the CAIC "View Field Reports" page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReportQuery {
    pub start: String,
    pub end: String,
    pub bc_zones: Vec<BackcountryZoneTitle>,
    pub cracking: Vec<CrackingObs>,
    pub collapsing: Vec<CollapsingObs>,
    /// Free-text search.
    pub query: String,
    /// Only reports that did (or did not) see an avalanche.
    pub avy_seen: Option<bool>,
    /// Page ceiling; must be at least 1. The search endpoint reports no page
    /// count, so an unbounded walk is not allowed.
    pub page_limit: i64,
}

impl FieldReportQuery {
    pub const DEFAULT_PAGE_LIMIT: i64 = 100;
    const SORT: &'static str = "observed_at desc";

    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            bc_zones: Vec::new(),
            cracking: Vec::new(),
            collapsing: Vec::new(),
            query: String::new(),
            avy_seen: None,
            page_limit: Self::DEFAULT_PAGE_LIMIT,
        }
    }

    pub fn bc_zones(mut self, zones: impl IntoIterator<Item = BackcountryZoneTitle>) -> Self {
        self.bc_zones = zones.into_iter().collect();
        self
    }

    pub fn cracking(mut self, levels: impl IntoIterator<Item = CrackingObs>) -> Self {
        self.cracking = levels.into_iter().collect();
        self
    }

    pub fn collapsing(mut self, levels: impl IntoIterator<Item = CollapsingObs>) -> Self {
        self.collapsing = levels.into_iter().collect();
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn avy_seen(mut self, seen: bool) -> Self {
        self.avy_seen = Some(seen);
        self
    }

    pub fn page_limit(mut self, page_limit: i64) -> Self {
        self.page_limit = page_limit;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.page_limit <= 0 {
            return Err(Error::Config(format!(
                "a page_limit of at least 1 must be set for field report searches, got {}",
                self.page_limit
            )));
        }
        Ok(())
    }

    pub(crate) fn to_params(&self) -> Params {
        let mut params = Params::new()
            .with(
                "r[backcountry_zone_title_in][]",
                self.bc_zones
                    .iter()
                    .map(|z| z.as_str().to_string())
                    .collect::<Vec<_>>(),
            )
            .with(
                "r[snowpack_observations_cracking_in][]",
                self.cracking
                    .iter()
                    .map(|c| c.as_str().to_string())
                    .collect::<Vec<_>>(),
            )
            .with(
                "r[snowpack_observations_collapsing_in][]",
                self.collapsing
                    .iter()
                    .map(|c| c.as_str().to_string())
                    .collect::<Vec<_>>(),
            )
            .with("q", self.query.as_str());
        params.set_opt("r[saw_avalanche_eq]", self.avy_seen);
        params.set("r[observed_at_gteq]", self.start.as_str());
        params.set("r[observed_at_lteq]", self.end.as_str());
        params.set("r[sorts][]", Self::SORT);
        params
    }
}
