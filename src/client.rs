use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::{ConfigOverrides, load_config};
use crate::error::{Error, Result};
use crate::models::{
    AvalancheObservation, BackcountryZone, FieldReport, Forecast, HighwayZone, Record,
    SnowpackObservation, WeatherObservation,
};
use crate::paginator::{PageLimit, PaginationPolicy, Paginator, flat_page, legacy_avalanche_page};
use crate::queries::{AvyObsQuery, FieldReportQuery};
use crate::query::Params;
use crate::transport::{HttpTransport, Transport};
use crate::util::{compose_proxy_uri, object_url, urljoin};

const V1_AVY_OBS: &str = "/api/avalanche_observations";
const AVY_OBS: &str = "/api/v2/avalanche_observations";
const OBS_REPORTS: &str = "/api/v2/observation_reports";
const SNOWPACK_OBS: &str = "/api/v2/snowpack_observations";
const WEATHER_OBS: &str = "/api/v2/weather_observations";
const ZONES: &str = "/api/v2/zones";

const PROXY_URI_PARAM: &str = "_api_proxy_uri";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base CAIC API URL, typically `https://api.avalanche.state.co.us`.
    pub api_url: String,
    /// CAIC website URL; hosts the proxy endpoints.
    pub home_url: String,
    pub timeout: Duration,
    /// Whether to verify TLS certificates.
    pub verify: bool,
}

/// Proxy endpoints on the CAIC website.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyEndpoint {
    /// Forecast products (AVID).
    Avid,
    /// The website's data API.
    CaicDataApi,
}

impl ProxyEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            ProxyEndpoint::Avid => "/api-proxy/avid",
            ProxyEndpoint::CaicDataApi => "/api-proxy/caic_data_api",
        }
    }
}

/// The CAIC API client.
///
/// Bulk queries never fail: they retry within the [`PaginationPolicy`] and
/// return what they collected. Single-object lookups and proxy requests
/// return `Err` on transport failure and `Ok(None)` when the response does
/// not validate.
#[derive(Debug)]
pub struct Client<T: Transport = HttpTransport> {
    api_url: String,
    home_url: String,
    policy: PaginationPolicy,
    progress: bool,
    transport: T,
}

impl Client<HttpTransport> {
    /// Creates a client from environment variables and/or `.caicrc`.
    ///
    /// This is equivalent to `Client::new(ConfigOverrides::default())`.
    pub fn from_env() -> Result<Self> {
        Self::new(ConfigOverrides::default())
    }

    /// Creates a client using (in order of precedence):
    /// - explicit overrides
    /// - environment variables `CAIC_API_URL`, `CAIC_HOME_URL`, `CAIC_TIMEOUT`, `CAIC_VERIFY`
    /// - config file from `CAIC_RC` or `.caicrc`
    /// - the public CAIC endpoints
    pub fn new(overrides: ConfigOverrides) -> Result<Self> {
        let cfg = load_config(overrides).map_err(|e| Error::Config(format!("{:#}", e)))?;
        Self::with_config(cfg)
    }

    pub fn with_config(cfg: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(cfg.timeout, cfg.verify)?;
        Ok(Self::with_transport(transport, cfg))
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client on top of any [`Transport`]. `timeout` and `verify`
    /// are the transport's business and are ignored here.
    pub fn with_transport(transport: T, cfg: ClientConfig) -> Self {
        Self {
            api_url: cfg.api_url,
            home_url: cfg.home_url,
            policy: PaginationPolicy::default(),
            progress: false,
            transport,
        }
    }

    pub fn with_policy(mut self, policy: PaginationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Shows a spinner while paging through bulk queries.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn policy(&self) -> PaginationPolicy {
        self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Releases the client and its connection pool.
    pub fn close(self) {
        debug!(api_url = %self.api_url, "closing CAIC client");
    }

    async fn api_id_get<R: Record>(&self, collection: &str, id: &str) -> Result<Option<R>> {
        let url = object_url(&self.api_url, collection, id);
        let value = self.transport.get_json(&url, &Params::new()).await?;
        match R::from_value(value) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                warn!(url = %url, error = %err, "unable to validate {}", R::NAME);
                Ok(None)
            }
        }
    }

    /// Sends a GET through one of the website's proxy endpoints and returns
    /// the raw JSON.
    ///
    /// `uri` and `params` describe the inner request; they are folded into
    /// the proxy's `_api_proxy_uri` parameter.
    pub async fn proxy_get(
        &self,
        endpoint: ProxyEndpoint,
        uri: &str,
        params: &[(&str, &str)],
    ) -> Result<Value> {
        let url = urljoin(&self.home_url, endpoint.path());
        let inner = compose_proxy_uri(uri, params);
        debug!(url = %url, inner = %inner, "proxy request");
        let outer = Params::new().with(PROXY_URI_PARAM, inner);
        self.transport.get_json(&url, &outer).await
    }

    /// Avalanche observations in a time window.
    ///
    /// Never fails. Failed or unvalidated pages are retried and skipped
    /// within the pagination policy; an empty result may mean every request
    /// failed (see the logs).
    pub async fn avy_obs(&self, query: &AvyObsQuery) -> Vec<AvalancheObservation> {
        let limit = PageLimit::from_count(query.page_limit);
        let params = query.to_params();

        let walk = if query.legacy {
            let paginator = Paginator::new(&self.transport, urljoin(&self.api_url, V1_AVY_OBS), self.policy)
                .with_progress(self.progress);
            paginator.walk(&params, limit, legacy_avalanche_page).await
        } else {
            let paginator = Paginator::new(&self.transport, urljoin(&self.api_url, AVY_OBS), self.policy)
                .with_progress(self.progress);
            paginator
                .walk(&params, limit, flat_page::<AvalancheObservation>)
                .await
        };

        info!(
            records = walk.records.len(),
            requests = walk.requests,
            termination = ?walk.termination,
            legacy = query.legacy,
            "avalanche observation query finished"
        );
        walk.records
    }

    /// Field reports matching a search.
    ///
    /// Fails with [`Error::Config`] before any request when the page limit
    /// is below 1. Otherwise behaves like [`Client::avy_obs`].
    pub async fn field_reports(&self, query: &FieldReportQuery) -> Result<Vec<FieldReport>> {
        query.validate()?;
        let limit = PageLimit::from_count(query.page_limit);
        let paginator = Paginator::new(&self.transport, urljoin(&self.api_url, OBS_REPORTS), self.policy)
            .with_progress(self.progress);
        let walk = paginator
            .walk(&query.to_params(), limit, flat_page::<FieldReport>)
            .await;

        info!(
            records = walk.records.len(),
            requests = walk.requests,
            termination = ?walk.termination,
            "field report search finished"
        );
        Ok(walk.records)
    }

    pub async fn field_report(&self, id: &str) -> Result<Option<FieldReport>> {
        self.api_id_get(OBS_REPORTS, id).await
    }

    pub async fn snowpack_observation(&self, id: &str) -> Result<Option<SnowpackObservation>> {
        self.api_id_get(SNOWPACK_OBS, id).await
    }

    pub async fn avalanche_observation(&self, id: &str) -> Result<Option<AvalancheObservation>> {
        self.api_id_get(AVY_OBS, id).await
    }

    pub async fn weather_observation(&self, id: &str) -> Result<Option<WeatherObservation>> {
        self.api_id_get(WEATHER_OBS, id).await
    }

    pub async fn bc_zone(&self, id: &str) -> Result<Option<BackcountryZone>> {
        self.api_id_get(ZONES, id).await
    }

    pub async fn highway_zone(&self, id: &str) -> Result<Option<HighwayZone>> {
        self.api_id_get(ZONES, id).await
    }

    /// The field report an avalanche observation was submitted with.
    ///
    /// `Ok(None)` when the observation carries no report reference.
    pub async fn field_report_for(&self, obs: &AvalancheObservation) -> Result<Option<FieldReport>> {
        let Some(report_id) = obs.observation_report.as_ref().and_then(|r| r.id.as_deref()) else {
            debug!(id = %obs.id, "avalanche observation has no field report reference");
            return Ok(None);
        };
        self.field_report(report_id).await
    }

    /// Forecasts valid at `date` (ISO-8601), fetched through the AVID proxy.
    ///
    /// Items that match neither forecast shape are logged and dropped.
    pub async fn avy_forecast(&self, date: &str) -> Result<Vec<Forecast>> {
        let resp = self
            .proxy_get(
                ProxyEndpoint::Avid,
                "/products/all",
                &[("datetime", date), ("includeExpired", "true")],
            )
            .await?;

        let Value::Array(items) = resp else {
            error!(date, "forecast response was not a list of forecasts");
            return Ok(Vec::new());
        };

        let mut forecasts = Vec::with_capacity(items.len());
        for item in items {
            match Forecast::from_value(item) {
                Ok(forecast) => forecasts.push(forecast),
                Err(err) => error!(date, error = %err, "dropping a forecast that failed validation"),
            }
        }
        Ok(forecasts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{BackcountryZoneTitle, ObsType};
    use crate::transport::testing::ScriptedTransport;
    use serde_json::json;

    fn config() -> ClientConfig {
        ClientConfig {
            api_url: "https://api.test".into(),
            home_url: "https://home.test".into(),
            timeout: Duration::from_secs(5),
            verify: true,
        }
    }

    fn client(responses: Vec<Result<Value>>) -> Client<ScriptedTransport> {
        Client::with_transport(ScriptedTransport::new(responses), config())
    }

    fn param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[tokio::test]
    async fn single_object_url_and_shape() {
        let client = client(vec![Ok(json!({
            "id": "abc",
            "type": "backcountry_zone",
            "title": "Front Range"
        }))]);
        let zone = client.bc_zone("abc").await.unwrap().unwrap();
        assert_eq!(zone.kind, ObsType::BackcountryZone);

        let calls = client.transport().calls();
        assert_eq!(calls[0].0, "https://api.test/api/v2/zones/abc.json");
        assert!(calls[0].1.is_empty());
    }

    #[tokio::test]
    async fn invalid_single_object_is_none() {
        let client = client(vec![Ok(json!({"type": "snowpack_observation"}))]);
        assert_eq!(client.snowpack_observation("x").await.unwrap(), None);
    }

    #[tokio::test]
    async fn transport_failure_on_single_object_is_an_error() {
        let client = client(vec![]);
        let err = client.weather_observation("x").await.unwrap_err();
        assert!(err.is_request());
    }

    #[tokio::test]
    async fn field_reports_rejects_non_positive_page_limit_without_requests() {
        let client = client(vec![Ok(json!([]))]);
        let err = client
            .field_reports(&FieldReportQuery::new("a", "b").page_limit(0))
            .await
            .unwrap_err();
        assert!(err.is_config());
        assert!(client.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn field_reports_sends_search_params() {
        let client = client(vec![Ok(json!([{"id": "r1", "type": "observation_report"}]))]);
        let reports = client
            .field_reports(
                &FieldReportQuery::new("2023-01-01", "2023-01-02")
                    .bc_zones([BackcountryZoneTitle::Sawatch])
                    .avy_seen(false),
            )
            .await
            .unwrap();
        assert_eq!(reports.len(), 1);

        let calls = client.transport().calls();
        assert_eq!(calls[0].0, "https://api.test/api/v2/observation_reports");
        let q = &calls[0].1;
        assert_eq!(param(q, "r[backcountry_zone_title_in][]"), Some("Sawatch"));
        assert_eq!(param(q, "r[saw_avalanche_eq]"), Some("false"));
        assert_eq!(param(q, "r[sorts][]"), Some("observed_at desc"));
        assert_eq!(param(q, "page"), Some("1"));
        assert_eq!(param(q, "per"), Some("1000"));
    }

    #[tokio::test]
    async fn avy_obs_picks_endpoint_by_version() {
        let v2 = client(vec![Ok(json!([{"id": "a"}]))]);
        assert_eq!(v2.avy_obs(&AvyObsQuery::new("s", "e")).await.len(), 1);
        assert_eq!(
            v2.transport().calls()[0].0,
            "https://api.test/api/v2/avalanche_observations"
        );

        let v1 = client(vec![Ok(json!({
            "meta": {"current_page": 1, "page_items": 1, "total_pages": 1, "total_count": 1},
            "links": {},
            "data": [{
                "id": "legacy",
                "type": "avalanche_observation",
                "attributes": {"aspect": "E"},
                "relationships": {"backcountry_zone": {"id": "z", "type": "backcountry_zone"}}
            }]
        }))]);
        let obs = v1.avy_obs(&AvyObsQuery::new("s", "e").legacy(true)).await;
        assert_eq!(obs[0].id, "legacy");
        assert_eq!(obs[0].backcountry_zone.as_ref().map(|z| z.id.as_str()), Some("z"));
        let calls = v1.transport().calls();
        assert_eq!(calls[0].0, "https://api.test/api/avalanche_observations");
        assert_eq!(param(&calls[0].1, "observed_after"), Some("s"));
        assert!(param(&calls[0].1, "t").is_some());
    }

    #[tokio::test]
    async fn proxy_request_wraps_the_inner_uri() {
        let client = client(vec![Ok(json!({"ok": true}))]);
        let value = client
            .proxy_get(ProxyEndpoint::CaicDataApi, "/api/v1/things", &[("a", "1"), ("b", "2")])
            .await
            .unwrap();
        assert_eq!(value, json!({"ok": true}));

        let calls = client.transport().calls();
        assert_eq!(calls[0].0, "https://home.test/api-proxy/caic_data_api");
        assert_eq!(
            calls[0].1,
            vec![(PROXY_URI_PARAM.to_string(), "/api/v1/things?a=1&b=2".to_string())]
        );
    }

    #[tokio::test]
    async fn non_list_forecast_response_is_empty() {
        let client = client(vec![Ok(json!({"error": "nope"}))]);
        assert!(client.avy_forecast("2023-01-05T00:00:00Z").await.unwrap().is_empty());
        let calls = client.transport().calls();
        assert_eq!(calls[0].0, "https://home.test/api-proxy/avid");
        assert_eq!(
            param(&calls[0].1, PROXY_URI_PARAM),
            Some("/products/all?datetime=2023-01-05T00:00:00Z&includeExpired=true")
        );
    }

    #[tokio::test]
    async fn field_report_for_follows_the_report_reference() {
        let client = client(vec![Ok(json!({"id": "rep-1", "type": "observation_report"}))]);
        let obs = AvalancheObservation::from_value(json!({
            "id": "obs-1",
            "observation_report": {"id": "rep-1"}
        }))
        .unwrap();
        let report = client.field_report_for(&obs).await.unwrap().unwrap();
        assert_eq!(report.id, "rep-1");
        assert_eq!(
            client.transport().calls()[0].0,
            "https://api.test/api/v2/observation_reports/rep-1.json"
        );

        let bare = AvalancheObservation::from_value(json!({"id": "obs-2"})).unwrap();
        assert_eq!(client.field_report_for(&bare).await.unwrap(), None);
    }
}
