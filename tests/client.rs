use async_trait::async_trait;
use caic::{
    AvyObsQuery, Client, ClientConfig, Error, FieldReportQuery, Forecast, PaginationPolicy, Params,
    Result, Transport,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Serves canned JSON by URL and page number, and records every request.
#[derive(Default)]
struct FakeCaic {
    routes: HashMap<String, Vec<Result<Value>>>,
    calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl FakeCaic {
    fn route(mut self, url: &str, responses: Vec<Result<Value>>) -> Self {
        self.routes.insert(url.to_string(), responses);
        self
    }

    fn calls(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_to(&self, url: &str) -> usize {
        self.calls().iter().filter(|(u, _)| u == url).count()
    }
}

fn clone_result(r: &Result<Value>) -> Result<Value> {
    match r {
        Ok(v) => Ok(v.clone()),
        Err(e) => Err(Error::Request(e.to_string())),
    }
}

#[async_trait]
impl Transport for FakeCaic {
    async fn get_json(&self, url: &str, params: &Params) -> Result<Value> {
        let pairs = params.to_pairs();
        let mut calls = self.calls.lock().unwrap();
        calls.push((url.to_string(), pairs));
        let nth = calls.iter().filter(|(u, _)| u == url).count() - 1;
        drop(calls);

        match self.routes.get(url).and_then(|r| r.get(nth)) {
            Some(r) => clone_result(r),
            None => Err(Error::Request(format!("HTTP 503 for url ({url})"))),
        }
    }
}

const API: &str = "https://api.caic.test";
const HOME: &str = "https://home.caic.test";

fn client(fake: FakeCaic) -> Client<FakeCaic> {
    Client::with_transport(
        fake,
        ClientConfig {
            api_url: API.to_string(),
            home_url: HOME.to_string(),
            timeout: Duration::from_secs(1),
            verify: true,
        },
    )
}

fn reports(ids: std::ops::Range<usize>) -> Value {
    Value::Array(
        ids.map(|i| json!({"id": format!("r{i}"), "type": "observation_report"}))
            .collect(),
    )
}

fn small_pages() -> PaginationPolicy {
    PaginationPolicy {
        per: 2,
        ..PaginationPolicy::default()
    }
}

#[tokio::test]
async fn field_reports_with_zero_page_limit_fail_before_any_request() {
    let c = client(FakeCaic::default());
    let err = c
        .field_reports(&FieldReportQuery::new("2023-01-01", "2023-02-01").page_limit(0))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config(_)));
    assert!(c.transport().calls().is_empty());
}

#[tokio::test]
async fn field_reports_walk_until_short_page() {
    let url = format!("{API}/api/v2/observation_reports");
    let fake = FakeCaic::default().route(&url, vec![Ok(reports(0..2)), Ok(reports(2..3))]);
    let c = client(fake).with_policy(small_pages());

    let got = c
        .field_reports(&FieldReportQuery::new("2023-01-01", "2023-02-01"))
        .await
        .unwrap();

    let ids: Vec<&str> = got.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["r0", "r1", "r2"]);
    assert_eq!(c.transport().calls_to(&url), 2);
}

#[tokio::test]
async fn persistent_outage_gives_empty_result_not_an_error() {
    let c = client(FakeCaic::default());
    let obs = c.avy_obs(&AvyObsQuery::new("2023-01-01", "2023-02-01")).await;

    assert!(obs.is_empty());
    assert_eq!(
        c.transport().calls().len() as u32,
        PaginationPolicy::default().total_retries
    );
}

#[tokio::test]
async fn outage_midway_keeps_what_was_collected() {
    let url = format!("{API}/api/v2/observation_reports");
    let fake = FakeCaic::default().route(&url, vec![Ok(reports(0..2))]);
    let c = client(fake).with_policy(small_pages());

    let got = c
        .field_reports(&FieldReportQuery::new("a", "b"))
        .await
        .unwrap();
    assert_eq!(got.len(), 2);
}

#[tokio::test]
async fn legacy_observations_are_flattened() {
    let url = format!("{API}/api/avalanche_observations");
    let fake = FakeCaic::default().route(
        &url,
        vec![Ok(json!({
            "meta": {"current_page": 1, "page_items": 1, "total_pages": 1, "total_count": 1},
            "links": {"first": "/api/avalanche_observations?page=1"},
            "data": [{
                "id": "v1",
                "type": "avalanche_observation",
                "attributes": {"type_code": "SS", "aspect": "N", "destructive_size": "D1.5"},
                "relationships": {"backcountry_zone": {"id": "z1", "type": "backcountry_zone", "title": "Vail & Summit County"}}
            }]
        }))],
    );
    let c = client(fake);

    let obs = c
        .avy_obs(&AvyObsQuery::new("2023-01-01", "2023-02-01").legacy(true))
        .await;
    assert_eq!(obs.len(), 1);
    assert_eq!(obs[0].id, "v1");
    assert_eq!(
        obs[0].backcountry_zone.as_ref().and_then(|z| z.title.as_deref()),
        Some("Vail & Summit County")
    );
}

#[tokio::test]
async fn single_lookups_distinguish_invalid_from_unreachable() {
    let fake = FakeCaic::default().route(
        &format!("{API}/api/v2/observation_reports/bad.json"),
        vec![Ok(json!({"type": "observation_report"}))],
    );
    let c = client(fake);

    assert!(c.field_report("bad").await.unwrap().is_none());
    assert!(c.field_report("gone").await.unwrap_err().is_request());
}

#[tokio::test]
async fn forecasts_keep_valid_items_and_drop_the_rest() {
    let regional = json!({
        "id": "rd",
        "title": "Regional",
        "type": "regionaldiscussionforecast",
        "polygons": [],
        "areaId": "a",
        "forecaster": "f",
        "issueDateTime": "2023-01-05T23:00:00Z",
        "expiryDateTime": "2023-01-06T23:00:00Z",
        "message": "m",
        "communications": {"headline": "h", "sms": "s"},
        "media": {"Images": []}
    });
    let fake = FakeCaic::default().route(
        &format!("{HOME}/api-proxy/avid"),
        vec![Ok(json!([regional, {"id": "junk", "type": "avalancheforecast"}]))],
    );
    let c = client(fake);

    let forecasts = c.avy_forecast("2023-01-06T00:00:00Z").await.unwrap();
    assert_eq!(forecasts.len(), 1);
    assert!(matches!(forecasts[0], Forecast::Regional(_)));

    let calls = c.transport().calls();
    assert_eq!(
        calls[0].1,
        vec![(
            "_api_proxy_uri".to_string(),
            "/products/all?datetime=2023-01-06T00:00:00Z&includeExpired=true".to_string()
        )]
    );
}

#[tokio::test]
async fn forecast_transport_failure_is_an_error() {
    let c = client(FakeCaic::default());
    assert!(c.avy_forecast("2023-01-06").await.is_err());
}
