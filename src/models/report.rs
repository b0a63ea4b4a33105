use serde::{Deserialize, Serialize};

use super::common::{Timestamp, null_as_default};
use super::observation::{
    AvalancheObservation, Detail, ObservationAsset, SnowpackObservation, WeatherObservation,
};
use super::zone::BackcountryZone;
use crate::codes::ObsType;

/// The creator of a field report. The API only exposes an opaque id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A field report (called an observation report by the API).
///
/// A report owns the observations filed with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldReport {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ObsType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backcountry_zone: Option<BackcountryZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<Creator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avalanche_observations_count: Option<i64>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub avalanche_observations: Vec<AvalancheObservation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avalanche_detail: Option<Detail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_observations_count: Option<i64>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub weather_observations: Vec<WeatherObservation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_detail: Option<Detail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snowpack_observations_count: Option<i64>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub snowpack_observations: Vec<SnowpackObservation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snowpack_detail: Option<Detail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets_count: Option<i64>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub assets: Vec<ObservationAsset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highway_zone_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation_form: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_anonymous: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_known: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_known: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hw_op_bc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saw_avalanche: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggered_avalanche: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caught_in_avalanche: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_anonymous_location: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl FieldReport {
    /// The report's id on the classic CAIC site, if it has one.
    ///
    /// Looks in the detail objects first, then in every embedded
    /// observation's `classic_observation_report_id`.
    pub fn classic_id(&self) -> Option<i64> {
        let from_details = [
            &self.avalanche_detail,
            &self.snowpack_detail,
            &self.weather_detail,
        ]
        .into_iter()
        .flatten()
        .find_map(|d| d.classic_id);

        from_details
            .or_else(|| {
                self.avalanche_observations
                    .iter()
                    .find_map(|o| o.classic_observation_report_id)
            })
            .or_else(|| {
                self.weather_observations
                    .iter()
                    .find_map(|o| o.classic_observation_report_id)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(value: serde_json::Value) -> FieldReport {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn embedded_observations_are_owned_by_the_report() {
        let r = report(json!({
            "id": "rep-1",
            "type": "observation_report",
            "avalanche_observations": [
                {"id": "av-1", "type": "avalanche_observation", "aspect": "NE", "destructive_size": "D1.5"}
            ],
            "weather_observations": null,
            "assets": [
                {"id": "img-1", "type": "image_asset", "tags": null}
            ]
        }));
        assert_eq!(r.avalanche_observations.len(), 1);
        assert!(r.weather_observations.is_empty());
        assert!(r.assets[0].tags.is_empty());
    }

    #[test]
    fn classic_id_prefers_details() {
        let r = report(json!({
            "id": "rep-1",
            "type": "observation_report",
            "snowpack_detail": {"id": "d-1", "type": "snowpack_detail", "classic_id": 42},
            "avalanche_observations": [
                {"id": "av-1", "classic_observation_report_id": 7}
            ]
        }));
        assert_eq!(r.classic_id(), Some(42));
    }

    #[test]
    fn classic_id_falls_back_to_observations() {
        let r = report(json!({
            "id": "rep-1",
            "type": "observation_report",
            "weather_observations": [
                {"id": "wx-1", "type": "weather_observation", "classic_observation_report_id": 9}
            ]
        }));
        assert_eq!(r.classic_id(), Some(9));

        let empty = report(json!({"id": "rep-2", "type": "observation_report"}));
        assert_eq!(empty.classic_id(), None);
    }

    #[test]
    fn unknown_report_type_is_rejected() {
        let res = serde_json::from_value::<FieldReport>(json!({"id": "x", "type": "blog_post"}));
        assert!(res.is_err());
    }
}
