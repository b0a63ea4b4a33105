use serde::{Deserialize, Serialize};

use super::common::{Measurement, Timestamp};
use super::zone::{BackcountryZone, HighwayZone};
use crate::codes::{
    Aspect, DestructiveSize, DetailType, ObsType, PrimaryTrigger, RelativeSize, SecondaryTrigger,
    TypeCode,
};

/// Summary details attached to a field report (avalanche, snowpack or
/// weather). This is where `classic_id` lives in the v2 API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DetailType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classic_id: Option<i64>,
}

/// The report an avalanche observation belongs to, as embedded in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObsReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_anonymous: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A single avalanche observation.
///
/// Fields documented as "v1 only" are filled in by the legacy
/// `/api/avalanche_observations` endpoint and are absent from v2 objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvalancheObservation {
    pub id: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ObsType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backcountry_zone_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backcountry_zone: Option<BackcountryZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highway_zone_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// v1 only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classic_id: Option<i64>,
    /// v1 only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classic_observation_report_id: Option<i64>,
    /// v1 only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classic_observation_report_url: Option<String>,
    /// v1 only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation_report_status: Option<String>,
    /// v1 only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation_report_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_known: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_known: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hw_op_bc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_code: Option<TypeCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect: Option<Aspect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_size: Option<RelativeSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destructive_size: Option<DestructiveSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_trigger: Option<PrimaryTrigger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_trigger: Option<SecondaryTrigger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_incident: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle_maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation_feet: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weak_layer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grain_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crown_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crown_maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crown_units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_depth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_depth_units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_length_units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation_report: Option<ObsReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avalanche_detail: Option<Detail>,
}

/// An observation about the snowpack in a field report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnowpackObservation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ObsType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backcountry_zone_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backcountry_zone: Option<BackcountryZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highway_zone_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cracking: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weak_layers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rose: Option<String>,
}

/// An observation about the weather in a field report.
///
/// Measurements are [`Measurement`]s: the API has sent each of them both as
/// numbers and as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ObsType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backcountry_zone_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backcountry_zone: Option<BackcountryZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highway_zone_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highway_zone: Option<HighwayZone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classic_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classic_observation_report_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classic_observation_report_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Measurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_maximum: Option<Measurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_minimum: Option<Measurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_at_negative_20cm: Option<Measurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_at_negative_20cm_units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_humidity: Option<Measurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sky_cover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_of_snow: Option<Measurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_of_snow_units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_of_new_snow_12_hours: Option<Measurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_of_new_snow_24_hours: Option<Measurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_of_new_snow_units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_of_new_snow_water_equivalent_12_hours: Option<Measurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_of_new_snow_water_equivalent_24_hours: Option<Measurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_of_new_snow_water_equivalent_units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windspeed_ridgeline: Option<Measurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_direction_ridgeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windspeed: Option<Measurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windspeed_units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_gust_speed: Option<Measurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_gust_direction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_gust_duration_seconds: Option<Measurement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blowing_snow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub windloading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_detail: Option<Detail>,
}

/// An image, video or snowpit asset attached to a field report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationAsset {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ObsType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::common::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_redacted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_avalanche: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduced_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}
