//! Canonical records returned by the client.
//!
//! Every record deserializes straight from the v2 (flat) API shape. Unset
//! optional fields are omitted when a record is serialized again.

mod common;
mod forecast;
mod observation;
mod report;
mod zone;

pub use common::{Measurement, Timestamp};
pub use forecast::{
    AvalancheForecast, AvalancheForecastType, AvalancheProblem, AvalancheProblems, DangerRating,
    DangerRatings, ExpectedSize, Forecast, ForecastComms, ForecastConfidence, ForecastConfidences,
    ForecastImage, ForecastMedia, ForecastSummary, ForecastSummaryDay, RegionalDiscussionForecast,
};
pub use observation::{
    AvalancheObservation, Detail, ObsReport, ObservationAsset, SnowpackObservation,
    WeatherObservation,
};
pub use report::{Creator, FieldReport};
pub use zone::{BackcountryZone, HighwayZone};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// A record that can be built from decoded API JSON.
///
/// `from_value` is the one place shape validation happens; the legacy
/// adapter builds a canonical object and goes through it as well.
pub trait Record: DeserializeOwned + Serialize + Sized {
    /// Name used in log messages.
    const NAME: &'static str;

    fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| Error::Validation(format!("{}: {}", Self::NAME, e)))
    }

    /// Serializes without unset optional fields.
    ///
    /// Codes are written in their canonical spelling, so any of the
    /// "unknown" spellings (`Unkn`, `---`, ...) comes back as `U`.
    fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| Error::Validation(format!("{}: {}", Self::NAME, e)))
    }
}

impl Record for AvalancheObservation {
    const NAME: &'static str = "avalanche observation";
}

impl Record for FieldReport {
    const NAME: &'static str = "field report";
}

impl Record for SnowpackObservation {
    const NAME: &'static str = "snowpack observation";
}

impl Record for WeatherObservation {
    const NAME: &'static str = "weather observation";
}

impl Record for BackcountryZone {
    const NAME: &'static str = "backcountry zone";
}

impl Record for HighwayZone {
    const NAME: &'static str = "highway zone";
}

impl Record for AvalancheForecast {
    const NAME: &'static str = "avalanche forecast";
}

impl Record for RegionalDiscussionForecast {
    const NAME: &'static str = "regional discussion forecast";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{Aspect, DestructiveSize, ObsType, PrimaryTrigger, TypeCode};
    use serde_json::json;

    #[test]
    fn round_trip_omits_unset_fields_and_keeps_set_ones() {
        let input = json!({
            "id": "7a1f",
            "type": "avalanche_observation",
            "observed_at": "2023-02-01T15:30:00Z",
            "latitude": 39.6,
            "longitude": -105.9,
            "is_locked": false,
            "number": 2,
            "type_code": "SS",
            "aspect": "NE",
            "destructive_size": "D2",
            "primary_trigger": "AS",
            "comments": "Skier triggered, no one caught.",
            "backcountry_zone": {"id": "z1", "type": "backcountry_zone", "title": "Front Range"}
        });

        let obs = AvalancheObservation::from_value(input.clone()).unwrap();
        assert_eq!(obs.kind, Some(ObsType::AvalancheObservation));
        assert_eq!(obs.type_code, Some(TypeCode::SoftSlab));
        assert_eq!(obs.aspect, Some(Aspect::Northeast));
        assert_eq!(obs.destructive_size, Some(DestructiveSize::D2));
        assert_eq!(obs.primary_trigger, Some(PrimaryTrigger::Skier));
        assert_eq!(obs.relative_size, None);

        let output = obs.to_value().unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn weather_measurements_keep_their_json_type() {
        let input = json!({
            "id": "wx-1",
            "type": "weather_observation",
            "temperature": 21.5,
            "windspeed_ridgeline": "Strong",
            "maximum_gust_duration_seconds": "30"
        });
        let obs = WeatherObservation::from_value(input.clone()).unwrap();
        assert_eq!(obs.temperature, Some(Measurement::Number(21.5)));
        assert_eq!(obs.to_value().unwrap(), input);
    }

    #[test]
    fn missing_identifier_is_a_validation_error() {
        let err = SnowpackObservation::from_value(json!({"type": "snowpack_observation"}))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("snowpack observation"));
    }

    #[test]
    fn unknown_spellings_do_not_fail_validation() {
        let obs = AvalancheObservation::from_value(json!({
            "id": "a",
            "type_code": "---",
            "aspect": "Unkn",
            "relative_size": "UNK",
            "destructive_size": "Unknown",
            "primary_trigger": "UNKNOWN",
            "secondary_trigger": "--"
        }))
        .unwrap();
        assert_eq!(obs.type_code, Some(TypeCode::Unknown));
        assert_eq!(obs.aspect, Some(Aspect::Unknown));

        let out = obs.to_value().unwrap();
        assert_eq!(out["type_code"], "U");
        assert_eq!(out["aspect"], "U");
        assert_eq!(out["secondary_trigger"], "U");
    }
}
