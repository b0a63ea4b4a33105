use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Record;
use super::common::{Timestamp, null_as_default};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummaryDay {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// A summary per forecast day (weather, snowpack, avalanche).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub days: Vec<ForecastSummaryDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedSize {
    pub min: String,
    pub max: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvalancheProblem {
    #[serde(rename = "type")]
    pub kind: String,
    pub aspect_elevations: Vec<String>,
    pub likelihood: String,
    pub expected_size: ExpectedSize,
    pub comment: String,
}

/// Avalanche problems, one list per forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvalancheProblems {
    pub days: Vec<Vec<AvalancheProblem>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfidence {
    pub date: Timestamp,
    pub rating: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub statements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfidences {
    pub days: Vec<ForecastConfidence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastComms {
    pub headline: String,
    pub sms: String,
}

/// Danger ratings for the alpine, treeline and below-treeline bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DangerRating {
    pub position: i64,
    pub alp: String,
    pub tln: String,
    pub btl: String,
    pub date: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DangerRatings {
    pub days: Vec<DangerRating>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastImage {
    pub id: String,
    pub url: String,
    pub width: i64,
    pub height: i64,
    pub credit: String,
    pub caption: String,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMedia {
    #[serde(rename = "Images", default, deserialize_with = "null_as_default")]
    pub images: Vec<ForecastImage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvalancheForecastType {
    #[serde(rename = "avalancheforecast")]
    AvalancheForecast,
}

/// An area-specific avalanche forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvalancheForecast {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: AvalancheForecastType,
    pub polygons: Vec<Value>,
    pub area_id: String,
    pub forecaster: String,
    pub issue_date_time: Timestamp,
    pub expiry_date_time: Timestamp,
    pub weather_summary: ForecastSummary,
    pub snowpack_summary: ForecastSummary,
    pub avalanche_summary: ForecastSummary,
    pub avalanche_problems: AvalancheProblems,
    pub terrain_and_travel_advice: Map<String, Value>,
    pub confidence: ForecastConfidences,
    pub communication: ForecastComms,
    pub danger_ratings: DangerRatings,
    pub media: ForecastMedia,
}

/// A forecast discussion covering a broader region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalDiscussionForecast {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub polygons: Vec<String>,
    pub area_id: String,
    pub forecaster: String,
    pub issue_date_time: Timestamp,
    pub expiry_date_time: Timestamp,
    pub message: String,
    pub communications: ForecastComms,
    pub media: ForecastMedia,
}

/// One item of the forecast feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Forecast {
    Avalanche(Box<AvalancheForecast>),
    Regional(RegionalDiscussionForecast),
}

impl Forecast {
    /// The `type` tag the feed uses for area forecasts.
    pub const AVALANCHE_TYPE: &'static str = "avalancheforecast";

    pub fn id(&self) -> &str {
        match self {
            Forecast::Avalanche(f) => &f.id,
            Forecast::Regional(f) => &f.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Forecast::Avalanche(f) => &f.title,
            Forecast::Regional(f) => &f.title,
        }
    }

    /// Builds the variant named by the item's `type` tag. The feed does not
    /// always tag consistently, so the other variant is tried when the
    /// tagged one fails.
    pub fn from_value(item: Value) -> Result<Self> {
        let tagged_avalanche = item.get("type").and_then(Value::as_str) == Some(Self::AVALANCHE_TYPE);

        type Build = fn(Value) -> Result<Forecast>;
        let (first, second): (Build, Build) = if tagged_avalanche {
            (Self::avalanche, Self::regional)
        } else {
            (Self::regional, Self::avalanche)
        };

        match first(item.clone()) {
            Ok(forecast) => Ok(forecast),
            Err(first_err) => second(item).map_err(|second_err| {
                Error::Validation(format!(
                    "forecast matches neither shape: {first_err}; {second_err}"
                ))
            }),
        }
    }

    fn avalanche(item: Value) -> Result<Self> {
        AvalancheForecast::from_value(item).map(|f| Forecast::Avalanche(Box::new(f)))
    }

    fn regional(item: Value) -> Result<Self> {
        RegionalDiscussionForecast::from_value(item).map(Forecast::Regional)
    }
}
