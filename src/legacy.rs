//! The legacy ("v1") avalanche observation shape.
//!
//! `/api/avalanche_observations` wraps each object in a JSON:API style
//! envelope (`{id, type, attributes, relationships}`) and pages with
//! `meta`/`links`. Envelopes are flattened into the canonical
//! [`AvalancheObservation`] through the same constructor as v2 objects.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::warn;

use crate::codes::ObsType;
use crate::error::Result;
use crate::models::{AvalancheObservation, Record};

const BACKCOUNTRY_ZONE: &str = "backcountry_zone";

/// A relationship attached to a legacy envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Relationship {
    /// The zone the observation was made in, as sent.
    BackcountryZone(Value),
    /// A relationship kind this client does not understand yet.
    Unrecognized { key: String, value: Value },
}

impl Relationship {
    fn from_entry(key: String, value: Value) -> Self {
        match key.as_str() {
            BACKCOUNTRY_ZONE => Relationship::BackcountryZone(value),
            _ => Relationship::Unrecognized { key, value },
        }
    }
}

fn deserialize_relationships<'de, D>(deserializer: D) -> std::result::Result<Vec<Relationship>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(map
        .into_iter()
        .map(|(k, v)| Relationship::from_entry(k, v))
        .collect())
}

/// One legacy envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct V1AvalancheObservation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ObsType,
    pub attributes: Map<String, Value>,
    #[serde(default, deserialize_with = "deserialize_relationships")]
    pub relationships: Vec<Relationship>,
}

impl V1AvalancheObservation {
    pub fn backcountry_zone(&self) -> Option<&Value> {
        self.relationships.iter().find_map(|r| match r {
            Relationship::BackcountryZone(v) => Some(v),
            Relationship::Unrecognized { .. } => None,
        })
    }

    pub fn unrecognized_relationships(&self) -> Vec<&str> {
        self.relationships
            .iter()
            .filter_map(|r| match r {
                Relationship::Unrecognized { key, .. } => Some(key.as_str()),
                Relationship::BackcountryZone(_) => None,
            })
            .collect()
    }

    /// Flattens the envelope into a canonical object:
    /// `{id, type, backcountry_zone, ...attributes}`.
    ///
    /// Unrecognized relationships are logged and left out.
    pub fn into_canonical(self) -> Value {
        let unrecognized = self.unrecognized_relationships();
        if !unrecognized.is_empty() {
            warn!(
                id = %self.id,
                relationships = ?unrecognized,
                "found new relationship objects on a legacy avalanche observation, please report these"
            );
        }

        let zone = self.backcountry_zone().cloned();
        let mut obj = self.attributes;
        obj.insert("id".to_string(), Value::String(self.id));
        obj.insert(
            "type".to_string(),
            Value::String(self.kind.as_str().to_string()),
        );
        match zone {
            Some(zone) => {
                obj.insert(BACKCOUNTRY_ZONE.to_string(), zone);
            }
            None => {
                obj.remove(BACKCOUNTRY_ZONE);
            }
        }
        Value::Object(obj)
    }

    pub fn to_obs(self) -> Result<AvalancheObservation> {
        AvalancheObservation::from_shape(ObservationShape::Legacy(self))
    }
}

/// The two shapes an avalanche observation arrives in.
#[derive(Debug, Clone)]
pub enum ObservationShape {
    Canonical(Value),
    Legacy(V1AvalancheObservation),
}

impl ObservationShape {
    /// Envelopes are recognized by their `attributes` object.
    pub fn detect(value: Value) -> Result<Self> {
        if value.get("attributes").is_some_and(Value::is_object) {
            let envelope: V1AvalancheObservation = serde_json::from_value(value)?;
            Ok(ObservationShape::Legacy(envelope))
        } else {
            Ok(ObservationShape::Canonical(value))
        }
    }
}

impl AvalancheObservation {
    /// Single constructor for both shapes; both go through
    /// [`Record::from_value`].
    pub fn from_shape(shape: ObservationShape) -> Result<Self> {
        match shape {
            ObservationShape::Canonical(value) => Self::from_value(value),
            ObservationShape::Legacy(envelope) => Self::from_value(envelope.into_canonical()),
        }
    }
}

/// Pagination info of a legacy response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct V1Meta {
    pub current_page: u32,
    pub page_items: u32,
    pub total_pages: u32,
    pub total_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct V1Links {
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
}

/// A page from the legacy endpoint. Items stay raw so one bad item does
/// not fail the page.
#[derive(Debug, Clone, Deserialize)]
pub struct V1AvyResponse {
    pub meta: V1Meta,
    pub links: V1Links,
    pub data: Vec<Value>,
}
