//! An async Rust client for the Colorado Avalanche Information Center (CAIC)
//! API.
//!
//! The client wraps the public CAIC endpoints the CAIC website uses:
//! paged avalanche observation and field report queries, single-object
//! lookups, and forecasts served through the website's proxy.
//!
//! ## Quick start
//! - Endpoints default to the public CAIC hosts. Override them with
//!   environment variables (`CAIC_API_URL`, `CAIC_HOME_URL`) or a `.caicrc`
//!   file (current directory or home directory).
//! - Call [`Client::avy_obs`] with a time window.
//!
//! ```no_run
//! use caic::{AvyObsQuery, Client};
//!
//! #[tokio::main]
//! async fn main() -> caic::Result<()> {
//!     let client = Client::from_env()?;
//!     let obs = client
//!         .avy_obs(&AvyObsQuery::new("2023-01-01 00:00:00", "2023-01-08 00:00:00"))
//!         .await;
//!     for o in &obs {
//!         println!("{} {:?}", o.id, o.destructive_size);
//!     }
//!     client.close();
//!     Ok(())
//! }
//! ```
//!
//! Bulk queries do not fail; they retry within a [`PaginationPolicy`] and
//! return what they collected, logging through `tracing`.

#![forbid(unsafe_code)]

mod client;
pub mod codes;
mod config;
mod error;
mod legacy;
pub mod models;
mod paginator;
mod queries;
mod query;
mod transport;
mod util;

#[cfg(test)]
mod test_support;

pub use client::{Client, ClientConfig, ProxyEndpoint};
pub use codes::{
    Aspect, BackcountryZoneTitle, CodeError, CollapsingObs, CrackingObs, DestructiveSize,
    DetailType, ElevationBand, ObsType, PrimaryTrigger, RelativeSize, SecondaryTrigger, TypeCode,
};
pub use config::ConfigOverrides;
pub use error::{Error, Result};
pub use legacy::{
    ObservationShape, Relationship, V1AvalancheObservation, V1AvyResponse, V1Links, V1Meta,
};
pub use models::{
    AvalancheObservation, BackcountryZone, FieldReport, Forecast, HighwayZone, Record,
    SnowpackObservation, WeatherObservation,
};
pub use paginator::{PageLimit, PaginationPolicy};
pub use queries::{AvyObsQuery, FieldReportQuery};
pub use query::{Params, QueryValue};
pub use transport::{HttpTransport, Transport};
