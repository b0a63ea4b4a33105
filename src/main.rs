use anyhow::{Context, Result};
use caic::{
    AvyObsQuery, BackcountryZoneTitle, Client, CollapsingObs, ConfigOverrides, CrackingObs,
    FieldReportQuery,
};
use chrono::{Duration as ChronoDuration, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Parser)]
#[command(name = "caic")]
#[command(about = "Query the Colorado Avalanche Information Center API")]
#[command(version)]
struct Cli {
    /// Verbose logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Base API URL
    #[arg(long, global = true, env = "CAIC_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Hide the progress spinner on bulk queries
    #[arg(long, global = true)]
    no_progress: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Window {
    /// Start of the window (defaults to 14 days ago)
    #[arg(short, long)]
    start: Option<String>,
    /// End of the window (defaults to now)
    #[arg(short, long)]
    end: Option<String>,
}

impl Window {
    fn resolve(self) -> (String, String) {
        let now = Utc::now();
        let start = self
            .start
            .unwrap_or_else(|| (now - ChronoDuration::days(14)).format(TIME_FORMAT).to_string());
        let end = self.end.unwrap_or_else(|| now.format(TIME_FORMAT).to_string());
        (start, end)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Avalanche observations in a time window
    AvyObs {
        #[command(flatten)]
        window: Window,
        /// Page ceiling; 0 disables it
        #[arg(long, default_value_t = AvyObsQuery::DEFAULT_PAGE_LIMIT)]
        page_limit: i64,
        /// Use the legacy observation endpoint
        #[arg(long)]
        v1: bool,
    },
    /// Search field reports
    FieldReports {
        #[command(flatten)]
        window: Window,
        /// Backcountry zone title (repeatable)
        #[arg(long = "zone")]
        zones: Vec<BackcountryZoneTitle>,
        /// Cracking level (repeatable)
        #[arg(long)]
        cracking: Vec<CrackingObs>,
        /// Collapsing level (repeatable)
        #[arg(long)]
        collapsing: Vec<CollapsingObs>,
        /// Free-text search
        #[arg(short, long, default_value = "")]
        query: String,
        /// Only reports that saw (true) or did not see (false) an avalanche
        #[arg(long)]
        avy_seen: Option<bool>,
        #[arg(long, default_value_t = FieldReportQuery::DEFAULT_PAGE_LIMIT)]
        page_limit: i64,
    },
    /// One field report by id
    FieldReport { id: String },
    /// One snowpack observation by id
    SnowpackObservation { id: String },
    /// One avalanche observation by id
    AvalancheObservation { id: String },
    /// One weather observation by id
    WeatherObservation { id: String },
    /// One backcountry zone by id
    BcZone { id: String },
    /// One highway zone by id
    HighwayZone { id: String },
    /// Forecasts valid at a date
    AvyForecast {
        /// ISO-8601 date-time (defaults to now)
        #[arg(long)]
        date: Option<String>,
    },
}

fn init_logging(debug: bool) {
    let default = if debug { "caic=debug,warn" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize output")?
    );
    Ok(())
}

fn print_found<T: Serialize>(kind: &str, id: &str, value: Option<T>) -> Result<()> {
    match value {
        Some(v) => print_json(&v),
        None => anyhow::bail!("{} {} did not validate (see the logs)", kind, id),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let overrides = ConfigOverrides {
        api_url: cli.api_url,
        timeout: cli.timeout.map(Duration::from_secs),
        ..ConfigOverrides::default()
    };
    let client = Client::new(overrides)?.with_progress(!cli.no_progress);

    match cli.command {
        Commands::AvyObs {
            window,
            page_limit,
            v1,
        } => {
            let (start, end) = window.resolve();
            let query = AvyObsQuery::new(start, end).page_limit(page_limit).legacy(v1);
            print_json(&client.avy_obs(&query).await)?;
        }
        Commands::FieldReports {
            window,
            zones,
            cracking,
            collapsing,
            query,
            avy_seen,
            page_limit,
        } => {
            let (start, end) = window.resolve();
            let mut search = FieldReportQuery::new(start, end)
                .bc_zones(zones)
                .cracking(cracking)
                .collapsing(collapsing)
                .query(query)
                .page_limit(page_limit);
            if let Some(seen) = avy_seen {
                search = search.avy_seen(seen);
            }
            print_json(&client.field_reports(&search).await?)?;
        }
        Commands::FieldReport { id } => {
            print_found("field report", &id, client.field_report(&id).await?)?
        }
        Commands::SnowpackObservation { id } => print_found(
            "snowpack observation",
            &id,
            client.snowpack_observation(&id).await?,
        )?,
        Commands::AvalancheObservation { id } => print_found(
            "avalanche observation",
            &id,
            client.avalanche_observation(&id).await?,
        )?,
        Commands::WeatherObservation { id } => print_found(
            "weather observation",
            &id,
            client.weather_observation(&id).await?,
        )?,
        Commands::BcZone { id } => {
            print_found("backcountry zone", &id, client.bc_zone(&id).await?)?
        }
        Commands::HighwayZone { id } => {
            print_found("highway zone", &id, client.highway_zone(&id).await?)?
        }
        Commands::AvyForecast { date } => {
            let date = date.unwrap_or_else(|| Utc::now().to_rfc3339());
            print_json(&client.avy_forecast(&date).await?)?;
        }
    }

    client.close();
    Ok(())
}
