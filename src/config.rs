use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::ClientConfig;

pub(crate) const DEFAULT_API_URL: &str = "https://api.avalanche.state.co.us";
pub(crate) const DEFAULT_HOME_URL: &str = "https://avalanche.state.co.us";
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Default, PartialEq)]
struct RcConfig {
    api_url: Option<String>,
    home_url: Option<String>,
    timeout: Option<Duration>,
    verify: Option<bool>,
}

/// Overrides supplied by the caller; anything left `None` falls through to
/// the environment, then the rc file, then the defaults.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub home_url: Option<String>,
    pub timeout: Option<Duration>,
    pub verify: Option<bool>,
}

pub(crate) fn load_config(overrides: ConfigOverrides) -> Result<ClientConfig> {
    let mut api_url = overrides
        .api_url
        .or_else(|| std::env::var("CAIC_API_URL").ok());
    let mut home_url = overrides
        .home_url
        .or_else(|| std::env::var("CAIC_HOME_URL").ok());
    let mut timeout = match overrides.timeout {
        Some(t) => Some(t),
        None => match std::env::var("CAIC_TIMEOUT") {
            Ok(v) => Some(parse_timeout(&v).context("invalid CAIC_TIMEOUT")?),
            Err(_) => None,
        },
    };
    let mut verify = overrides
        .verify
        .or_else(|| std::env::var("CAIC_VERIFY").ok().map(|v| v.trim() != "0"));

    if api_url.is_none() || home_url.is_none() || timeout.is_none() || verify.is_none() {
        for rc_path in rc_candidates() {
            if rc_path.exists() {
                let cfg = read_rc(&rc_path).with_context(|| {
                    format!("failed to read configuration file {}", rc_path.display())
                })?;

                api_url = api_url.or(cfg.api_url);
                home_url = home_url.or(cfg.home_url);
                timeout = timeout.or(cfg.timeout);
                verify = verify.or(cfg.verify);
                break;
            }
        }
    }

    let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let home_url = home_url.unwrap_or_else(|| DEFAULT_HOME_URL.to_string());
    for (name, url) in [("api_url", &api_url), ("home_url", &home_url)] {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!("{} must be an absolute http(s) URL, got [{}]", name, url);
        }
    }

    Ok(ClientConfig {
        api_url,
        home_url,
        timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        verify: verify.unwrap_or(true),
    })
}

fn parse_timeout(v: &str) -> Result<Duration> {
    let secs: u64 = v
        .trim()
        .parse()
        .with_context(|| format!("timeout must be a whole number of seconds, got [{}]", v))?;
    Ok(Duration::from_secs(secs))
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path)?;
    parse_rc(&text)
}

fn parse_rc(text: &str) -> Result<RcConfig> {
    let mut cfg = RcConfig::default();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // URLs contain ':' too, so only split on the first one.
        if let Some((k, v)) = line.split_once(':') {
            let v = strip_quotes(v.trim());
            if v.is_empty() {
                continue;
            }
            match k.trim() {
                "api_url" => cfg.api_url = Some(v.to_string()),
                "home_url" => cfg.home_url = Some(v.to_string()),
                "timeout" => cfg.timeout = Some(parse_timeout(v)?),
                "verify" => cfg.verify = Some(v != "0"),
                _ => {}
            }
        }
    }

    Ok(cfg)
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // 1) CAIC_RC (explicit)
    // 2) ./.caicrc
    // 3) ~/.caicrc
    if let Ok(p) = std::env::var("CAIC_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".caicrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".caicrc"));
    }
    v
}
