use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) fn urljoin(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// URL of a single object: `<base>/<collection>/<id>.json`.
pub(crate) fn object_url(base: &str, collection: &str, id: &str) -> String {
    let collection = collection.trim_matches('/');
    urljoin(base, &format!("/{}/{}.json", collection, id.trim()))
}

/// Builds the inner request the home-site proxy forwards, e.g.
/// `/products/all?datetime=...&includeExpired=true`.
///
/// The proxy receives this whole string as one parameter value, so the
/// inner pairs are joined verbatim and escaped once by the outer request.
pub(crate) fn compose_proxy_uri(uri: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return uri.to_string();
    }
    let mut out = uri.to_string();
    out.push(if uri.contains('?') { '&' } else { '?' });
    let mut first = true;
    for (k, v) in params {
        if !first {
            out.push('&');
        }
        first = false;
        out.push_str(k);
        out.push('=');
        out.push_str(v);
    }
    out
}

/// Current unix time in seconds, sent as `t` to defeat upstream caching.
pub(crate) fn cache_buster() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
        .to_string()
}
