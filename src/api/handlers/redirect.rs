//! Handler for the redirect route.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use url::Url;
use uuid::Uuid;

use crate::domain::redirect_request::RedirectRequestData;
use crate::metrics;
use crate::state::AppState;

/// `GET /r/{slug}`: decides the redirect and answers `303 See Other`.
///
/// The response is written as soon as the decision is made; click results
/// drain on a background task that exits when the stream closes or the
/// request token is cancelled. Engine errors surface as `500` with the
/// error message as body.
pub async fn redirect_handler(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();

    if slug.is_empty() {
        return (StatusCode::BAD_REQUEST, "slug is required").into_response();
    }

    let ip = client_ip(&headers, addr);

    let protocol = request_protocol(&headers);

    let host = header_value(&headers, header::HOST.as_str()).unwrap_or_else(|| "localhost".to_string());
    let request_url = match Url::parse(&format!("{}://{}{}", protocol, host, uri)) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(error = %e, "failed to build request url");
            return (StatusCode::INTERNAL_SERVER_ERROR, "invalid request url").into_response();
        }
    };

    let data = RedirectRequestData {
        request_id: Uuid::new_v4().to_string(),
        slug: slug.clone(),
        params: query_params(&uri),
        headers: header_multimap(&headers),
        user_agent: header_value(&headers, header::USER_AGENT.as_str()).unwrap_or_default(),
        ip,
        protocol,
        referer: header_value(&headers, header::REFERER.as_str()).unwrap_or_default(),
        request_url,
    };

    if let Err(e) = data.validate() {
        tracing::error!(slug, error = %e, "invalid redirect request");
        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
    }

    tracing::debug!(slug, request_id = %data.request_id, "redirect request");

    let cancel = state.shutdown.child_token();
    let outcome = state
        .redirect_service
        .redirect(cancel.clone(), &slug, &data)
        .await;

    if let Some(m) = metrics::get_metrics() {
        m.redirect_duration.observe(started.elapsed().as_secs_f64());
    }

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(slug, error = %e, "redirect failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    if let Some(m) = metrics::get_metrics() {
        m.redirects_total.inc();
        m.redirects_by_slug.with_label_values(&[slug.as_str()]).inc();
    }

    let mut output = result.output;
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                item = output.recv() => {
                    let Some(processed) = item else {
                        tracing::debug!(slug, "click processing complete");
                        break;
                    };

                    if let Some(err) = processed.err {
                        tracing::error!(
                            slug,
                            click_id = %processed.click.id,
                            error = %err,
                            "click processing failed"
                        );
                    }
                }
            }
        }
    });

    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, result.target_url)],
    )
        .into_response()
}

/// `GET /r/`: the slug segment is missing entirely.
pub async fn missing_slug_handler() -> Response {
    (StatusCode::BAD_REQUEST, "slug is required").into_response()
}

/// Resolves the client IP from proxy headers, in order of reliability:
/// `CF-Connecting-IP`, `X-Real-IP`, the first `X-Forwarded-For` entry, then
/// the peer address.
fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> IpAddr {
    for name in ["cf-connecting-ip", "x-real-ip"] {
        if let Some(ip) = header_value(headers, name).and_then(|v| v.trim().parse().ok()) {
            return ip;
        }
    }

    if let Some(forwarded) = header_value(headers, "x-forwarded-for") {
        if let Some(ip) = forwarded
            .split(',')
            .next()
            .and_then(|first| first.trim().parse().ok())
        {
            return ip;
        }
    }

    peer.ip()
}

/// `"https"` when a trusted proxy says so, `"http"` otherwise.
fn request_protocol(headers: &HeaderMap) -> String {
    let forwarded = header_value(headers, "x-forwarded-proto")
        .map(|v| v.split(',').next().unwrap_or("").trim().to_lowercase());

    match forwarded.as_deref() {
        Some("https") => "https".to_string(),
        _ => "http".to_string(),
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn header_multimap(headers: &HeaderMap) -> HashMap<String, Vec<String>> {
    let mut map: HashMap<String, Vec<String>> = HashMap::new();

    for (name, value) in headers.iter() {
        if let Ok(value) = value.to_str() {
            map.entry(name.as_str().to_string())
                .or_default()
                .push(value.to_string());
        }
    }

    map
}

/// Query parameters with multi-valued semantics preserved.
fn query_params(uri: &Uri) -> HashMap<String, Vec<String>> {
    let mut params: HashMap<String, Vec<String>> = HashMap::new();

    if let Some(query) = uri.query() {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_default()
                .push(value.into_owned());
        }
    }

    params
}
