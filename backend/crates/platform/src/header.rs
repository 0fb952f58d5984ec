//! Request header helpers

use std::net::IpAddr;

use axum::http::{HeaderMap, header};

/// Read a credential from a custom header, falling back to
/// `Authorization: Bearer <token>`.
///
/// Empty values are treated as absent.
pub fn extract_token(headers: &HeaderMap, custom_header: &str) -> Option<String> {
    let custom = headers
        .get(custom_header)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(token) = custom {
        return Some(token.to_string());
    }

    extract_bearer(headers)
}

/// `Authorization: Bearer <token>` (scheme is case-insensitive)
pub fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Extract client IP, preferring the first `X-Forwarded-For` entry
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| xff.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .or(direct_ip)
}
