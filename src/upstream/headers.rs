//! Header manipulation for forwarded traffic.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions
//! - Apply per-upstream header overrides to outbound requests
//!
//! # Design Decisions
//! - End-to-end headers pass through untouched, including the incoming Host
//! - Overrides replace every existing value of the named header

use axum::http::{header, HeaderMap, HeaderName};

/// Headers that only apply to a single transport hop.
static HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Remove hop-by-hop headers, including any listed in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}

/// Set each override on the outbound headers.
pub fn apply_overrides(headers: &mut HeaderMap, overrides: &HeaderMap) {
    for (name, value) in overrides {
        headers.insert(name.clone(), value.clone());
    }
}
