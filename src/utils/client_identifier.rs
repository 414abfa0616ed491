use actix_web::http::header::{HeaderMap, USER_AGENT};

/// Address headers consulted in priority order
pub const FORWARDED_ADDRESS_HEADERS: [&str; 4] = [
    "x-forwarded-for",
    "x-real-ip",
    "cf-connecting-ip",
    "true-client-ip",
];

/// Bucket shared by clients that send nothing identifying
pub const ANONYMOUS_IDENTIFIER: &str = "anonymous";

/// Derives the rate-limit bucket for a request.
///
/// The first present address header wins. Only `x-forwarded-for` carries a
/// proxy chain, so it alone is split and its leftmost entry used. Without any
/// address header the user agent is used, then a fixed sentinel.
pub fn client_identifier(headers: &HeaderMap) -> String {
    for name in FORWARDED_ADDRESS_HEADERS {
        let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) else {
            continue;
        };

        let candidate = if name == "x-forwarded-for" {
            value.split(',').next().unwrap_or_default().trim()
        } else {
            value.trim()
        };

        if !candidate.is_empty() {
            return candidate.to_string();
        }
    }

    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|ua| !ua.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| ANONYMOUS_IDENTIFIER.to_string())
}
