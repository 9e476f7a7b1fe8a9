//! Origin gate: decides which CORS headers a response carries.
//!
//! The gate only shapes response headers. It never rejects a request;
//! browsers enforce the result, non-browser clients ignore it.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, VARY,
};
use axum::http::{HeaderMap, HeaderValue};
use tracing::warn;

/// Origins allowed in every deployment.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:8080", "http://localhost:1234"];

/// Methods advertised to an allowed pre-flight request.
pub const PREFLIGHT_ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE";

/// Request headers advertised to an allowed pre-flight request.
pub const PREFLIGHT_ALLOW_HEADERS: &str = "Content-Type";

/// Outcome of checking a request's `Origin` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginDecision {
    /// Allowed. Carries the exact origin to echo, or `None` when the request
    /// had no `Origin` header (same-origin or non-browser caller).
    Allow(Option<HeaderValue>),
    /// Origin not in the allow-list: no CORS headers are emitted.
    Deny,
}

impl OriginDecision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }

    /// The origin value to echo back, if any.
    #[must_use]
    pub fn echo(&self) -> Option<&HeaderValue> {
        match self {
            Self::Allow(origin) => origin.as_ref(),
            Self::Deny => None,
        }
    }

    /// Writes `Access-Control-Allow-Origin` (and `Vary: Origin`) when there
    /// is an origin to echo.
    pub fn apply(&self, headers: &mut HeaderMap) {
        if let Some(origin) = self.echo() {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
            headers.append(VARY, HeaderValue::from_static("origin"));
        }
    }

    /// Writes the pre-flight method and header allowances when allowed.
    pub fn apply_preflight(&self, headers: &mut HeaderMap) {
        if self.is_allowed() {
            headers.insert(
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(PREFLIGHT_ALLOW_METHODS),
            );
            headers.insert(
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(PREFLIGHT_ALLOW_HEADERS),
            );
        }
    }
}

/// Fixed allow-list of origins.
#[derive(Debug, Clone)]
pub struct OriginGate {
    allowed: Vec<HeaderValue>,
}

impl OriginGate {
    /// Builds a gate from origin strings. Entries that are not valid header
    /// values are skipped with a warning.
    #[must_use]
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = origins
            .into_iter()
            .filter_map(|origin| {
                let origin = origin.as_ref();
                match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin, "ignoring invalid CORS origin");
                        None
                    }
                }
            })
            .collect();
        Self { allowed }
    }

    /// Decides what to do with a request's `Origin` header value.
    ///
    /// Absent → allow with nothing to echo. Listed → allow, echoing the
    /// exact value. Anything else → deny.
    #[must_use]
    pub fn decide(&self, origin: Option<&HeaderValue>) -> OriginDecision {
        match origin {
            None => OriginDecision::Allow(None),
            Some(origin) if self.allowed.contains(origin) => {
                OriginDecision::Allow(Some(origin.clone()))
            }
            Some(_) => OriginDecision::Deny,
        }
    }
}

impl Default for OriginGate {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_ORIGINS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(value: &'static str) -> HeaderValue {
        HeaderValue::from_static(value)
    }

    #[test]
    fn absent_origin_is_allowed_without_echo() {
        let gate = OriginGate::default();
        let decision = gate.decide(None);
        assert_eq!(decision, OriginDecision::Allow(None));
        assert!(decision.echo().is_none());
    }

    #[test]
    fn listed_origin_is_echoed() {
        let gate = OriginGate::default();
        for origin in DEFAULT_ALLOWED_ORIGINS {
            let value = HeaderValue::from_static(origin);
            assert_eq!(gate.decide(Some(&value)).echo(), Some(&value));
        }
    }

    #[test]
    fn unlisted_origin_is_denied() {
        let gate = OriginGate::default();
        assert_eq!(
            gate.decide(Some(&header("http://evil.example.com"))),
            OriginDecision::Deny
        );
        // Exact match only: no prefix or case folding.
        assert_eq!(
            gate.decide(Some(&header("http://localhost:8080/"))),
            OriginDecision::Deny
        );
        assert_eq!(
            gate.decide(Some(&header("HTTP://LOCALHOST:8080"))),
            OriginDecision::Deny
        );
    }

    #[test]
    fn custom_origins_extend_the_list() {
        let gate = OriginGate::new(["https://movies.example.com"]);
        assert!(gate
            .decide(Some(&header("https://movies.example.com")))
            .is_allowed());
        assert!(!gate.decide(Some(&header("http://localhost:8080"))).is_allowed());
    }

    #[test]
    fn invalid_origins_are_skipped() {
        let gate = OriginGate::new(["http://ok.example.com", "bad\norigin"]);
        assert_eq!(gate.allowed.len(), 1);
    }

    #[test]
    fn apply_writes_echo_and_vary() {
        let mut headers = HeaderMap::new();
        OriginDecision::Allow(Some(header("http://localhost:1234"))).apply(&mut headers);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:1234");
        assert_eq!(headers[VARY], "origin");
    }

    #[test]
    fn apply_writes_nothing_without_echo() {
        let mut headers = HeaderMap::new();
        OriginDecision::Allow(None).apply(&mut headers);
        OriginDecision::Deny.apply(&mut headers);
        assert!(headers.is_empty());
    }

    #[test]
    fn preflight_headers_only_when_allowed() {
        let mut headers = HeaderMap::new();
        OriginDecision::Deny.apply_preflight(&mut headers);
        assert!(headers.is_empty());

        OriginDecision::Allow(None).apply_preflight(&mut headers);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], PREFLIGHT_ALLOW_METHODS);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }
}
