use axum::http::{
    header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        CONTENT_TYPE, VARY,
    },
    HeaderMap, HeaderValue,
};

use crate::config::DEFAULT_ORIGINS;

/// Exact-match origin allow-list. Unknown origins get the default origin,
/// never the caller's value.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed: Vec<HeaderValue>,
}

impl CorsPolicy {
    /// The first origin is the default. Values that are not valid header
    /// values are skipped.
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed: Vec<HeaderValue> = origins
            .into_iter()
            .filter_map(|origin| HeaderValue::from_str(origin.as_ref()).ok())
            .collect();

        if allowed.is_empty() {
            return Self::default();
        }
        Self { allowed }
    }

    pub fn default_origin(&self) -> &HeaderValue {
        &self.allowed[0]
    }

    pub fn allow_origin(&self, origin: Option<&HeaderValue>) -> HeaderValue {
        origin
            .and_then(|origin| self.allowed.iter().find(|allowed| *allowed == origin))
            .unwrap_or_else(|| self.default_origin())
            .clone()
    }

    /// Headers attached to every JSON response for this origin.
    pub fn headers(&self, origin: Option<&HeaderValue>) -> HeaderMap {
        let mut headers = self.preflight_headers(origin);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    pub fn preflight_headers(&self, origin: Option<&HeaderValue>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin(origin));
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );
        headers.insert(VARY, HeaderValue::from_static("Origin"));
        headers
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allowed: DEFAULT_ORIGINS
                .into_iter()
                .map(HeaderValue::from_static)
                .collect(),
        }
    }
}
