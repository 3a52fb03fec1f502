//! CORS layer construction.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use super::config::CorsConfig;

impl CorsConfig {
    /// Build the CORS layer. Entries that fail to parse are ignored.
    ///
    /// A disabled config yields a layer that adds no CORS headers, so browsers
    /// deny cross-origin reads. Credentials are never allowed with a `*` origin.
    pub fn layer(&self) -> CorsLayer {
        if !self.enabled {
            return CorsLayer::new();
        }

        let wildcard = self.allow_origins.iter().any(|o| o == "*");
        let cors = if wildcard {
            CorsLayer::new().allow_origin(Any)
        } else {
            let origins: Vec<HeaderValue> =
                self.allow_origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new().allow_origin(origins)
        };

        let methods: Vec<Method> = self
            .allow_methods
            .iter()
            .filter_map(|m| m.to_uppercase().parse().ok())
            .collect();
        let headers: Vec<HeaderName> = self
            .allow_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();

        cors.allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(self.allow_credentials && !wildcard)
            .max_age(Duration::from_secs(self.max_age))
    }
}
