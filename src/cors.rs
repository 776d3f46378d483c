use http::Method;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub const DEFAULT_CORS_ORIGINS: &str =
    "http://localhost,https://localhost,http://127.0.0.1,https://127.0.0.1";

/// Normalize configured origins: trim whitespace and drop empty entries.
#[must_use]
pub fn normalize_origins(origins: &[String]) -> Vec<String> {
    origins
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Whether `origin` is allowed by the configured prefixes.
///
/// A `*` entry allows every origin.
#[must_use]
pub fn origin_allowed(origin: &str, cors_origins: &[String]) -> bool {
    cors_origins
        .iter()
        .any(|allowed| allowed == "*" || origin.starts_with(allowed.as_str()))
}

/// Build a CORS layer for gRPC-Web with the given allowed origins.
///
/// Pass "*" in the origins list to allow all origins (not recommended for production).
pub fn build_cors_layer(cors_origins: Vec<String>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            origin
                .to_str()
                .is_ok_and(|origin_str| origin_allowed(origin_str, &cors_origins))
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origins(list: &str) -> Vec<String> {
        normalize_origins(&list.split(',').map(str::to_string).collect::<Vec<_>>())
    }

    #[test]
    fn test_normalize_trims_and_drops_empty() {
        assert_eq!(
            origins(" http://a.test , ,https://b.test"),
            vec!["http://a.test".to_string(), "https://b.test".to_string()]
        );
    }

    #[test]
    fn test_default_origins_allow_localhost_with_port() {
        let allowed = origins(DEFAULT_CORS_ORIGINS);
        assert!(origin_allowed("http://localhost:5173", &allowed));
        assert!(origin_allowed("https://127.0.0.1:8443", &allowed));
        assert!(!origin_allowed("https://evil.example", &allowed));
    }

    #[test]
    fn test_wildcard_allows_everything() {
        let allowed = origins("*");
        assert!(origin_allowed("https://anything.example", &allowed));
    }

    #[test]
    fn test_empty_list_allows_nothing() {
        assert!(!origin_allowed("http://localhost", &[]));
    }

    #[test]
    fn test_build_cors_layer_does_not_panic() {
        let _layer = build_cors_layer(origins(DEFAULT_CORS_ORIGINS));
    }
}
