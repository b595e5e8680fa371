//! HTTP transport for the recipe lookups.
//!
//! Lookups only ever see the [`HttpClient`] trait, so tests swap in
//! [`MockClient`] and never touch the network.

mod client;
mod rate_limiter;

pub use client::{HttpClient, MockClient, MockResponse, ReqwestClient, ReqwestClientBuilder};
pub use rate_limiter::RateLimiter;

/// Host part of a URL, used to key the rate limiter.
pub fn host_of(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
}

#[cfg(test)]
mod tests {
    use super::host_of;

    #[test]
    fn host_of_extracts_host() {
        assert_eq!(
            host_of("https://www.thecocktaildb.com/api/json/v1/1/search.php?s=Mojito"),
            Some("www.thecocktaildb.com".to_string())
        );
        assert_eq!(host_of("not a url"), None);
    }
}
