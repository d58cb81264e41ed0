//! EnsembleData API client.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::constants::USER_AGENT;
use crate::db::SearchContext;
use crate::normalize::{sanitize_utf8, strip_lone_surrogates};
use crate::platform::Platform;

/// Longest error body excerpt carried in [`ApiError::Status`].
const ERROR_BODY_EXCERPT: usize = 300;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// One search to run against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub platform: Platform,
    pub hashtag: String,
    /// TikTok only: how many days back to search.
    pub days: i64,
    /// TikTok cursor; Instagram chunk size. Unused for Threads.
    pub max_cursor: i64,
}

impl FetchRequest {
    /// API path for this request's platform.
    #[must_use]
    pub fn endpoint(&self) -> &'static str {
        match self.platform {
            Platform::TikTok => "/tt/hashtag/recent-posts",
            Platform::Instagram => "/instagram/hashtag/posts",
            Platform::Threads => "/threads/keyword/search",
        }
    }

    /// Query parameters for this request, token last.
    #[must_use]
    pub fn query_params(&self, token: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![("name", self.hashtag.clone())];
        match self.platform {
            Platform::TikTok => {
                params.push(("days", self.days.to_string()));
                params.push(("remap_output", "true".to_string()));
                params.push(("max_cursor", self.max_cursor.to_string()));
            }
            Platform::Instagram => {
                params.push(("cursor", String::new()));
                params.push(("chunk_size", self.max_cursor.to_string()));
                params.push(("get_author_info", "true".to_string()));
            }
            Platform::Threads => {
                params.push(("sorting", "0".to_string()));
            }
        }
        params.push(("token", token.to_string()));
        params
    }

    /// Search parameters stored with each row of the resulting batch.
    #[must_use]
    pub fn search_context(&self) -> SearchContext {
        let (days, max_cursor) = match self.platform {
            Platform::TikTok => (Some(self.days), Some(self.max_cursor)),
            Platform::Instagram => (None, Some(self.max_cursor)),
            Platform::Threads => (None, None),
        };
        SearchContext {
            query: self.hashtag.clone(),
            days,
            max_cursor,
        }
    }
}

/// Client for the EnsembleData search endpoints.
pub struct EnsembleClient {
    client: Client,
    base_url: String,
    token: String,
}

impl EnsembleClient {
    /// Create a client for the configured API root.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config, token: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Run one search and return the decoded JSON body.
    ///
    /// Invalid UTF-8 bytes and unpaired surrogate escapes in the body are
    /// dropped before decoding.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a body
    /// that is not JSON.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<Value, ApiError> {
        let endpoint = request.endpoint();
        let url = format!("{}{endpoint}", self.base_url);

        info!(platform = %request.platform, hashtag = %request.hashtag, endpoint, "Fetching posts");

        // Errors carry the request URL, which contains the token.
        let response = self
            .client
            .get(&url)
            .query(&request.query_params(&self.token))
            .send()
            .await
            .map_err(|e| ApiError::Request {
                endpoint,
                source: e.without_url(),
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| ApiError::Request {
            endpoint,
            source: e.without_url(),
        })?;
        let text = sanitize_utf8(&body);

        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint,
                status,
                body: text.chars().take(ERROR_BODY_EXCERPT).collect(),
            });
        }

        debug!(endpoint, bytes = body.len(), "Received response");

        serde_json::from_str(&strip_lone_surrogates(&text))
            .map_err(|source| ApiError::Decode { endpoint, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(platform: Platform) -> FetchRequest {
        FetchRequest {
            platform,
            hashtag: "blackjoy".to_string(),
            days: 7,
            max_cursor: 30,
        }
    }

    #[test]
    fn test_tiktok_params() {
        let params = request(Platform::TikTok).query_params("tok");
        assert_eq!(
            params,
            vec![
                ("name", "blackjoy".to_string()),
                ("days", "7".to_string()),
                ("remap_output", "true".to_string()),
                ("max_cursor", "30".to_string()),
                ("token", "tok".to_string()),
            ]
        );
    }

    #[test]
    fn test_instagram_params_use_cursor_as_chunk_size() {
        let params = request(Platform::Instagram).query_params("tok");
        assert!(params.contains(&("chunk_size", "30".to_string())));
        assert!(params.contains(&("cursor", String::new())));
        assert!(params.contains(&("get_author_info", "true".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "days"));
    }

    #[test]
    fn test_threads_params() {
        let params = request(Platform::Threads).query_params("tok");
        assert_eq!(
            params,
            vec![
                ("name", "blackjoy".to_string()),
                ("sorting", "0".to_string()),
                ("token", "tok".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_context_per_platform() {
        let tiktok = request(Platform::TikTok).search_context();
        assert_eq!(tiktok.query, "blackjoy");
        assert_eq!((tiktok.days, tiktok.max_cursor), (Some(7), Some(30)));

        let instagram = request(Platform::Instagram).search_context();
        assert_eq!((instagram.days, instagram.max_cursor), (None, Some(30)));

        let threads = request(Platform::Threads).search_context();
        assert_eq!((threads.days, threads.max_cursor), (None, None));
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(request(Platform::TikTok).endpoint(), "/tt/hashtag/recent-posts");
        assert_eq!(request(Platform::Instagram).endpoint(), "/instagram/hashtag/posts");
        assert_eq!(request(Platform::Threads).endpoint(), "/threads/keyword/search");
    }
}
