//! Named-endpoint REST client.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{ApiEndpoint, AppConfiguration};
use crate::error::{classify_http_error, ConfigError, NetworkError, ShellResult};
use crate::traits::{Headers, HttpClient, Response};

/// Longest response body excerpt carried in an error.
const ERROR_BODY_LIMIT: usize = 200;

/// Calls the configured API endpoints by name.
///
/// Every request first asks the endpoint's header augmenter for headers, so
/// the `Authorization` token is retrieved fresh per call.
#[derive(Clone)]
pub struct ApiClient {
    http: Arc<dyn HttpClient>,
    config: Arc<AppConfiguration>,
}

impl ApiClient {
    pub fn new(http: Arc<dyn HttpClient>, config: Arc<AppConfiguration>) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &Arc<AppConfiguration> {
        &self.config
    }

    /// `GET {endpoint}{path}?{query}` and parse the JSON reply.
    pub async fn get(&self, api_name: &str, path: &str, query: &[(&str, &str)]) -> ShellResult<Value> {
        let endpoint = self.endpoint(api_name)?;
        let url = build_url(&endpoint.endpoint, path, query);
        let headers = self.headers_for(endpoint).await?;

        debug!(api = api_name, url = %url, "GET");
        let response = self
            .http
            .get(&url, &headers)
            .await
            .map_err(|e| classify_http_error(e, &url))?;
        decode(response, &url)
    }

    /// `POST {endpoint}{path}` with a JSON body and parse the JSON reply.
    pub async fn post(&self, api_name: &str, path: &str, body: &Value) -> ShellResult<Value> {
        let endpoint = self.endpoint(api_name)?;
        let url = build_url(&endpoint.endpoint, path, &[]);
        let mut headers = self.headers_for(endpoint).await?;
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        debug!(api = api_name, url = %url, "POST");
        let response = self
            .http
            .post(&url, &body.to_string(), &headers)
            .await
            .map_err(|e| classify_http_error(e, &url))?;
        decode(response, &url)
    }

    fn endpoint(&self, name: &str) -> ShellResult<&ApiEndpoint> {
        self.config.endpoint(name).ok_or_else(|| {
            ConfigError::UnknownApi {
                name: name.to_string(),
            }
            .into()
        })
    }

    async fn headers_for(&self, endpoint: &ApiEndpoint) -> ShellResult<Headers> {
        let mut headers = match &endpoint.custom_header {
            Some(augmenter) => augmenter.headers().await?,
            None => Headers::new(),
        };
        headers
            .entry("Accept".to_string())
            .or_insert_with(|| "application/json".to_string());
        Ok(headers)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoints", &self.config.api.endpoints)
            .finish_non_exhaustive()
    }
}

/// Join base, path and an url-encoded query string.
pub fn build_url(base: &str, path: &str, query: &[(&str, &str)]) -> String {
    let mut url = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    if !query.is_empty() {
        let encoded: Vec<String> = query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        url.push('?');
        url.push_str(&encoded.join("&"));
    }
    url
}

fn decode(response: Response, url: &str) -> ShellResult<Value> {
    if !response.is_success() {
        let body = response.text().unwrap_or_default();
        let message: String = body.chars().take(ERROR_BODY_LIMIT).collect();
        warn!(status = response.status, url, "API returned an error status");
        return Err(NetworkError::HttpStatus {
            status: response.status,
            message,
        }
        .into());
    }
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(response.json()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::config::DEFAULT_API_NAME;
    use crate::error::{AuthError, ShellError};
    use crate::traits::{HeaderAugmenter, HttpError, StaticHeaders};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BASE: &str = "https://api.example.com/prod";

    struct CountingAugmenter(AtomicUsize);

    #[async_trait]
    impl HeaderAugmenter for CountingAugmenter {
        async fn headers(&self) -> ShellResult<Headers> {
            let n = self.0.fetch_add(1, Ordering::SeqCst) + 1;
            let mut headers = Headers::new();
            headers.insert("Authorization".to_string(), format!("token-{}", n));
            Ok(headers)
        }
    }

    struct SignedOut;

    #[async_trait]
    impl HeaderAugmenter for SignedOut {
        async fn headers(&self) -> ShellResult<Headers> {
            Err(AuthError::NoActiveSession.into())
        }
    }

    fn client(http: &MockHttpClient, augmenter: Arc<dyn HeaderAugmenter>) -> ApiClient {
        let mut config = AppConfiguration::default();
        config.api.endpoints[0].endpoint = BASE.to_string();
        ApiClient::new(
            Arc::new(http.clone()),
            Arc::new(config.with_header_augmenter(augmenter)),
        )
    }

    #[test]
    fn test_build_url() {
        assert_eq!(build_url(BASE, "/", &[]), "https://api.example.com/prod/");
        assert_eq!(build_url("https://a.com/", "items", &[]), "https://a.com/items");
        assert_eq!(
            build_url(BASE, "/", &[("function", "iam-users"), ("q", "a b&c")]),
            "https://api.example.com/prod/?function=iam-users&q=a%20b%26c"
        );
    }

    #[tokio::test]
    async fn test_get_attaches_fresh_header_per_call() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::json(200, json!([{"InstanceId": "i-1"}])));
        let api = client(&http, Arc::new(CountingAugmenter(AtomicUsize::new(0))));

        let value = api
            .get(DEFAULT_API_NAME, "/", &[("function", "ec2")])
            .await
            .unwrap();
        assert_eq!(value[0]["InstanceId"], "i-1");
        api.get(DEFAULT_API_NAME, "/", &[("function", "ec2")])
            .await
            .unwrap();

        let requests = http.get_requests();
        assert_eq!(requests[0].url, "https://api.example.com/prod/?function=ec2");
        assert_eq!(requests[0].header("Authorization"), Some("token-1"));
        assert_eq!(requests[1].header("Authorization"), Some("token-2"));
        assert_eq!(requests[0].header("Accept"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_no_session_sends_nothing() {
        let http = MockHttpClient::new();
        let api = client(&http, Arc::new(SignedOut));

        let err = api.get(DEFAULT_API_NAME, "/", &[]).await.unwrap_err();
        assert!(err.is_no_active_session());
        assert!(http.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_api() {
        let http = MockHttpClient::new();
        let api = client(&http, Arc::new(StaticHeaders::default()));
        let err = api.get("Nope", "/", &[]).await.unwrap_err();
        assert_eq!(
            err,
            ShellError::Config(ConfigError::UnknownApi {
                name: "Nope".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_status_and_transport_errors() {
        let http = MockHttpClient::new();
        let api = client(&http, Arc::new(StaticHeaders::default()));

        http.push_response(MockResponse::json(401, json!({"message": "Unauthorized"})));
        let err = api.get(DEFAULT_API_NAME, "/", &[]).await.unwrap_err();
        assert!(err.requires_reauth());

        http.push_response(MockResponse::Error(HttpError::ConnectionFailed(
            "refused".to_string(),
        )));
        let err = api.get(DEFAULT_API_NAME, "/", &[]).await.unwrap_err();
        assert!(matches!(
            err,
            ShellError::Network(NetworkError::ConnectionFailed { .. })
        ));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_invalid_and_empty_bodies() {
        let http = MockHttpClient::new();
        let api = client(&http, Arc::new(StaticHeaders::default()));

        http.push_response(MockResponse::Success(Response::new(200, "<html>".into())));
        let err = api.get(DEFAULT_API_NAME, "/", &[]).await.unwrap_err();
        assert!(matches!(
            err,
            ShellError::Network(NetworkError::InvalidResponse { .. })
        ));

        http.push_response(MockResponse::Success(Response::new(200, "".into())));
        assert_eq!(api.get(DEFAULT_API_NAME, "/", &[]).await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_post_sends_json() {
        let http = MockHttpClient::new();
        http.set_default_response(MockResponse::json(200, json!({"ok": true})));
        let api = client(&http, Arc::new(StaticHeaders::default()));

        api.post(DEFAULT_API_NAME, "/items", &json!({"a": 1}))
            .await
            .unwrap();
        let request = &http.get_requests()[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.url, "https://api.example.com/prod/items");
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.json_body().unwrap(), json!({"a": 1}));
    }
}
