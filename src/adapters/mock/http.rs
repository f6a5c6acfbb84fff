//! Mock HTTP client for testing.
//!
//! Responses are chosen, in order, from a FIFO queue, then by the
//! `X-Amz-Target` header (user-pool operations share one URL), then by URL
//! (exact, then prefix), then the default response.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::traits::{Headers, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method (GET or POST)
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body (for POST requests)
    pub body: Option<String>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The body parsed as JSON, if any.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body.as_deref().and_then(|b| serde_json::from_str(b).ok())
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a response (any status)
    Success(Response),
    /// Return a transport error
    Error(HttpError),
}

impl MockResponse {
    /// Response with a JSON body.
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        MockResponse::Success(Response::json_body(status, &value))
    }
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use cloudinv::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "https://api.example.com/prod/?function=ec2",
///     MockResponse::json(200, serde_json::json!([])),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    queue: Arc<Mutex<VecDeque<MockResponse>>>,
    by_target: Arc<Mutex<HashMap<String, MockResponse>>>,
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    default_response: Arc<Mutex<Option<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a URL. Exact matches win over prefix matches.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    /// Set a response for a user-pool operation, e.g. `"InitiateAuth"`.
    pub fn set_target_response(&self, operation: &str, response: MockResponse) {
        self.by_target.lock().unwrap().insert(
            format!("AWSCognitoIdentityProviderService.{}", operation),
            response,
        );
    }

    /// Queue a one-shot response, consumed by the next request.
    pub fn push_response(&self, response: MockResponse) {
        self.queue.lock().unwrap().push_back(response);
    }

    /// Set a default response for requests without a specific match.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock().unwrap() = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Operations (the part after the dot in `X-Amz-Target`) in call order.
    pub fn targets(&self) -> Vec<String> {
        self.get_requests()
            .iter()
            .filter_map(|r| r.header("X-Amz-Target"))
            .map(|t| t.rsplit('.').next().unwrap_or(t).to_string())
            .collect()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn pick(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        let response = self.queue.lock().unwrap().pop_front().or_else(|| {
            let target = headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("X-Amz-Target"))
                .map(|(_, v)| v.clone());
            target.and_then(|t| self.by_target.lock().unwrap().get(&t).cloned())
        });

        let response = response.or_else(|| {
            let responses = self.responses.lock().unwrap();
            responses.get(url).cloned().or_else(|| {
                responses
                    .iter()
                    .filter(|(pattern, _)| url.starts_with(pattern.as_str()))
                    .max_by_key(|(pattern, _)| pattern.len())
                    .map(|(_, r)| r.clone())
            })
        });

        match response.or_else(|| self.default_response.lock().unwrap().clone()) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get(&self, url: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("GET", url, headers, None);
        self.pick(url, headers)
    }

    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()));
        self.pick(url, headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[tokio::test]
    async fn test_get_with_response() {
        let client = MockHttpClient::new();
        client.set_response(
            "https://example.com/test",
            MockResponse::Success(Response::new(200, Bytes::from("Hello"))),
        );

        let response = client
            .get("https://example.com/test", &Headers::new())
            .await
            .unwrap();
        assert_eq!(response.body, Bytes::from("Hello"));

        let requests = client.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
    }

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let client = MockHttpClient::new();
        client.set_response("https://a.com/", MockResponse::json(200, serde_json::json!(1)));
        client.set_response("https://a.com/prod", MockResponse::json(200, serde_json::json!(2)));

        let response = client
            .get("https://a.com/prod/?function=ec2", &Headers::new())
            .await
            .unwrap();
        assert_eq!(response.text().unwrap(), "2");
    }

    #[tokio::test]
    async fn test_queue_then_target_then_default() {
        let client = MockHttpClient::new();
        client.set_default_response(MockResponse::Error(HttpError::Timeout("t".to_string())));
        client.set_target_response("GetUser", MockResponse::json(200, serde_json::json!({})));
        client.push_response(MockResponse::json(400, serde_json::json!({})));

        let mut headers = Headers::new();
        headers.insert(
            "X-Amz-Target".to_string(),
            "AWSCognitoIdentityProviderService.GetUser".to_string(),
        );

        let first = client.post("https://idp/", "{}", &headers).await.unwrap();
        assert_eq!(first.status, 400);
        let second = client.post("https://idp/", "{}", &headers).await.unwrap();
        assert_eq!(second.status, 200);
        let third = client.post("https://idp/", "{}", &Headers::new()).await;
        assert!(matches!(third, Err(HttpError::Timeout(_))));

        assert_eq!(client.targets(), vec!["GetUser", "GetUser"]);
    }

    #[tokio::test]
    async fn test_no_response_configured() {
        let client = MockHttpClient::new();
        let result = client.get("https://nothing", &Headers::new()).await;
        assert!(matches!(result, Err(HttpError::Other(_))));
    }

    #[test]
    fn test_recorded_request_helpers() {
        let mut headers = Headers::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        let request = RecordedRequest {
            method: "POST".to_string(),
            url: "u".to_string(),
            headers,
            body: Some(r#"{"k":"v"}"#.to_string()),
        };
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.json_body().unwrap()["k"], "v");
    }
}
