//! HTTP client for the portfolio analytics backend.
//!
//! One wrapper owns the base URL, timeout and JSON headers; every resource
//! module (`portfolio`, `transactions`, `analytics`, ...) is an `impl`
//! block on [`ApiClient`] that only encodes endpoint paths and query
//! parameters. All computation happens server-side — this layer fetches,
//! decodes and nothing else. Retry policy lives in the query layer, not
//! here.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub mod analytics;
pub mod benchmarks;
pub mod error;
pub mod optimization;
pub mod portfolio;
pub mod risk;
pub mod sync;
pub mod transactions;

pub use error::ApiError;

/// Default backend address, overridable via `--api-url` / `FOLIO_API_URL`
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// All resources except the health check live under this prefix
const API_PREFIX: &str = "/api/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|source| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            API_PREFIX,
            path
        )
    }

    /// The health check is mounted at the server root, outside `/api/v1`
    pub(crate) fn root_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Send a request and decode the response.
    ///
    /// `204 No Content` yields `Ok(None)` without touching the body. Any
    /// non-2xx status becomes [`ApiError::Status`] with the body's `detail`
    /// message unwrapped when present.
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        context: &'static str,
    ) -> Result<Option<T>, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            debug!(context, %status, "no content");
            return Ok(None);
        }

        let body = response.text().await?;
        debug!(context, %status, bytes = body.len(), "response received");

        if !status.is_success() {
            return Err(ApiError::from_response(status, &body));
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| ApiError::Decode { context, source })
    }

    /// GET a JSON payload from under the API prefix
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        context: &'static str,
    ) -> Result<T, ApiError> {
        let builder = self.http.get(self.endpoint(path)).query(query);
        self.expect_body(self.request(builder, context).await?, context)
    }

    /// POST a JSON body and decode the JSON response
    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        context: &'static str,
    ) -> Result<T, ApiError> {
        let builder = self.http.post(self.endpoint(path)).json(body);
        self.expect_body(self.request(builder, context).await?, context)
    }

    /// POST with no body (manual triggers)
    pub(crate) async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        context: &'static str,
    ) -> Result<T, ApiError> {
        let builder = self.http.post(self.endpoint(path)).query(query);
        self.expect_body(self.request(builder, context).await?, context)
    }

    /// PUT a JSON body and decode the JSON response
    pub(crate) async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        context: &'static str,
    ) -> Result<T, ApiError> {
        let builder = self.http.put(self.endpoint(path)).json(body);
        self.expect_body(self.request(builder, context).await?, context)
    }

    /// DELETE a resource; 200 and 204 both count as success
    pub(crate) async fn delete(&self, path: &str, context: &'static str) -> Result<(), ApiError> {
        let builder = self.http.delete(self.endpoint(path));
        let _: Option<serde_json::Value> = self.request(builder, context).await?;
        Ok(())
    }

    fn expect_body<T: DeserializeOwned>(
        &self,
        body: Option<T>,
        context: &'static str,
    ) -> Result<T, ApiError> {
        match body {
            Some(value) => Ok(value),
            // A 204 where a payload was expected; `Option<T>` targets
            // decode from null, anything else is a shape mismatch.
            None => serde_json::from_value(serde_json::Value::Null)
                .map_err(|source| ApiError::Decode { context, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Probe {
        value: f64,
    }

    #[test]
    fn test_endpoint_joins_prefix() {
        let client = ApiClient::new("http://localhost:8000").unwrap();
        assert_eq!(
            client.endpoint("/portfolio/summary"),
            "http://localhost:8000/api/v1/portfolio/summary"
        );
        // trailing slash on the base URL must not double up
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.root_endpoint("/health"), "http://localhost:8000/health");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_json_decodes_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/probe"))
            .and(query_param("days", "90"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": 1.5})))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let probe: Probe = client
            .get_json("/probe", &[("days", "90".to_string())], "probe")
            .await
            .unwrap();
        assert_eq!(probe.value, 1.5);
    }

    #[tokio::test]
    async fn test_error_body_detail_is_unwrapped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/probe"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"detail": "No portfolio data found"})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let err = client
            .get_json::<Probe>("/probe", &[], "probe")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "HTTP 404 Not Found: No portfolio data found");
    }

    #[tokio::test]
    async fn test_no_content_yields_none() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/probe/7"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        client.delete("/probe/7", "probe").await.unwrap();
    }

    #[tokio::test]
    async fn test_mismatched_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/probe"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let err = client
            .get_json::<Probe>("/probe", &[], "probe")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode { context: "probe", .. }));
    }
}
