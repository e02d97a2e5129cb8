//! Access to the remote REST backend.
//!
//! Every call goes through the [`Transport`] seam and comes back as an
//! [`ApiResult`], so callers never branch on client-specific types.

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::errors::{ApiError, ApiResult};

pub mod errors;
pub mod http;
#[cfg(feature = "test-mocks")]
pub mod mock;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// A single authenticated request. `body` is already JSON-encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub bearer: String,
    pub body: Option<String>,
}

/// Status and body exactly as received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Successful, decoded response.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
}

/// Sends requests to the backend. Transport-level failures are reported as
/// [`ApiError::NetworkFailure`]; any HTTP status counts as a response.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> impl Future<Output = ApiResult<RawResponse>> + Send;
}

/// Collection resource with an optional alternate collection retried once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceEndpoint {
    pub resource: String,
    pub alternate: Option<String>,
}

impl ResourceEndpoint {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            alternate: None,
        }
    }

    /// Sets the alternate collection. A blank name leaves the fallback off.
    pub fn alternate(mut self, alternate: impl Into<String>) -> Self {
        let alternate = alternate.into();
        let alternate = alternate.trim();
        self.alternate = (!alternate.is_empty()).then(|| alternate.to_string());
        self
    }
}

/// Statuses of the primary collection fetch that trigger the alternate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FallbackPolicy {
    pub statuses: Vec<u16>,
    pub server_errors: bool,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            statuses: vec![400, 401],
            server_errors: true,
        }
    }
}

impl FallbackPolicy {
    pub fn is_eligible(&self, status: u16) -> bool {
        self.statuses.contains(&status) || (self.server_errors && (500..600).contains(&status))
    }
}

/// REST access to `{base_url}/api/...` over a [`Transport`].
pub struct HttpRepository<T> {
    transport: T,
    base_url: String,
    fallback: FallbackPolicy,
}

impl<T: Transport> HttpRepository<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            fallback: FallbackPolicy::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        token: &str,
        body: Option<String>,
    ) -> ApiResult<RawResponse> {
        let request = ApiRequest {
            method,
            url: self.url(path),
            bearer: token.to_string(),
            body,
        };
        log::debug!("{} {}", method.as_str(), request.url);
        let response = self.transport.send(request).await?;
        log::debug!("{} {} -> {}", method.as_str(), path, response.status);
        Ok(response)
    }

    /// Fetches the whole collection, retrying the alternate collection at
    /// most once when the primary status is fallback-eligible.
    pub async fn fetch_collection<I>(
        &self,
        endpoint: &ResourceEndpoint,
        token: &str,
    ) -> ApiResult<ApiResponse<Vec<I>>>
    where
        I: DeserializeOwned,
    {
        let mut response = self.send(Method::Get, &endpoint.resource, token, None).await?;

        if !response.is_success() && self.fallback.is_eligible(response.status) {
            if let Some(alternate) = &endpoint.alternate {
                log::warn!(
                    "{} answered {}, retrying via {}",
                    endpoint.resource,
                    response.status,
                    alternate
                );
                response = self.send(Method::Get, alternate, token, None).await?;
            }
        }

        let response = check_status(response)?;
        let data = decode_collection(&response.body)?;

        Ok(ApiResponse {
            status: response.status,
            data,
        })
    }

    pub async fn create<I, P>(
        &self,
        resource: &str,
        token: &str,
        payload: &P,
    ) -> ApiResult<ApiResponse<I>>
    where
        I: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let body = serde_json::to_string(payload)?;
        let response = self.send(Method::Post, resource, token, Some(body)).await?;
        decode_record(check_status(response)?)
    }

    pub async fn update<I, P>(
        &self,
        resource: &str,
        id: i64,
        token: &str,
        patch: &P,
    ) -> ApiResult<ApiResponse<I>>
    where
        I: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let body = serde_json::to_string(patch)?;
        let path = format!("{resource}/{id}");
        let response = self.send(Method::Patch, &path, token, Some(body)).await?;
        decode_record(check_status(response)?)
    }

    pub async fn delete(&self, resource: &str, id: i64, token: &str) -> ApiResult<ApiResponse<()>> {
        let path = format!("{resource}/{id}");
        let response = check_status(self.send(Method::Delete, &path, token, None).await?)?;
        Ok(ApiResponse {
            status: response.status,
            data: (),
        })
    }
}

fn check_status(response: RawResponse) -> ApiResult<RawResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_status(response.status))
    }
}

/// Decodes a collection body. An empty body or valid JSON that is not an
/// array counts as an empty collection. Records that do not decode are
/// skipped.
fn decode_collection<I: DeserializeOwned>(body: &str) -> ApiResult<Vec<I>> {
    if body.trim().is_empty() {
        log::debug!("collection body is empty, treating as empty");
        return Ok(Vec::new());
    }
    let value: serde_json::Value = serde_json::from_str(body)?;
    let serde_json::Value::Array(records) = value else {
        log::debug!("collection body is not an array, treating as empty");
        return Ok(Vec::new());
    };

    let mut items = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value(record) {
            Ok(item) => items.push(item),
            Err(e) => log::warn!("Skipping record {index} of collection: {e}"),
        }
    }
    Ok(items)
}

fn decode_record<I: DeserializeOwned>(response: RawResponse) -> ApiResult<ApiResponse<I>> {
    let data = serde_json::from_str(&response.body)?;
    Ok(ApiResponse {
        status: response.status,
        data,
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::repository::errors::ErrorKind;
    use crate::repository::test::ScriptedTransport;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: i64,
    }

    fn repo() -> HttpRepository<ScriptedTransport> {
        HttpRepository::new(ScriptedTransport::new(), ScriptedTransport::BASE_URL)
    }

    fn endpoint() -> ResourceEndpoint {
        ResourceEndpoint::new("users").alternate("users-alt")
    }

    #[tokio::test]
    async fn primary_success_skips_alternate() {
        let repo = repo();
        repo.transport()
            .respond(Method::Get, "/api/users", 200, r#"[{"id":1},{"id":2}]"#);

        let response = repo.fetch_collection::<Row>(&endpoint(), "t").await.unwrap();

        assert_eq!(response.data, vec![Row { id: 1 }, Row { id: 2 }]);
        assert_eq!(repo.transport().calls_to(Method::Get, "/api/users-alt"), 0);
    }

    #[tokio::test]
    async fn unauthorized_primary_falls_back_once() {
        let repo = repo();
        repo.transport().respond(Method::Get, "/api/users", 401, "");
        repo.transport()
            .respond(Method::Get, "/api/users-alt", 200, r#"[{"id":1}]"#);

        let response = repo.fetch_collection::<Row>(&endpoint(), "t").await.unwrap();

        assert_eq!(response.data, vec![Row { id: 1 }]);
        assert_eq!(repo.transport().calls_to(Method::Get, "/api/users"), 1);
        assert_eq!(repo.transport().calls_to(Method::Get, "/api/users-alt"), 1);
    }

    #[tokio::test]
    async fn failing_alternate_is_not_retried() {
        let repo = repo();
        repo.transport().respond(Method::Get, "/api/users", 500, "");
        repo.transport().respond(Method::Get, "/api/users-alt", 502, "");

        let err = repo
            .fetch_collection::<Row>(&endpoint(), "t")
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::ServerFault(502));
        assert_eq!(repo.transport().calls_to(Method::Get, "/api/users-alt"), 1);
        assert_eq!(repo.transport().requests().len(), 2);
    }

    #[tokio::test]
    async fn forbidden_is_not_fallback_eligible() {
        let repo = repo();
        repo.transport().respond(Method::Get, "/api/users", 403, "");

        let err = repo
            .fetch_collection::<Row>(&endpoint(), "t")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AuthInsufficient);
        assert_eq!(repo.transport().calls_to(Method::Get, "/api/users-alt"), 0);
    }

    #[tokio::test]
    async fn eligible_status_without_alternate_fails() {
        let repo = repo();
        repo.transport().respond(Method::Get, "/api/users", 401, "");

        let err = repo
            .fetch_collection::<Row>(&ResourceEndpoint::new("users"), "t")
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::AuthRejected);
        assert_eq!(repo.transport().requests().len(), 1);
    }

    #[tokio::test]
    async fn non_array_body_is_empty_collection() {
        let repo = repo();
        repo.transport()
            .respond(Method::Get, "/api/users", 200, r#"{"message":"ok"}"#);

        let response = repo.fetch_collection::<Row>(&endpoint(), "t").await.unwrap();

        assert!(response.data.is_empty());
    }

    #[tokio::test]
    async fn undecodable_records_are_skipped() {
        let repo = repo();
        repo.transport().respond(
            Method::Get,
            "/api/users",
            200,
            r#"[{"id":1},{"id":"two"},{"name":"no id"},{"id":3}]"#,
        );

        let response = repo.fetch_collection::<Row>(&endpoint(), "t").await.unwrap();

        assert_eq!(response.data, vec![Row { id: 1 }, Row { id: 3 }]);
    }

    #[tokio::test]
    async fn empty_success_body_is_empty_collection() {
        let repo = repo();
        repo.transport().respond(Method::Get, "/api/users", 204, "");

        let response = repo.fetch_collection::<Row>(&endpoint(), "t").await.unwrap();

        assert_eq!(response.status, 204);
        assert!(response.data.is_empty());
    }

    #[tokio::test]
    async fn invalid_json_is_parse_failure() {
        let repo = repo();
        repo.transport()
            .respond(Method::Get, "/api/users", 200, "<html>oops</html>");

        let err = repo
            .fetch_collection::<Row>(&endpoint(), "t")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ParseFailure);
        assert_eq!(repo.transport().calls_to(Method::Get, "/api/users-alt"), 0);
    }

    #[tokio::test]
    async fn network_failure_is_terminal() {
        let repo = repo();
        repo.transport()
            .fail(Method::Get, "/api/users", "connection refused");

        let err = repo
            .fetch_collection::<Row>(&endpoint(), "t")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NetworkFailure);
        assert_eq!(repo.transport().calls_to(Method::Get, "/api/users-alt"), 0);
    }

    #[tokio::test]
    async fn requests_carry_bearer_and_json_body() {
        let repo = repo();
        repo.transport()
            .respond(Method::Patch, "/api/users/4", 200, r#"{"id":4}"#);

        let response: ApiResponse<Row> = repo
            .update("users", 4, "secret", &serde_json::json!({"status": "active"}))
            .await
            .unwrap();

        assert_eq!(response.data, Row { id: 4 });
        let request = &repo.transport().requests()[0];
        assert_eq!(request.bearer, "secret");
        assert_eq!(request.url, "http://backend.test/api/users/4");
        assert_eq!(request.body.as_deref(), Some(r#"{"status":"active"}"#));
    }

    #[tokio::test]
    async fn delete_accepts_empty_no_content() {
        let repo = repo();
        repo.transport().respond(Method::Delete, "/api/users/9", 204, "");
        repo.transport().respond(Method::Delete, "/api/users/10", 404, "");

        assert_eq!(repo.delete("users", 9, "t").await.unwrap().status, 204);
        assert_eq!(
            repo.delete("users", 10, "t").await.unwrap_err(),
            ApiError::NotFound
        );
    }

    #[test]
    fn fallback_policy_defaults() {
        let policy = FallbackPolicy::default();
        assert!(policy.is_eligible(400));
        assert!(policy.is_eligible(401));
        assert!(policy.is_eligible(503));
        assert!(!policy.is_eligible(403));
        assert!(!policy.is_eligible(404));
    }

    #[test]
    fn blank_alternate_disables_fallback() {
        assert_eq!(ResourceEndpoint::new("alerts").alternate("  ").alternate, None);
    }
}
