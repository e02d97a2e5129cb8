//! `reqwest`-backed [`Transport`].

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::repository::errors::{ApiError, ApiResult};
use crate::repository::{ApiRequest, Method, RawResponse, Transport};

const CONNECT_TIMEOUT_SECS: u64 = 10;

pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::NetworkFailure(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<RawResponse> {
        let builder = match request.method {
            Method::Get => self.http.get(&request.url),
            Method::Post => self.http.post(&request.url),
            Method::Patch => self.http.patch(&request.url),
            Method::Delete => self.http.delete(&request.url),
        };
        let mut builder = builder
            .bearer_auth(&request.bearer)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::NetworkFailure(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::NetworkFailure(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}
