use crate::providers::ProviderFailure;
use reqwest::{Client, Response};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// Shared HTTP plumbing for provider adapters. One `HttpClient` is built per
/// provider at startup and reused across calls, so the underlying connection
/// pool survives between dispatches.
#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    auth_header: Option<(String, String)>,
    extra_headers: HashMap<String, String>,
    query_params: Vec<(String, String)>,
    client: Client,
}

impl HttpClient {
    pub fn new(
        base_url: String,
        auth_header: Option<(String, String)>,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url,
            auth_header,
            extra_headers: HashMap::new(),
            query_params: Vec::new(),
            client,
        }
    }

    pub fn add_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.extra_headers.insert(key.into(), value.into());
    }

    pub fn add_query_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query_params.push((key.into(), value.into()));
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, ProviderFailure> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");

        if let Some((key, value)) = &self.auth_header {
            request = request.header(key, value);
        }
        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }
        if !self.query_params.is_empty() {
            request = request.query(&self.query_params);
        }

        let response = request.json(payload).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderFailure::Api(format!("{} {}", status, body)));
        }

        Ok(response)
    }
}
