//! PostgREST-style HTTP backend.
//!
//! Requests go to `{url}/rest/v1/{table}` with the service key in both the
//! `apikey` and bearer headers, and ask for the stored representation back.

use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};

use super::{Backend, Filter};
use crate::config::BackendConfig;
use crate::platform::BoxFuture;
use crate::{AppError, Result};

/// REST backend client.
pub struct RestBackend {
    http: Client,
    base: String,
    api_key: String,
}

impl RestBackend {
    /// Build a client from backend configuration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the service key has not been loaded.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(AppError::Config("backend api key is not loaded".into()));
        }
        Ok(Self {
            http: Client::new(),
            base: format!("{}/rest/v1", config.url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        })
    }

    fn request(&self, method: Method, table: &str, filter: &Filter) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{table}", self.base))
            .query(filter.pairs())
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Prefer", "return=representation")
    }

    async fn send(&self, method: &Method, table: &str, request: RequestBuilder) -> Result<Value> {
        let response = request
            .send()
            .await
            .map_err(|err| AppError::Persistence(format!("{method} {table}: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%method, table, %status, %body, "backend request failed");
            return Err(AppError::Persistence(format!(
                "{method} {table}: http {status}"
            )));
        }
        debug!(%method, table, %status, "backend request ok");
        let text = response
            .text()
            .await
            .map_err(|err| AppError::Persistence(format!("{method} {table}: {err}")))?;
        if text.trim().is_empty() {
            return Ok(Value::Array(Vec::new()));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn into_rows(value: Value) -> Vec<Value> {
    match value {
        Value::Array(rows) => rows,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

impl Backend for RestBackend {
    fn insert<'a>(&'a self, table: &'a str, row: Value) -> BoxFuture<'a, Vec<Value>> {
        Box::pin(async move {
            let request = self.request(Method::POST, table, &Filter::all()).json(&row);
            self.send(&Method::POST, table, request).await.map(into_rows)
        })
    }

    fn select<'a>(&'a self, table: &'a str, filter: Filter) -> BoxFuture<'a, Vec<Value>> {
        Box::pin(async move {
            let request = self.request(Method::GET, table, &filter);
            self.send(&Method::GET, table, request).await.map(into_rows)
        })
    }

    fn update<'a>(
        &'a self,
        table: &'a str,
        filter: Filter,
        patch: Value,
    ) -> BoxFuture<'a, Vec<Value>> {
        Box::pin(async move {
            let request = self.request(Method::PATCH, table, &filter).json(&patch);
            self.send(&Method::PATCH, table, request).await.map(into_rows)
        })
    }

    fn delete<'a>(&'a self, table: &'a str, filter: Filter) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let request = self.request(Method::DELETE, table, &filter);
            self.send(&Method::DELETE, table, request).await.map(|_| ())
        })
    }
}
