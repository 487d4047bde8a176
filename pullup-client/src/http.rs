use crate::error::{ApiError, Result};
use crate::token_store::TokenStore;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Thin wrapper around `reqwest` that knows the base url, sends the session token and drops it
/// again when the server answers 401. Failures are reported once, never retried.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.request(method, url);

        if let Some(token) = self.tokens.token() {
            builder = builder.bearer_auth(token);
        }

        builder
    }

    /// The session is no good anymore once the server answers 401. Whoever sits above us sees
    /// the logged out state the next time it reads the store.
    fn drop_rejected_session(&self, status: StatusCode) {
        if status == StatusCode::UNAUTHORIZED {
            self.tokens.remove_token();
        }
    }

    async fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<Value> {
        debug!(%method, path, "sending request");

        let res = match builder.send().await {
            Ok(res) => res,
            Err(e) => {
                error!(%method, url = %format!("{}{}", self.base_url, path), "API Error: {e}");
                return Err(ApiError::Network(e));
            }
        };

        let status = res.status();
        self.drop_rejected_session(status);
        let body = res.text().await?;

        if !status.is_success() {
            error!(
                %method,
                url = %format!("{}{}", self.base_url, path),
                status = status.as_u16(),
                body = %body,
                "API Error"
            );
            return Err(ApiError::from_status(status, &body));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn get_value(&self, path: &str) -> Result<Value> {
        self.send(Method::GET, path, self.request(Method::GET, path))
            .await
    }

    pub async fn get_query_value(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let builder = self.request(Method::GET, path).query(query);
        self.send(Method::GET, path, builder).await
    }

    pub async fn post_value<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let builder = self.request(Method::POST, path).json(body);
        self.send(Method::POST, path, builder).await
    }

    pub async fn post_empty_value(&self, path: &str) -> Result<Value> {
        self.send(Method::POST, path, self.request(Method::POST, path))
            .await
    }

    pub async fn put_value<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let builder = self.request(Method::PUT, path).json(body);
        self.send(Method::PUT, path, builder).await
    }

    /// The backend reads ids for deletions from the body, not the path.
    pub async fn delete_value<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let builder = self.request(Method::DELETE, path).json(body);
        self.send(Method::DELETE, path, builder).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        decode(self.post_value(path, body).await?)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}
