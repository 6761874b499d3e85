use std::time::Duration;

use reqwest::Client as HttpClient;
use serde_json::Value;
use url::Url;

use super::ApiError;
use super::models::{
    self, ChatRequest, HistoryEntry, SaveMessageRequest, Session, SignInRequest, SignUpReply,
    SignUpRequest,
};
use crate::config::Config;

/// Thin wrapper around the Labmentix backend. Cheap to clone; clones share
/// the connection pool and cookie jar.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    base: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, None)
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::with_timeout(&config.backend_url, config.request_timeout())
    }

    fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let base = crate::utils::normalize_url(base_url);
        Url::parse(&base)?;
        let mut builder = HttpClient::builder().cookie_store(true);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self { http: builder.build()?, base })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    fn with_auth(mut req: reqwest::RequestBuilder, token: Option<&str>) -> reqwest::RequestBuilder {
        if let Some(t) = token {
            req = req.header("Authorization", format!("Bearer {}", t));
        }
        req
    }

    /// Reads the body as JSON when it parses, as a JSON string otherwise, and
    /// turns non-2xx statuses into `ApiError::Status`.
    async fn read_body(resp: reqwest::Response) -> Result<Value, ApiError> {
        let status = resp.status();
        let text = resp.text().await?;
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: models::message_from(&body),
            });
        }
        Ok(body)
    }

    /// Sends one chat turn and returns the assistant's reply text.
    pub async fn call_api(&self, text: &str) -> Result<String, ApiError> {
        let resp = self
            .http
            .post(self.endpoint("callapi"))
            .json(&ChatRequest { mymsg: text })
            .send()
            .await?;
        let body = Self::read_body(resp).await?;
        Ok(models::reply_from(&body))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let resp = self
            .http
            .post(self.endpoint("callsignin"))
            .json(&SignInRequest { email, password })
            .send()
            .await?;
        let body = Self::read_body(resp).await?;
        let token = models::token_from(&body).ok_or(ApiError::MissingToken)?;
        Ok(Session { token, message: models::message_from(&body) })
    }

    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<SignUpReply, ApiError> {
        let resp = self
            .http
            .post(self.endpoint("callsignup"))
            .json(&SignUpRequest { name, email, password })
            .send()
            .await?;
        let body = Self::read_body(resp).await?;
        Ok(SignUpReply {
            token: models::token_from(&body),
            message: models::message_from(&body),
        })
    }

    /// Returns the backend's confirmation text, if any.
    pub async fn sign_out(&self, token: Option<&str>) -> Result<Option<String>, ApiError> {
        let req = Self::with_auth(self.http.post(self.endpoint("callsignout")), token)
            .header("Content-Type", "application/json");
        let body = Self::read_body(req.send().await?).await?;
        Ok(models::message_from(&body))
    }

    pub async fn save_message(&self, message: &SaveMessageRequest<'_>) -> Result<(), ApiError> {
        let resp = self.http.post(self.endpoint("savemessage")).json(message).send().await?;
        Self::read_body(resp).await?;
        Ok(())
    }

    pub async fn chat_history(&self, token: Option<&str>) -> Result<Vec<HistoryEntry>, ApiError> {
        let req = Self::with_auth(self.http.get(self.endpoint("getchathistory")), token);
        let body = Self::read_body(req.send().await?).await?;
        let items = body
            .as_array()
            .or_else(|| body.get("history").and_then(Value::as_array))
            .or_else(|| body.get("data").and_then(Value::as_array))
            .cloned()
            .unwrap_or_default();
        Ok(items.iter().filter_map(HistoryEntry::from_value).collect())
    }
}
