//! HTTP client

use std::time::Duration;

use catalog::{Product, ProductFilter};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::image_url::ImageUrls;
use crate::models::{
    AuthSession, HistoryPage, PredictionEnvelope, PredictionRecord, ProductsEnvelope,
    ProfileUpdate, RecordEnvelope, User, UserEnvelope,
};
use crate::validation::{LoginRequest, RegisterRequest};

/// Dermalyze backend client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a new client
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        info!("API client for {}", config.base_url);
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Image URL builder for this deployment
    pub fn image_urls(&self) -> ImageUrls {
        ImageUrls::from_config(&self.config)
    }

    fn authed(&self, builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn require(token: Option<&str>) -> Result<&str, ApiError> {
        token.filter(|t| !t.is_empty()).ok_or(ApiError::AuthRequired)
    }

    /// Upload a still for skin-type classification
    pub async fn predict(
        &self,
        token: Option<&str>,
        file_name: &str,
        jpeg: Vec<u8>,
    ) -> Result<PredictionRecord, ApiError> {
        let token = Self::require(token)?;
        let url = self.config.endpoint("/predict");
        info!("Uploading {} ({} bytes) for prediction", file_name, jpeg.len());

        let part = Part::bytes(jpeg)
            .file_name(file_name.to_string())
            .mime_str("image/jpeg")?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;

        let envelope: PredictionEnvelope = read_json(response, &url).await?;
        debug!("Prediction {} -> {}", envelope.data.id, envelope.data.label);
        Ok(envelope.data)
    }

    /// One page of the user's analysis history
    pub async fn history(
        &self,
        token: Option<&str>,
        page: u32,
        limit: u32,
    ) -> Result<HistoryPage, ApiError> {
        let token = Self::require(token)?;
        let url = self.config.endpoint("/history");
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("page", page), ("limit", limit)])
            .send()
            .await?;
        read_json(response, &url).await
    }

    /// A single analysis
    pub async fn history_entry(
        &self,
        token: Option<&str>,
        id: &str,
    ) -> Result<PredictionRecord, ApiError> {
        let token = Self::require(token)?;
        let url = self.config.endpoint(&format!("/history/{}", id));
        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let envelope: RecordEnvelope = read_json(response, &url).await?;
        Ok(envelope.into_record())
    }

    /// Delete an analysis
    pub async fn delete_history(&self, token: Option<&str>, id: &str) -> Result<(), ApiError> {
        let token = Self::require(token)?;
        let url = self.config.endpoint(&format!("/history/{}", id));
        let response = self.http.delete(&url).bearer_auth(token).send().await?;
        let _: Value = read_json(response, &url).await?;
        info!("Deleted analysis {}", id);
        Ok(())
    }

    /// Products matching `filter`
    pub async fn products(
        &self,
        token: Option<&str>,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, ApiError> {
        let url = self.config.endpoint("/products");
        let query = filter.query_pairs();
        debug!("GET {} {:?}", url, query);

        let response = self
            .authed(self.http.get(&url), token)
            .query(&query)
            .send()
            .await?;
        let envelope: ProductsEnvelope = read_json(response, &url).await?;
        debug!("Received {} products", envelope.products.len());
        Ok(envelope.products)
    }

    /// Log in; the request is validated before it is sent
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthSession, ApiError> {
        request.validate()?;
        let url = self.config.endpoint("/login");
        let body = LoginRequest::new(request.email.trim(), request.password.clone());
        let response = self.http.post(&url).json(&body).send().await?;
        read_json(response, &url).await
    }

    /// Create an account; the request is validated before it is sent
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthSession, ApiError> {
        request.validate()?;
        let url = self.config.endpoint("/register");
        let response = self.http.post(&url).json(request).send().await?;
        read_json(response, &url).await
    }

    /// Invalidate the token on the backend
    pub async fn logout(&self, token: &str) -> Result<(), ApiError> {
        let url = self.config.endpoint("/logout");
        let response = self.http.post(&url).bearer_auth(token).send().await?;
        let _: Value = read_json(response, &url).await?;
        Ok(())
    }

    pub async fn profile(&self, token: Option<&str>) -> Result<User, ApiError> {
        let token = Self::require(token)?;
        let url = self.config.endpoint("/auth/profile");
        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let envelope: UserEnvelope = read_json(response, &url).await?;
        Ok(envelope.user)
    }

    pub async fn update_profile(
        &self,
        token: Option<&str>,
        update: &ProfileUpdate,
    ) -> Result<User, ApiError> {
        let token = Self::require(token)?;
        let url = self.config.endpoint("/auth/profile");
        let response = self
            .http
            .put(&url)
            .bearer_auth(token)
            .json(update)
            .send()
            .await?;
        let envelope: UserEnvelope = read_json(response, &url).await?;
        Ok(envelope.user)
    }
}

/// Read the body as text, then classify it.
///
/// Non-JSON bodies become `HtmlResponse` or `InvalidResponse`; error statuses
/// map to the taxonomy; a `success: false` body on 2xx is a rejection.
async fn read_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    let value: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            error!("Non-JSON response from {} (status {}): {}", url, status, e);
            return Err(if looks_like_html(&text) {
                ApiError::HtmlResponse
            } else {
                ApiError::InvalidResponse(e.to_string())
            });
        }
    };

    if !status.is_success() {
        let error = status_error(status, &value, url);
        warn!("{} failed: {}", url, error);
        return Err(error);
    }

    if value.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message: body_message(&value).unwrap_or_else(|| "Permintaan gagal".to_string()),
        });
    }

    serde_json::from_value(value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

fn looks_like_html(text: &str) -> bool {
    text.contains("<!DOCTYPE") || text.contains("<html")
}

fn body_message(value: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn status_error(status: StatusCode, body: &Value, url: &str) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound(url.to_string()),
        StatusCode::INTERNAL_SERVER_ERROR => ApiError::Server {
            status: status.as_u16(),
        },
        _ => ApiError::Rejected {
            status: status.as_u16(),
            message: body_message(body)
                .unwrap_or_else(|| format!("Server error: {}", status.as_u16())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_html_detection() {
        assert!(looks_like_html("<!DOCTYPE html><html></html>"));
        assert!(looks_like_html("  <html><body>502</body></html>"));
        assert!(!looks_like_html("Bad Gateway"));
    }

    #[test]
    fn test_status_mapping() {
        let body = json!({"error": "Invalid credentials"});

        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, &body, "/login"),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, &body, "/predict"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, &body, "/predict"),
            ApiError::Server { status: 500 }
        ));
        match status_error(StatusCode::BAD_REQUEST, &body, "/register") {
            ApiError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid credentials");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_message_fallback() {
        match status_error(StatusCode::BAD_GATEWAY, &json!({}), "/x") {
            ApiError::Rejected { message, .. } => assert_eq!(message, "Server error: 502"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_token_required() {
        let client = ApiClient::new(ApiConfig::default()).unwrap();
        assert!(matches!(
            client.history(None, 1, 10).await,
            Err(ApiError::AuthRequired)
        ));
        assert!(matches!(
            client.predict(Some(""), "a.jpg", vec![1]).await,
            Err(ApiError::AuthRequired)
        ));
    }

    #[tokio::test]
    async fn test_login_validated_before_send() {
        let client = ApiClient::new(ApiConfig::default()).unwrap();
        let result = client.login(&LoginRequest::new("a@b.co", "123")).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
