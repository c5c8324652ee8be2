use crate::config::RecognitionConfig;
use crate::error::{DailyPlantError, Result};
use crate::models::RecognitionResult;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Client for the Baidu AIP plant classification API.
pub struct PlantApiClient {
    client: reqwest::Client,
    config: RecognitionConfig,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Error body the classify endpoint returns with HTTP 200.
#[derive(Debug, Deserialize)]
struct ApiError {
    error_code: i64,
    #[serde(default)]
    error_msg: String,
}

impl PlantApiClient {
    pub fn new(config: RecognitionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, config })
    }

    fn token_request(&self) -> Result<reqwest::Request> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.api_key.as_str()),
            ("client_secret", self.config.secret_key.as_str()),
        ];

        Ok(self
            .client
            .post(&self.config.token_url)
            .form(&params)
            .build()?)
    }

    fn classify_request(&self, token: &str, base64_image: &str) -> Result<reqwest::Request> {
        let baike_num = self.config.baike_num.to_string();
        let params = [("image", base64_image), ("baike_num", baike_num.as_str())];

        Ok(self
            .client
            .post(&self.config.classify_url)
            .query(&[("access_token", token)])
            .form(&params)
            .build()?)
    }

    /// Exchange the API key and secret for a short-lived access token.
    pub async fn fetch_access_token(&self) -> Result<String> {
        let response = self
            .client
            .execute(self.token_request()?)
            .await
            .map_err(|e| DailyPlantError::Recognition(format!("Token request failed: {}", e)))?;

        ensure_success(response.status(), "Token endpoint")?;

        let body = response.text().await?;
        parse_token_response(&body)
    }

    /// Classify a base64-encoded image.
    pub async fn recognize(&self, base64_image: &str) -> Result<RecognitionResult> {
        let token = self.fetch_access_token().await?;

        let response = self
            .client
            .execute(self.classify_request(&token, base64_image)?)
            .await
            .map_err(|e| DailyPlantError::Recognition(format!("Classify request failed: {}", e)))?;

        ensure_success(response.status(), "Classify endpoint")?;

        let body = response.text().await?;
        let result = parse_classify_response(&body)?;

        tracing::info!(
            candidates = result.result.len(),
            log_id = result.log_id,
            "Plant recognition succeeded"
        );
        Ok(result)
    }
}

fn ensure_success(status: StatusCode, endpoint: &str) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    tracing::warn!(%status, endpoint, "Recognition API request rejected");
    Err(DailyPlantError::Recognition(format!(
        "{} returned {}",
        endpoint, status
    )))
}

fn parse_token_response(body: &str) -> Result<String> {
    let body: TokenResponse = serde_json::from_str(body).map_err(|e| {
        DailyPlantError::Recognition(format!("Failed to parse token response: {}", e))
    })?;

    match body.access_token.filter(|t| !t.is_empty()) {
        Some(token) => Ok(token),
        None => Err(DailyPlantError::Recognition(format!(
            "No access token in response{}",
            body.error_description
                .map(|d| format!(": {}", d))
                .unwrap_or_default()
        ))),
    }
}

fn parse_classify_response(body: &str) -> Result<RecognitionResult> {
    if let Ok(err) = serde_json::from_str::<ApiError>(body) {
        return Err(DailyPlantError::Recognition(format!(
            "API error {}: {}",
            err.error_code, err.error_msg
        )));
    }
    Ok(serde_json::from_str(body)?)
}
