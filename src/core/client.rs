use crate::config::toml_config::ChainSettings;
use crate::utils::error::{Result, ShowtimeError};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;

pub fn build_client(settings: &ChainSettings) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(settings.timeout_seconds))
        .build()?;
    Ok(client)
}

/// Adds the configured headers. Both booking APIs reject requests without
/// a browser `User-Agent` and `Referer`.
pub fn with_headers(mut request: RequestBuilder, settings: &ChainSettings) -> RequestBuilder {
    for (key, value) in &settings.headers {
        request = request.header(key, value);
    }
    request
}

/// Sends the request and decodes the body as JSON, treating non-2xx as an error.
pub async fn send_for_json(request: RequestBuilder, endpoint: &str) -> Result<serde_json::Value> {
    tracing::debug!("Making API request to: {}", endpoint);
    let response = request.send().await?;

    tracing::debug!("API response status: {}", response.status());

    if !response.status().is_success() {
        return Err(ShowtimeError::HttpStatusError {
            status: response.status().as_u16(),
            url: endpoint.to_string(),
        });
    }

    let body = response.text().await?;
    tracing::debug!("Raw API response: {}", body);

    serde_json::from_str(&body).map_err(|e| ShowtimeError::ResponseFormatError {
        message: format!("body is not valid JSON: {}", e),
    })
}
