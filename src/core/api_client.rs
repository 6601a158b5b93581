use crate::domain::model::AccessToken;
use crate::utils::error::{ClientError, Result};
use crate::utils::monitor::RequestCounter;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const HAL_JSON: &str = "application/hal+json";

pub(crate) fn reason_phrase(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Status")
}

pub(crate) fn build_http_client(
    timeout_seconds: Option<u64>,
    default_headers: Option<HeaderMap>,
) -> Result<Client> {
    let mut builder = Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));

    if let Some(secs) = timeout_seconds {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(headers) = default_headers {
        builder = builder.default_headers(headers);
    }

    Ok(builder.build()?)
}

/// HTTP client for `/api/...` calls: bearer token and HAL accept header on
/// every request, and every GET counted.
#[derive(Debug, Clone)]
pub struct RestApiClient {
    client: Client,
    counter: RequestCounter,
}

impl RestApiClient {
    pub fn new(
        token: &AccessToken,
        counter: RequestCounter,
        timeout_seconds: Option<u64>,
    ) -> Result<Self> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.secret())).map_err(
            |_| ClientError::AccessTokenError {
                status: None,
                message: "Access token contains characters not allowed in a header".to_string(),
            },
        )?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static(HAL_JSON));

        let client = build_http_client(timeout_seconds, Some(headers))?;
        Ok(Self { client, counter })
    }

    /// GET `api_path` and return the body. `what` names the resource in the
    /// error message, e.g. "the contract types".
    pub async fn get_text(&self, api_path: &str, what: &str) -> Result<String> {
        let request_number = self.counter.increment();
        tracing::debug!("GET {} (request #{})", api_path, request_number);

        let response = self.client.get(api_path).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ClientError::RestApiError {
                api_path: api_path.to_string(),
                message: format!(
                    "[{}] Error retrieving {} [{}].",
                    status.as_u16(),
                    what,
                    reason_phrase(status)
                ),
            });
        }

        Ok(response.text().await?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, api_path: &str, what: &str) -> Result<T> {
        let body = self.get_text(api_path, what).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::UnexpectedResponseError {
            api_path: api_path.to_string(),
            message: format!("Cannot read {}: {}", what, e),
        })
    }
}
