use crate::core::api_client::{build_http_client, reason_phrase};
use crate::core::ConfigProvider;
use crate::domain::model::{AccessToken, DiscoveryDocument, TokenErrorResponse, TokenResponse};
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{is_loopback, validate_url};
use chrono::Utc;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use std::fmt::Display;

const DISCOVERY_PATH: &str = ".well-known/openid-configuration";

fn status_label(status: Option<StatusCode>) -> String {
    status
        .map(|s| s.as_u16().to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn discovery_error(status: Option<StatusCode>, reason: impl Display) -> ClientError {
    ClientError::AccessTokenError {
        status: status.map(|s| s.as_u16()),
        message: format!(
            "[{}] Error retrieving the discovery document [{}].",
            status_label(status),
            reason
        ),
    }
}

fn token_error(status: Option<StatusCode>, reason: impl Display) -> ClientError {
    ClientError::AccessTokenError {
        status: status.map(|s| s.as_u16()),
        message: format!(
            "[{}] Error authenticating [{}].",
            status_label(status),
            reason
        ),
    }
}

/// OAuth2 client-credentials login against `{domain}/auth`.
pub struct Authenticator<'a, C: ConfigProvider> {
    config: &'a C,
    client: Client,
}

impl<'a, C: ConfigProvider> Authenticator<'a, C> {
    pub fn new(config: &'a C) -> Result<Self> {
        let client = build_http_client(config.timeout_seconds(), None)?;
        Ok(Self { config, client })
    }

    /// Fetches the discovery document and checks it against the authority:
    /// HTTPS unless loopback, and an issuer equal to the authority.
    pub async fn fetch_discovery_document(&self) -> Result<DiscoveryDocument> {
        let authority = self.config.authority();
        let authority_url = validate_url("authority", &authority)?;

        if authority_url.scheme() != "https" && !is_loopback(&authority_url) {
            return Err(discovery_error(
                None,
                format!("HTTPS required: {}", authority),
            ));
        }

        let discovery_url = format!("{}/{}", authority.trim_end_matches('/'), DISCOVERY_PATH);
        tracing::debug!("GET {}", discovery_url);

        let response = self
            .client
            .get(&discovery_url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| discovery_error(None, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(discovery_error(Some(status), reason_phrase(status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| discovery_error(Some(status), e))?;
        let document: DiscoveryDocument = serde_json::from_str(&body).map_err(|e| {
            discovery_error(Some(status), format!("Invalid discovery document: {}", e))
        })?;

        let issuer = document.issuer.trim_end_matches('/');
        if !issuer.eq_ignore_ascii_case(authority.trim_end_matches('/')) {
            return Err(discovery_error(
                Some(status),
                format!("Issuer name does not match authority: {}", document.issuer),
            ));
        }

        Ok(document)
    }

    /// 以 client credentials 換取 access token
    pub async fn request_token(&self) -> Result<AccessToken> {
        let token_url = self.config.token_url();
        tracing::debug!("POST {}", token_url);

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id()),
            ("client_secret", self.config.client_secret()),
            ("scope", self.config.scope()),
        ];

        let response = self
            .client
            .post(&token_url)
            .header(ACCEPT, "application/json")
            .form(&params)
            .send()
            .await
            .map_err(|e| token_error(None, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| token_error(Some(status), e))?;

        if !status.is_success() {
            // OAuth 錯誤回應優先使用 error 欄位
            let reason = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(oauth_error) => {
                    if let Some(description) = &oauth_error.error_description {
                        tracing::warn!(
                            "Token endpoint rejected {}: {}",
                            self.config.client_id(),
                            description
                        );
                    }
                    oauth_error.error
                }
                Err(_) => reason_phrase(status).to_string(),
            };
            return Err(token_error(Some(status), reason));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| token_error(Some(status), format!("Invalid token response: {}", e)))?;

        Ok(AccessToken::from_response(token, Utc::now()))
    }

    pub async fn authenticate(&self) -> Result<AccessToken> {
        tracing::info!("Retrieving the discovery document...");
        let document = self.fetch_discovery_document().await?;
        tracing::info!("Retrieved the discovery document.");
        if !document.grant_types_supported.is_empty()
            && !document
                .grant_types_supported
                .iter()
                .any(|grant| grant == "client_credentials")
        {
            tracing::warn!("Discovery document does not list the client_credentials grant");
        }
        if let Some(advertised) = &document.token_endpoint {
            tracing::debug!(
                "Discovery advertises token endpoint {}, using {}",
                advertised,
                self.config.token_url()
            );
        }

        tracing::info!("Authenticating {}...", self.config.client_id());
        let token = self.request_token().await?;
        tracing::info!("Authenticated successfully.");

        if let Some(expires_at) = token.expires_at {
            tracing::debug!("Access token expires at {}", expires_at.to_rfc3339());
        }

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use httpmock::prelude::*;

    fn config_for(server: &MockServer) -> ClientConfig {
        let mut config = ClientConfig::default();
        config.server.domain = server.base_url();
        config.credentials.client_id = "hr-export".to_string();
        config.credentials.client_secret = "s3cret".to_string();
        config
    }

    fn mock_discovery<'a>(server: &'a MockServer, issuer: &str) -> httpmock::Mock<'a> {
        let body = serde_json::json!({
            "issuer": issuer,
            "token_endpoint": format!("{}/connect/token", issuer),
            "grant_types_supported": ["client_credentials"]
        });
        server.mock(|when, then| {
            when.method(GET).path("/auth/.well-known/openid-configuration");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(body);
        })
    }

    #[tokio::test]
    async fn test_discovery_document_accepted() {
        let server = MockServer::start();
        let discovery = mock_discovery(&server, &server.url("/auth"));

        let config = config_for(&server);
        let auth = Authenticator::new(&config).unwrap();
        let document = auth.fetch_discovery_document().await.unwrap();

        discovery.assert();
        assert_eq!(document.grant_types_supported, vec!["client_credentials"]);
    }

    #[tokio::test]
    async fn test_discovery_issuer_mismatch() {
        let server = MockServer::start();
        let discovery = mock_discovery(&server, "https://someone-else.example.com/auth");

        let config = config_for(&server);
        let auth = Authenticator::new(&config).unwrap();
        let err = auth.fetch_discovery_document().await.unwrap_err();

        discovery.assert();
        assert!(err.to_string().contains("Issuer name does not match authority"));
    }

    #[tokio::test]
    async fn test_discovery_issuer_ignores_case_and_trailing_slash() {
        let server = MockServer::start();
        let issuer = format!("{}/", server.url("/auth")).to_uppercase();
        let discovery = mock_discovery(&server, &issuer);

        let config = config_for(&server);
        let auth = Authenticator::new(&config).unwrap();
        let document = auth.fetch_discovery_document().await.unwrap();

        discovery.assert();
        assert_eq!(document.issuer, issuer);
    }

    #[tokio::test]
    async fn test_discovery_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/auth/.well-known/openid-configuration");
            then.status(503);
        });

        let config = config_for(&server);
        let auth = Authenticator::new(&config).unwrap();
        let err = auth.fetch_discovery_document().await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "[503] Error retrieving the discovery document [Service Unavailable]."
        );
        assert!(matches!(err, ClientError::AccessTokenError { status: Some(503), .. }));
    }

    #[tokio::test]
    async fn test_discovery_requires_https_for_remote_hosts() {
        let mut config = ClientConfig::default();
        config.server.domain = "http://developerdemo.isams.cloud".to_string();

        let auth = Authenticator::new(&config).unwrap();
        let err = auth.fetch_discovery_document().await.unwrap_err();

        assert!(err.to_string().contains("HTTPS required"));
    }

    #[tokio::test]
    async fn test_request_token_posts_client_credentials() {
        let server = MockServer::start();
        let token_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/connect/token")
                .header("content-type", "application/x-www-form-urlencoded")
                .body_contains("grant_type=client_credentials")
                .body_contains("client_id=hr-export")
                .body_contains("client_secret=s3cret")
                .body_contains("scope=restapi");
            then.status(200).json_body(serde_json::json!({
                "access_token": "abc123",
                "token_type": "Bearer",
                "expires_in": 3600,
                "scope": "restapi"
            }));
        });

        let config = config_for(&server);
        let auth = Authenticator::new(&config).unwrap();
        let token = auth.request_token().await.unwrap();

        token_mock.assert();
        assert_eq!(token.secret(), "abc123");
        assert_eq!(token.scope.as_deref(), Some("restapi"));
        assert!(token.expires_at.is_some());
    }

    #[tokio::test]
    async fn test_request_token_reports_oauth_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/connect/token");
            then.status(400)
                .json_body(serde_json::json!({"error": "invalid_client"}));
        });

        let config = config_for(&server);
        let auth = Authenticator::new(&config).unwrap();
        let err = auth.request_token().await.unwrap_err();

        assert_eq!(err.to_string(), "[400] Error authenticating [invalid_client].");
    }

    #[tokio::test]
    async fn test_request_token_falls_back_to_reason_phrase() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/connect/token");
            then.status(500).body("boom");
        });

        let config = config_for(&server);
        let auth = Authenticator::new(&config).unwrap();
        let err = auth.request_token().await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "[500] Error authenticating [Internal Server Error]."
        );
    }

    #[tokio::test]
    async fn test_authenticate_runs_discovery_then_token() {
        let server = MockServer::start();
        let discovery = mock_discovery(&server, &server.url("/auth"));
        let token_mock = server.mock(|when, then| {
            when.method(POST).path("/auth/connect/token");
            then.status(200)
                .json_body(serde_json::json!({"access_token": "abc123"}));
        });

        let config = config_for(&server);
        let token = Authenticator::new(&config)
            .unwrap()
            .authenticate()
            .await
            .unwrap();

        discovery.assert();
        token_mock.assert();
        assert_eq!(token.token_type, "Bearer");
        assert!(token.expires_at.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_uses_configured_token_path() {
        let server = MockServer::start();
        let issuer = server.url("/auth");
        server.mock(|when, then| {
            when.method(GET).path("/auth/.well-known/openid-configuration");
            then.status(200).json_body(serde_json::json!({
                "issuer": issuer,
                "token_endpoint": server.url("/identity/oauth2/token"),
                "grant_types_supported": ["client_credentials"]
            }));
        });
        let advertised = server.mock(|when, then| {
            when.method(POST).path("/identity/oauth2/token");
            then.status(200)
                .json_body(serde_json::json!({"access_token": "wrong-endpoint"}));
        });
        let configured = server.mock(|when, then| {
            when.method(POST).path("/auth/connect/token");
            then.status(200)
                .json_body(serde_json::json!({"access_token": "abc123"}));
        });

        let config = config_for(&server);
        let token = Authenticator::new(&config)
            .unwrap()
            .authenticate()
            .await
            .unwrap();

        advertised.assert_hits(0);
        configured.assert();
        assert_eq!(token.secret(), "abc123");
    }

    #[tokio::test]
    async fn test_request_token_with_error_description() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/connect/token");
            then.status(400).json_body(serde_json::json!({
                "error": "invalid_scope",
                "error_description": "Scope apiv1 is not allowed for this client"
            }));
        });

        let config = config_for(&server);
        let auth = Authenticator::new(&config).unwrap();
        let err = auth.request_token().await.unwrap_err();

        assert_eq!(err.to_string(), "[400] Error authenticating [invalid_scope].");
    }
}
