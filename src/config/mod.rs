#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_DOMAIN: &str = "https://developerdemo.isams.cloud";
pub const DEFAULT_CLIENT_ID: &str = "{your_client_id_here}";
pub const DEFAULT_CLIENT_SECRET: &str = "{your_client_secret_here}";
/// `restapi` for the public REST API, `apiv1` for the batch API.
pub const DEFAULT_SCOPE: &str = "restapi";
pub const DEFAULT_TOKEN_PATH: &str = "auth/connect/token";
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const MAX_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub credentials: CredentialsConfig,
    pub paging: PagingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host root, without the `/api` or `/auth` suffix.
    pub domain: String,
    pub token_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            token_path: DEFAULT_TOKEN_PATH.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_secret: DEFAULT_CLIENT_SECRET.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
        }
    }
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("scope", &self.scope)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub page_size: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ClientConfig {
    /// 範例佔位字串尚未替換時回傳 true
    pub fn has_placeholder_credentials(&self) -> bool {
        validation::looks_like_placeholder(&self.credentials.client_id)
            || validation::looks_like_placeholder(&self.credentials.client_secret)
    }
}

impl ConfigProvider for ClientConfig {
    fn domain(&self) -> &str {
        self.server.domain.trim_end_matches('/')
    }

    fn client_id(&self) -> &str {
        &self.credentials.client_id
    }

    fn client_secret(&self) -> &str {
        &self.credentials.client_secret
    }

    fn scope(&self) -> &str {
        &self.credentials.scope
    }

    fn token_path(&self) -> &str {
        &self.server.token_path
    }

    fn page_size(&self) -> usize {
        self.paging.page_size
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.server.timeout_seconds
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        let domain = validation::validate_url("server.domain", &self.server.domain)?;
        // HAL 的相對連結以主機根目錄解析，路徑前綴會被丟掉
        if domain.path() != "/" || domain.query().is_some() {
            return Err(ClientError::InvalidConfigValueError {
                field: "server.domain".to_string(),
                value: self.server.domain.clone(),
                reason: "Domain must be a host root without a path or query".to_string(),
            });
        }
        validation::validate_url("server.token_path", &self.token_url())?;

        validation::validate_non_empty_string("credentials.client_id", &self.credentials.client_id)?;
        validation::validate_non_empty_string(
            "credentials.client_secret",
            &self.credentials.client_secret,
        )?;
        validation::validate_non_empty_string("credentials.scope", &self.credentials.scope)?;

        validation::validate_range("paging.page_size", self.paging.page_size, 1, MAX_PAGE_SIZE)?;

        if let Some(timeout) = self.server.timeout_seconds {
            validation::validate_positive_number("server.timeout_seconds", timeout, 1)?;
        }

        Ok(())
    }
}
