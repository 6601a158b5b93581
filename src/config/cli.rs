use crate::config::ClientConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "isams-rest-client")]
#[command(about = "Fetches HR reference data and employees from an iSAMS REST API")]
pub struct CliArgs {
    #[arg(long, short = 'c', help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "iSAMS host, e.g. https://developerdemo.isams.cloud")]
    pub domain: Option<String>,

    #[arg(long)]
    pub client_id: Option<String>,

    #[arg(long)]
    pub client_secret: Option<String>,

    #[arg(long, help = "OAuth2 scope (restapi or apiv1)")]
    pub scope: Option<String>,

    #[arg(long)]
    pub token_path: Option<String>,

    #[arg(long, help = "Employees requested per page")]
    pub page_size: Option<usize>,

    #[arg(long, help = "Per-request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, short = 'q', help = "Only log phase banners, not every request")]
    pub quiet: bool,

    #[arg(long, help = "Log process CPU and memory after each phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Wait for Enter before exiting")]
    pub pause: bool,
}

impl CliArgs {
    /// 預設輸出每個請求的進度
    pub fn verbose(&self) -> bool {
        !self.quiet
    }

    /// 載入配置檔（若有）後，以命令列參數覆寫
    pub fn into_config(self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(domain) = &self.domain {
            config.server.domain = domain.clone();
        }
        if let Some(token_path) = &self.token_path {
            config.server.token_path = token_path.clone();
        }
        if let Some(timeout) = self.timeout {
            config.server.timeout_seconds = Some(timeout);
        }
        if let Some(client_id) = &self.client_id {
            config.credentials.client_id = client_id.clone();
        }
        if let Some(client_secret) = &self.client_secret {
            config.credentials.client_secret = client_secret.clone();
        }
        if let Some(scope) = &self.scope {
            config.credentials.scope = scope.clone();
        }
        if let Some(page_size) = self.page_size {
            config.paging.page_size = page_size;
        }
    }
}
