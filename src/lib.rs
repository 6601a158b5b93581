pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use config::ClientConfig;
pub use crate::core::{
    api_client::RestApiClient, auth::Authenticator, engine::HrEngine,
    hr_workflow::HumanResourcesWorkflow, session::run_session,
};
pub use utils::error::{ClientError, Result};
pub use utils::monitor::{RequestCounter, RunMonitor, RunSummary};
