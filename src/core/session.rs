use crate::core::api_client::RestApiClient;
use crate::core::auth::Authenticator;
use crate::core::engine::HrEngine;
use crate::core::hr_workflow::HumanResourcesWorkflow;
use crate::core::ConfigProvider;
use crate::domain::model::RunReport;
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;
use crate::utils::validation::Validate;

/// Authenticate, then fetch HR reference data, all employees and their
/// details. API requests are counted on the monitor's counter.
pub async fn run_session<C>(config: &C, monitor: &RunMonitor) -> Result<RunReport>
where
    C: ConfigProvider + Validate + Clone,
{
    config.validate()?;

    let token = Authenticator::new(config)?.authenticate().await?;
    monitor.log_phase("Authentication");

    let client = RestApiClient::new(&token, monitor.counter().clone(), config.timeout_seconds())?;
    tracing::info!("Set the bearer token for all API requests.");

    let workflow = HumanResourcesWorkflow::new(client, config.clone());
    HrEngine::new(workflow).run(monitor).await
}
