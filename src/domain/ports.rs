use crate::domain::model::{EmployeeDetails, FetchedResource};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait ConfigProvider: Send + Sync {
    /// Host root without a trailing `/`, e.g. `https://developerdemo.isams.cloud`.
    fn domain(&self) -> &str;
    fn client_id(&self) -> &str;
    fn client_secret(&self) -> &str;
    fn scope(&self) -> &str;
    fn token_path(&self) -> &str;
    fn page_size(&self) -> usize;
    fn timeout_seconds(&self) -> Option<u64>;

    fn authority(&self) -> String {
        format!("{}/auth", self.domain().trim_end_matches('/'))
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}",
            self.domain().trim_end_matches('/'),
            self.token_path().trim_start_matches('/')
        )
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/{}",
            self.domain().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
pub trait Workflow: Send + Sync {
    async fn reference_data(&self) -> Result<Vec<FetchedResource>>;
    async fn employee_ids(&self) -> Result<Vec<i64>>;
    async fn employee_details(&self, employee_ids: &[i64]) -> Result<Vec<EmployeeDetails>>;
}
