use crate::core::api_client::RestApiClient;
use crate::core::{ConfigProvider, Workflow};
use crate::domain::model::{EmployeeDetails, EmployeePage, FetchedResource};
use crate::utils::error::{ClientError, Result};
use std::collections::HashSet;
use url::Url;

/// HR 參考資料，依序讀取：(名稱, `/api/` 之後的路徑)
pub const REFERENCE_DATA: &[(&str, &str)] = &[
    ("absence categories", "humanresources/absencecategories"),
    ("contract types", "humanresources/contracttypes"),
    ("qualification types", "humanresources/qualificationtypes"),
    ("qualification subjects", "humanresources/qualificationsubjects"),
    ("qualification levels", "humanresources/qualificationlevels"),
    (
        "disclosure types",
        "humanresources/disclosureandprobation/disclosuretypes",
    ),
    (
        "right to work check types",
        "humanresources/disclosureandprobation/righttoworkchecktypes",
    ),
    ("employee levels", "humanresources/employeelevels"),
];

pub struct HumanResourcesWorkflow<C: ConfigProvider> {
    client: RestApiClient,
    config: C,
}

impl<C: ConfigProvider> HumanResourcesWorkflow<C> {
    pub fn new(client: RestApiClient, config: C) -> Self {
        Self { client, config }
    }

    fn first_page_url(&self) -> Result<Url> {
        let path = format!(
            "humanresources/employees?page=1&pageSize={}",
            self.config.page_size()
        );
        Ok(Url::parse(&self.config.api_url(&path))?)
    }

    /// `_links.next.href` may be absolute or relative to the domain.
    fn resolve_href(&self, href: &str) -> Result<Url> {
        let base = Url::parse(&format!("{}/", self.config.domain()))?;
        Ok(base.join(href)?)
    }
}

#[async_trait::async_trait]
impl<C: ConfigProvider> Workflow for HumanResourcesWorkflow<C> {
    async fn reference_data(&self) -> Result<Vec<FetchedResource>> {
        let mut fetched = Vec::with_capacity(REFERENCE_DATA.len());

        for (label, path) in REFERENCE_DATA {
            let api_path = self.config.api_url(path);
            tracing::debug!("Retrieving {}...", label);

            let body = self
                .client
                .get_text(&api_path, &format!("the {}", label))
                .await?;

            tracing::debug!("Retrieved {}.", label);
            fetched.push(FetchedResource {
                label: label.to_string(),
                url: api_path,
                body,
            });
        }

        Ok(fetched)
    }

    async fn employee_ids(&self) -> Result<Vec<i64>> {
        let mut employee_ids = Vec::new();
        let mut page_number: u64 = 0;
        let mut api_path = self.first_page_url()?;
        let mut visited = HashSet::new();

        loop {
            page_number += 1;
            visited.insert(api_path.clone());
            tracing::debug!("Retrieving page #{} of employees...", page_number);

            let page: EmployeePage = self
                .client
                .get_json(
                    api_path.as_str(),
                    &format!("page #{} of employees", page_number),
                )
                .await?;

            employee_ids.extend(page.employees.iter().map(|employee| employee.id));

            let total_pages = page
                .total_pages
                .map(|total| total.to_string())
                .unwrap_or_else(|| "?".to_string());
            tracing::debug!(
                "Retrieved page #{} employees out of {} pages.",
                page_number,
                total_pages
            );

            let next = match page.next_href() {
                Some(href) => self.resolve_href(href)?,
                None => break,
            };

            // 下一頁連結指回已讀過的頁面時會無限循環
            if visited.contains(&next) {
                return Err(ClientError::UnexpectedResponseError {
                    api_path: api_path.to_string(),
                    message: format!(
                        "Page #{} of employees links back to already retrieved page {}",
                        page_number, next
                    ),
                });
            }
            api_path = next;
        }

        Ok(employee_ids)
    }

    async fn employee_details(&self, employee_ids: &[i64]) -> Result<Vec<EmployeeDetails>> {
        let total = employee_ids.len();
        let mut details = Vec::with_capacity(total);

        for (index, employee_id) in employee_ids.iter().enumerate() {
            let position = index + 1;

            let api_path = self.config.api_url(&format!(
                "humanresources/employees/{}/financialinformation",
                employee_id
            ));
            tracing::debug!(
                "Retrieving financial information for employee #{}... {} of {} employees",
                employee_id,
                position,
                total
            );
            let financial_information = self
                .client
                .get_text(
                    &api_path,
                    &format!("financial information for employee #{}", employee_id),
                )
                .await?;
            tracing::debug!("Retrieved financial information for employee #{}.", employee_id);

            let api_path = self
                .config
                .api_url(&format!("humanresources/employees/{}/contracts", employee_id));
            tracing::debug!(
                "Retrieving contracts for employee #{}... {} of {} employees",
                employee_id,
                position,
                total
            );
            let contracts = self
                .client
                .get_text(&api_path, &format!("contracts for employee #{}", employee_id))
                .await?;
            tracing::debug!("Retrieved contracts for employee #{}.", employee_id);

            details.push(EmployeeDetails {
                employee_id: *employee_id,
                financial_information,
                contracts,
            });
        }

        Ok(details)
    }
}
