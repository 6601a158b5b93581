use crate::core::Workflow;
use crate::domain::model::RunReport;
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;

pub struct HrEngine<W: Workflow> {
    workflow: W,
}

impl<W: Workflow> HrEngine<W> {
    pub fn new(workflow: W) -> Self {
        Self { workflow }
    }

    pub async fn run(&self, monitor: &RunMonitor) -> Result<RunReport> {
        // HR 參考資料
        tracing::info!("Retrieving the HR data...");
        let reference_data = self.workflow.reference_data().await?;
        tracing::info!("Retrieved the HR data.");
        monitor.log_phase("HR data");

        // 員工分頁
        tracing::info!("Retrieving the employees...");
        let employee_ids = self.workflow.employee_ids().await?;
        tracing::info!("Retrieved {} employees.", employee_ids.len());
        monitor.log_phase("Employees");

        // 每位員工的明細
        tracing::info!(
            "Retrieving additional information for {} employees...",
            employee_ids.len()
        );
        let employee_details = self.workflow.employee_details(&employee_ids).await?;
        tracing::info!(
            "Retrieved additional information for {} employees.",
            employee_ids.len()
        );
        monitor.log_phase("Employee details");

        Ok(RunReport {
            reference_data,
            employee_ids,
            employee_details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{EmployeeDetails, FetchedResource};
    use crate::utils::error::ClientError;
    use crate::utils::monitor::RequestCounter;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct MockWorkflow {
        ids: Vec<i64>,
        fail_employees: bool,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockWorkflow {
        fn new(ids: Vec<i64>) -> Self {
            Self {
                ids,
                fail_employees: false,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait::async_trait]
    impl Workflow for MockWorkflow {
        async fn reference_data(&self) -> Result<Vec<FetchedResource>> {
            self.calls.lock().await.push("reference_data".to_string());
            Ok(vec![FetchedResource {
                label: "employee levels".to_string(),
                url: "https://host/api/humanresources/employeelevels".to_string(),
                body: "{}".to_string(),
            }])
        }

        async fn employee_ids(&self) -> Result<Vec<i64>> {
            self.calls.lock().await.push("employee_ids".to_string());
            if self.fail_employees {
                return Err(ClientError::RestApiError {
                    api_path: "https://host/api/humanresources/employees".to_string(),
                    message: "[500] Error retrieving page #1 of employees [Internal Server Error]."
                        .to_string(),
                });
            }
            Ok(self.ids.clone())
        }

        async fn employee_details(&self, employee_ids: &[i64]) -> Result<Vec<EmployeeDetails>> {
            self.calls
                .lock()
                .await
                .push(format!("employee_details:{:?}", employee_ids));
            Ok(employee_ids
                .iter()
                .map(|id| EmployeeDetails {
                    employee_id: *id,
                    financial_information: "{}".to_string(),
                    contracts: "{}".to_string(),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_runs_phases_in_order() {
        let workflow = MockWorkflow::new(vec![3, 1, 2]);
        let calls = workflow.calls.clone();
        let engine = HrEngine::new(workflow);
        let monitor = RunMonitor::new(RequestCounter::new(), false);

        let report = engine.run(&monitor).await.unwrap();

        assert_eq!(report.reference_data.len(), 1);
        assert_eq!(report.employee_ids, vec![3, 1, 2]);
        assert_eq!(report.employee_details.len(), 3);
        assert_eq!(
            *calls.lock().await,
            vec![
                "reference_data".to_string(),
                "employee_ids".to_string(),
                "employee_details:[3, 1, 2]".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_skips_remaining_phases() {
        let mut workflow = MockWorkflow::new(vec![1]);
        workflow.fail_employees = true;
        let calls = workflow.calls.clone();
        let engine = HrEngine::new(workflow);
        let monitor = RunMonitor::new(RequestCounter::new(), false);

        let err = engine.run(&monitor).await.unwrap_err();

        assert!(matches!(err, ClientError::RestApiError { .. }));
        assert_eq!(calls.lock().await.len(), 2);
    }
}
