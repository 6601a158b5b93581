pub mod api_client;
pub mod auth;
pub mod engine;
pub mod hr_workflow;
pub mod session;

pub use crate::domain::model::{EmployeeDetails, FetchedResource, RunReport};
pub use crate::domain::ports::{ConfigProvider, Workflow};
pub use crate::utils::error::Result;
