use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// OpenID Connect discovery document. Only the fields this client checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryDocument {
    pub issuer: String,
    pub token_endpoint: Option<String>,
    #[serde(default)]
    pub grant_types_supported: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub scope: Option<String>,
}

/// RFC 6749 error body from the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}

#[derive(Clone)]
pub struct AccessToken {
    value: String,
    pub token_type: String,
    pub scope: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    #[cfg(test)]
    pub(crate) fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            token_type: "Bearer".to_string(),
            scope: None,
            expires_at: None,
        }
    }

    pub fn from_response(response: TokenResponse, issued_at: DateTime<Utc>) -> Self {
        Self {
            value: response.access_token,
            token_type: response.token_type.unwrap_or_else(|| "Bearer".to_string()),
            scope: response.scope,
            expires_at: response
                .expires_in
                .and_then(Duration::try_seconds)
                .and_then(|lifetime| issued_at.checked_add_signed(lifetime)),
        }
    }

    pub fn secret(&self) -> &str {
        &self.value
    }

}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"***")
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// One page of `GET /api/humanresources/employees` (HAL+JSON).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePage {
    pub employees: Vec<EmployeeSummary>,
    pub total_pages: Option<u64>,
    #[serde(rename = "_links", default)]
    pub links: HalLinks,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeSummary {
    pub id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HalLinks {
    pub next: Option<HalLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HalLink {
    pub href: String,
}

impl EmployeePage {
    pub fn next_href(&self) -> Option<&str> {
        self.links.next.as_ref().map(|link| link.href.as_str())
    }
}

/// Raw body of a GET, passed through untouched.
#[derive(Debug, Clone)]
pub struct FetchedResource {
    pub label: String,
    pub url: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct EmployeeDetails {
    pub employee_id: i64,
    pub financial_information: String,
    pub contracts: String,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub reference_data: Vec<FetchedResource>,
    pub employee_ids: Vec<i64>,
    pub employee_details: Vec<EmployeeDetails>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_employee_page_with_next_link() {
        let page: EmployeePage = serde_json::from_value(serde_json::json!({
            "employees": [{"id": 7, "forename": "Ada"}, {"id": 9}],
            "page": 1,
            "pageSize": 2,
            "totalPages": 3,
            "_links": {
                "self": {"href": "https://host/api/humanresources/employees?page=1&pageSize=2"},
                "next": {"href": "https://host/api/humanresources/employees?page=2&pageSize=2"}
            }
        }))
        .unwrap();

        let ids: Vec<i64> = page.employees.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![7, 9]);
        assert_eq!(page.total_pages, Some(3));
        assert_eq!(
            page.next_href(),
            Some("https://host/api/humanresources/employees?page=2&pageSize=2")
        );
    }

    #[test]
    fn test_employee_page_without_links_is_last() {
        let page: EmployeePage =
            serde_json::from_value(serde_json::json!({"employees": []})).unwrap();
        assert!(page.next_href().is_none());
        assert!(page.total_pages.is_none());
    }

    #[test]
    fn test_token_expiry_and_redacted_debug() {
        let issued_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let token = AccessToken::from_response(
            TokenResponse {
                access_token: "secret-token".to_string(),
                token_type: Some("Bearer".to_string()),
                expires_in: Some(3600),
                scope: Some("restapi".to_string()),
            },
            issued_at,
        );

        assert_eq!(token.secret(), "secret-token");
        assert_eq!(token.expires_at, Some(issued_at + Duration::seconds(3600)));
        assert!(!format!("{:?}", token).contains("secret-token"));
    }
}
