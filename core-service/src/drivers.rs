//! Driver vetting on the delivery backend

use crate::error::Result;
use crate::SortOrder;
use core_gateway::{Gateway, RequestOptions};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const DRIVER_ROOT: &str = "/api/delivery/driver";

/// Filters for the driver list.
///
/// `audit_status`: 0 pending, 1 approved, 2 rejected.
/// `work_status`: 1 idle, 2 busy, 3 offline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub audit_status: Option<i32>,
    pub work_status: Option<i32>,
}

/// Outcome of reviewing a driver application, sent as query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverAudit {
    pub audit_status: i32,
    pub audit_remark: Option<String>,
    pub auditor: String,
}

impl DriverAudit {
    pub fn approved(auditor: impl Into<String>) -> Self {
        Self {
            audit_status: 1,
            audit_remark: None,
            auditor: auditor.into(),
        }
    }

    pub fn rejected(auditor: impl Into<String>, remark: impl Into<String>) -> Self {
        Self {
            audit_status: 2,
            audit_remark: Some(remark.into()),
            auditor: auditor.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DriversApi {
    gateway: Gateway,
}

impl DriversApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, query: &DriverQuery) -> Result<Value> {
        let options = RequestOptions::new().query(query)?;
        Ok(self.gateway.get(DRIVER_ROOT, options).await?)
    }

    pub async fn detail(&self, driver_id: i64) -> Result<Value> {
        Ok(self
            .gateway
            .get(&driver_path(driver_id, ""), RequestOptions::new())
            .await?)
    }

    pub async fn approve(&self, driver_id: i64, audit: &DriverAudit) -> Result<Value> {
        let options = RequestOptions::new().query(audit)?;
        Ok(self
            .gateway
            .put(&driver_path(driver_id, "/approval"), options)
            .await?)
    }

    pub async fn reject(&self, driver_id: i64, audit: &DriverAudit) -> Result<Value> {
        let options = RequestOptions::new().query(audit)?;
        Ok(self
            .gateway
            .put(&driver_path(driver_id, "/rejection"), options)
            .await?)
    }

    pub async fn delete(&self, driver_id: i64, auditor: &str) -> Result<Value> {
        let options = RequestOptions::new().body(json!({ "auditor": auditor }));
        Ok(self
            .gateway
            .delete(&driver_path(driver_id, "/delete"), options)
            .await?)
    }

    /// Zero the driver's account balance.
    pub async fn reset_money(&self, driver_id: i64, auditor: &str) -> Result<Value> {
        let options = RequestOptions::new().query_pair("auditor", auditor);
        Ok(self
            .gateway
            .delete(&driver_path(driver_id, "/reset-money"), options)
            .await?)
    }
}

fn driver_path(driver_id: i64, suffix: &str) -> String {
    format!("{}/{}{}", DRIVER_ROOT, driver_id, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_query_uses_camel_case() {
        let query = DriverQuery {
            audit_status: Some(0),
            work_status: Some(1),
            ..DriverQuery::default()
        };
        let options = RequestOptions::new().query(&query).unwrap();

        assert_eq!(options.query.len(), 2);
        assert!(options
            .query
            .contains(&("auditStatus".to_string(), "0".to_string())));
        assert!(options
            .query
            .contains(&("workStatus".to_string(), "1".to_string())));
    }

    #[test]
    fn test_audit_presets() {
        let approved = DriverAudit::approved("admin");
        assert_eq!(approved.audit_status, 1);
        assert_eq!(approved.audit_remark, None);

        let rejected = DriverAudit::rejected("admin", "Licence expired");
        assert_eq!(rejected.audit_status, 2);

        let json = serde_json::to_value(&rejected).unwrap();
        assert_eq!(json["auditRemark"], "Licence expired");
    }

    #[test]
    fn test_driver_paths() {
        assert_eq!(driver_path(7, ""), "/api/delivery/driver/7");
        assert_eq!(driver_path(7, "/reset-money"), "/api/delivery/driver/7/reset-money");
    }
}
