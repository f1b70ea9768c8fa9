//! Stock movement records on the warehouse backend
//!
//! Operation types: 1 inbound, 2 outbound, 3 transfer, 4 correction.

use crate::error::Result;
use crate::SortOrder;
use core_gateway::{Gateway, RequestOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const OPERATION_INBOUND: i32 = 1;
pub const OPERATION_OUTBOUND: i32 = 2;
pub const OPERATION_TRANSFER: i32 = 3;
pub const OPERATION_CORRECTION: i32 = 4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub operation_type: Option<i32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl LogQuery {
    pub fn of_type(operation_type: i32) -> Self {
        Self {
            operation_type: Some(operation_type),
            ..Self::default()
        }
    }
}

/// Stock arriving for a model, creating the item when it is new.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InboundLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_num: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pieces: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pieces_per_box: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_piece: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_item_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_warehouse: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_warehouse: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

/// Correction of an existing record. Unset warehouses are sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryLogChange {
    pub id: i64,
    pub inventory_item_id: i64,
    pub operator_id: i64,
    pub operation_type: i32,
    pub source_warehouse: Option<i64>,
    pub target_warehouse: Option<i64>,
    pub quantity_change: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InventoryLogsApi {
    gateway: Gateway,
}

impl InventoryLogsApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, query: &LogQuery) -> Result<Value> {
        let options = RequestOptions::new().query(query)?;
        Ok(self.gateway.get("/logs", options).await?)
    }

    pub async fn record_inbound(&self, log: &InboundLog) -> Result<Value> {
        let options = RequestOptions::new().json(log)?;
        Ok(self.gateway.post("/logs/inbound", options).await?)
    }

    pub async fn record_transfer(&self, log: &TransferLog) -> Result<Value> {
        let options = RequestOptions::new().json(log)?;
        Ok(self.gateway.post("/logs/transfer", options).await?)
    }

    /// Rewrite a record. `operation_type` selects how the backend rebalances
    /// stock and travels in the query string.
    pub async fn update(&self, change: &InventoryLogChange, operation_type: i32) -> Result<Value> {
        let options = RequestOptions::new()
            .json(change)?
            .query_pair("operation_type", operation_type);
        Ok(self.gateway.put("/logs", options).await?)
    }

    /// Admin only.
    pub async fn delete(&self, id: i64) -> Result<Value> {
        Ok(self
            .gateway
            .delete(&format!("/logs/{}", id), RequestOptions::new())
            .await?)
    }
}
