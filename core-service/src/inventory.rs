//! Tile stock on the warehouse backend

use crate::error::Result;
use crate::SortOrder;
use core_gateway::{Gateway, RequestOptions};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const ITEMS_ROOT: &str = "/api/inventory/items";

/// Filters for the stock list.
///
/// `category`: 1 wall tile, 2 floor tile.
/// `surface`: 1 polished, 2 matte, 3 glazed, 4 full-body marble, 5 crystallized,
/// 6 sintered slab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub category: Option<i32>,
    pub surface: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub model_number: String,
    pub manufacturer: String,
    pub specification: String,
    pub surface: i32,
    pub category: i32,
    pub warehouse_num: i64,
    pub total_pieces: i64,
    pub price_per_piece: f64,
    pub pieces_per_box: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

/// Body of a stock-in: the item without server-assigned fields, plus the
/// number of boxes received.
#[derive(Serialize)]
struct StockIn<'a> {
    #[serde(flatten)]
    item: &'a InventoryItem,
    box_count: i64,
}

#[derive(Debug, Clone)]
pub struct InventoryApi {
    gateway: Gateway,
}

impl InventoryApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, query: &InventoryQuery) -> Result<Value> {
        let options = RequestOptions::new().query(query)?;
        Ok(self.gateway.get(ITEMS_ROOT, options).await?)
    }

    pub async fn update(&self, id: i64, item: &InventoryItem) -> Result<Value> {
        let options = RequestOptions::new().json(item)?;
        Ok(self.gateway.put(&item_path(id), options).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<Value> {
        Ok(self
            .gateway
            .delete(&item_path(id), RequestOptions::new())
            .await?)
    }

    /// Register received stock. `id` and the timestamps of `item` are ignored.
    pub async fn stock_in(&self, item: &InventoryItem, box_count: i64) -> Result<Value> {
        let item = InventoryItem {
            id: None,
            create_time: None,
            update_time: None,
            ..item.clone()
        };
        let options = RequestOptions::new().json(&StockIn {
            item: &item,
            box_count,
        })?;
        Ok(self.gateway.post(ITEMS_ROOT, options).await?)
    }
}

fn item_path(id: i64) -> String {
    format!("{}/{}", ITEMS_ROOT, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item() -> InventoryItem {
        InventoryItem {
            id: Some(9),
            model_number: "M-600".to_string(),
            manufacturer: "Foshan".to_string(),
            specification: "600x600".to_string(),
            surface: 1,
            category: 2,
            warehouse_num: 1,
            total_pieces: 40,
            price_per_piece: 12.5,
            pieces_per_box: 4,
            remark: None,
            create_time: Some("2024-01-01 00:00:00".to_string()),
            update_time: None,
        }
    }

    #[test]
    fn test_stock_in_body_drops_server_fields() {
        let item = InventoryItem {
            id: None,
            create_time: None,
            ..item()
        };
        let body = serde_json::to_value(StockIn {
            item: &item,
            box_count: 10,
        })
        .unwrap();

        assert_eq!(body["box_count"], 10);
        assert_eq!(body["model_number"], "M-600");
        assert!(body.get("id").is_none());
        assert!(body.get("create_time").is_none());
        assert!(body.get("remark").is_none());
    }

    #[test]
    fn test_item_deserializes_backend_row() {
        let row = json!({
            "id": 3, "model_number": "M-1", "manufacturer": "X", "specification": "300x600",
            "surface": 2, "category": 1, "warehouse_num": 2, "total_pieces": 8,
            "price_per_piece": 3.0, "pieces_per_box": 8, "remark": null,
            "create_time": "2024-05-01 10:00:00", "update_time": "2024-05-02 10:00:00"
        });
        let item: InventoryItem = serde_json::from_value(row).unwrap();
        assert_eq!(item.id, Some(3));
        assert_eq!(item.remark, None);
    }
}
