//! Dashboard figures from the warehouse backend

use crate::error::Result;
use core_gateway::{Gateway, RequestOptions};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct SalesApi {
    gateway: Gateway,
}

impl SalesApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn top_products(&self) -> Result<Value> {
        self.fetch("/sales/top-products").await
    }

    /// Sales per period for `length` periods ending at `year`/`month`.
    pub async fn trend(&self, year: i32, month: u32, length: u32) -> Result<Value> {
        self.fetch(&format!("/sales/trend/{}/{}/{}", year, month, length))
            .await
    }

    pub async fn today_amount(&self) -> Result<Value> {
        self.fetch("/sales/today-amount").await
    }

    pub async fn total_amount(&self) -> Result<Value> {
        self.fetch("/sales/total-amount").await
    }

    async fn fetch(&self, path: &str) -> Result<Value> {
        Ok(self.gateway.get(path, RequestOptions::new()).await?)
    }
}
