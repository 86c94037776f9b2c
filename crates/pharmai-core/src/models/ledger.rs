//! Inventory, sales and patient-history models.
//!
//! Field names serialize in camelCase to match the web front end.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A stocked product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryItem {
    pub name: String,
    /// Units on hand
    #[serde(alias = "stock")]
    pub qty: u32,
    /// Unit price
    pub price: f64,
    pub expiry: NaiveDate,
    pub category: String,
}

impl InventoryItem {
    pub fn new(name: &str, qty: u32, price: f64, expiry: NaiveDate, category: &str) -> Self {
        Self {
            name: name.to_string(),
            qty,
            price,
            expiry,
            category: category.to_string(),
        }
    }
}

/// One line of a sale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleItem {
    pub name: String,
    pub qty: u32,
}

/// Incoming sale as posted by the billing screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    pub patient: String,
    pub items: Vec<SaleItem>,
    /// Zero means "price it from inventory"
    #[serde(default)]
    pub total_amount: f64,
}

/// A recorded sale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: String,
    pub patient: String,
    pub items: Vec<SaleItem>,
    pub total_amount: f64,
    pub timestamp: DateTime<Utc>,
}

/// Patient-history line, most recent first in listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub patient: String,
    pub details: String,
    pub total_amount: f64,
    pub timestamp: DateTime<Utc>,
}

/// Daily dashboard figures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub today_revenue: f64,
    pub order_count: usize,
    pub total_patients: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExpiryStatus {
    Expired,
    Warning,
}

/// Item expiring inside the alert window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpiryAlert {
    pub name: String,
    pub expiry: NaiveDate,
    pub status: ExpiryStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_accepts_stock_alias() {
        let item: InventoryItem = serde_json::from_str(
            r#"{"name":"Aspirin","stock":10,"price":12.0,"expiry":"2026-12-01","category":"Analgesic"}"#,
        )
        .unwrap();
        assert_eq!(item.qty, 10);
        assert_eq!(item.price, 12.0);
    }

    #[test]
    fn test_sale_request_camel_case() {
        let sale: SaleRequest = serde_json::from_str(
            r#"{"patient":"Rahul","items":[{"name":"Aspirin","qty":2}],"totalAmount":24}"#,
        )
        .unwrap();
        assert_eq!(sale.total_amount, 24.0);

        let no_total: SaleRequest =
            serde_json::from_str(r#"{"patient":"Rahul","items":[]}"#).unwrap();
        assert_eq!(no_total.total_amount, 0.0);
    }
}
