//! In-memory pharmacy ledger: inventory, sales and patient history.
//!
//! Owned by the caller and shared by `Arc`; all state sits behind one
//! `RwLock`. Nothing is persisted.

mod seed;

use std::collections::{BTreeMap, HashSet};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::models::{
    Analytics, ExpiryAlert, ExpiryStatus, HistoryEntry, InventoryItem, SaleItem, SaleRecord,
    SaleRequest,
};
use crate::resolver::NormalizedName;
use crate::store::InteractionStore;

/// Maximum patient-history entries kept.
pub const HISTORY_LIMIT: usize = 50;

/// Default look-ahead for expiry alerts.
pub const EXPIRY_WINDOW_DAYS: i64 = 90;

/// Ledger errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Patient name is required")]
    MissingPatient,

    #[error("Sale has no items")]
    EmptySale,

    #[error("Invalid quantity for {0}")]
    InvalidQuantity(String),

    #[error("Invalid total amount: {0}")]
    InvalidTotal(f64),

    #[error("Ledger lock poisoned")]
    LockPoisoned,
}

impl<T> From<PoisonError<T>> for LedgerError {
    fn from(_: PoisonError<T>) -> Self {
        LedgerError::LockPoisoned
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Default)]
struct LedgerState {
    inventory: Vec<InventoryItem>,
    sales: Vec<SaleRecord>,
    /// Most recent first
    history: Vec<HistoryEntry>,
}

/// The pharmacy's books.
#[derive(Debug, Default)]
pub struct Ledger {
    state: RwLock<LedgerState>,
}

impl Ledger {
    /// Ledger stocked with the demo inventory and two history entries.
    pub fn demo() -> Self {
        Self::demo_at(Utc::now())
    }

    /// Demo ledger with history timestamps relative to `now`.
    pub fn demo_at(now: DateTime<Utc>) -> Self {
        Self::with_inventory(seed::inventory(), seed::history(now))
    }

    pub fn with_inventory(inventory: Vec<InventoryItem>, history: Vec<HistoryEntry>) -> Self {
        Self {
            state: RwLock::new(LedgerState {
                inventory,
                sales: Vec::new(),
                history,
            }),
        }
    }

    pub fn list_inventory(&self) -> LedgerResult<Vec<InventoryItem>> {
        Ok(self.state.read()?.inventory.clone())
    }

    /// Patient history, most recent first.
    pub fn list_history(&self) -> LedgerResult<Vec<HistoryEntry>> {
        Ok(self.state.read()?.history.clone())
    }

    /// Sales in the order they were recorded.
    pub fn list_sales(&self) -> LedgerResult<Vec<SaleRecord>> {
        Ok(self.state.read()?.sales.clone())
    }

    /// Record a sale now.
    pub fn record_sale(&self, request: SaleRequest) -> LedgerResult<SaleRecord> {
        self.record_sale_at(request, Utc::now())
    }

    /// Record a sale with an explicit timestamp.
    ///
    /// Stock of matching items is decremented (never below zero); names not
    /// in inventory are accepted as-is. A zero `total_amount` is priced from
    /// inventory.
    pub fn record_sale_at(
        &self,
        request: SaleRequest,
        timestamp: DateTime<Utc>,
    ) -> LedgerResult<SaleRecord> {
        let patient = request.patient.trim().to_string();
        if patient.is_empty() {
            return Err(LedgerError::MissingPatient);
        }
        if request.items.is_empty() {
            return Err(LedgerError::EmptySale);
        }
        if let Some(item) = request.items.iter().find(|i| i.qty == 0) {
            return Err(LedgerError::InvalidQuantity(item.name.clone()));
        }
        if !request.total_amount.is_finite() || request.total_amount < 0.0 {
            return Err(LedgerError::InvalidTotal(request.total_amount));
        }

        let mut state = self.state.write()?;

        let mut priced = 0.0;
        for line in &request.items {
            match find_item(&mut state.inventory, &line.name) {
                Some(product) => {
                    priced += product.price * line.qty as f64;
                    product.qty = product.qty.saturating_sub(line.qty);
                }
                None => {
                    tracing::debug!(item = %line.name, "Sold item not in inventory");
                }
            }
        }

        let total_amount = if request.total_amount > 0.0 {
            request.total_amount
        } else {
            priced
        };

        let sale = SaleRecord {
            id: uuid::Uuid::new_v4().to_string(),
            patient: patient.clone(),
            items: request.items,
            total_amount,
            timestamp,
        };

        state.history.insert(
            0,
            HistoryEntry {
                patient,
                details: purchase_details(&sale.items),
                total_amount,
                timestamp,
            },
        );
        state.history.truncate(HISTORY_LIMIT);
        state.sales.push(sale.clone());

        tracing::info!(sale_id = %sale.id, total = sale.total_amount, "Sale recorded");
        Ok(sale)
    }

    /// Figures for the calendar day (UTC) containing `now`.
    pub fn analytics(&self, now: DateTime<Utc>) -> LedgerResult<Analytics> {
        let state = self.state.read()?;
        let today = now.date_naive();

        let todays: Vec<&SaleRecord> = state
            .sales
            .iter()
            .filter(|s| s.timestamp.date_naive() == today)
            .collect();

        let patients: HashSet<String> = state
            .history
            .iter()
            .map(|h| h.patient.trim().to_lowercase())
            .collect();

        Ok(Analytics {
            today_revenue: todays.iter().map(|s| s.total_amount).sum(),
            order_count: todays.len(),
            total_patients: patients.len(),
        })
    }

    /// Items expiring within `window_days` of `today`, soonest first.
    pub fn expiry_alerts(&self, today: NaiveDate, window_days: i64) -> LedgerResult<Vec<ExpiryAlert>> {
        let state = self.state.read()?;

        let mut alerts: Vec<ExpiryAlert> = state
            .inventory
            .iter()
            .filter_map(|item| {
                let days = (item.expiry - today).num_days();
                let status = if days < 0 {
                    ExpiryStatus::Expired
                } else if days < window_days {
                    ExpiryStatus::Warning
                } else {
                    return None;
                };
                Some(ExpiryAlert {
                    name: item.name.clone(),
                    expiry: item.expiry,
                    status,
                })
            })
            .collect();

        alerts.sort_by(|a, b| a.expiry.cmp(&b.expiry).then_with(|| a.name.cmp(&b.name)));
        Ok(alerts)
    }

    /// Inventory names plus every drug in the interaction table.
    ///
    /// Sorted and de-duplicated hyphen- and case-insensitively; an inventory
    /// spelling wins over the table's.
    pub fn catalogue(&self, store: &InteractionStore) -> LedgerResult<Vec<String>> {
        let state = self.state.read()?;

        let mut names: BTreeMap<String, String> = store
            .drug_names()
            .into_iter()
            .map(|n| (n.clone(), n))
            .collect();
        for item in &state.inventory {
            names.insert(NormalizedName::new(&item.name).key_form(), item.name.clone());
        }

        Ok(names.into_values().collect())
    }
}

fn find_item<'a>(inventory: &'a mut [InventoryItem], name: &str) -> Option<&'a mut InventoryItem> {
    let key = NormalizedName::new(name).key_form();
    inventory
        .iter_mut()
        .find(|p| NormalizedName::new(&p.name).key_form() == key)
}

fn purchase_details(items: &[SaleItem]) -> String {
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    format!("Purchased: {}", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn sale(patient: &str, items: &[(&str, u32)], total: f64) -> SaleRequest {
        SaleRequest {
            patient: patient.into(),
            items: items
                .iter()
                .map(|&(name, qty)| SaleItem {
                    name: name.into(),
                    qty,
                })
                .collect(),
            total_amount: total,
        }
    }

    fn stock_of(ledger: &Ledger, name: &str) -> u32 {
        ledger
            .list_inventory()
            .unwrap()
            .into_iter()
            .find(|i| i.name == name)
            .map(|i| i.qty)
            .unwrap()
    }

    #[test]
    fn test_demo_contents() {
        let ledger = Ledger::demo_at(now());
        assert_eq!(ledger.list_inventory().unwrap().len(), 12);

        let history = ledger.list_history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].patient, "Rahul Sharma");
        assert!(ledger.list_sales().unwrap().is_empty());
    }

    #[test]
    fn test_sale_decrements_stock_and_prepends_history() {
        let ledger = Ledger::demo_at(now());

        let record = ledger
            .record_sale_at(sale("Anita Rao", &[("Aspirin", 10), ("warfarin", 2)], 200.0), now())
            .unwrap();

        assert_eq!(record.total_amount, 200.0);
        assert!(!record.id.is_empty());
        assert_eq!(stock_of(&ledger, "Aspirin"), 440);
        assert_eq!(stock_of(&ledger, "Warfarin"), 198);

        let history = ledger.list_history().unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].patient, "Anita Rao");
        assert_eq!(history[0].details, "Purchased: Aspirin, warfarin");
        assert_eq!(ledger.list_sales().unwrap(), vec![record]);
    }

    #[test]
    fn test_zero_total_priced_from_inventory() {
        let ledger = Ledger::demo_at(now());
        let record = ledger
            .record_sale_at(sale("Anita", &[("Aspirin", 2), ("Unlisted Tonic", 1)], 0.0), now())
            .unwrap();
        assert_eq!(record.total_amount, 24.0);
    }

    #[test]
    fn test_stock_floors_at_zero() {
        let ledger = Ledger::demo_at(now());
        ledger
            .record_sale_at(sale("Anita", &[("Atorvastatin", 25)], 10.0), now())
            .unwrap();
        assert_eq!(stock_of(&ledger, "Atorvastatin"), 0);
    }

    #[test]
    fn test_invalid_sales_rejected() {
        let ledger = Ledger::demo_at(now());

        assert_eq!(
            ledger.record_sale_at(sale("  ", &[("Aspirin", 1)], 1.0), now()),
            Err(LedgerError::MissingPatient)
        );
        assert_eq!(
            ledger.record_sale_at(sale("Anita", &[], 1.0), now()),
            Err(LedgerError::EmptySale)
        );
        assert_eq!(
            ledger.record_sale_at(sale("Anita", &[("Aspirin", 0)], 1.0), now()),
            Err(LedgerError::InvalidQuantity("Aspirin".into()))
        );
        assert!(matches!(
            ledger.record_sale_at(sale("Anita", &[("Aspirin", 1)], -5.0), now()),
            Err(LedgerError::InvalidTotal(_))
        ));

        // Nothing changed
        assert_eq!(stock_of(&ledger, "Aspirin"), 450);
        assert_eq!(ledger.list_history().unwrap().len(), 2);
    }

    #[test]
    fn test_history_capped() {
        let ledger = Ledger::demo_at(now());
        for i in 0..60 {
            ledger
                .record_sale_at(sale(&format!("Patient {}", i), &[("Paracetamol", 1)], 20.0), now())
                .unwrap();
        }

        let history = ledger.list_history().unwrap();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].patient, "Patient 59");
        assert_eq!(ledger.list_sales().unwrap().len(), 60);
    }

    #[test]
    fn test_analytics_counts_today_only() {
        let ledger = Ledger::demo_at(now());
        let yesterday = now() - chrono::Duration::days(1);

        ledger
            .record_sale_at(sale("Rahul Sharma", &[("Aspirin", 1)], 12.0), yesterday)
            .unwrap();
        ledger
            .record_sale_at(sale("Anita", &[("Aspirin", 1)], 12.0), now())
            .unwrap();
        ledger
            .record_sale_at(sale("anita ", &[("Digoxin", 1)], 110.0), now())
            .unwrap();

        let analytics = ledger.analytics(now()).unwrap();
        assert_eq!(analytics.order_count, 2);
        assert_eq!(analytics.today_revenue, 122.0);
        // Rahul Sharma, Priya Patel, Anita
        assert_eq!(analytics.total_patients, 3);
    }

    #[test]
    fn test_expiry_alerts() {
        let ledger = Ledger::demo_at(now());
        let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();

        let alerts = ledger.expiry_alerts(today, EXPIRY_WINDOW_DAYS).unwrap();
        let names: Vec<&str> = alerts.iter().map(|a| a.name.as_str()).collect();

        assert_eq!(names, vec!["Atorvastatin", "Metformin"]);
        assert_eq!(alerts[0].status, ExpiryStatus::Expired);
        assert_eq!(alerts[1].status, ExpiryStatus::Warning);
    }

    #[test]
    fn test_catalogue_merges_inventory_and_table() {
        let ledger = Ledger::demo_at(now());
        let store = InteractionStore::builtin().unwrap();

        let names = ledger.catalogue(&store).unwrap();

        assert!(names.contains(&"Aspirin".to_string()));
        assert!(!names.contains(&"aspirin".to_string()));
        assert!(names.contains(&"Cetirizine".to_string()));
        assert!(names.contains(&"amiodarone".to_string()));

        let mut sorted = names.clone();
        sorted.sort_by_key(|n| n.to_lowercase());
        assert_eq!(names, sorted);
    }
}
