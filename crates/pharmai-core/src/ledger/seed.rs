//! Demo pharmacy contents.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::models::{HistoryEntry, InventoryItem};

/// (name, qty, price, (year, month, day), category)
const INVENTORY: &[(&str, u32, f64, (i32, u32, u32), &str)] = &[
    ("Aspirin", 450, 12.0, (2026, 12, 1), "Analgesic"),
    ("Metformin", 25, 55.0, (2025, 5, 15), "Antidiabetic"),
    ("Lisinopril", 150, 85.0, (2026, 8, 20), "Antihypertensive"),
    ("Atorvastatin", 10, 120.0, (2025, 3, 10), "Cholesterol"),
    ("Amoxicillin", 300, 45.0, (2026, 1, 5), "Antibiotic"),
    ("Sildenafil", 85, 250.0, (2027, 2, 14), "Men's Health"),
    ("Warfarin", 200, 40.0, (2026, 6, 30), "Anticoagulant"),
    ("Digoxin", 120, 110.0, (2025, 9, 12), "Heart Failure"),
    ("Paracetamol", 500, 20.0, (2027, 1, 1), "Analgesic"),
    ("Cetirizine", 100, 35.0, (2026, 5, 20), "Antihistamine"),
    ("Azithromycin", 40, 90.0, (2025, 11, 15), "Antibiotic"),
    ("Pantoprazole", 200, 80.0, (2026, 10, 10), "Antacid"),
];

pub(super) fn inventory() -> Vec<InventoryItem> {
    INVENTORY
        .iter()
        .filter_map(|&(name, qty, price, (y, m, d), category)| {
            NaiveDate::from_ymd_opt(y, m, d)
                .map(|expiry| InventoryItem::new(name, qty, price, expiry, category))
        })
        .collect()
}

pub(super) fn history(now: DateTime<Utc>) -> Vec<HistoryEntry> {
    vec![
        HistoryEntry {
            patient: "Rahul Sharma".into(),
            details: "Prescribed Amoxicillin 500mg for throat infection.".into(),
            total_amount: 450.0,
            timestamp: now - Duration::days(1),
        },
        HistoryEntry {
            patient: "Priya Patel".into(),
            details: "Routine refill for Metformin 500mg.".into(),
            total_amount: 1100.0,
            timestamp: now - Duration::days(2),
        },
    ]
}
