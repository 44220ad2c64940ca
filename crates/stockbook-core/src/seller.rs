//! # Seller Aggregator
//!
//! Read-only summaries composed from sales records and due entries. A
//! seller is only a grouping key; there is no seller table.
//!
//! ## Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SalesRecord[] (one seller)                                            │
//! │     │                                                                   │
//! │     ├── month filter (optional) ── record.date in YYYY-MM              │
//! │     │                                                                   │
//! │     ├── Σ total / cash / due, Σ quantity                               │
//! │     │                                                                   │
//! │     └── every SalesItem ──► ProductSalesAccumulator                    │
//! │                              key: product_id                            │
//! │                              merge: qty += q, value += total            │
//! │                              read:  average = value / qty               │
//! │                                                                         │
//! │  DueEntry[] (same seller, same month) ──► outstanding_due              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No data is a normal state: every function here returns an empty
//! aggregate rather than an error.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{DueEntry, SalesItem, SalesRecord, YearMonth};

// =============================================================================
// Seller Names
// =============================================================================

/// Distinct seller names across `records`, sorted.
pub fn list_sellers<'a>(records: impl IntoIterator<Item = &'a SalesRecord>) -> Vec<String> {
    records
        .into_iter()
        .map(|r| r.seller_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Case-insensitive substring filter. An empty query keeps every name.
///
/// ## Example
/// ```rust
/// use stockbook_core::seller::search_sellers;
///
/// let sellers = vec!["Acme".to_string(), "Bolt Traders".to_string()];
/// assert_eq!(search_sellers(&sellers, "ACM"), vec!["Acme".to_string()]);
/// assert_eq!(search_sellers(&sellers, "").len(), 2);
/// ```
pub fn search_sellers(sellers: &[String], query: &str) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    sellers
        .iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

// =============================================================================
// Products Sold
// =============================================================================

/// Per-product totals across a seller's sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductSold {
    pub product_id: String,
    pub product_name: String,
    pub total_quantity: i64,
    pub total_value_cents: i64,
    /// `total_value / total_quantity`, rounded to the cent.
    pub average_price_cents: i64,
}

#[derive(Debug, Clone)]
struct ProductTally {
    product_name: String,
    quantity: i64,
    value: Money,
}

/// Keyed accumulator for [`ProductSold`] rows.
///
/// Lines for the same product id merge by summing quantity and value. The
/// name is the one first seen. Averages are derived on read.
#[derive(Debug, Clone, Default)]
pub struct ProductSalesAccumulator {
    tallies: HashMap<String, ProductTally>,
}

impl ProductSalesAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: &SalesItem) {
        let tally = self
            .tallies
            .entry(item.product_id.clone())
            .or_insert_with(|| ProductTally {
                product_name: item.product_name.clone(),
                quantity: 0,
                value: Money::zero(),
            });
        tally.quantity += item.quantity;
        tally.value += item.total_price();
    }

    pub fn add_record(&mut self, record: &SalesRecord) {
        for item in &record.items {
            self.add(item);
        }
    }

    /// Rows ordered by total value descending, then product name.
    pub fn finish(self) -> Vec<ProductSold> {
        let mut rows: Vec<ProductSold> = self
            .tallies
            .into_iter()
            .map(|(product_id, tally)| ProductSold {
                product_id,
                product_name: tally.product_name,
                total_quantity: tally.quantity,
                total_value_cents: tally.value.cents(),
                average_price_cents: tally.value.divide_rounded(tally.quantity).cents(),
            })
            .collect();

        rows.sort_by(|a, b| {
            b.total_value_cents
                .cmp(&a.total_value_cents)
                .then_with(|| a.product_name.cmp(&b.product_name))
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        rows
    }
}

// =============================================================================
// Summaries
// =============================================================================

/// Everything a seller has sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SellerSummary {
    pub seller_name: String,
    pub total_sales_cents: i64,
    pub total_cash_cents: i64,
    pub total_due_on_sales_cents: i64,
    pub total_quantity_sold: i64,
    pub record_count: i64,
    pub products_sold: Vec<ProductSold>,
    pub sales_records: Vec<SalesRecord>,
}

impl SellerSummary {
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

/// One seller's activity within a calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MonthlySummary {
    pub seller_name: String,
    #[ts(as = "String")]
    pub month: YearMonth,
    pub total_sales_cents: i64,
    pub total_cash_cents: i64,
    pub total_due_on_sales_cents: i64,
    pub total_quantity_sold: i64,
    pub record_count: i64,
    /// Σ unsettled due entries added this month.
    pub outstanding_due_cents: i64,
    pub products_sold: Vec<ProductSold>,
    pub sales_records: Vec<SalesRecord>,
}

#[derive(Debug, Default)]
struct Totals {
    sales: Money,
    cash: Money,
    due: Money,
    quantity: i64,
    count: i64,
    products: ProductSalesAccumulator,
}

impl Totals {
    fn over(records: &[SalesRecord]) -> Self {
        let mut totals = Totals::default();
        for record in records {
            totals.sales += record.total_sales_amount();
            totals.cash += record.cash_sale_amount();
            totals.due += record.total_due_amount();
            totals.quantity += record.total_quantity();
            totals.count += 1;
            totals.products.add_record(record);
        }
        totals
    }
}

/// Orders records most recent first (sale date, then creation time).
pub fn sort_newest_first(records: &mut [SalesRecord]) {
    records.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Summarizes every record belonging to `seller_name`.
pub fn seller_summary(
    seller_name: &str,
    records: impl IntoIterator<Item = SalesRecord>,
) -> SellerSummary {
    let mut sales_records: Vec<SalesRecord> = records
        .into_iter()
        .filter(|r| r.seller_name == seller_name)
        .collect();
    sort_newest_first(&mut sales_records);

    let totals = Totals::over(&sales_records);

    SellerSummary {
        seller_name: seller_name.to_string(),
        total_sales_cents: totals.sales.cents(),
        total_cash_cents: totals.cash.cents(),
        total_due_on_sales_cents: totals.due.cents(),
        total_quantity_sold: totals.quantity,
        record_count: totals.count,
        products_sold: totals.products.finish(),
        sales_records,
    }
}

/// Summarizes `seller_name`'s records and dues dated within `month`.
pub fn monthly_summary(
    seller_name: &str,
    month: YearMonth,
    records: impl IntoIterator<Item = SalesRecord>,
    dues: impl IntoIterator<Item = DueEntry>,
) -> MonthlySummary {
    let mut sales_records: Vec<SalesRecord> = records
        .into_iter()
        .filter(|r| r.seller_name == seller_name && month.contains(r.date))
        .collect();
    sort_newest_first(&mut sales_records);

    let totals = Totals::over(&sales_records);

    let outstanding_due: Money = dues
        .into_iter()
        .filter(|d| d.seller_name == seller_name && month.contains(d.date_added))
        .map(|d| d.due_amount())
        .sum();

    MonthlySummary {
        seller_name: seller_name.to_string(),
        month,
        total_sales_cents: totals.sales.cents(),
        total_cash_cents: totals.cash.cents(),
        total_due_on_sales_cents: totals.due.cents(),
        total_quantity_sold: totals.quantity,
        record_count: totals.count,
        outstanding_due_cents: outstanding_due.cents(),
        products_sold: totals.products.finish(),
        sales_records,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn item(product_id: &str, name: &str, quantity: i64, price: i64) -> SalesItem {
        SalesItem {
            product_id: product_id.to_string(),
            product_name: name.to_string(),
            quantity,
            selling_price_cents: price,
            total_price_cents: quantity * price,
        }
    }

    fn record(id: &str, seller: &str, date: (i32, u32, u32), items: Vec<SalesItem>, due: i64) -> SalesRecord {
        let total: i64 = items.iter().map(|i| i.total_price_cents).sum();
        SalesRecord {
            id: id.to_string(),
            seller_name: seller.to_string(),
            items,
            total_sales_amount_cents: total,
            total_due_amount_cents: due,
            cash_sale_amount_cents: total - due,
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn due(seller: &str, amount: i64, date: (i32, u32, u32)) -> DueEntry {
        DueEntry {
            id: format!("d-{amount}"),
            seller_name: seller.to_string(),
            shop_name: "CornerStore".to_string(),
            due_amount_cents: amount,
            date_added: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn sample() -> Vec<SalesRecord> {
        vec![
            record("s1", "Acme", (2026, 9, 28), vec![item("w", "Widget", 30, 500)], 5000),
            record(
                "s2",
                "Acme",
                (2026, 10, 2),
                vec![item("w", "Widget", 3, 450), item("g", "Gadget", 1, 9900)],
                0,
            ),
            record("s3", "Bolt", (2026, 10, 3), vec![item("g", "Gadget", 2, 9900)], 0),
        ]
    }

    #[test]
    fn test_list_and_search_sellers() {
        let records = sample();
        let sellers = list_sellers(&records);
        assert_eq!(sellers, vec!["Acme".to_string(), "Bolt".to_string()]);
        assert_eq!(search_sellers(&sellers, "bo"), vec!["Bolt".to_string()]);
        assert!(search_sellers(&sellers, "zzz").is_empty());
    }

    #[test]
    fn test_accumulator_merges_and_averages() {
        let mut acc = ProductSalesAccumulator::new();
        acc.add(&item("w", "Widget", 30, 500));
        acc.add(&item("w", "Widget renamed", 3, 450));
        acc.add(&item("g", "Gadget", 1, 9900));

        let rows = acc.finish();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_id, "w");
        assert_eq!(rows[0].product_name, "Widget");
        assert_eq!(rows[0].total_quantity, 33);
        assert_eq!(rows[0].total_value_cents, 16350);
        // 16350 / 33 = 495.45.. → 495
        assert_eq!(rows[0].average_price_cents, 495);
        assert_eq!(rows[1].product_id, "g");
    }

    #[test]
    fn test_accumulator_orders_ties_by_name() {
        let mut acc = ProductSalesAccumulator::new();
        acc.add(&item("b", "Bolt", 1, 100));
        acc.add(&item("a", "Anchor", 1, 100));
        let names: Vec<String> = acc.finish().into_iter().map(|r| r.product_name).collect();
        assert_eq!(names, vec!["Anchor".to_string(), "Bolt".to_string()]);
    }

    #[test]
    fn test_seller_summary() {
        let summary = seller_summary("Acme", sample());

        assert_eq!(summary.record_count, 2);
        assert_eq!(summary.total_sales_cents, 15000 + 1350 + 9900);
        assert_eq!(summary.total_due_on_sales_cents, 5000);
        assert_eq!(summary.total_cash_cents, summary.total_sales_cents - 5000);
        assert_eq!(summary.total_quantity_sold, 34);
        assert_eq!(summary.sales_records[0].id, "s2");
        assert_eq!(summary.products_sold[0].product_name, "Widget");
    }

    #[test]
    fn test_seller_summary_empty_for_unknown_seller() {
        let summary = seller_summary("Nobody", sample());
        assert!(summary.is_empty());
        assert_eq!(summary.total_sales_cents, 0);
        assert!(summary.products_sold.is_empty());
    }

    #[test]
    fn test_monthly_summary_filters_by_month() {
        let month: YearMonth = "2026-10".parse().unwrap();
        let dues = vec![
            due("Acme", 2500, (2026, 10, 5)),
            due("Acme", 700, (2026, 9, 30)),
            due("Bolt", 100, (2026, 10, 5)),
        ];

        let summary = monthly_summary("Acme", month, sample(), dues);
        assert_eq!(summary.record_count, 1);
        assert_eq!(summary.total_sales_cents, 1350 + 9900);
        assert_eq!(summary.total_quantity_sold, 4);
        assert_eq!(summary.outstanding_due_cents, 2500);
        assert_eq!(summary.products_sold[0].product_name, "Gadget");

        let empty = monthly_summary("Acme", "2025-01".parse().unwrap(), sample(), Vec::new());
        assert_eq!(empty.record_count, 0);
        assert_eq!(empty.outstanding_due_cents, 0);
    }

    #[test]
    fn test_monthly_summary_serializes_month_string() {
        let summary = monthly_summary("Acme", "2026-10".parse().unwrap(), sample(), Vec::new());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["month"], "2026-10");
        assert_eq!(json["recordCount"], 1);
    }
}
