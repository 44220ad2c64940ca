//! # Sales Recorder (pure half)
//!
//! Validates and prices a sale request against a product snapshot. Nothing
//! here mutates state; the database layer persists the result and applies
//! the stock deltas inside one transaction.
//!
//! ## Pricing Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  NewSale                                                                │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  1. shape checks (seller name, 1..=100 lines, qty ≥ 1, price ≥ 0)      │
//! │  2. resolve every product            ── missing → NotFound             │
//! │  3. sum requested qty per product    ── > remaining → InsufficientStock│
//! │  4. total = Σ qty × price            ── ≠ caller total → InvalidAmount │
//! │  5. due ≤ total                      ── otherwise → InvalidAmount      │
//! │  6. cash = total − due                                                 │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  PricedSale { items, totals, stock_deltas }                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two lines for the same product are checked against the product's
//! remaining stock by their combined quantity.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{NewSale, Product, SalesItem, SalesRecord};
use crate::validation::validate_new_sale;

/// Quantity to add to one product's `sold_quantity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDelta {
    pub product_id: String,
    pub quantity: i64,
}

/// A sale that passed every check and is ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedSale {
    pub seller_name: String,
    pub items: Vec<SalesItem>,
    pub total_sales_amount: Money,
    pub total_due_amount: Money,
    pub cash_sale_amount: Money,
    pub date: NaiveDate,
    /// One entry per distinct product, in first-seen line order.
    pub stock_deltas: Vec<StockDelta>,
}

impl PricedSale {
    /// Turns the priced sale into the record that gets stored.
    pub fn into_record(self, id: String, now: DateTime<Utc>) -> SalesRecord {
        SalesRecord {
            id,
            seller_name: self.seller_name,
            items: self.items,
            total_sales_amount_cents: self.total_sales_amount.cents(),
            total_due_amount_cents: self.total_due_amount.cents(),
            cash_sale_amount_cents: self.cash_sale_amount.cents(),
            date: self.date,
            created_at: now,
        }
    }
}

/// Validates and prices `input` against `products`.
///
/// `products` must hold every product the sale references (extra entries
/// are ignored). Any failure leaves nothing to roll back.
pub fn price_sale(input: &NewSale, products: &[Product]) -> CoreResult<PricedSale> {
    let input = validate_new_sale(input)?;

    let mut items = Vec::with_capacity(input.items.len());
    let mut stock_deltas: Vec<StockDelta> = Vec::new();

    for line in &input.items {
        let product_id = line.product_id.trim();
        let product = products
            .iter()
            .find(|p| p.id == product_id)
            .ok_or_else(|| CoreError::not_found("Product", product_id))?;

        match stock_deltas.iter_mut().find(|d| d.product_id == product.id) {
            Some(delta) => delta.quantity += line.quantity,
            None => stock_deltas.push(StockDelta {
                product_id: product.id.clone(),
                quantity: line.quantity,
            }),
        }

        let total_price = Money::from_cents(line.selling_price_cents)
            .checked_multiply_quantity(line.quantity)
            .ok_or_else(amount_overflow)?;
        items.push(SalesItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            quantity: line.quantity,
            selling_price_cents: line.selling_price_cents,
            total_price_cents: total_price.cents(),
        });
    }

    for delta in &stock_deltas {
        if let Some(product) = products.iter().find(|p| p.id == delta.product_id) {
            product.check_sale(delta.quantity)?;
        }
    }

    let total_sales_amount = items
        .iter()
        .try_fold(Money::zero(), |acc, item| acc.checked_add(item.total_price()))
        .ok_or_else(amount_overflow)?;

    if let Some(claimed) = input.total_sales_amount_cents {
        if claimed != total_sales_amount.cents() {
            return Err(CoreError::invalid_amount(
                "totalSalesAmount",
                format!(
                    "expected {} from line items, got {}",
                    total_sales_amount,
                    Money::from_cents(claimed)
                ),
            ));
        }
    }

    let total_due_amount = Money::from_cents(input.total_due_amount_cents);
    if total_due_amount > total_sales_amount {
        return Err(CoreError::invalid_amount(
            "totalDueAmount",
            format!(
                "due {} exceeds sale total {}",
                total_due_amount, total_sales_amount
            ),
        ));
    }

    Ok(PricedSale {
        seller_name: input.seller_name,
        items,
        total_sales_amount,
        total_due_amount,
        cash_sale_amount: total_sales_amount - total_due_amount,
        date: input.date,
        stock_deltas,
    })
}

fn amount_overflow() -> CoreError {
    CoreError::invalid_amount("totalSalesAmount", "sale total is too large")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::ledger::new_product;
    use crate::types::{NewProduct, NewSaleLine};
    use crate::{MAX_PRICE_CENTS, MAX_QUANTITY};
    use proptest::prelude::*;

    const WIDGET: &str = "550e8400-e29b-41d4-a716-446655440000";
    const GADGET: &str = "6f1c2a4e-8d3b-4c5a-9e7f-0a1b2c3d4e5f";

    fn product(id: &str, name: &str, stock: i64) -> Product {
        new_product(
            id.to_string(),
            &NewProduct {
                name: name.to_string(),
                initial_stock: stock,
                buying_price_cents: 200,
                selling_price_cents: 500,
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn line(product_id: &str, quantity: i64, price: i64) -> NewSaleLine {
        NewSaleLine {
            product_id: product_id.to_string(),
            quantity,
            selling_price_cents: price,
        }
    }

    fn sale(items: Vec<NewSaleLine>, due: i64) -> NewSale {
        NewSale {
            seller_name: "Acme".to_string(),
            items,
            total_due_amount_cents: due,
            total_sales_amount_cents: None,
            date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        }
    }

    #[test]
    fn test_price_sale_cash_due_split() {
        let products = vec![product(WIDGET, "Widget", 100)];
        let priced = price_sale(&sale(vec![line(WIDGET, 30, 500)], 5000), &products).unwrap();

        assert_eq!(priced.total_sales_amount.cents(), 15000);
        assert_eq!(priced.total_due_amount.cents(), 5000);
        assert_eq!(priced.cash_sale_amount.cents(), 10000);
        assert_eq!(priced.items[0].product_name, "Widget");
        assert_eq!(
            priced.stock_deltas,
            vec![StockDelta {
                product_id: WIDGET.to_string(),
                quantity: 30
            }]
        );
    }

    #[test]
    fn test_price_sale_insufficient_stock() {
        let mut widget = product(WIDGET, "Widget", 100);
        widget.apply_sale(30).unwrap();

        let err = price_sale(&sale(vec![line(WIDGET, 71, 500)], 0), &[widget]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 70,
                requested: 71,
                ..
            }
        ));
    }

    #[test]
    fn test_price_sale_rejects_huge_quantity() {
        let products = vec![product(WIDGET, "Widget", 10)];
        let err = price_sale(&sale(vec![line(WIDGET, i64::MAX, 2)], 0), &products).unwrap_err();

        assert_eq!(
            err,
            CoreError::Validation(ValidationError::OutOfRange {
                field: "items[0].quantity".to_string(),
                min: 1,
                max: MAX_QUANTITY,
            })
        );
    }

    #[test]
    fn test_price_sale_line_total_overflow() {
        let products = vec![product(WIDGET, "Widget", 10)];
        let err = price_sale(
            &sale(vec![line(WIDGET, MAX_QUANTITY, MAX_PRICE_CENTS)], 0),
            &products,
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::InvalidAmount { ref field, .. } if field == "totalSalesAmount"));
    }

    #[test]
    fn test_price_sale_missing_product() {
        let products = vec![product(WIDGET, "Widget", 100)];
        let err = price_sale(
            &sale(vec![line(WIDGET, 1, 500), line(GADGET, 1, 500)], 0),
            &products,
        )
        .unwrap_err();
        assert_eq!(err, CoreError::not_found("Product", GADGET));
    }

    #[test]
    fn test_price_sale_same_product_checked_cumulatively() {
        let products = vec![product(WIDGET, "Widget", 10)];

        let err = price_sale(
            &sale(vec![line(WIDGET, 6, 500), line(WIDGET, 6, 450)], 0),
            &products,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 10,
                requested: 12,
                ..
            }
        ));

        let priced = price_sale(
            &sale(vec![line(WIDGET, 6, 500), line(WIDGET, 4, 450)], 0),
            &products,
        )
        .unwrap();
        assert_eq!(priced.items.len(), 2);
        assert_eq!(priced.stock_deltas.len(), 1);
        assert_eq!(priced.stock_deltas[0].quantity, 10);
        assert_eq!(priced.total_sales_amount.cents(), 3000 + 1800);
    }

    #[test]
    fn test_price_sale_due_exceeds_total() {
        let products = vec![product(WIDGET, "Widget", 100)];
        let err = price_sale(&sale(vec![line(WIDGET, 1, 500)], 501), &products).unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount { ref field, .. } if field == "totalDueAmount"));
    }

    #[test]
    fn test_price_sale_caller_total_must_match() {
        let products = vec![product(WIDGET, "Widget", 100)];
        let mut input = sale(vec![line(WIDGET, 2, 500)], 0);

        input.total_sales_amount_cents = Some(999);
        let err = price_sale(&input, &products).unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount { ref field, .. } if field == "totalSalesAmount"));

        input.total_sales_amount_cents = Some(1000);
        assert!(price_sale(&input, &products).is_ok());
    }

    #[test]
    fn test_into_record() {
        let products = vec![product(WIDGET, "Widget", 100)];
        let priced = price_sale(&sale(vec![line(WIDGET, 30, 500)], 5000), &products).unwrap();
        let record = priced.into_record("s-1".to_string(), Utc::now());

        assert_eq!(record.id, "s-1");
        assert_eq!(record.total_sales_amount_cents, 15000);
        assert_eq!(record.cash_sale_amount_cents, 10000);
        assert_eq!(record.total_quantity(), 30);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        #[test]
        fn prop_cash_plus_due_equals_total(
            lines in prop::collection::vec((1i64..20, 0i64..10_000), 1..10),
            due_fraction in 0u32..=100,
        ) {
            let products = vec![product(WIDGET, "Widget", 10_000)];
            let items: Vec<NewSaleLine> = lines
                .iter()
                .map(|(qty, price)| line(WIDGET, *qty, *price))
                .collect();
            let total: i64 = lines.iter().map(|(q, p)| q * p).sum();
            let due = total * i64::from(due_fraction) / 100;

            let priced = price_sale(&sale(items, due), &products).unwrap();
            prop_assert_eq!(priced.total_sales_amount.cents(), total);
            prop_assert_eq!(
                priced.cash_sale_amount + priced.total_due_amount,
                priced.total_sales_amount
            );
        }

        #[test]
        fn prop_rejected_sale_changes_nothing(
            stock in 0i64..50,
            first in 1i64..40,
            second in 1i64..40,
        ) {
            let products = vec![
                product(WIDGET, "Widget", stock),
                product(GADGET, "Gadget", 20),
            ];
            let input = sale(vec![line(GADGET, first.min(20), 100), line(WIDGET, second, 100)], 0);

            match price_sale(&input, &products) {
                Ok(priced) => {
                    prop_assert!(second <= stock);
                    let mut applied = products.clone();
                    for delta in &priced.stock_deltas {
                        let target = applied.iter_mut().find(|p| p.id == delta.product_id).unwrap();
                        target.apply_sale(delta.quantity).unwrap();
                    }
                    for p in &applied {
                        prop_assert!(p.sold_quantity <= p.delivered_quantity);
                    }
                }
                Err(err) => {
                    prop_assert!(second > stock);
                    let is_insufficient = matches!(err, CoreError::InsufficientStock { .. });
                    prop_assert!(is_insufficient);
                }
            }
        }
    }
}
