//! # Product Ledger
//!
//! Stock counters and the values derived from them.
//!
//! ## Counter Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Product Counters                                  │
//! │                                                                         │
//! │  create ──► delivered = initial_stock, sold = 0                        │
//! │                                                                         │
//! │  delivery (purchase order) ──► delivered += q                          │
//! │  sale (sales record)       ──► sold += q   iff q ≤ delivered − sold    │
//! │                                                                         │
//! │  Derived, never stored:                                                │
//! │    remaining    = delivered − sold                                     │
//! │    buying cost  = delivered × buying price                             │
//! │    sales value  = sold × selling price                                 │
//! │    profit/loss  = (selling price − buying price) × sold                │
//! │                                                                         │
//! │  Invariant: 0 ≤ sold ≤ delivered after every accepted operation        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The database layer applies the same rules with conditional UPDATEs; the
//! methods here are the in-memory form used for validation and tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{NewProduct, Product, ProductUpdate};
use crate::validation::{validate_new_product, validate_product_update, validate_quantity};
use crate::MAX_DELIVERED_QUANTITY;

// =============================================================================
// Construction
// =============================================================================

/// Builds a new product from validated input.
///
/// `delivered_quantity` starts equal to `initial_stock`; nothing is sold.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use stockbook_core::{ledger::new_product, NewProduct};
///
/// let product = new_product(
///     "p-1".to_string(),
///     &NewProduct {
///         name: "Widget".to_string(),
///         initial_stock: 100,
///         buying_price_cents: 200,
///         selling_price_cents: 500,
///     },
///     Utc::now(),
/// )
/// .unwrap();
///
/// assert_eq!(product.delivered_quantity, 100);
/// assert_eq!(product.sold_quantity, 0);
/// assert_eq!(product.remaining_quantity(), 100);
/// ```
pub fn new_product(id: String, input: &NewProduct, now: DateTime<Utc>) -> CoreResult<Product> {
    let input = validate_new_product(input)?;

    Ok(Product {
        id,
        name: input.name,
        initial_stock: input.initial_stock,
        delivered_quantity: input.initial_stock,
        sold_quantity: 0,
        buying_price_cents: input.buying_price_cents,
        selling_price_cents: input.selling_price_cents,
        created_at: now,
        updated_at: now,
    })
}

// =============================================================================
// Derived Values and Counter Updates
// =============================================================================

impl Product {
    /// `delivered − sold`.
    #[inline]
    pub fn remaining_quantity(&self) -> i64 {
        self.delivered_quantity - self.sold_quantity
    }

    /// `delivered × buying price`.
    pub fn buying_cost(&self) -> Money {
        self.buying_price().multiply_quantity(self.delivered_quantity)
    }

    /// `sold × selling price`.
    pub fn sales_value(&self) -> Money {
        self.selling_price().multiply_quantity(self.sold_quantity)
    }

    /// `(selling price − buying price) × sold`. Negative when selling at a loss.
    pub fn profit_loss(&self) -> Money {
        (self.selling_price() - self.buying_price()).multiply_quantity(self.sold_quantity)
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.remaining_quantity(), self.sold_quantity)
    }

    /// Adds delivered stock, keeping the total within `MAX_DELIVERED_QUANTITY`.
    ///
    /// `ProductRepository::add_delivered` enforces the same bound in its
    /// UPDATE guard.
    pub fn apply_delivery(&mut self, quantity: i64) -> CoreResult<()> {
        validate_quantity("quantity", quantity)?;
        self.delivered_quantity = self
            .delivered_quantity
            .checked_add(quantity)
            .filter(|total| *total <= MAX_DELIVERED_QUANTITY)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "deliveredQuantity".to_string(),
                min: 0,
                max: MAX_DELIVERED_QUANTITY,
            })?;
        Ok(())
    }

    /// Checks that `quantity` can be sold without driving remaining below zero.
    pub fn check_sale(&self, quantity: i64) -> CoreResult<()> {
        let available = self.remaining_quantity();
        if quantity > available {
            return Err(CoreError::InsufficientStock {
                product_id: self.id.clone(),
                product_name: self.name.clone(),
                available,
                requested: quantity,
            });
        }

        Ok(())
    }

    /// Records sold stock after [`Product::check_sale`] passes.
    ///
    /// Mirrors the `delivered_quantity - sold_quantity >= ?` guard of
    /// `ProductRepository::add_sold`.
    pub fn apply_sale(&mut self, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }
        self.check_sale(quantity)?;

        self.sold_quantity += quantity;
        Ok(())
    }

    /// Applies an edit of name and prices. Counters are untouched.
    pub fn apply_update(&mut self, update: &ProductUpdate, now: DateTime<Utc>) -> CoreResult<()> {
        let update = validate_product_update(update)?;

        self.name = update.name;
        self.buying_price_cents = update.buying_price_cents;
        self.selling_price_cents = update.selling_price_cents;
        self.updated_at = now;
        Ok(())
    }

    /// Builds the derived report for this product.
    pub fn report(&self) -> ProductReport {
        ProductReport {
            remaining_quantity: self.remaining_quantity(),
            buying_cost_cents: self.buying_cost().cents(),
            sales_value_cents: self.sales_value().cents(),
            profit_loss_cents: self.profit_loss().cents(),
            stock_status: self.stock_status(),
            product: self.clone(),
        }
    }
}

/// Remaining quantity of a product in a set; 0 when the product is absent.
pub fn remaining(products: &[Product], product_id: &str) -> i64 {
    products
        .iter()
        .find(|p| p.id == product_id)
        .map(Product::remaining_quantity)
        .unwrap_or(0)
}

// =============================================================================
// Reports
// =============================================================================

/// Stock level classification shown next to each product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum StockStatus {
    /// Nothing left.
    OutOfStock,
    /// Remaining is below a fifth of what has been sold.
    LowStock,
    InStock,
}

impl StockStatus {
    pub fn classify(remaining: i64, sold: i64) -> Self {
        if remaining <= 0 {
            StockStatus::OutOfStock
        } else if remaining * 5 < sold {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

/// A product with its derived values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductReport {
    #[serde(flatten)]
    #[ts(flatten)]
    pub product: Product,
    pub remaining_quantity: i64,
    pub buying_cost_cents: i64,
    pub sales_value_cents: i64,
    pub profit_loss_cents: i64,
    pub stock_status: StockStatus,
}

/// Inventory-wide totals over all product reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryTotals {
    pub product_count: i64,
    pub total_remaining_quantity: i64,
    pub total_buying_cost_cents: i64,
    pub total_sales_value_cents: i64,
    pub total_profit_loss_cents: i64,
}

impl InventoryTotals {
    pub fn from_products<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        products
            .into_iter()
            .fold(InventoryTotals::default(), |mut totals, product| {
                totals.product_count = totals.product_count.saturating_add(1);
                totals.total_remaining_quantity =
                    totals.total_remaining_quantity.saturating_add(product.remaining_quantity());
                totals.total_buying_cost_cents =
                    totals.total_buying_cost_cents.saturating_add(product.buying_cost().cents());
                totals.total_sales_value_cents =
                    totals.total_sales_value_cents.saturating_add(product.sales_value().cents());
                totals.total_profit_loss_cents =
                    totals.total_profit_loss_cents.saturating_add(product.profit_loss().cents());
                totals
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
