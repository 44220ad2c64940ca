//! # Purchase Order Rules
//!
//! Creation and the one-way delivery transition.
//!
//! ```text
//! create ──► Pending ──mark_delivered──► Delivered (immutable)
//!                           │
//!                           └── product.delivered_quantity += order.quantity
//! ```
//!
//! A second delivery is an error (`AlreadyDelivered`), never a silent no-op.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{NewPurchaseOrder, Product, PurchaseOrder, PurchaseOrderStatus};
use crate::validation::validate_new_purchase_order;

/// Builds a pending order for `product`, snapshotting its name.
///
/// `total_cost = quantity × buying_price`, computed once here.
pub fn new_purchase_order(
    id: String,
    input: &NewPurchaseOrder,
    product: &Product,
    order_date: NaiveDate,
    now: DateTime<Utc>,
) -> CoreResult<PurchaseOrder> {
    validate_new_purchase_order(input)?;
    if input.product_id.trim() != product.id {
        return Err(CoreError::not_found("Product", input.product_id.trim()));
    }

    let total_cost = Money::from_cents(input.buying_price_cents)
        .checked_multiply_quantity(input.quantity)
        .ok_or_else(|| CoreError::invalid_amount("totalCost", "order total is too large"))?;

    Ok(PurchaseOrder {
        id,
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        quantity: input.quantity,
        buying_price_cents: input.buying_price_cents,
        total_cost_cents: total_cost.cents(),
        status: PurchaseOrderStatus::Pending,
        order_date,
        delivery_date: None,
        created_at: now,
    })
}

impl PurchaseOrder {
    /// Fails with `AlreadyDelivered` unless the order is still pending.
    pub fn ensure_pending(&self) -> CoreResult<()> {
        if self.is_delivered() {
            return Err(CoreError::AlreadyDelivered {
                order_id: self.id.clone(),
            });
        }
        Ok(())
    }

    /// Flips the order to delivered and feeds its quantity into `product`.
    ///
    /// In-memory form of `PurchaseOrderRepository::mark_delivered`, which
    /// applies the same two steps with guarded UPDATEs in one transaction.
    pub fn mark_delivered(&mut self, product: &mut Product, today: NaiveDate) -> CoreResult<()> {
        self.ensure_pending()?;
        if product.id != self.product_id {
            return Err(CoreError::not_found("Product", self.product_id.clone()));
        }

        product.apply_delivery(self.quantity)?;
        self.status = PurchaseOrderStatus::Delivered;
        self.delivery_date = Some(today);
        Ok(())
    }
}
