//! # Due Ledger
//!
//! Outstanding shop credit per seller. Entries are created when a seller
//! reports an unpaid debt and deleted outright when settled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{DueEntry, NewDue};
use crate::validation::validate_new_due;

/// Builds a due entry. The amount must be strictly positive.
pub fn new_due_entry(id: String, input: &NewDue, now: DateTime<Utc>) -> CoreResult<DueEntry> {
    let input = validate_new_due(input)?;

    if input.due_amount_cents <= 0 {
        return Err(CoreError::invalid_amount(
            "dueAmount",
            "must be greater than zero",
        ));
    }

    Ok(DueEntry {
        id,
        seller_name: input.seller_name,
        shop_name: input.shop_name,
        due_amount_cents: input.due_amount_cents,
        date_added: input.date_added,
        created_at: now,
    })
}

/// Σ due amount over the entries belonging to `seller_name`.
pub fn total_due_for_seller(entries: &[DueEntry], seller_name: &str) -> Money {
    entries
        .iter()
        .filter(|e| e.seller_name == seller_name)
        .map(DueEntry::due_amount)
        .sum()
}

/// Orders entries most recent first (date added, then creation time).
pub fn sort_newest_first(entries: &mut [DueEntry]) {
    entries.sort_by(|a, b| {
        b.date_added
            .cmp(&a.date_added)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// A seller's outstanding dues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SellerDues {
    pub seller_name: String,
    pub total_due_cents: i64,
    pub due_entries: Vec<DueEntry>,
}

impl SellerDues {
    /// Collects `seller_name`'s entries; empty when there are none.
    pub fn collect(seller_name: &str, entries: impl IntoIterator<Item = DueEntry>) -> Self {
        let mut due_entries: Vec<DueEntry> = entries
            .into_iter()
            .filter(|e| e.seller_name == seller_name)
            .collect();
        sort_newest_first(&mut due_entries);

        SellerDues {
            seller_name: seller_name.to_string(),
            total_due_cents: total_due_for_seller(&due_entries, seller_name).cents(),
            due_entries,
        }
    }
}
