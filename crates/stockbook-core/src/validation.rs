//! # Validation Module
//!
//! Input validation for Stockbook.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum Json)                                   │
//! │  └── Shape and type checks (deserialization)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Names present and bounded                                         │
//! │  ├── Quantities ≥ 1, prices ≥ 0, dues > 0                              │
//! │  └── Ids well-formed                                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ledger rules (stock availability, amount consistency)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every validator runs before any state is touched, so a rejected request
//! never leaves partial writes behind.
//!
//! ## Usage
//! ```rust
//! use stockbook_core::validation::{validate_name, validate_quantity};
//!
//! validate_name("sellerName", "Acme").unwrap();
//! validate_quantity("quantity", 30).unwrap();
//! assert!(validate_quantity("quantity", 0).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{NewDue, NewProduct, NewPurchaseOrder, NewSale, ProductUpdate};
use crate::{MAX_NAME_LEN, MAX_PRICE_CENTS, MAX_QUANTITY, MAX_SALE_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (product, seller, shop).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
///
/// ## Returns
/// The trimmed name.
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_name;
///
/// assert_eq!(validate_name("name", "  Widget ").unwrap(), "Widget");
/// assert!(validate_name("name", "   ").is_err());
/// ```
pub fn validate_name(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(value.to_string())
}

/// Validates a seller search query. Empty is allowed and matches everyone.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "q".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an ordered or sold quantity (`1..=MAX_QUANTITY`).
pub fn validate_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    if qty > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a stock count (zero allowed, at most `MAX_QUANTITY`).
pub fn validate_stock(field: &str, qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    if qty > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (giveaways)
/// - At most `MAX_PRICE_CENTS`
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("sellingPrice", 500).is_ok());
/// assert!(validate_price_cents("sellingPrice", 0).is_ok());
/// assert!(validate_price_cents("sellingPrice", -1).is_err());
/// assert!(validate_price_cents("sellingPrice", i64::MAX).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    validate_amount_cents(field, cents)?;
    if cents > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a caller-supplied total in cents. Only the sign is checked;
/// totals are compared against the computed sale amount.
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string.
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_uuid;
///
/// assert!(validate_uuid("productId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("productId", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Input Validators
// =============================================================================
// Each returns a normalized copy of its input (names trimmed).

/// Validates a product creation request.
pub fn validate_new_product(input: &NewProduct) -> ValidationResult<NewProduct> {
    let name = validate_name("name", &input.name)?;
    validate_stock("initialStock", input.initial_stock)?;
    validate_price_cents("buyingPriceCents", input.buying_price_cents)?;
    validate_price_cents("sellingPriceCents", input.selling_price_cents)?;

    Ok(NewProduct {
        name,
        ..input.clone()
    })
}

/// Validates a product edit request.
pub fn validate_product_update(input: &ProductUpdate) -> ValidationResult<ProductUpdate> {
    let name = validate_name("name", &input.name)?;
    validate_price_cents("buyingPriceCents", input.buying_price_cents)?;
    validate_price_cents("sellingPriceCents", input.selling_price_cents)?;

    Ok(ProductUpdate {
        name,
        ..input.clone()
    })
}

/// Validates a purchase order request.
pub fn validate_new_purchase_order(input: &NewPurchaseOrder) -> ValidationResult<()> {
    validate_uuid("productId", &input.product_id)?;
    validate_quantity("quantity", input.quantity)?;
    validate_price_cents("buyingPriceCents", input.buying_price_cents)?;

    Ok(())
}

/// Validates the shape of a sale request.
///
/// Stock availability and amount consistency are ledger rules and are
/// checked later in [`crate::sale::price_sale`].
pub fn validate_new_sale(input: &NewSale) -> ValidationResult<NewSale> {
    let seller_name = validate_name("sellerName", &input.seller_name)?;

    if input.items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }
    if input.items.len() > MAX_SALE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_SALE_LINES as i64,
        });
    }

    for (index, line) in input.items.iter().enumerate() {
        validate_uuid(&format!("items[{index}].productId"), &line.product_id)?;
        validate_quantity(&format!("items[{index}].quantity"), line.quantity)?;
        validate_price_cents(
            &format!("items[{index}].sellingPriceCents"),
            line.selling_price_cents,
        )?;
    }

    validate_amount_cents("totalDueAmountCents", input.total_due_amount_cents)?;
    if let Some(total) = input.total_sales_amount_cents {
        validate_amount_cents("totalSalesAmountCents", total)?;
    }

    Ok(NewSale {
        seller_name,
        ..input.clone()
    })
}

/// Validates a due entry request (names only; the amount rule lives in
/// [`crate::due::new_due_entry`]).
pub fn validate_new_due(input: &NewDue) -> ValidationResult<NewDue> {
    let seller_name = validate_name("sellerName", &input.seller_name)?;
    let shop_name = validate_name("shopName", &input.shop_name)?;

    Ok(NewDue {
        seller_name,
        shop_name,
        ..input.clone()
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NewSaleLine;
    use chrono::NaiveDate;

    const PRODUCT_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn sale_with(items: Vec<NewSaleLine>) -> NewSale {
        NewSale {
            seller_name: " Acme ".to_string(),
            items,
            total_due_amount_cents: 0,
            total_sales_amount_cents: None,
            date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        }
    }

    fn line(quantity: i64) -> NewSaleLine {
        NewSaleLine {
            product_id: PRODUCT_ID.to_string(),
            quantity,
            selling_price_cents: 500,
        }
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", "Widget").unwrap(), "Widget");
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", &"A".repeat(MAX_NAME_LEN)).is_ok());

        let err = validate_name("shopName", &"A".repeat(MAX_NAME_LEN + 1)).unwrap_err();
        assert_eq!(err.field(), "shopName");
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity("quantity", 1).is_ok());
        assert!(validate_quantity("quantity", 0).is_err());
        assert!(validate_quantity("quantity", -3).is_err());
        assert!(validate_quantity("quantity", MAX_QUANTITY).is_ok());
        assert_eq!(
            validate_quantity("quantity", i64::MAX),
            Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: MAX_QUANTITY,
            })
        );
    }

    #[test]
    fn test_validate_stock_allows_zero() {
        assert!(validate_stock("initialStock", 0).is_ok());
        assert!(validate_stock("initialStock", -1).is_err());
        assert!(validate_stock("initialStock", MAX_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_price_upper_bound() {
        assert!(validate_price_cents("buyingPriceCents", MAX_PRICE_CENTS).is_ok());
        let err = validate_price_cents("buyingPriceCents", MAX_PRICE_CENTS + 1).unwrap_err();
        assert_eq!(err.field(), "buyingPriceCents");
        assert!(validate_amount_cents("totalDueAmountCents", i64::MAX).is_ok());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("id", PRODUCT_ID).is_ok());
        assert!(validate_uuid("id", "").is_err());
        assert!(validate_uuid("id", "123").is_err());
    }

    #[test]
    fn test_validate_new_product_trims_name() {
        let input = NewProduct {
            name: "  Widget  ".to_string(),
            initial_stock: 100,
            buying_price_cents: 200,
            selling_price_cents: 500,
        };
        assert_eq!(validate_new_product(&input).unwrap().name, "Widget");

        let bad = NewProduct {
            buying_price_cents: -1,
            ..input
        };
        let err = validate_new_product(&bad).unwrap_err();
        assert_eq!(err.field(), "buyingPriceCents");
    }

    #[test]
    fn test_validate_new_sale() {
        let sale = validate_new_sale(&sale_with(vec![line(30)])).unwrap();
        assert_eq!(sale.seller_name, "Acme");

        let err = validate_new_sale(&sale_with(vec![])).unwrap_err();
        assert_eq!(err.field(), "items");

        let err = validate_new_sale(&sale_with(vec![line(30), line(0)])).unwrap_err();
        assert_eq!(err.field(), "items[1].quantity");

        let too_many = (0..=MAX_SALE_LINES).map(|_| line(1)).collect();
        assert!(validate_new_sale(&sale_with(too_many)).is_err());
    }

    #[test]
    fn test_validate_new_sale_rejects_negative_due() {
        let mut sale = sale_with(vec![line(1)]);
        sale.total_due_amount_cents = -1;
        let err = validate_new_sale(&sale).unwrap_err();
        assert_eq!(err.field(), "totalDueAmountCents");
    }

    #[test]
    fn test_validate_new_due() {
        let due = NewDue {
            seller_name: "Acme".to_string(),
            shop_name: "".to_string(),
            due_amount_cents: 2500,
            date_added: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        };
        assert_eq!(validate_new_due(&due).unwrap_err().field(), "shopName");
    }
}
