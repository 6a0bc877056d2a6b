//! # Sale Ledger Planning
//!
//! The pure half of the sale engine: every rule that decides whether a sale
//! or a void may happen, and what rows it produces. The database layer loads
//! the catalog rows, calls in here, and writes whatever comes back inside a
//! single transaction.
//!
//! ## Create Flow
//! ```text
//! NewSale
//!   │ check_request              user, payment method id, ≥1 line
//!   │ ensure_payment_method_active
//!   │ check_lines                qty > 0, price ≥ 0, discount ≥ 0,
//!   │                            discount ≤ gross (explicit prices)
//!   │ ensure_product_active      per distinct product
//!   ▼
//! price_sale ──► SaleWithDetails (kind=normal, status=completed)
//!   │            discount ≤ gross (catalog prices)
//!   │            Σ qty per product ≤ stock
//!   ▼
//! quantities_by_product ──► one stock decrement per product
//! ```
//!
//! ## Void Flow
//! ```text
//! SaleWithDetails (completed, normal)
//!   │ ensure_voidable
//!   ▼
//! plan_void ──► VoidPlan
//!               ├── original   status=voided
//!               ├── void       kind=void, negated money, same quantities
//!               └── restock    Σ qty per product (once per product)
//! ```
//!
//! Ids and clocks are injected so that the same inputs always plan the same
//! rows.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{
    NewSale, NewSaleLine, PaymentMethod, Product, Sale, SaleDetail, SaleKind, SaleStatus,
    SaleWithDetails,
};

// =============================================================================
// Create: Request Checks
// =============================================================================

/// Checks the request envelope: acting user, payment method and lines.
pub fn check_request(request: &NewSale) -> CoreResult<()> {
    if request.user_id.trim().is_empty() {
        return Err(CoreError::InvalidInput("user_id is required".to_string()));
    }
    if request.payment_method_id.trim().is_empty() {
        return Err(CoreError::InvalidInput(
            "payment_method_id is required".to_string(),
        ));
    }
    if request.lines.is_empty() {
        return Err(CoreError::InvalidInput(
            "a sale needs at least one line".to_string(),
        ));
    }
    Ok(())
}

pub fn ensure_payment_method_active(method: &PaymentMethod) -> CoreResult<()> {
    if !method.is_active() {
        return Err(CoreError::PaymentMethodNotActive(method.id.clone()));
    }
    Ok(())
}

pub fn ensure_product_active(product: &Product) -> CoreResult<()> {
    if !product.is_active() {
        return Err(CoreError::ProductNotActive(product.id.clone()));
    }
    Ok(())
}

/// Checks every line without looking at the catalog.
///
/// Lines priced from the catalog get their discount-vs-gross check later,
/// in [`price_sale`], once the price is known.
pub fn check_lines(lines: &[NewSaleLine]) -> CoreResult<()> {
    for line in lines {
        if line.quantity <= 0 {
            return Err(CoreError::InvalidQuantity {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
            });
        }

        if let Some(price_cents) = line.unit_price_cents {
            if price_cents < 0 {
                return Err(CoreError::InvalidPrice {
                    product_id: line.product_id.clone(),
                    price_cents,
                });
            }
        }

        let discount = line.discount();
        if discount.is_negative() {
            return Err(CoreError::InvalidDiscount {
                product_id: line.product_id.clone(),
                discount_cents: discount.cents(),
            });
        }

        if let Some(price_cents) = line.unit_price_cents {
            let gross = line_gross(line, Money::from_cents(price_cents))?;
            ensure_discount_within_gross(line, gross)?;
        }
    }

    Ok(())
}

/// Distinct product ids in the order they first appear.
pub fn distinct_product_ids(lines: &[NewSaleLine]) -> Vec<&str> {
    let mut seen = HashSet::new();
    lines
        .iter()
        .map(|line| line.product_id.as_str())
        .filter(|id| seen.insert(*id))
        .collect()
}

// =============================================================================
// Create: Pricing
// =============================================================================

/// Prices a validated request against the loaded catalog rows.
///
/// `catalog` must hold every product the lines reference. The returned sale
/// is completed and normal; nothing has been persisted yet.
pub fn price_sale(
    request: &NewSale,
    catalog: &HashMap<String, Product>,
    mut next_id: impl FnMut() -> String,
    now: DateTime<Utc>,
) -> CoreResult<SaleWithDetails> {
    let sale_id = next_id();
    let mut details = Vec::with_capacity(request.lines.len());

    for (index, line) in request.lines.iter().enumerate() {
        let product = catalog
            .get(&line.product_id)
            .ok_or_else(|| CoreError::not_found("Product", &line.product_id))?;

        let unit_price = line
            .unit_price_cents
            .map(Money::from_cents)
            .unwrap_or_else(|| product.price());
        let gross = line_gross(line, unit_price)?;
        ensure_discount_within_gross(line, gross)?;
        let discount = line.discount();

        details.push(SaleDetail {
            id: next_id(),
            sale_id: sale_id.clone(),
            product_id: line.product_id.clone(),
            line_number: index as i64 + 1,
            unit_price_cents: unit_price.cents(),
            quantity: line.quantity,
            gross_cents: gross.cents(),
            discount_cents: discount.cents(),
            net_cents: (gross - discount).cents(),
            created_at: now,
        });
    }

    let requested = quantities_by_product(&details)?;
    for product_id in distinct_product_ids(&request.lines) {
        let (Some(product), Some(&quantity)) = (catalog.get(product_id), requested.get(product_id))
        else {
            continue;
        };
        if !product.has_stock(quantity) {
            return Err(CoreError::InsufficientStock {
                product_id: product.id.clone(),
                available: product.stock,
                requested: quantity,
            });
        }
    }

    let (total, total_discount) = totals(&details)?;
    let sale = Sale {
        id: sale_id,
        sale_date: request.sale_date.unwrap_or(now),
        total_cents: total.cents(),
        total_discount_cents: total_discount.cents(),
        user_id: request.user_id.trim().to_string(),
        kind: SaleKind::Normal,
        status: SaleStatus::Completed,
        payment_method_id: request.payment_method_id.trim().to_string(),
        voided_sale_id: None,
        created_at: now,
        updated_at: now,
    };

    Ok(SaleWithDetails { sale, details })
}

/// Sums quantities per product, in a stable (sorted) order.
///
/// Both the stock decrement of a sale and the restock of its void go through
/// this, so a product listed on several lines moves exactly once.
pub fn quantities_by_product(details: &[SaleDetail]) -> CoreResult<BTreeMap<String, i64>> {
    let mut quantities: BTreeMap<String, i64> = BTreeMap::new();
    for detail in details {
        let entry = quantities.entry(detail.product_id.clone()).or_insert(0);
        *entry = entry
            .checked_add(detail.quantity)
            .ok_or_else(|| CoreError::InvalidQuantity {
                product_id: detail.product_id.clone(),
                quantity: detail.quantity,
            })?;
    }
    Ok(quantities)
}

fn line_gross(line: &NewSaleLine, unit_price: Money) -> CoreResult<Money> {
    unit_price
        .checked_multiply_quantity(line.quantity)
        .ok_or_else(|| CoreError::InvalidQuantity {
            product_id: line.product_id.clone(),
            quantity: line.quantity,
        })
}

fn ensure_discount_within_gross(line: &NewSaleLine, gross: Money) -> CoreResult<()> {
    let discount = line.discount();
    if discount > gross {
        return Err(CoreError::DiscountExceedsTotal {
            product_id: line.product_id.clone(),
            discount_cents: discount.cents(),
            gross_cents: gross.cents(),
        });
    }
    Ok(())
}

fn totals(details: &[SaleDetail]) -> CoreResult<(Money, Money)> {
    let mut total: i64 = 0;
    let mut discount: i64 = 0;
    for detail in details {
        total = total
            .checked_add(detail.net_cents)
            .ok_or_else(|| CoreError::InvalidInput("sale total is out of range".to_string()))?;
        discount = discount
            .checked_add(detail.discount_cents)
            .ok_or_else(|| CoreError::InvalidInput("sale discount is out of range".to_string()))?;
    }
    Ok((Money::from_cents(total), Money::from_cents(discount)))
}

// =============================================================================
// Void
// =============================================================================

/// Everything a void writes.
#[derive(Debug, Clone)]
pub struct VoidPlan {
    /// The original header, flipped to `voided`.
    pub original: Sale,
    /// The compensating sale and its negated details.
    pub void: SaleWithDetails,
    /// Units to put back, per product.
    pub restock: BTreeMap<String, i64>,
}

pub fn check_void_request(sale_id: &str, user_id: &str) -> CoreResult<()> {
    if sale_id.trim().is_empty() {
        return Err(CoreError::InvalidInput("sale_id is required".to_string()));
    }
    if user_id.trim().is_empty() {
        return Err(CoreError::InvalidInput("user_id is required".to_string()));
    }
    Ok(())
}

/// Only completed normal sales can be voided.
pub fn ensure_voidable(sale: &Sale) -> CoreResult<()> {
    if sale.can_be_voided() {
        return Ok(());
    }

    let reason = if sale.is_void() {
        "void sales cannot be voided"
    } else if sale.status == SaleStatus::Voided {
        "already voided"
    } else {
        "sale is not completed"
    };
    Err(CoreError::SaleCannotBeVoided {
        sale_id: sale.id.clone(),
        reason: reason.to_string(),
    })
}

/// Plans the reversal of `original`, acting as `user_id`.
///
/// The void mirrors the stored details line by line: same product, unit
/// price and positive quantity, with gross, discount and net negated. Header
/// totals are the negation of the original header's.
pub fn plan_void(
    original: &SaleWithDetails,
    user_id: &str,
    mut next_id: impl FnMut() -> String,
    now: DateTime<Utc>,
) -> CoreResult<VoidPlan> {
    ensure_voidable(&original.sale)?;

    let void_id = next_id();
    let details = original
        .details
        .iter()
        .map(|detail| SaleDetail {
            id: next_id(),
            sale_id: void_id.clone(),
            product_id: detail.product_id.clone(),
            line_number: detail.line_number,
            unit_price_cents: detail.unit_price_cents,
            quantity: detail.quantity,
            gross_cents: (-detail.gross()).cents(),
            discount_cents: (-detail.discount()).cents(),
            net_cents: (-detail.net()).cents(),
            created_at: now,
        })
        .collect();

    let void = Sale {
        id: void_id,
        sale_date: now,
        total_cents: (-original.sale.total()).cents(),
        total_discount_cents: (-original.sale.total_discount()).cents(),
        user_id: user_id.trim().to_string(),
        kind: SaleKind::Void,
        status: SaleStatus::Completed,
        payment_method_id: original.sale.payment_method_id.clone(),
        voided_sale_id: Some(original.sale.id.clone()),
        created_at: now,
        updated_at: now,
    };

    let mut voided = original.sale.clone();
    voided.status = SaleStatus::Voided;
    voided.updated_at = now;

    Ok(VoidPlan {
        original: voided,
        void: SaleWithDetails { sale: void, details },
        restock: quantities_by_product(&original.details)?,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
