//! Dispatch planning (pure functions)
//!
//! Planning is separated from application: these functions look at an
//! order's items, the affected products, and a dispatch request, and
//! compute the exact writes the engine must apply. No I/O here, which is
//! what makes the branchy reversal / partial-dispatch logic testable
//! without a store.

use std::collections::HashMap;

use crate::db::models::{OrderItem, Product};
use shared::DispatchLine;

use super::error::{DispatchError, DispatchResult, StockShortage};

/// A stock change the engine must apply to one product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockChange {
    /// Product reference ("product:<id>")
    pub product: String,
    pub previous: i64,
    pub new_stock: i64,
    /// Signed delta (negative for a confirm debit)
    pub change: i64,
}

/// A dispatch amount allocated to one order item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Index into the order's `items`
    pub item_index: usize,
    pub product: String,
    pub quantity: i64,
}

/// Index products by their "product:<id>" reference
fn index_products(products: &[Product]) -> HashMap<String, &Product> {
    products
        .iter()
        .filter_map(|p| p.id.as_ref().map(|id| (id.to_string(), p)))
        .collect()
}

/// Plan the stock debits for confirming an order
///
/// Every item is checked against current stock; if any fails, the whole
/// confirm is rejected with the complete shortage list and no debit is
/// planned (no partial effect).
pub fn plan_confirm(items: &[OrderItem], products: &[Product]) -> DispatchResult<Vec<StockChange>> {
    let by_id = index_products(products);

    let mut debits = Vec::with_capacity(items.len());
    let mut shortages = Vec::new();

    for item in items {
        let product = by_id
            .get(&item.product)
            .ok_or_else(|| DispatchError::ProductNotFound(item.product.clone()))?;

        if item.quantity > product.stock {
            shortages.push(StockShortage {
                product: item.product.clone(),
                product_name: item.product_name.clone(),
                requested: item.quantity,
                available: product.stock,
            });
            continue;
        }

        debits.push(StockChange {
            product: item.product.clone(),
            previous: product.stock,
            new_stock: product.stock - item.quantity,
            change: -item.quantity,
        });
    }

    if !shortages.is_empty() {
        return Err(DispatchError::InsufficientStock(shortages));
    }

    Ok(debits)
}

/// Drop zero-quantity lines and merge duplicates per product
///
/// Zero lines are silently discarded (not an error); negative quantities
/// are rejected. Several lines for the same product in one request
/// accumulate before validation.
pub fn normalize_lines(lines: Vec<DispatchLine>) -> DispatchResult<Vec<DispatchLine>> {
    let mut merged: Vec<DispatchLine> = Vec::new();

    for line in lines {
        if line.quantity == 0 {
            continue;
        }
        if line.quantity < 0 {
            return Err(DispatchError::InvalidQuantity {
                product: line.product,
                quantity: line.quantity,
            });
        }
        match merged.iter_mut().find(|l| l.product == line.product) {
            Some(existing) => existing.quantity += line.quantity,
            None => merged.push(line),
        }
    }

    Ok(merged)
}

/// Plan a partial dispatch: validate every line against the remaining
/// undispatched amount and allocate it to its order item
///
/// Lines must already be normalized. Violating lines reject the whole
/// request, naming the product and the maximum allowed.
pub fn plan_dispatch(items: &[OrderItem], lines: &[DispatchLine]) -> DispatchResult<Vec<Allocation>> {
    let mut allocations = Vec::with_capacity(lines.len());

    for line in lines {
        let (index, item) = items
            .iter()
            .enumerate()
            .find(|(_, i)| i.product == line.product)
            .ok_or_else(|| DispatchError::UnknownLine(line.product.clone()))?;

        let remaining = item.outstanding();
        if line.quantity > remaining {
            return Err(DispatchError::OverDispatch {
                product_name: item.product_name.clone(),
                requested: line.quantity,
                available: remaining,
            });
        }

        allocations.push(Allocation {
            item_index: index,
            product: line.product.clone(),
            quantity: line.quantity,
        });
    }

    Ok(allocations)
}

/// Plan a full dispatch: everything outstanding, skipping items that are
/// already fully dispatched
pub fn plan_full_dispatch(items: &[OrderItem]) -> Vec<Allocation> {
    items
        .iter()
        .enumerate()
        .filter(|(_, i)| i.outstanding() > 0)
        .map(|(index, item)| Allocation {
            item_index: index,
            product: item.product.clone(),
            quantity: item.outstanding(),
        })
        .collect()
}

/// Plan the stock credits for reversing an order's dispatches
///
/// Every item with dispatch progress gets its dispatched amount credited
/// back to the product.
pub fn plan_reversal(items: &[OrderItem], products: &[Product]) -> DispatchResult<Vec<StockChange>> {
    let by_id = index_products(products);

    let mut credits = Vec::new();
    for item in items {
        if item.dispatched_quantity == 0 {
            continue;
        }
        let product = by_id
            .get(&item.product)
            .ok_or_else(|| DispatchError::ProductNotFound(item.product.clone()))?;

        credits.push(StockChange {
            product: item.product.clone(),
            previous: product.stock,
            new_stock: product.stock + item.dispatched_quantity,
            change: item.dispatched_quantity,
        });
    }

    Ok(credits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(id: &str, name: &str, stock: i64) -> Product {
        let mut p = Product::new(
            name.to_string(),
            "pcs".to_string(),
            Decimal::new(100, 1),
            stock,
            0,
        );
        p.id = Some(format!("product:{}", id).parse().unwrap());
        p
    }

    fn item(id: &str, name: &str, quantity: i64, dispatched: i64) -> OrderItem {
        OrderItem {
            product: format!("product:{}", id),
            product_name: name.to_string(),
            unit: "pcs".to_string(),
            quantity,
            price: Decimal::new(100, 1),
            dispatched_quantity: dispatched,
        }
    }

    fn line(id: &str, quantity: i64) -> DispatchLine {
        DispatchLine {
            product: format!("product:{}", id),
            quantity,
        }
    }

    #[test]
    fn test_plan_confirm_debits_every_item() {
        let items = vec![item("a", "Widget", 4, 0), item("b", "Gadget", 2, 0)];
        let products = vec![product("a", "Widget", 10), product("b", "Gadget", 2)];

        let debits = plan_confirm(&items, &products).unwrap();
        assert_eq!(debits.len(), 2);
        assert_eq!(debits[0].new_stock, 6);
        assert_eq!(debits[0].change, -4);
        assert_eq!(debits[1].new_stock, 0);
    }

    #[test]
    fn test_plan_confirm_names_every_failing_product() {
        let items = vec![
            item("a", "Widget", 4, 0),
            item("b", "Gadget", 5, 0),
            item("c", "Sprocket", 9, 0),
        ];
        let products = vec![
            product("a", "Widget", 10),
            product("b", "Gadget", 2),
            product("c", "Sprocket", 1),
        ];

        let err = plan_confirm(&items, &products).unwrap_err();
        match err {
            DispatchError::InsufficientStock(shortages) => {
                assert_eq!(shortages.len(), 2);
                assert_eq!(shortages[0].product_name, "Gadget");
                assert_eq!(shortages[0].available, 2);
                assert_eq!(shortages[1].product_name, "Sprocket");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_plan_confirm_missing_product_is_an_error() {
        let items = vec![item("a", "Widget", 1, 0)];
        let err = plan_confirm(&items, &[]).unwrap_err();
        assert!(matches!(err, DispatchError::ProductNotFound(_)));
    }

    #[test]
    fn test_normalize_drops_zero_lines() {
        let lines = vec![line("a", 0), line("b", 3), line("c", 0)];
        let normalized = normalize_lines(lines).unwrap();
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].quantity, 3);
    }

    #[test]
    fn test_normalize_merges_duplicate_products() {
        let lines = vec![line("a", 2), line("a", 3)];
        let normalized = normalize_lines(lines).unwrap();
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].quantity, 5);
    }

    #[test]
    fn test_normalize_rejects_negative() {
        let err = normalize_lines(vec![line("a", -1)]).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidQuantity { .. }));
    }

    #[test]
    fn test_plan_dispatch_respects_remaining() {
        let items = vec![item("a", "Widget", 10, 4)];

        let allocations = plan_dispatch(&items, &[line("a", 6)]).unwrap();
        assert_eq!(allocations[0].quantity, 6);

        let err = plan_dispatch(&items, &[line("a", 7)]).unwrap_err();
        match err {
            DispatchError::OverDispatch {
                product_name,
                requested,
                available,
            } => {
                assert_eq!(product_name, "Widget");
                assert_eq!(requested, 7);
                assert_eq!(available, 6);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_plan_dispatch_rejects_unknown_product() {
        let items = vec![item("a", "Widget", 10, 0)];
        let err = plan_dispatch(&items, &[line("x", 1)]).unwrap_err();
        assert!(matches!(err, DispatchError::UnknownLine(_)));
    }

    #[test]
    fn test_plan_full_dispatch_skips_completed_items() {
        let items = vec![item("a", "Widget", 10, 10), item("b", "Gadget", 5, 2)];
        let allocations = plan_full_dispatch(&items);
        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].product, "product:b");
        assert_eq!(allocations[0].quantity, 3);
    }

    #[test]
    fn test_plan_reversal_credits_dispatched_amounts() {
        let items = vec![item("a", "Widget", 10, 10), item("b", "Gadget", 5, 0)];
        let products = vec![product("a", "Widget", 0), product("b", "Gadget", 5)];

        let credits = plan_reversal(&items, &products).unwrap();
        assert_eq!(credits.len(), 1);
        assert_eq!(credits[0].product, "product:a");
        assert_eq!(credits[0].previous, 0);
        assert_eq!(credits[0].new_stock, 10);
        assert_eq!(credits[0].change, 10);
    }
}
