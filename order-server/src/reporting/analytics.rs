//! Sales analytics rollups
//!
//! Pure, side-effect-free folds over the order collection. Everything is
//! recomputed from scratch on each request; the data sets here are
//! small-business sized and the handlers fetch a bounded window.
//!
//! Only orders with status `FULL_DISPATCH` count as realized sales.

use std::collections::BTreeMap;

use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::OrderStatus;

use crate::db::models::Order;
use crate::utils::time::month_bucket;

use super::category::infer_category;

/// Rollup lists are capped at this many entries
const TOP_LIMIT: usize = 10;

/// Per-product sales totals
#[derive(Debug, Clone, Serialize)]
pub struct ProductSales {
    pub product: String,
    pub name: String,
    pub unit: String,
    pub quantity: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

/// Revenue per calendar month ("YYYY-MM", business timezone)
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub orders: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

/// Revenue per inferred category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRevenue {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

/// Product breakdown within one inferred category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryProducts {
    pub category: String,
    pub products: Vec<ProductSales>,
}

/// Orders and revenue per delivery location
#[derive(Debug, Clone, Serialize)]
pub struct LocationStats {
    pub location: String,
    pub orders: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

/// The full analytics rollup
#[derive(Debug, Clone, Serialize)]
pub struct SalesAnalytics {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub order_count: i64,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub top_products: Vec<ProductSales>,
    pub categories: Vec<CategoryRevenue>,
    pub products_by_category: Vec<CategoryProducts>,
    pub locations: Vec<LocationStats>,
}

/// Build the rollup from an order collection
///
/// Callers apply the date window at the query level; the realized-sales
/// status filter lives here so every consumer agrees on it.
pub fn build(orders: &[Order], tz: Tz) -> SalesAnalytics {
    let realized: Vec<&Order> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::FullDispatch)
        .collect();

    let total_revenue: Decimal = realized.iter().map(|o| o.total()).sum();

    // Monthly buckets: BTreeMap keeps "YYYY-MM" keys chronological
    let mut monthly: BTreeMap<String, (i64, Decimal)> = BTreeMap::new();
    for order in &realized {
        let bucket = monthly
            .entry(month_bucket(order.created_at, tz))
            .or_insert((0, Decimal::ZERO));
        bucket.0 += 1;
        bucket.1 += order.total();
    }
    let monthly_revenue = monthly
        .into_iter()
        .map(|(month, (orders, revenue))| MonthlyRevenue {
            month,
            orders,
            revenue,
        })
        .collect();

    // Per-product totals, keyed by product reference
    let mut per_product: BTreeMap<String, ProductSales> = BTreeMap::new();
    for order in &realized {
        for item in &order.items {
            let entry = per_product
                .entry(item.product.clone())
                .or_insert_with(|| ProductSales {
                    product: item.product.clone(),
                    name: item.product_name.clone(),
                    unit: item.unit.clone(),
                    quantity: 0,
                    revenue: Decimal::ZERO,
                });
            entry.quantity += item.quantity;
            entry.revenue += item.line_total();
        }
    }
    let product_sales: Vec<ProductSales> = per_product.into_values().collect();

    let top_products = merge_top_products(&product_sales);

    // Category rollups from the same per-product totals
    let mut by_category: BTreeMap<&'static str, Vec<ProductSales>> = BTreeMap::new();
    for sales in &product_sales {
        by_category
            .entry(infer_category(&sales.name))
            .or_default()
            .push(sales.clone());
    }
    let mut categories: Vec<CategoryRevenue> = by_category
        .iter()
        .map(|(category, products)| CategoryRevenue {
            category: category.to_string(),
            revenue: products.iter().map(|p| p.revenue).sum(),
        })
        .collect();
    categories.sort_by(|a, b| b.revenue.cmp(&a.revenue));

    let mut products_by_category: Vec<CategoryProducts> = by_category
        .into_iter()
        .map(|(category, mut products)| {
            products.sort_by(|a, b| b.revenue.cmp(&a.revenue));
            CategoryProducts {
                category: category.to_string(),
                products,
            }
        })
        .collect();
    products_by_category.sort_by(|a, b| {
        let ra: Decimal = a.products.iter().map(|p| p.revenue).sum();
        let rb: Decimal = b.products.iter().map(|p| p.revenue).sum();
        rb.cmp(&ra)
    });

    // Delivery locations, top 10 by order count
    let mut per_location: BTreeMap<String, (i64, Decimal)> = BTreeMap::new();
    for order in &realized {
        let location = if order.delivery_location.is_empty() {
            "Unknown".to_string()
        } else {
            order.delivery_location.clone()
        };
        let entry = per_location.entry(location).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += order.total();
    }
    let mut locations: Vec<LocationStats> = per_location
        .into_iter()
        .map(|(location, (orders, revenue))| LocationStats {
            location,
            orders,
            revenue,
        })
        .collect();
    locations.sort_by(|a, b| b.orders.cmp(&a.orders).then(b.revenue.cmp(&a.revenue)));
    locations.truncate(TOP_LIMIT);

    SalesAnalytics {
        total_revenue,
        order_count: realized.len() as i64,
        monthly_revenue,
        top_products,
        categories,
        products_by_category,
        locations,
    }
}

/// Merge the by-revenue and by-quantity top lists, revenue priority,
/// capped at [`TOP_LIMIT`]
fn merge_top_products(product_sales: &[ProductSales]) -> Vec<ProductSales> {
    let mut by_revenue: Vec<&ProductSales> = product_sales.iter().collect();
    by_revenue.sort_by(|a, b| b.revenue.cmp(&a.revenue));

    let mut by_quantity: Vec<&ProductSales> = product_sales.iter().collect();
    by_quantity.sort_by(|a, b| b.quantity.cmp(&a.quantity));

    let mut merged: Vec<ProductSales> = Vec::with_capacity(TOP_LIMIT);
    for sales in by_revenue
        .into_iter()
        .take(TOP_LIMIT)
        .chain(by_quantity.into_iter().take(TOP_LIMIT))
    {
        if merged.len() >= TOP_LIMIT {
            break;
        }
        if !merged.iter().any(|m| m.product == sales.product) {
            merged.push(sales.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::OrderItem;

    fn item(product: &str, name: &str, quantity: i64, price: i64) -> OrderItem {
        OrderItem {
            product: format!("product:{}", product),
            product_name: name.to_string(),
            unit: "pcs".to_string(),
            quantity,
            price: Decimal::from(price),
            dispatched_quantity: quantity,
        }
    }

    fn order(status: OrderStatus, location: &str, created_at: i64, items: Vec<OrderItem>) -> Order {
        Order {
            id: None,
            customer_name: "C".to_string(),
            customer_city: String::new(),
            customer_phone: String::new(),
            delivery_location: location.to_string(),
            status,
            items,
            dispatched_items: Vec::new(),
            delivered_by: Vec::new(),
            created_at,
            updated_at: created_at,
        }
    }

    // 2024-03-15 / 2024-04-02, both UTC noon
    const MARCH: i64 = 1_710_504_000_000;
    const APRIL: i64 = 1_712_059_200_000;

    #[test]
    fn test_only_full_dispatch_counts() {
        let orders = vec![
            order(OrderStatus::FullDispatch, "North", MARCH, vec![item("a", "Pot", 2, 10)]),
            order(OrderStatus::Confirmed, "North", MARCH, vec![item("a", "Pot", 5, 10)]),
            order(OrderStatus::Cancelled, "North", MARCH, vec![item("a", "Pot", 9, 10)]),
        ];
        let analytics = build(&orders, chrono_tz::UTC);
        assert_eq!(analytics.order_count, 1);
        assert_eq!(analytics.total_revenue, Decimal::from(20));
    }

    #[test]
    fn test_aggregation_consistency() {
        // Σ per-product revenue == Σ per-order revenue == total_revenue
        let orders = vec![
            order(
                OrderStatus::FullDispatch,
                "North",
                MARCH,
                vec![item("a", "Pot", 2, 10), item("b", "Plate", 3, 4)],
            ),
            order(OrderStatus::FullDispatch, "South", APRIL, vec![item("a", "Pot", 1, 10)]),
            order(OrderStatus::PartialDispatch, "South", APRIL, vec![item("b", "Plate", 7, 4)]),
        ];
        let analytics = build(&orders, chrono_tz::UTC);

        let per_order: Decimal = orders
            .iter()
            .filter(|o| o.status == OrderStatus::FullDispatch)
            .map(|o| o.total())
            .sum();
        let per_product: Decimal = analytics
            .products_by_category
            .iter()
            .flat_map(|c| &c.products)
            .map(|p| p.revenue)
            .sum();

        assert_eq!(analytics.total_revenue, per_order);
        assert_eq!(per_product, analytics.total_revenue);
        assert_eq!(analytics.total_revenue, Decimal::from(42));
    }

    #[test]
    fn test_monthly_buckets_are_chronological() {
        let orders = vec![
            order(OrderStatus::FullDispatch, "N", APRIL, vec![item("a", "Pot", 1, 5)]),
            order(OrderStatus::FullDispatch, "N", MARCH, vec![item("a", "Pot", 2, 5)]),
            order(OrderStatus::FullDispatch, "N", MARCH, vec![item("a", "Pot", 1, 5)]),
        ];
        let analytics = build(&orders, chrono_tz::UTC);
        assert_eq!(analytics.monthly_revenue.len(), 2);
        assert_eq!(analytics.monthly_revenue[0].month, "2024-03");
        assert_eq!(analytics.monthly_revenue[0].orders, 2);
        assert_eq!(analytics.monthly_revenue[0].revenue, Decimal::from(15));
        assert_eq!(analytics.monthly_revenue[1].month, "2024-04");
    }

    #[test]
    fn test_top_products_merge_prefers_revenue() {
        // 12 products: p0 has the highest revenue but lowest quantity,
        // the rest ramp the other way. Cap stays at 10 with revenue first.
        let mut items = Vec::new();
        items.push(item("hi-rev", "Premium Pot", 1, 1000));
        for i in 0..11 {
            items.push(item(&format!("q{}", i), &format!("Bulk Plate {}", i), 50 + i, 1));
        }
        let orders = vec![order(OrderStatus::FullDispatch, "N", MARCH, items)];
        let analytics = build(&orders, chrono_tz::UTC);

        assert_eq!(analytics.top_products.len(), 10);
        assert_eq!(analytics.top_products[0].name, "Premium Pot");
    }

    #[test]
    fn test_locations_ranked_by_order_count() {
        let mut orders = Vec::new();
        for _ in 0..3 {
            orders.push(order(OrderStatus::FullDispatch, "North", MARCH, vec![item("a", "Pot", 1, 1)]));
        }
        orders.push(order(OrderStatus::FullDispatch, "South", MARCH, vec![item("a", "Pot", 99, 1)]));
        orders.push(order(OrderStatus::FullDispatch, "", MARCH, vec![item("a", "Pot", 1, 1)]));

        let analytics = build(&orders, chrono_tz::UTC);
        assert_eq!(analytics.locations[0].location, "North");
        assert_eq!(analytics.locations[0].orders, 3);
        // Empty location folds into "Unknown"
        assert!(analytics.locations.iter().any(|l| l.location == "Unknown"));
    }

    #[test]
    fn test_categories_from_name_heuristic() {
        let orders = vec![order(
            OrderStatus::FullDispatch,
            "N",
            MARCH,
            vec![
                item("a", "Copper Pot", 1, 30),
                item("b", "Steel Pan", 1, 20),
                item("c", "Dinner Plate", 1, 10),
            ],
        )];
        let analytics = build(&orders, chrono_tz::UTC);
        assert_eq!(analytics.categories[0].category, "Cookware");
        assert_eq!(analytics.categories[0].revenue, Decimal::from(50));
        assert_eq!(analytics.categories[1].category, "Tableware");
    }

    #[test]
    fn test_empty_input() {
        let analytics = build(&[], chrono_tz::UTC);
        assert_eq!(analytics.total_revenue, Decimal::ZERO);
        assert!(analytics.monthly_revenue.is_empty());
        assert!(analytics.top_products.is_empty());
        assert!(analytics.locations.is_empty());
    }
}
