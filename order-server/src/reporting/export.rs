//! Analytics workbook export
//!
//! Writes the rollup as a five-sheet workbook, one CSV file per sheet.
//! Sheet names are a fixed contract consumed by the office tooling
//! downstream; do not rename them.

use std::path::{Path, PathBuf};

use crate::utils::{AppError, AppResult};

use super::analytics::SalesAnalytics;

pub const SHEET_MONTHLY: &str = "Monthly Revenue";
pub const SHEET_TOP_PRODUCTS: &str = "Top Products";
pub const SHEET_CATEGORIES: &str = "Categories";
pub const SHEET_PRODUCTS_BY_CATEGORY: &str = "Products by Category";
pub const SHEET_LOCATIONS: &str = "Locations";

fn sheet_writer(dir: &Path, sheet: &str) -> AppResult<(PathBuf, csv::Writer<std::fs::File>)> {
    let path = dir.join(format!("{}.csv", sheet));
    let writer = csv::Writer::from_path(&path)
        .map_err(|e| AppError::internal(format!("Failed to create {}: {}", path.display(), e)))?;
    Ok((path, writer))
}

fn write_error(sheet: &str, e: csv::Error) -> AppError {
    AppError::internal(format!("Failed to write sheet {}: {}", sheet, e))
}

/// Write the workbook under `dir`, returning the created file paths in
/// sheet order
pub fn export_workbook(analytics: &SalesAnalytics, dir: &Path) -> AppResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AppError::internal(format!("Failed to create export dir: {}", e)))?;

    let mut paths = Vec::with_capacity(5);

    // Monthly Revenue
    let (path, mut w) = sheet_writer(dir, SHEET_MONTHLY)?;
    w.write_record(["Month", "Orders", "Revenue"])
        .map_err(|e| write_error(SHEET_MONTHLY, e))?;
    for row in &analytics.monthly_revenue {
        w.write_record([
            row.month.clone(),
            row.orders.to_string(),
            row.revenue.to_string(),
        ])
        .map_err(|e| write_error(SHEET_MONTHLY, e))?;
    }
    w.flush()
        .map_err(|e| AppError::internal(format!("Failed to flush {}: {}", SHEET_MONTHLY, e)))?;
    paths.push(path);

    // Top Products
    let (path, mut w) = sheet_writer(dir, SHEET_TOP_PRODUCTS)?;
    w.write_record(["Product", "Unit", "Quantity", "Revenue"])
        .map_err(|e| write_error(SHEET_TOP_PRODUCTS, e))?;
    for row in &analytics.top_products {
        w.write_record([
            row.name.clone(),
            row.unit.clone(),
            row.quantity.to_string(),
            row.revenue.to_string(),
        ])
        .map_err(|e| write_error(SHEET_TOP_PRODUCTS, e))?;
    }
    w.flush()
        .map_err(|e| AppError::internal(format!("Failed to flush {}: {}", SHEET_TOP_PRODUCTS, e)))?;
    paths.push(path);

    // Categories
    let (path, mut w) = sheet_writer(dir, SHEET_CATEGORIES)?;
    w.write_record(["Category", "Revenue"])
        .map_err(|e| write_error(SHEET_CATEGORIES, e))?;
    for row in &analytics.categories {
        w.write_record([row.category.clone(), row.revenue.to_string()])
            .map_err(|e| write_error(SHEET_CATEGORIES, e))?;
    }
    w.flush()
        .map_err(|e| AppError::internal(format!("Failed to flush {}: {}", SHEET_CATEGORIES, e)))?;
    paths.push(path);

    // Products by Category
    let (path, mut w) = sheet_writer(dir, SHEET_PRODUCTS_BY_CATEGORY)?;
    w.write_record(["Category", "Product", "Quantity", "Revenue"])
        .map_err(|e| write_error(SHEET_PRODUCTS_BY_CATEGORY, e))?;
    for group in &analytics.products_by_category {
        for product in &group.products {
            w.write_record([
                group.category.clone(),
                product.name.clone(),
                product.quantity.to_string(),
                product.revenue.to_string(),
            ])
            .map_err(|e| write_error(SHEET_PRODUCTS_BY_CATEGORY, e))?;
        }
    }
    w.flush().map_err(|e| {
        AppError::internal(format!("Failed to flush {}: {}", SHEET_PRODUCTS_BY_CATEGORY, e))
    })?;
    paths.push(path);

    // Locations
    let (path, mut w) = sheet_writer(dir, SHEET_LOCATIONS)?;
    w.write_record(["Location", "Orders", "Revenue"])
        .map_err(|e| write_error(SHEET_LOCATIONS, e))?;
    for row in &analytics.locations {
        w.write_record([
            row.location.clone(),
            row.orders.to_string(),
            row.revenue.to_string(),
        ])
        .map_err(|e| write_error(SHEET_LOCATIONS, e))?;
    }
    w.flush()
        .map_err(|e| AppError::internal(format!("Failed to flush {}: {}", SHEET_LOCATIONS, e)))?;
    paths.push(path);

    tracing::info!(dir = %dir.display(), sheets = paths.len(), "Workbook exported");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Order, OrderItem};
    use crate::reporting::analytics;
    use rust_decimal::Decimal;
    use shared::OrderStatus;

    fn sample_analytics() -> SalesAnalytics {
        let orders = vec![Order {
            id: None,
            customer_name: "C".to_string(),
            customer_city: String::new(),
            customer_phone: String::new(),
            delivery_location: "North".to_string(),
            status: OrderStatus::FullDispatch,
            items: vec![OrderItem {
                product: "product:a".to_string(),
                product_name: "Copper Pot".to_string(),
                unit: "pcs".to_string(),
                quantity: 2,
                price: Decimal::from(10),
                dispatched_quantity: 2,
            }],
            dispatched_items: Vec::new(),
            delivered_by: Vec::new(),
            created_at: 1_710_504_000_000,
            updated_at: 1_710_504_000_000,
        }];
        analytics::build(&orders, chrono_tz::UTC)
    }

    #[test]
    fn test_export_writes_all_five_sheets() {
        let dir = tempfile::tempdir().unwrap();
        let paths = export_workbook(&sample_analytics(), dir.path()).unwrap();

        assert_eq!(paths.len(), 5);
        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "Monthly Revenue.csv",
                "Top Products.csv",
                "Categories.csv",
                "Products by Category.csv",
                "Locations.csv",
            ]
        );
        for path in &paths {
            assert!(path.exists());
        }
    }

    #[test]
    fn test_sheet_contents_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let paths = export_workbook(&sample_analytics(), dir.path()).unwrap();

        let mut reader = csv::Reader::from_path(&paths[0]).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers, csv::StringRecord::from(vec!["Month", "Orders", "Revenue"]));

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "2024-03");
        assert_eq!(&rows[0][2], "20");
    }
}
