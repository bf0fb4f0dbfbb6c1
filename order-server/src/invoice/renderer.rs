//! Invoice renderer
//!
//! Renders an order into a fixed-width plain-text invoice with fixed
//! field positions. The layout is a contract: office tooling downstream
//! parses these documents by column.

use chrono::TimeZone;
use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::db::models::Order;

/// Invoice document width in characters (A4, monospace, portrait)
const INVOICE_WIDTH: usize = 72;

/// Item table column widths: name / qty / unit / price / total
const COL_NAME: usize = 30;
const COL_QTY: usize = 6;
const COL_UNIT: usize = 8;
const COL_PRICE: usize = 12;
const COL_TOTAL: usize = 14;

/// Fixed-layout invoice renderer
pub struct InvoiceRenderer {
    width: usize,
    timezone: Tz,
}

impl InvoiceRenderer {
    pub fn new(timezone: Tz) -> Self {
        Self {
            width: INVOICE_WIDTH,
            timezone,
        }
    }

    /// Render an order into the invoice document
    pub fn render(&self, order: &Order) -> String {
        let mut out = String::new();

        self.render_header(&mut out, order);
        self.render_customer(&mut out, order);
        self.render_items(&mut out, order);
        self.render_footer(&mut out, order);

        out
    }

    fn render_header(&self, out: &mut String, order: &Order) {
        out.push_str(&self.center("INVOICE"));
        out.push('\n');
        out.push_str(&self.sep_double());
        out.push('\n');
        out.push_str(&format!("Order No : {}\n", order.id_string()));
        out.push_str(&format!(
            "Date     : {}\n",
            self.format_timestamp(order.created_at)
        ));
        out.push_str(&format!("Status   : {}\n", order.status.label()));
        out.push_str(&self.sep());
        out.push('\n');
    }

    fn render_customer(&self, out: &mut String, order: &Order) {
        out.push_str(&format!("Customer : {}\n", order.customer_name));
        if !order.customer_city.is_empty() {
            out.push_str(&format!("City     : {}\n", order.customer_city));
        }
        if !order.customer_phone.is_empty() {
            out.push_str(&format!("Phone    : {}\n", order.customer_phone));
        }
        if !order.delivery_location.is_empty() {
            out.push_str(&format!("Delivery : {}\n", order.delivery_location));
        }
        out.push_str(&self.sep());
        out.push('\n');
    }

    fn render_items(&self, out: &mut String, order: &Order) {
        out.push_str(&format!(
            "{:<name$} {:>qty$} {:<unit$} {:>price$} {:>total$}\n",
            "Item",
            "Qty",
            "Unit",
            "Price",
            "Total",
            name = COL_NAME,
            qty = COL_QTY,
            unit = COL_UNIT,
            price = COL_PRICE,
            total = COL_TOTAL,
        ));
        out.push_str(&self.sep());
        out.push('\n');

        for item in &order.items {
            // Names longer than the column are cut, the columns never move
            let name: String = item.product_name.chars().take(COL_NAME).collect();
            out.push_str(&format!(
                "{:<name_w$} {:>qty$} {:<unit$} {:>price$} {:>total$}\n",
                name,
                item.quantity,
                item.unit,
                format_money(item.price),
                format_money(item.line_total()),
                name_w = COL_NAME,
                qty = COL_QTY,
                unit = COL_UNIT,
                price = COL_PRICE,
                total = COL_TOTAL,
            ));
        }

        out.push_str(&self.sep());
        out.push('\n');
        let total_label_width = self.width - COL_TOTAL - 1;
        out.push_str(&format!(
            "{:>label$} {:>total$}\n",
            "TOTAL",
            format_money(order.total()),
            label = total_label_width,
            total = COL_TOTAL,
        ));
    }

    fn render_footer(&self, out: &mut String, order: &Order) {
        if !order.delivered_by.is_empty() {
            out.push_str(&self.sep());
            out.push('\n');
            out.push_str(&format!("Delivered by : {}\n", order.delivered_by.join(", ")));
        }
        out.push_str(&self.sep_double());
        out.push('\n');
        out.push_str(&self.center("Thank you for your business"));
        out.push('\n');
    }

    fn format_timestamp(&self, millis: i64) -> String {
        self.timezone
            .timestamp_millis_opt(millis)
            .earliest()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    fn center(&self, text: &str) -> String {
        if text.len() >= self.width {
            return text.to_string();
        }
        let pad = (self.width - text.len()) / 2;
        format!("{}{}", " ".repeat(pad), text)
    }

    fn sep(&self) -> String {
        "-".repeat(self.width)
    }

    fn sep_double(&self) -> String {
        "=".repeat(self.width)
    }
}

fn format_money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::OrderItem;
    use shared::OrderStatus;

    fn sample_order() -> Order {
        Order {
            id: Some("order:inv1".parse().unwrap()),
            customer_name: "Jordan Blake".to_string(),
            customer_city: "Springfield".to_string(),
            customer_phone: "555-0100".to_string(),
            delivery_location: "Main St Depot".to_string(),
            status: OrderStatus::FullDispatch,
            items: vec![
                OrderItem {
                    product: "product:a".to_string(),
                    product_name: "Copper Pot".to_string(),
                    unit: "pcs".to_string(),
                    quantity: 2,
                    price: Decimal::new(2550, 2),
                    dispatched_quantity: 2,
                },
                OrderItem {
                    product: "product:b".to_string(),
                    product_name: "Dinner Plate".to_string(),
                    unit: "set".to_string(),
                    quantity: 1,
                    price: Decimal::new(1200, 2),
                    dispatched_quantity: 1,
                },
            ],
            dispatched_items: Vec::new(),
            delivered_by: vec!["ACME Freight".to_string()],
            created_at: 1_710_504_000_000,
            updated_at: 1_710_504_000_000,
        }
    }

    #[test]
    fn test_invoice_contains_all_sections() {
        let doc = InvoiceRenderer::new(chrono_tz::UTC).render(&sample_order());
        assert!(doc.contains("INVOICE"));
        assert!(doc.contains("order:inv1"));
        assert!(doc.contains("Jordan Blake"));
        assert!(doc.contains("Main St Depot"));
        assert!(doc.contains("Copper Pot"));
        assert!(doc.contains("Delivered by : ACME Freight"));
        assert!(doc.contains("TOTAL"));
        // 2 * 25.50 + 12.00
        assert!(doc.contains("63.00"));
    }

    #[test]
    fn test_columns_do_not_move() {
        let doc = InvoiceRenderer::new(chrono_tz::UTC).render(&sample_order());
        let item_lines: Vec<&str> = doc
            .lines()
            .filter(|l| l.contains("Copper Pot") || l.contains("Dinner Plate"))
            .collect();
        assert_eq!(item_lines.len(), 2);
        // Every item row has identical width, fixed field positions
        assert_eq!(item_lines[0].len(), item_lines[1].len());
    }

    #[test]
    fn test_long_names_are_cut_not_shifted() {
        let mut order = sample_order();
        order.items[0].product_name =
            "An Extremely Long Product Name That Cannot Possibly Fit".to_string();
        let doc = InvoiceRenderer::new(chrono_tz::UTC).render(&order);
        let row = doc
            .lines()
            .find(|l| l.contains("An Extremely Long"))
            .unwrap();
        let reference = doc.lines().find(|l| l.contains("Dinner Plate")).unwrap();
        assert_eq!(row.len(), reference.len());
    }
}
