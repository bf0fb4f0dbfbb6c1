use super::*;
use crate::db::models::{Order, OrderItem, Product, ProductCreate};
use crate::db::repository::{OrderRepository, ProductRepository};
use rust_decimal::Decimal;
use shared::{DispatchLine, OrderStatus, StockChangeType};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn test_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    db
}

fn engine(db: &Surreal<Db>) -> DispatchEngine {
    DispatchEngine::new(db.clone())
}

/// Seed a product, return its "product:<id>" reference
async fn seed_product(db: &Surreal<Db>, name: &str, price: Decimal, stock: i64) -> String {
    let repo = ProductRepository::new(db.clone());
    let product = repo
        .create(ProductCreate {
            name: name.to_string(),
            unit: "pcs".to_string(),
            price,
            stock,
        })
        .await
        .expect("Failed to seed product");
    product.id.unwrap().to_string()
}

/// Seed an unconfirmed order over existing products, return its id
async fn seed_order(db: &Surreal<Db>, lines: &[(&str, i64)]) -> String {
    let products = ProductRepository::new(db.clone());
    let mut items = Vec::new();
    for (product_ref, quantity) in lines {
        let product = products
            .find_by_id(product_ref)
            .await
            .unwrap()
            .expect("Order line references a missing product");
        items.push(OrderItem {
            product: (*product_ref).to_string(),
            product_name: product.name,
            unit: product.unit,
            quantity: *quantity,
            price: product.price,
            dispatched_quantity: 0,
        });
    }

    let order = Order {
        id: None,
        customer_name: "Test Customer".to_string(),
        customer_city: "Springfield".to_string(),
        customer_phone: "555-0100".to_string(),
        delivery_location: "Main St Depot".to_string(),
        status: OrderStatus::Unconfirmed,
        items,
        dispatched_items: Vec::new(),
        delivered_by: Vec::new(),
        created_at: 1,
        updated_at: 1,
    };

    let created = OrderRepository::new(db.clone())
        .create(order)
        .await
        .expect("Failed to seed order");
    created.id_string()
}

async fn get_product(db: &Surreal<Db>, product_ref: &str) -> Product {
    ProductRepository::new(db.clone())
        .find_by_id(product_ref)
        .await
        .unwrap()
        .expect("Product disappeared")
}

async fn get_order(db: &Surreal<Db>, order_id: &str) -> Order {
    OrderRepository::new(db.clone())
        .find_by_id(order_id)
        .await
        .unwrap()
        .expect("Order disappeared")
}

fn line(product_ref: &str, quantity: i64) -> DispatchLine {
    DispatchLine {
        product: product_ref.to_string(),
        quantity,
    }
}

/// The ledger must replay to the current stock after any operation mix
fn assert_ledger_consistent(product: &Product) {
    assert_eq!(
        shared::stock::replay(&product.stock_history),
        product.stock,
        "Stock ledger of {} diverged from stock quantity",
        product.name
    );
}

mod test_confirm;
mod test_dispatch;
