use super::*;

#[tokio::test]
async fn test_confirm_reserves_stock() {
    let db = test_db().await;
    let p = seed_product(&db, "Widget", Decimal::new(250, 1), 10).await;
    let order_id = seed_order(&db, &[(&p, 4)]).await;

    let order = engine(&db).confirm(&order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);

    let product = get_product(&db, &p).await;
    assert_eq!(product.stock, 6);
    assert_ledger_consistent(&product);

    let last = product.stock_history.last().unwrap();
    assert_eq!(last.change_type, StockChangeType::OrderConfirmation);
    assert_eq!(last.change, -4);
    assert_eq!(last.stock, 6);
    assert_eq!(last.order.as_deref(), Some(order_id.as_str()));
}

#[tokio::test]
async fn test_confirm_exact_stock_drains_to_zero() {
    // Scenario A, first half: ordering the entire stock is allowed
    let db = test_db().await;
    let p = seed_product(&db, "Widget", Decimal::new(100, 1), 10).await;
    let order_id = seed_order(&db, &[(&p, 10)]).await;

    let order = engine(&db).confirm(&order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(get_product(&db, &p).await.stock, 0);
}

#[tokio::test]
async fn test_confirm_insufficient_stock_rejected() {
    // Scenario A, second half: a drained product rejects further confirms
    let db = test_db().await;
    let p = seed_product(&db, "Widget", Decimal::new(100, 1), 10).await;

    let first = seed_order(&db, &[(&p, 10)]).await;
    engine(&db).confirm(&first).await.unwrap();

    let second = seed_order(&db, &[(&p, 1)]).await;
    let err = engine(&db).confirm(&second).await.unwrap_err();
    match &err {
        DispatchError::InsufficientStock(shortages) => {
            assert_eq!(shortages.len(), 1);
            assert_eq!(shortages[0].product_name, "Widget");
            assert_eq!(shortages[0].requested, 1);
            assert_eq!(shortages[0].available, 0);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // No partial effect: stock and order untouched
    assert_eq!(get_product(&db, &p).await.stock, 0);
    assert_eq!(get_order(&db, &second).await.status, OrderStatus::Unconfirmed);
}

#[tokio::test]
async fn test_confirm_failure_names_every_failing_product() {
    let db = test_db().await;
    let ok = seed_product(&db, "Widget", Decimal::new(100, 1), 50).await;
    let short_a = seed_product(&db, "Gadget", Decimal::new(100, 1), 2).await;
    let short_b = seed_product(&db, "Sprocket", Decimal::new(100, 1), 0).await;
    let order_id = seed_order(&db, &[(&ok, 5), (&short_a, 3), (&short_b, 1)]).await;

    let err = engine(&db).confirm(&order_id).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Gadget"), "message was: {}", message);
    assert!(message.contains("Sprocket"), "message was: {}", message);

    // Even the satisfiable line is not applied
    assert_eq!(get_product(&db, &ok).await.stock, 50);
    assert_eq!(get_product(&db, &short_a).await.stock, 2);
    assert_eq!(get_order(&db, &order_id).await.status, OrderStatus::Unconfirmed);
}

#[tokio::test]
async fn test_confirm_twice_rejected() {
    let db = test_db().await;
    let p = seed_product(&db, "Widget", Decimal::new(100, 1), 10).await;
    let order_id = seed_order(&db, &[(&p, 2)]).await;

    engine(&db).confirm(&order_id).await.unwrap();
    let err = engine(&db).confirm(&order_id).await.unwrap_err();
    assert!(matches!(err, DispatchError::InvalidState(_)));

    // Debited exactly once
    assert_eq!(get_product(&db, &p).await.stock, 8);
}

#[tokio::test]
async fn test_confirm_multi_product_order() {
    let db = test_db().await;
    let a = seed_product(&db, "Widget", Decimal::new(150, 1), 8).await;
    let b = seed_product(&db, "Gadget", Decimal::new(400, 1), 5).await;
    let order_id = seed_order(&db, &[(&a, 3), (&b, 5)]).await;

    engine(&db).confirm(&order_id).await.unwrap();

    let pa = get_product(&db, &a).await;
    let pb = get_product(&db, &b).await;
    assert_eq!(pa.stock, 5);
    assert_eq!(pb.stock, 0);
    assert_ledger_consistent(&pa);
    assert_ledger_consistent(&pb);
}
