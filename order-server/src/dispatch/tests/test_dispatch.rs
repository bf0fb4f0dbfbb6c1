use super::*;

#[tokio::test]
async fn test_partial_dispatch() {
    // Scenario B
    let db = test_db().await;
    let p = seed_product(&db, "Widget", Decimal::new(100, 1), 10).await;
    let order_id = seed_order(&db, &[(&p, 10)]).await;
    engine(&db).confirm(&order_id).await.unwrap();

    let order = engine(&db)
        .dispatch(&order_id, vec![line(&p, 4)], None)
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::PartialDispatch);
    assert_eq!(order.items[0].dispatched_quantity, 4);
    assert_eq!(order.dispatched_items.len(), 1);
    assert_eq!(order.dispatched_items[0].product, p);
    assert_eq!(order.dispatched_items[0].quantity, 4);
}

#[tokio::test]
async fn test_dispatch_accumulates() {
    let db = test_db().await;
    let p = seed_product(&db, "Widget", Decimal::new(100, 1), 10).await;
    let order_id = seed_order(&db, &[(&p, 10)]).await;
    engine(&db).confirm(&order_id).await.unwrap();

    engine(&db).dispatch(&order_id, vec![line(&p, 4)], None).await.unwrap();
    let order = engine(&db)
        .dispatch(&order_id, vec![line(&p, 3)], None)
        .await
        .unwrap();

    // Additive, never overwritten
    assert_eq!(order.items[0].dispatched_quantity, 7);
    assert_eq!(order.dispatched_items.len(), 2);
    assert_eq!(order.status, OrderStatus::PartialDispatch);
}

#[tokio::test]
async fn test_over_dispatch_rejected() {
    let db = test_db().await;
    let p = seed_product(&db, "Widget", Decimal::new(100, 1), 10).await;
    let order_id = seed_order(&db, &[(&p, 10)]).await;
    engine(&db).confirm(&order_id).await.unwrap();
    engine(&db).dispatch(&order_id, vec![line(&p, 4)], None).await.unwrap();

    let err = engine(&db)
        .dispatch(&order_id, vec![line(&p, 7)], None)
        .await
        .unwrap_err();
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

    // Rejected request left no trace
    let order = get_order(&db, &order_id).await;
    assert_eq!(order.items[0].dispatched_quantity, 4);
    assert_eq!(order.dispatched_items.len(), 1);
}

#[tokio::test]
async fn test_zero_quantity_dispatch_is_a_noop() {
    let db = test_db().await;
    let p = seed_product(&db, "Widget", Decimal::new(100, 1), 10).await;
    let order_id = seed_order(&db, &[(&p, 10)]).await;
    engine(&db).confirm(&order_id).await.unwrap();
    let before = get_order(&db, &order_id).await;

    let order = engine(&db)
        .dispatch(&order_id, vec![line(&p, 0)], Some("ACME Freight".to_string()))
        .await
        .unwrap();

    // Order and product state unchanged
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.items[0].dispatched_quantity, 0);
    assert!(order.dispatched_items.is_empty());
    assert!(order.delivered_by.is_empty());
    assert_eq!(order.updated_at, before.updated_at);
    assert_eq!(get_product(&db, &p).await.stock, 0);
}

#[tokio::test]
async fn test_full_dispatch_after_partial() {
    // Scenario C
    let db = test_db().await;
    let p = seed_product(&db, "Widget", Decimal::new(100, 1), 10).await;
    let order_id = seed_order(&db, &[(&p, 10)]).await;
    engine(&db).confirm(&order_id).await.unwrap();
    engine(&db).dispatch(&order_id, vec![line(&p, 4)], None).await.unwrap();

    let order = engine(&db).dispatch_all(&order_id, None).await.unwrap();

    assert_eq!(order.status, OrderStatus::FullDispatch);
    assert_eq!(order.items[0].dispatched_quantity, 10);
    // 4 from the partial run, 6 outstanding from the full run
    assert_eq!(order.dispatched_items.len(), 2);
    assert_eq!(order.dispatched_items[1].quantity, 6);
    assert!(order.fully_dispatched());
}

#[tokio::test]
async fn test_dispatch_requires_confirmed_order() {
    let db = test_db().await;
    let p = seed_product(&db, "Widget", Decimal::new(100, 1), 10).await;
    let order_id = seed_order(&db, &[(&p, 5)]).await;

    let err = engine(&db)
        .dispatch(&order_id, vec![line(&p, 1)], None)
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::InvalidState(_)));

    let err = engine(&db).dispatch_all(&order_id, None).await.unwrap_err();
    assert!(matches!(err, DispatchError::InvalidState(_)));
}

#[tokio::test]
async fn test_dispatch_never_touches_stock() {
    // Stock was reserved at confirm time; dispatch only tracks progress
    let db = test_db().await;
    let p = seed_product(&db, "Widget", Decimal::new(100, 1), 10).await;
    let order_id = seed_order(&db, &[(&p, 6)]).await;
    engine(&db).confirm(&order_id).await.unwrap();
    assert_eq!(get_product(&db, &p).await.stock, 4);

    engine(&db).dispatch(&order_id, vec![line(&p, 2)], None).await.unwrap();
    assert_eq!(get_product(&db, &p).await.stock, 4);

    engine(&db).dispatch_all(&order_id, None).await.unwrap();
    let product = get_product(&db, &p).await;
    assert_eq!(product.stock, 4);
    assert_ledger_consistent(&product);
}

#[tokio::test]
async fn test_transport_names_merge_without_duplicates() {
    let db = test_db().await;
    let p = seed_product(&db, "Widget", Decimal::new(100, 1), 10).await;
    let order_id = seed_order(&db, &[(&p, 9)]).await;
    engine(&db).confirm(&order_id).await.unwrap();

    engine(&db)
        .dispatch(&order_id, vec![line(&p, 2)], Some("ACME Freight".to_string()))
        .await
        .unwrap();
    engine(&db)
        .dispatch(&order_id, vec![line(&p, 2)], Some("ACME Freight".to_string()))
        .await
        .unwrap();
    let order = engine(&db)
        .dispatch(&order_id, vec![line(&p, 2)], Some("City Couriers".to_string()))
        .await
        .unwrap();

    assert_eq!(
        order.delivered_by,
        vec!["ACME Freight".to_string(), "City Couriers".to_string()]
    );
}

#[tokio::test]
async fn test_dispatched_quantity_stays_within_ordered() {
    // 0 <= dispatched_quantity <= quantity, across a mixed sequence
    let db = test_db().await;
    let a = seed_product(&db, "Widget", Decimal::new(100, 1), 20).await;
    let b = seed_product(&db, "Gadget", Decimal::new(100, 1), 20).await;
    let order_id = seed_order(&db, &[(&a, 5), (&b, 8)]).await;
    engine(&db).confirm(&order_id).await.unwrap();

    engine(&db)
        .dispatch(&order_id, vec![line(&a, 5), line(&b, 1)], None)
        .await
        .unwrap();
    let order = engine(&db).dispatch_all(&order_id, None).await.unwrap();

    for item in &order.items {
        assert!(item.dispatched_quantity >= 0);
        assert!(item.dispatched_quantity <= item.quantity);
    }
    assert_eq!(order.items[0].dispatched_quantity, 5);
    assert_eq!(order.items[1].dispatched_quantity, 8);
}
