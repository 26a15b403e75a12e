//! Integration tests for the order submission pipeline against a real
//! SQLite database: catalog resolution, pricing, atomic persistence,
//! friendly-id allocation and status updates. Most tests run in-memory;
//! the write-contention test uses a file-backed multi-connection pool.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use comanda_core::{
    price_order, requested_product_ids, CustomerInfo, Establishment, OrderStatus, PricedOrder,
    Product, RejectionReason,
};
use comanda_core::pricing::RequestedLine;
use comanda_db::{Database, DbConfig, DbError};

const EST_BURGER: i64 = 1;
const EST_PIZZA: i64 = 2;

/// Fresh in-memory database with two tenants and a small catalog.
async fn setup() -> Database {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    seed(&db).await;
    db
}

/// Seeds two tenants and a small catalog.
async fn seed(db: &Database) {
    let now = Utc::now();

    for (id, name) in [(EST_BURGER, "Burger Barn"), (EST_PIZZA, "Pizza Planet")] {
        db.establishments()
            .insert(&Establishment {
                id,
                name: name.to_string(),
                bot_token: Some(format!("token-{id}")),
                owner_telegram_id: Some(1000 + id),
                is_active: true,
                created_at: now,
            })
            .await
            .unwrap();
    }

    let catalog = [
        (10, EST_BURGER, "Burger", 500, true),
        (11, EST_BURGER, "Fries", 250, true),
        (12, EST_BURGER, "Old Special", 900, false),
        (20, EST_PIZZA, "Margherita", 1200, true),
    ];
    for (id, establishment_id, name, price_cents, is_active) in catalog {
        db.products()
            .insert(&Product {
                id,
                establishment_id,
                name: name.to_string(),
                price_cents,
                is_active,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
    }
}

fn items(raw: serde_json::Value) -> Vec<RequestedLine> {
    serde_json::from_value(raw).unwrap()
}

/// Runs the full submission pipeline: batched catalog resolve → pricing →
/// atomic write. Mirrors what the create-order handler does.
async fn submit(
    db: &Database,
    establishment_id: i64,
    raw_items: serde_json::Value,
) -> Result<(String, i64, PricedOrder), RejectionReason> {
    let lines = items(raw_items);
    let ids = requested_product_ids(&lines)?;
    let catalog = db.products().resolve(establishment_id, &ids).await.unwrap();
    let priced = price_order(&lines, &catalog)?;

    let created = db
        .orders()
        .create_order(establishment_id, &CustomerInfo::default(), None, &priced)
        .await
        .unwrap();

    Ok((created.order_id, created.friendly_id, priced))
}

async fn order_count(db: &Database, establishment_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE establishment_id = ?1")
        .bind(establishment_id)
        .fetch_one(db.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn first_order_gets_friendly_id_one_and_authoritative_total() {
    let db = setup().await;

    let (order_id, friendly_id, _) = submit(
        &db,
        EST_BURGER,
        json!([{"product_id": 10, "qty": 2}]),
    )
    .await
    .unwrap();

    assert_eq!(friendly_id, 1);

    let order = db.orders().get_by_id(&order_id).await.unwrap().unwrap();
    assert_eq!(order.total_cents, 1000);
    assert_eq!(order.status, OrderStatus::Received);
    assert_eq!(order.establishment_id, EST_BURGER);

    let lines = db.orders().get_lines(&order_id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].name_snapshot, "Burger");
    assert_eq!(lines[0].unit_price_cents, 500);
    assert_eq!(lines[0].quantity, 2);
    assert_eq!(lines[0].line_total_cents, 1000);

    // The persisted total equals the sum over persisted lines
    let line_sum: i64 = lines.iter().map(|l| l.line_total_cents).sum();
    assert_eq!(order.total_cents, line_sum);
}

#[tokio::test]
async fn friendly_ids_increment_within_one_establishment() {
    let db = setup().await;

    let (_, first, _) = submit(&db, EST_BURGER, json!([{"product_id": 10, "qty": 2}]))
        .await
        .unwrap();
    let (_, second, _) = submit(&db, EST_BURGER, json!([{"product_id": 10, "qty": 2}]))
        .await
        .unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 2);
}

#[tokio::test]
async fn friendly_ids_are_tenant_scoped_not_global() {
    let db = setup().await;

    let (_, burger_first, _) = submit(&db, EST_BURGER, json!([{"product_id": 10}]))
        .await
        .unwrap();
    let (_, pizza_first, _) = submit(&db, EST_PIZZA, json!([{"product_id": 20}]))
        .await
        .unwrap();

    // Overlapping numbers across tenants are expected
    assert_eq!(burger_first, 1);
    assert_eq!(pizza_first, 1);
}

#[tokio::test]
async fn concurrent_submissions_all_succeed_with_distinct_ids() {
    // A file-backed database with a multi-connection pool, the production
    // shape: writers genuinely race here, unlike the in-memory config
    // whose single connection serializes every transaction.
    let path = std::env::temp_dir().join(format!("comanda-test-{}.db", Uuid::new_v4()));
    let db = Database::new(DbConfig::new(&path).max_connections(5))
        .await
        .unwrap();
    seed(&db).await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let db = db.clone();
        handles.push(tokio::spawn(async move {
            let lines = items(json!([{"product_id": 10, "qty": 1}]));
            let ids = requested_product_ids(&lines).unwrap();
            let catalog = db.products().resolve(EST_BURGER, &ids).await.unwrap();
            let priced = price_order(&lines, &catalog).unwrap();
            db.orders()
                .create_order(EST_BURGER, &CustomerInfo::default(), None, &priced)
                .await
        }));
    }

    let mut friendly_ids = Vec::new();
    for handle in handles {
        // Every submission must succeed; a losing writer is retried, never
        // surfaced as an error.
        friendly_ids.push(handle.await.unwrap().unwrap().friendly_id);
    }
    friendly_ids.sort_unstable();

    // No duplicates, strictly increasing from 1
    assert_eq!(friendly_ids, (1..=8).collect::<Vec<i64>>());

    db.close().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
}

#[tokio::test]
async fn unknown_product_rejects_whole_order_and_persists_nothing() {
    let db = setup().await;

    let result = submit(
        &db,
        EST_BURGER,
        json!([
            {"product_id": 10, "qty": 1},
            {"product_id": 999, "qty": 1}
        ]),
    )
    .await;

    assert_eq!(
        result.unwrap_err(),
        RejectionReason::ProductUnavailable { product_id: 999 }
    );
    assert_eq!(order_count(&db, EST_BURGER).await, 0);
}

#[tokio::test]
async fn inactive_product_rejects_whole_order() {
    let db = setup().await;

    let result = submit(&db, EST_BURGER, json!([{"product_id": 12, "qty": 1}])).await;

    assert_eq!(
        result.unwrap_err(),
        RejectionReason::ProductUnavailable { product_id: 12 }
    );
    assert_eq!(order_count(&db, EST_BURGER).await, 0);
}

#[tokio::test]
async fn empty_cart_rejected_without_persistence() {
    let db = setup().await;

    let result = submit(&db, EST_BURGER, json!([])).await;

    assert_eq!(result.unwrap_err(), RejectionReason::EmptyOrder);
    assert_eq!(order_count(&db, EST_BURGER).await, 0);
}

#[tokio::test]
async fn cross_tenant_product_is_unavailable() {
    let db = setup().await;

    // Product 20 exists but belongs to the pizza tenant; resolving it for
    // the burger tenant must silently omit it, which refuses the order.
    let result = submit(&db, EST_BURGER, json!([{"product_id": 20, "qty": 1}])).await;

    assert_eq!(
        result.unwrap_err(),
        RejectionReason::ProductUnavailable { product_id: 20 }
    );
}

#[tokio::test]
async fn resolve_tolerates_empty_id_set() {
    let db = setup().await;
    let resolved = db.products().resolve(EST_BURGER, &[]).await.unwrap();
    assert!(resolved.is_empty());
}

#[tokio::test]
async fn order_history_immune_to_later_price_changes() {
    let db = setup().await;

    let (order_id, _, priced) = submit(&db, EST_BURGER, json!([{"product_id": 10, "qty": 2}]))
        .await
        .unwrap();

    // Catalog edit after the order committed
    db.products().update_price(10, 9900).await.unwrap();

    let order = db.orders().get_by_id(&order_id).await.unwrap().unwrap();
    let lines = db.orders().get_lines(&order_id).await.unwrap();

    // Read-back reproduces exactly the creation-time figures
    assert_eq!(order.total_cents, priced.total.cents());
    assert_eq!(lines[0].unit_price_cents, 500);
    assert_eq!(order.total_cents, 1000);
}

#[tokio::test]
async fn status_update_applies_status_and_tracking() {
    let db = setup().await;

    let (order_id, _, _) = submit(&db, EST_BURGER, json!([{"product_id": 10}]))
        .await
        .unwrap();

    db.orders()
        .update_status(
            &order_id,
            OrderStatus::Received,
            OrderStatus::Delivering,
            Some("https://track.example/1"),
        )
        .await
        .unwrap();

    let order = db.orders().get_by_id(&order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Delivering);
    assert_eq!(order.tracking_url.as_deref(), Some("https://track.example/1"));
    assert!(order.updated_at >= order.created_at);
}

#[tokio::test]
async fn status_update_unknown_order_is_not_found() {
    let db = setup().await;

    let err = db
        .orders()
        .update_status(
            "no-such-order",
            OrderStatus::Received,
            OrderStatus::Preparing,
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::NotFound { .. }));
}

#[tokio::test]
async fn stale_status_update_cannot_reopen_order() {
    let db = setup().await;

    let (order_id, _, _) = submit(&db, EST_BURGER, json!([{"product_id": 10}]))
        .await
        .unwrap();

    // One operator closes the order
    db.orders()
        .update_status(&order_id, OrderStatus::Received, OrderStatus::Completed, None)
        .await
        .unwrap();

    // A second operator validated `received -> preparing` against a read
    // taken before the close; the guarded write must not land
    let err = db
        .orders()
        .update_status(&order_id, OrderStatus::Received, OrderStatus::Preparing, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::StatusConflict { .. }));

    let order = db.orders().get_by_id(&order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
}

#[tokio::test]
async fn recent_orders_listed_newest_first_with_items() {
    let db = setup().await;

    let (first_id, _, _) = submit(&db, EST_BURGER, json!([{"product_id": 10, "qty": 1}]))
        .await
        .unwrap();
    let (second_id, _, _) = submit(
        &db,
        EST_BURGER,
        json!([
            {"product_id": 10, "qty": 1},
            {"product_id": 11, "qty": 2}
        ]),
    )
    .await
    .unwrap();
    // Another tenant's order must not leak into the listing
    submit(&db, EST_PIZZA, json!([{"product_id": 20}]))
        .await
        .unwrap();

    let listed = db.orders().list_recent(EST_BURGER, 50).await.unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].order.id, second_id);
    assert_eq!(listed[1].order.id, first_id);
    assert_eq!(listed[0].items.len(), 2);
    assert_eq!(listed[1].items.len(), 1);
}
