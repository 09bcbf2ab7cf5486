//! Order Lifecycle Integration Tests
//!
//! Drives placement, execution, cancellation and queries through the
//! container with in-memory adapters.

#![allow(clippy::unwrap_used)]

use order_ledger::config::load_config_from_string;
use order_ledger::domain::order_execution::{OrderStatus, OrderType, PlaceOrderCommand, TransactionType, Validity};
use order_ledger::domain::shared::{AccountId, Money, OrderId, Quantity, Symbol};
use order_ledger::error::ErrorCode;
use order_ledger::infrastructure::InMemoryContainer;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use test_case::test_case;

const CONFIG: &str = r"
engine:
  opening_balance: 100000
  max_page_size: 10
  commit_retry:
    max_attempts: 3
    initial_backoff_ms: 1
    max_backoff_ms: 2
    jitter_factor: 0.0
instruments:
  - symbol: INFY
    name: Infosys
    price: 100
  - symbol: TCS
    price: 3000
accounts: [alice, bob]
quotes:
  refresh_interval_secs: 0
";

async fn engine() -> InMemoryContainer {
    let config = load_config_from_string(CONFIG).unwrap();
    InMemoryContainer::from_config(&config).await.unwrap()
}

fn alice() -> AccountId {
    AccountId::new("alice")
}

fn order(
    symbol: &str,
    side: TransactionType,
    order_type: OrderType,
    qty: u32,
    price: Option<Decimal>,
) -> PlaceOrderCommand {
    PlaceOrderCommand {
        symbol: Symbol::new(symbol),
        transaction_type: side,
        order_type,
        quantity: Quantity::new(qty),
        price: price.map(Money::new),
        trigger_price: None,
        validity: Validity::Day,
        disclosed_quantity: None,
        notes: None,
    }
}

async fn move_price(engine: &InMemoryContainer, symbol: &str, price: Decimal) {
    engine
        .quotes()
        .set_price(&Symbol::new(symbol), Money::new(price));
    engine
        .refresh_quotes_use_case()
        .execute(&[Symbol::new(symbol)])
        .await
        .unwrap();
}

// =============================================================================
// Market orders
// =============================================================================

#[tokio::test]
async fn market_buy_then_partial_sell_books_realized_pnl() {
    let engine = engine().await;
    let place = engine.place_order_use_case();

    let buy = place
        .execute(&alice(), order("INFY", TransactionType::Buy, OrderType::Market, 10, None))
        .await
        .unwrap();
    assert_eq!(buy.status, OrderStatus::Complete);
    assert_eq!(buy.executed_price, Some(dec!(100.00)));

    let account = engine.account_use_case().get_account(&alice()).await.unwrap();
    assert_eq!(account.available_balance, dec!(99000.00));

    move_price(&engine, "INFY", dec!(110)).await;

    let sell = place
        .execute(&alice(), order("INFY", TransactionType::Sell, OrderType::Market, 4, None))
        .await
        .unwrap();
    assert_eq!(sell.status, OrderStatus::Complete);
    assert_eq!(sell.executed_value, Some(dec!(440.00)));

    let portfolio = engine.portfolio_use_case().get_portfolio(&alice()).await.unwrap();
    assert_eq!(portfolio.len(), 1);
    let infy = &portfolio[0];
    assert_eq!(infy.quantity, 6);
    assert_eq!(infy.average_cost, dec!(100.00));
    assert_eq!(infy.invested_amount, dec!(600.00));
    assert_eq!(infy.realized_pnl, dec!(40.00));

    let account = engine.account_use_case().get_account(&alice()).await.unwrap();
    assert_eq!(account.available_balance, dec!(99440.00));
}

#[tokio::test]
async fn every_execution_writes_a_trade_newest_first() {
    let engine = engine().await;
    let place = engine.place_order_use_case();

    let first = place
        .execute(&alice(), order("INFY", TransactionType::Buy, OrderType::Market, 2, None))
        .await
        .unwrap();
    let second = place
        .execute(&alice(), order("TCS", TransactionType::Buy, OrderType::Market, 1, None))
        .await
        .unwrap();

    let trades = engine.order_queries_use_case().list_trades(&alice()).await.unwrap();

    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].order_id, second.order_id);
    assert_eq!(trades[1].order_id, first.order_id);
    assert_eq!(trades[1].total_amount, dec!(200.00));
    assert!(trades[0].trade_id.starts_with("TXN-"));
}

// =============================================================================
// Resting orders
// =============================================================================

#[tokio::test]
async fn limit_buy_rests_then_executes_at_supplied_price() {
    let engine = engine().await;

    let placed = engine
        .place_order_use_case()
        .execute(
            &alice(),
            order("INFY", TransactionType::Buy, OrderType::Limit, 10, Some(dec!(95))),
        )
        .await
        .unwrap();
    assert_eq!(placed.status, OrderStatus::Open);
    assert!(placed.order_id.starts_with("ORD-"));
    assert_eq!(placed.total_value, Some(dec!(950.00)));

    let account = engine.account_use_case().get_account(&alice()).await.unwrap();
    assert_eq!(account.used_margin, dec!(950.00));
    assert_eq!(account.free_margin, dec!(99050.00));

    let executed = engine
        .execute_open_order_use_case()
        .execute(&OrderId::new(&placed.order_id), &alice(), Money::new(dec!(94)))
        .await
        .unwrap();
    assert_eq!(executed.status, OrderStatus::Complete);
    assert_eq!(executed.remaining_quantity, 0);

    let account = engine.account_use_case().get_account(&alice()).await.unwrap();
    assert_eq!(account.used_margin, dec!(0.00));
    assert_eq!(account.available_balance, dec!(99060.00));
}

#[tokio::test]
async fn limit_sell_blocks_shares_until_cancelled() {
    let engine = engine().await;
    let place = engine.place_order_use_case();
    place
        .execute(&alice(), order("INFY", TransactionType::Buy, OrderType::Market, 10, None))
        .await
        .unwrap();

    let resting = place
        .execute(
            &alice(),
            order("INFY", TransactionType::Sell, OrderType::Limit, 8, Some(dec!(120))),
        )
        .await
        .unwrap();
    assert_eq!(resting.status, OrderStatus::Open);

    // only 2 unreserved shares left
    let oversell = place
        .execute(&alice(), order("INFY", TransactionType::Sell, OrderType::Market, 3, None))
        .await
        .unwrap();
    assert_eq!(oversell.status, OrderStatus::Rejected);
    assert_eq!(oversell.rejection_reason.unwrap().code, "INSUFFICIENT_HOLDINGS");

    engine
        .cancel_order_use_case()
        .execute(&OrderId::new(&resting.order_id), &alice())
        .await
        .unwrap();

    let portfolio = engine.portfolio_use_case().get_portfolio(&alice()).await.unwrap();
    assert_eq!(portfolio[0].reserved_quantity, 0);
    let sold = place
        .execute(&alice(), order("INFY", TransactionType::Sell, OrderType::Market, 3, None))
        .await
        .unwrap();
    assert_eq!(sold.status, OrderStatus::Complete);
}

#[test_case(OrderType::Sl ; "stop limit")]
#[test_case(OrderType::SlM ; "stop market")]
#[tokio::test]
async fn stop_buy_costed_at_trigger_round_trips_margin(order_type: OrderType) {
    let engine = engine().await;
    let before = engine.account_use_case().get_account(&alice()).await.unwrap();
    let mut cmd = order("INFY", TransactionType::Buy, order_type, 7, None);
    cmd.trigger_price = Some(Money::new(dec!(97.35)));

    let placed = engine.place_order_use_case().execute(&alice(), cmd).await.unwrap();
    assert_eq!(placed.status, OrderStatus::Open);
    assert_eq!(placed.trigger_price, Some(dec!(97.35)));

    let account = engine.account_use_case().get_account(&alice()).await.unwrap();
    assert_eq!(account.used_margin, dec!(681.45));
    assert_eq!(account.free_margin, before.free_margin - dec!(681.45));

    let cancelled = engine
        .cancel_order_use_case()
        .execute(&OrderId::new(&placed.order_id), &alice())
        .await
        .unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let after = engine.account_use_case().get_account(&alice()).await.unwrap();
    assert_eq!(after.free_margin, before.free_margin);
    assert_eq!(after.available_balance, before.available_balance);
    assert_eq!(after.used_margin, dec!(0));
}

// =============================================================================
// Cancellation and ownership
// =============================================================================

#[tokio::test]
async fn cancelling_a_complete_order_is_illegal_and_changes_nothing() {
    let engine = engine().await;
    let done = engine
        .place_order_use_case()
        .execute(&alice(), order("INFY", TransactionType::Buy, OrderType::Market, 1, None))
        .await
        .unwrap();
    let before = engine.account_use_case().get_account(&alice()).await.unwrap();

    let err = engine
        .cancel_order_use_case()
        .execute(&OrderId::new(&done.order_id), &alice())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::IllegalStateTransition);
    let after = engine.account_use_case().get_account(&alice()).await.unwrap();
    assert_eq!(after, before);
    let stored = engine
        .order_queries_use_case()
        .get_order(&OrderId::new(&done.order_id), &alice())
        .await
        .unwrap();
    assert_eq!(stored.status, OrderStatus::Complete);
}

#[tokio::test]
async fn other_accounts_cannot_read_or_cancel_an_order() {
    let engine = engine().await;
    let placed = engine
        .place_order_use_case()
        .execute(
            &alice(),
            order("INFY", TransactionType::Buy, OrderType::Limit, 1, Some(dec!(90))),
        )
        .await
        .unwrap();
    let id = OrderId::new(&placed.order_id);
    let bob = AccountId::new("bob");

    let read = engine.order_queries_use_case().get_order(&id, &bob).await.unwrap_err();
    let cancel = engine.cancel_order_use_case().execute(&id, &bob).await.unwrap_err();

    assert_eq!(read.code(), ErrorCode::AccessDenied);
    assert_eq!(cancel.code(), ErrorCode::AccessDenied);
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let engine = engine().await;

    let err = engine
        .cancel_order_use_case()
        .execute(&OrderId::new("ORD-0-DEADBEEF"), &alice())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::NotFound);
}

// =============================================================================
// Validation and listing
// =============================================================================

#[tokio::test]
async fn malformed_request_reports_every_bad_field_and_stores_nothing() {
    let engine = engine().await;
    let mut cmd = order("", TransactionType::Buy, OrderType::Limit, 0, None);
    cmd.notes = Some("x".repeat(501));

    let err = engine
        .place_order_use_case()
        .execute(&alice(), cmd)
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::ValidationError);
    let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
    assert!(fields.contains(&"symbol"));
    assert!(fields.contains(&"quantity"));
    assert!(fields.contains(&"price"));
    assert!(fields.contains(&"notes"));
    assert!(engine.order_queries_use_case().list_orders(&alice()).await.unwrap().is_empty());
}

#[tokio::test]
async fn orders_page_newest_first() {
    let engine = engine().await;
    let place = engine.place_order_use_case();
    let mut ids = Vec::new();
    for qty in 1..=12 {
        let view = place
            .execute(
                &alice(),
                order("INFY", TransactionType::Buy, OrderType::Limit, qty, Some(dec!(50))),
            )
            .await
            .unwrap();
        ids.push(view.order_id);
    }

    let queries = engine.order_queries_use_case();
    let first = queries.list_orders_page(&alice(), 0, 5).await.unwrap();
    let last = queries.list_orders_page(&alice(), 2, 5).await.unwrap();

    assert_eq!(first.total_items, 12);
    assert_eq!(first.total_pages, 3);
    assert_eq!(first.items[0].order_id, ids[11]);
    assert_eq!(last.items.len(), 2);
    assert_eq!(last.items[1].order_id, ids[0]);

    let too_big = queries.list_orders_page(&alice(), 0, 11).await.unwrap_err();
    assert_eq!(too_big.code(), ErrorCode::ValidationError);
}
