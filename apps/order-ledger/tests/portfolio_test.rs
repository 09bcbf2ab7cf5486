//! Portfolio Integration Tests
//!
//! Valuation, summary, per-symbol performance and the persisted
//! mark-to-market refresh after real executions.

#![allow(clippy::unwrap_used)]

use order_ledger::config::load_config_from_string;
use order_ledger::domain::order_execution::{OrderType, PlaceOrderCommand, TransactionType, Validity};
use order_ledger::domain::portfolio::PositionRepository;
use order_ledger::domain::shared::{AccountId, Money, Quantity, Symbol};
use order_ledger::infrastructure::InMemoryContainer;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const CONFIG: &str = r"
engine:
  opening_balance: 50000
instruments:
  - symbol: INFY
    price: 100
  - symbol: TCS
    price: 200
  - symbol: WIPRO
    price: 50
accounts: [carol]
quotes:
  refresh_interval_secs: 0
";

fn carol() -> AccountId {
    AccountId::new("carol")
}

fn market(symbol: &str, side: TransactionType, qty: u32) -> PlaceOrderCommand {
    PlaceOrderCommand {
        symbol: Symbol::new(symbol),
        transaction_type: side,
        order_type: OrderType::Market,
        quantity: Quantity::new(qty),
        price: None,
        trigger_price: None,
        validity: Validity::Day,
        disclosed_quantity: None,
        notes: None,
    }
}

async fn set_price(engine: &InMemoryContainer, symbol: &str, price: Decimal) {
    engine.quotes().set_price(&Symbol::new(symbol), Money::new(price));
    engine.refresh_quotes_use_case().refresh_active().await.unwrap();
}

/// INFY: 10 bought at 100, now 120. TCS: 5 bought at 200 and sold at 190.
async fn traded_engine() -> InMemoryContainer {
    let config = load_config_from_string(CONFIG).unwrap();
    let engine = InMemoryContainer::from_config(&config).await.unwrap();
    let place = engine.place_order_use_case();

    place.execute(&carol(), market("INFY", TransactionType::Buy, 10)).await.unwrap();
    place.execute(&carol(), market("TCS", TransactionType::Buy, 5)).await.unwrap();
    set_price(&engine, "TCS", dec!(190)).await;
    place.execute(&carol(), market("TCS", TransactionType::Sell, 5)).await.unwrap();
    set_price(&engine, "INFY", dec!(120)).await;

    engine
}

#[tokio::test]
async fn portfolio_values_open_positions_at_latest_prices() {
    let engine = traded_engine().await;

    let positions = engine.portfolio_use_case().get_portfolio(&carol()).await.unwrap();

    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0].symbol, "INFY");
    assert_eq!(positions[0].current_price, Some(dec!(120.00)));
    assert_eq!(positions[0].current_value, dec!(1200.00));
    assert_eq!(positions[0].unrealized_pnl, dec!(200.00));
}

#[tokio::test]
async fn summary_includes_realized_losses_of_closed_positions() {
    let engine = traded_engine().await;

    let summary = engine
        .portfolio_use_case()
        .get_portfolio_summary(&carol())
        .await
        .unwrap();

    assert_eq!(summary.total_invested, dec!(1000.00));
    assert_eq!(summary.total_value, dec!(1200.00));
    assert_eq!(summary.unrealized_pnl, dec!(200.00));
    assert_eq!(summary.realized_pnl, dec!(-50.00));
    assert_eq!(summary.total_pnl, dec!(150.00));
    assert_eq!(summary.return_percent, dec!(15.00));
    assert_eq!(summary.active_holdings, 1);
    // 50000 - 1000 - 1000 + 950
    assert_eq!(summary.available_balance, dec!(48950.00));
}

#[tokio::test]
async fn performance_lists_held_and_realized_symbols_only() {
    let engine = traded_engine().await;

    let perf = engine
        .portfolio_use_case()
        .get_stock_performance(&carol())
        .await
        .unwrap();

    let symbols: Vec<&str> = perf.iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["INFY", "TCS"]);
    assert_eq!(perf[0].return_percent, dec!(20.00));
    assert_eq!(perf[1].quantity, 0);
    assert_eq!(perf[1].realized_pnl, dec!(-50.00));
}

#[tokio::test]
async fn refresh_persists_mark_to_market() {
    let engine = traded_engine().await;

    engine
        .portfolio_use_case()
        .refresh_portfolio(&carol())
        .await
        .unwrap();

    let stored = engine
        .store()
        .find_position(&carol(), &Symbol::new("INFY"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.current_value(), Money::new(dec!(1200)));
    assert_eq!(stored.unrealized_pnl(), Money::new(dec!(200)));
    assert!(stored.valued_at().is_some());
}

#[tokio::test]
async fn missing_quote_keeps_the_last_price() {
    let engine = traded_engine().await;
    engine.quotes().clear_price(&Symbol::new("INFY"));

    let report = engine.refresh_quotes_use_case().refresh_active().await.unwrap();

    assert!(report.unchanged.contains(&Symbol::new("INFY")));
    let positions = engine.portfolio_use_case().get_portfolio(&carol()).await.unwrap();
    assert_eq!(positions[0].current_price, Some(dec!(120.00)));
}
