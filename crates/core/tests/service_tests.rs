// ═══════════════════════════════════════════════════════════════════
// Service Tests — PortfolioService, AnalyticsService, PriceService
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use coinfolio_core::errors::CoreError;
use coinfolio_core::models::asset::Asset;
use coinfolio_core::models::portfolio::Portfolio;
use coinfolio_core::models::price::PricePoint;
use coinfolio_core::models::transaction::{Transaction, TransactionType};
use coinfolio_core::providers::registry::PriceProviderRegistry;
use coinfolio_core::providers::traits::PriceProvider;
use coinfolio_core::services::analytics_service::AnalyticsService;
use coinfolio_core::services::portfolio_service::PortfolioService;
use coinfolio_core::services::price_service::PriceService;

/// 2024-01-01T00:00:00Z
const DAY0: i64 = 1_704_067_200_000;

fn day(n: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(DAY0 + n * 86_400_000).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Mock Providers
// ═══════════════════════════════════════════════════════════════════

struct MockPriceProvider {
    name: &'static str,
    prices: HashMap<String, f64>,
    history: HashMap<String, Vec<PricePoint>>,
}

impl MockPriceProvider {
    fn new(name: &'static str) -> Self {
        let mut prices = HashMap::new();
        prices.insert("BTC".into(), 60_000.0);
        prices.insert("ETH".into(), 3_000.0);

        let mut history = HashMap::new();
        // Deliberately unsorted
        history.insert(
            "BTC".into(),
            vec![
                PricePoint::new(day(2), 42_000.0),
                PricePoint::new(day(0), 40_000.0),
                PricePoint::new(day(1), 41_000.0),
            ],
        );

        Self { name, prices, history }
    }

    fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.prices.insert(symbol.into(), price);
        self
    }

    fn without_history(mut self) -> Self {
        self.history.clear();
        self
    }
}

#[async_trait]
impl PriceProvider for MockPriceProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        self.prices
            .get(symbol)
            .copied()
            .ok_or(CoreError::PriceNotAvailable {
                symbol: symbol.into(),
            })
    }

    async fn get_price_history(
        &self,
        symbol: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, CoreError> {
        Ok(self
            .history
            .get(symbol)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.timestamp >= from && p.timestamp <= to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// A mock that always fails (for testing fallback behavior).
struct FailingMockProvider;

#[async_trait]
impl PriceProvider for FailingMockProvider {
    fn name(&self) -> &str {
        "FailingMock"
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        Err(CoreError::Api {
            provider: "FailingMock".into(),
            message: format!("Simulated failure {symbol}"),
        })
    }

    async fn get_price_history(
        &self,
        symbol: &str,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, CoreError> {
        Err(CoreError::Api {
            provider: "FailingMock".into(),
            message: format!("Simulated history failure {symbol}"),
        })
    }
}

fn registry_of(providers: Vec<Box<dyn PriceProvider>>) -> PriceProviderRegistry {
    let mut registry = PriceProviderRegistry::new();
    for provider in providers {
        registry.register(provider);
    }
    registry
}

fn portfolio_with(ticker: &str) -> (Portfolio, Uuid) {
    let mut portfolio = Portfolio::default();
    let id = PortfolioService::new()
        .add_asset(&mut portfolio, ticker, ticker)
        .unwrap();
    (portfolio, id)
}

// ═══════════════════════════════════════════════════════════════════
// PortfolioService — assets
// ═══════════════════════════════════════════════════════════════════

mod assets {
    use super::*;

    #[test]
    fn add_asset_normalizes_ticker() {
        let (portfolio, id) = portfolio_with(" btc ");
        let asset = portfolio.find_asset(id).unwrap();
        assert_eq!(asset.ticker, "BTC");
    }

    #[test]
    fn add_asset_rejects_duplicate_ticker() {
        let (mut portfolio, _) = portfolio_with("BTC");
        let err = PortfolioService::new()
            .add_asset(&mut portfolio, "btc", "Bitcoin again")
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateAsset(t) if t == "BTC"));
        assert_eq!(portfolio.assets.len(), 1);
    }

    #[test]
    fn add_asset_rejects_blank_ticker() {
        let mut portfolio = Portfolio::default();
        let err = PortfolioService::new()
            .add_asset(&mut portfolio, "   ", "Nothing")
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn assets_keep_insertion_order() {
        let svc = PortfolioService::new();
        let mut portfolio = Portfolio::default();
        let a = svc.add_asset(&mut portfolio, "SOL", "Solana").unwrap();
        let b = svc.add_asset(&mut portfolio, "BTC", "Bitcoin").unwrap();
        let c = svc.add_asset(&mut portfolio, "ETH", "Ethereum").unwrap();
        let ids: Vec<Uuid> = portfolio.assets.iter().map(|x| x.id).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn remove_asset_returns_it() {
        let (mut portfolio, id) = portfolio_with("BTC");
        let removed = PortfolioService::new().remove_asset(&mut portfolio, id).unwrap();
        assert_eq!(removed.id, id);
        assert!(portfolio.assets.is_empty());
    }

    #[test]
    fn remove_unknown_asset_fails() {
        let mut portfolio = Portfolio::default();
        let err = PortfolioService::new()
            .remove_asset(&mut portfolio, Uuid::new_v4())
            .unwrap_err();
        assert!(matches!(err, CoreError::AssetNotFound(_)));
    }

    #[test]
    fn insert_asset_recomputes_quantity_and_sorts_history() {
        let mut asset = Asset::new("eth", "Ethereum");
        asset.quantity = 999.0;
        asset.transactions.push(Transaction::buy(2.0, 10.0, day(0)));
        asset.transactions.push(Transaction::sell(0.5, 12.0, day(1)));
        asset.price_history = vec![
            PricePoint::new(day(3), 30.0),
            PricePoint::new(day(1), f64::NAN),
            PricePoint::new(day(2), 20.0),
        ];

        let mut portfolio = Portfolio::default();
        let id = PortfolioService::new().insert_asset(&mut portfolio, asset).unwrap();
        let stored = portfolio.find_asset(id).unwrap();

        assert_eq!(stored.ticker, "ETH");
        assert_eq!(stored.quantity, 1.5);
        let prices: Vec<f64> = stored.price_history.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![20.0, 30.0]);
    }

    #[test]
    fn insert_asset_rejects_reused_id() {
        let (mut portfolio, id) = portfolio_with("BTC");
        let mut clone = Asset::new("ETH", "Ethereum");
        clone.id = id;
        let err = PortfolioService::new().insert_asset(&mut portfolio, clone).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateAsset(_)));
    }

    #[test]
    fn insert_asset_rejects_invalid_transactions() {
        let mut asset = Asset::new("ETH", "Ethereum");
        asset.transactions.push(Transaction::buy(-1.0, 10.0, day(0)));
        let mut portfolio = Portfolio::default();
        let err = PortfolioService::new().insert_asset(&mut portfolio, asset).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert!(portfolio.assets.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// PortfolioService — transactions
// ═══════════════════════════════════════════════════════════════════

mod transactions {
    use super::*;

    #[test]
    fn buy_updates_quantity_and_seeds_price() {
        let svc = PortfolioService::new();
        let (mut portfolio, id) = portfolio_with("BTC");
        svc.add_transaction(&mut portfolio, id, TransactionType::Buy, 0.5, 40_000.0, day(0))
            .unwrap();

        let asset = portfolio.find_asset(id).unwrap();
        assert_eq!(asset.quantity, 0.5);
        assert_eq!(asset.current_price, 40_000.0);
        assert_eq!(asset.transactions[0].total_cost, 20_000.0);
    }

    #[test]
    fn buy_does_not_override_known_price() {
        let svc = PortfolioService::new();
        let (mut portfolio, id) = portfolio_with("BTC");
        svc.set_current_price(&mut portfolio, id, 65_000.0).unwrap();
        svc.add_transaction(&mut portfolio, id, TransactionType::Buy, 1.0, 40_000.0, day(0))
            .unwrap();
        assert_eq!(portfolio.find_asset(id).unwrap().current_price, 65_000.0);
    }

    #[test]
    fn sell_within_holdings_is_accepted() {
        let svc = PortfolioService::new();
        let (mut portfolio, id) = portfolio_with("BTC");
        svc.add_transaction(&mut portfolio, id, TransactionType::Buy, 2.0, 100.0, day(0))
            .unwrap();
        svc.add_transaction(&mut portfolio, id, TransactionType::Sell, 2.0, 150.0, day(1))
            .unwrap();
        assert_eq!(portfolio.find_asset(id).unwrap().quantity, 0.0);
    }

    #[test]
    fn oversell_is_rejected() {
        let svc = PortfolioService::new();
        let (mut portfolio, id) = portfolio_with("BTC");
        svc.add_transaction(&mut portfolio, id, TransactionType::Buy, 1.0, 100.0, day(0))
            .unwrap();
        let err = svc
            .add_transaction(&mut portfolio, id, TransactionType::Sell, 1.5, 100.0, day(1))
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(msg) if msg.contains("Cannot sell")));
        assert_eq!(portfolio.find_asset(id).unwrap().transactions.len(), 1);
    }

    #[test]
    fn sell_before_the_buy_is_rejected() {
        let svc = PortfolioService::new();
        let (mut portfolio, id) = portfolio_with("BTC");
        svc.add_transaction(&mut portfolio, id, TransactionType::Buy, 1.0, 100.0, day(5))
            .unwrap();
        let err = svc
            .add_transaction(&mut portfolio, id, TransactionType::Sell, 0.5, 100.0, day(1))
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn backdated_sell_that_breaks_a_later_sell_is_rolled_back() {
        let svc = PortfolioService::new();
        let (mut portfolio, id) = portfolio_with("BTC");
        svc.add_transaction(&mut portfolio, id, TransactionType::Buy, 1.0, 100.0, day(0))
            .unwrap();
        svc.add_transaction(&mut portfolio, id, TransactionType::Sell, 1.0, 100.0, day(5))
            .unwrap();

        let err = svc
            .add_transaction(&mut portfolio, id, TransactionType::Sell, 0.5, 100.0, day(2))
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(msg) if msg.contains("oversell")));

        let asset = portfolio.find_asset(id).unwrap();
        assert_eq!(asset.transactions.len(), 2);
        assert_eq!(asset.quantity, 0.0);
    }

    #[test]
    fn invalid_amounts_are_rejected() {
        let svc = PortfolioService::new();
        let (mut portfolio, id) = portfolio_with("BTC");
        for (qty, price) in [(0.0, 1.0), (-1.0, 1.0), (f64::NAN, 1.0), (1.0, -1.0), (1.0, f64::INFINITY)] {
            let err = svc
                .add_transaction(&mut portfolio, id, TransactionType::Buy, qty, price, day(0))
                .unwrap_err();
            assert!(matches!(err, CoreError::ValidationError(_)), "{qty} @ {price}");
        }
        assert!(portfolio.find_asset(id).unwrap().transactions.is_empty());
    }

    #[test]
    fn free_coins_are_allowed() {
        let svc = PortfolioService::new();
        let (mut portfolio, id) = portfolio_with("BTC");
        svc.add_transaction(&mut portfolio, id, TransactionType::Buy, 1.0, 0.0, day(0))
            .unwrap();
        assert_eq!(portfolio.find_asset(id).unwrap().quantity, 1.0);
    }

    #[test]
    fn transaction_on_unknown_asset_fails() {
        let mut portfolio = Portfolio::default();
        let err = PortfolioService::new()
            .add_transaction(&mut portfolio, Uuid::new_v4(), TransactionType::Buy, 1.0, 1.0, day(0))
            .unwrap_err();
        assert!(matches!(err, CoreError::AssetNotFound(_)));
    }

    #[test]
    fn remove_transaction_updates_quantity() {
        let svc = PortfolioService::new();
        let (mut portfolio, id) = portfolio_with("BTC");
        let tx = svc
            .add_transaction(&mut portfolio, id, TransactionType::Buy, 1.0, 100.0, day(0))
            .unwrap();
        svc.add_transaction(&mut portfolio, id, TransactionType::Buy, 2.0, 100.0, day(1))
            .unwrap();

        let removed = svc.remove_transaction(&mut portfolio, id, tx).unwrap();
        assert_eq!(removed.id, tx);
        assert_eq!(portfolio.find_asset(id).unwrap().quantity, 2.0);
    }

    #[test]
    fn removing_a_buy_that_covers_a_sell_is_rolled_back() {
        let svc = PortfolioService::new();
        let (mut portfolio, id) = portfolio_with("BTC");
        let buy = svc
            .add_transaction(&mut portfolio, id, TransactionType::Buy, 1.0, 100.0, day(0))
            .unwrap();
        svc.add_transaction(&mut portfolio, id, TransactionType::Sell, 1.0, 100.0, day(1))
            .unwrap();

        let err = svc.remove_transaction(&mut portfolio, id, buy).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));

        let asset = portfolio.find_asset(id).unwrap();
        assert_eq!(asset.transactions.len(), 2);
        assert_eq!(asset.transactions[0].id, buy);
    }

    #[test]
    fn remove_unknown_transaction_fails() {
        let (mut portfolio, id) = portfolio_with("BTC");
        let err = PortfolioService::new()
            .remove_transaction(&mut portfolio, id, Uuid::new_v4())
            .unwrap_err();
        assert!(matches!(err, CoreError::TransactionNotFound(_)));
    }
}

// ═══════════════════════════════════════════════════════════════════
// PortfolioService — prices
// ═══════════════════════════════════════════════════════════════════

mod prices {
    use super::*;

    #[test]
    fn set_current_price_validates() {
        let svc = PortfolioService::new();
        let (mut portfolio, id) = portfolio_with("BTC");
        svc.set_current_price(&mut portfolio, id, 0.0).unwrap();
        assert!(svc.set_current_price(&mut portfolio, id, -1.0).is_err());
        assert!(svc.set_current_price(&mut portfolio, id, f64::NAN).is_err());
        assert!(svc.set_current_price(&mut portfolio, Uuid::new_v4(), 1.0).is_err());
    }

    #[test]
    fn set_and_clear_price_history() {
        let svc = PortfolioService::new();
        let (mut portfolio, id) = portfolio_with("BTC");
        let stored = svc
            .set_price_history(
                &mut portfolio,
                id,
                vec![
                    PricePoint::new(day(1), 2.0),
                    PricePoint::new(day(0), 1.0),
                    PricePoint::new(day(2), f64::INFINITY),
                ],
            )
            .unwrap();
        assert_eq!(stored, 2);
        assert_eq!(portfolio.find_asset(id).unwrap().price_history[0].price, 1.0);

        svc.clear_price_history(&mut portfolio, id).unwrap();
        assert!(!portfolio.find_asset(id).unwrap().has_history());
    }
}

// ═══════════════════════════════════════════════════════════════════
// AnalyticsService
// ═══════════════════════════════════════════════════════════════════

mod analytics {
    use super::*;

    fn two_asset_portfolio() -> Portfolio {
        let svc = PortfolioService::new();
        let mut portfolio = Portfolio::default();
        let btc = svc.add_asset(&mut portfolio, "BTC", "Bitcoin").unwrap();
        let eth = svc.add_asset(&mut portfolio, "ETH", "Ethereum").unwrap();
        svc.add_transaction(&mut portfolio, btc, TransactionType::Buy, 1.0, 100.0, day(0))
            .unwrap();
        svc.add_transaction(&mut portfolio, eth, TransactionType::Buy, 10.0, 20.0, day(1))
            .unwrap();
        svc.set_current_price(&mut portfolio, btc, 150.0).unwrap();
        svc.set_current_price(&mut portfolio, eth, 60.0).unwrap();
        portfolio
    }

    #[test]
    fn totals_and_returns() {
        let summary = AnalyticsService::new().get_portfolio_summary(&two_asset_portfolio(), day(10));
        assert_eq!(summary.asset_count, 2);
        assert_eq!(summary.total_value, 750.0);
        assert_eq!(summary.total_cost_basis, 300.0);
        assert_eq!(summary.total_profit_loss, 450.0);
        assert!((summary.total_return_pct - 150.0).abs() < 1e-9);
        assert_eq!(summary.as_of, day(10));
    }

    #[test]
    fn holdings_sorted_by_allocation() {
        let summary = AnalyticsService::new().get_portfolio_summary(&two_asset_portfolio(), day(10));
        let tickers: Vec<&str> = summary.holdings.iter().map(|h| h.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["ETH", "BTC"]);

        let eth = &summary.holdings[0];
        assert_eq!(eth.average_cost, 20.0);
        assert_eq!(eth.current_value, 600.0);
        assert!((eth.allocation_pct - 80.0).abs() < 1e-9);
        assert!((eth.return_pct - 200.0).abs() < 1e-9);

        let total: f64 = summary.holdings.iter().map(|h| h.allocation_pct).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn future_transactions_are_not_counted_yet() {
        let summary = AnalyticsService::new().get_portfolio_summary(&two_asset_portfolio(), day(0));
        assert_eq!(summary.asset_count, 1);
        assert_eq!(summary.holdings[0].ticker, "BTC");
    }

    #[test]
    fn sold_out_assets_are_excluded() {
        let svc = PortfolioService::new();
        let mut portfolio = two_asset_portfolio();
        let eth = portfolio.assets[1].id;
        svc.add_transaction(&mut portfolio, eth, TransactionType::Sell, 10.0, 50.0, day(2))
            .unwrap();
        let summary = AnalyticsService::new().get_portfolio_summary(&portfolio, day(10));
        assert_eq!(summary.asset_count, 1);
        assert_eq!(summary.total_value, 150.0);
    }

    #[test]
    fn empty_portfolio_has_zero_returns() {
        let summary = AnalyticsService::new().get_portfolio_summary(&Portfolio::default(), day(0));
        assert_eq!(summary.asset_count, 0);
        assert_eq!(summary.total_value, 0.0);
        assert_eq!(summary.total_return_pct, 0.0);
        assert!(summary.holdings.is_empty());
    }

    #[test]
    fn free_coins_have_zero_return_not_nan() {
        let svc = PortfolioService::new();
        let (mut portfolio, id) = portfolio_with("AIR");
        svc.add_transaction(&mut portfolio, id, TransactionType::Buy, 5.0, 0.0, day(0))
            .unwrap();
        svc.set_current_price(&mut portfolio, id, 2.0).unwrap();
        let summary = AnalyticsService::new().get_portfolio_summary(&portfolio, day(1));
        assert_eq!(summary.holdings[0].return_pct, 0.0);
        assert_eq!(summary.total_return_pct, 0.0);
        assert_eq!(summary.total_value, 10.0);
    }

    #[test]
    fn profitable_sell_reports_remaining_cost() {
        let svc = PortfolioService::new();
        let (mut portfolio, id) = portfolio_with("BTC");
        svc.add_transaction(&mut portfolio, id, TransactionType::Buy, 1.0, 100.0, day(0))
            .unwrap();
        svc.add_transaction(&mut portfolio, id, TransactionType::Sell, 0.5, 1_000.0, day(1))
            .unwrap();
        svc.set_current_price(&mut portfolio, id, 1_000.0).unwrap();

        let summary = AnalyticsService::new().get_portfolio_summary(&portfolio, day(2));
        let holding = &summary.holdings[0];
        assert_eq!(holding.cost_basis, 50.0);
        assert_eq!(holding.average_cost, 100.0);
        assert_eq!(holding.profit_loss, 450.0);
        assert!((holding.return_pct - 900.0).abs() < 1e-9);
    }
}

// ═══════════════════════════════════════════════════════════════════
// PriceService — with mock providers
// ═══════════════════════════════════════════════════════════════════

mod price_service {
    use super::*;

    #[tokio::test]
    async fn current_price_from_single_provider() {
        let svc = PriceService::new(registry_of(vec![Box::new(MockPriceProvider::new("A"))]));
        let quote = svc.fetch_current_price("BTC").await.unwrap();
        assert_eq!(quote.price, 60_000.0);
        assert_eq!(quote.sources, vec!["A".to_string()]);
    }

    #[tokio::test]
    async fn current_price_is_averaged_across_providers() {
        let svc = PriceService::new(registry_of(vec![
            Box::new(MockPriceProvider::new("A")),
            Box::new(FailingMockProvider),
            Box::new(MockPriceProvider::new("B").with_price("BTC", 62_000.0)),
        ]));
        let quote = svc.fetch_current_price("BTC").await.unwrap();
        assert_eq!(quote.price, 61_000.0);
        assert_eq!(quote.sources, vec!["A".to_string(), "B".to_string()]);
    }

    #[tokio::test]
    async fn invalid_prices_are_ignored() {
        let svc = PriceService::new(registry_of(vec![
            Box::new(MockPriceProvider::new("A").with_price("BTC", f64::NAN)),
            Box::new(MockPriceProvider::new("B")),
        ]));
        let quote = svc.fetch_current_price("BTC").await.unwrap();
        assert_eq!(quote.price, 60_000.0);
        assert_eq!(quote.sources, vec!["B".to_string()]);
    }

    #[tokio::test]
    async fn all_failing_returns_last_error() {
        let svc = PriceService::new(registry_of(vec![Box::new(FailingMockProvider)]));
        let err = svc.fetch_current_price("BTC").await.unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
    }

    #[tokio::test]
    async fn no_provider_fails() {
        let svc = PriceService::new(PriceProviderRegistry::new());
        assert!(!svc.has_providers());
        let err = svc.fetch_current_price("BTC").await.unwrap_err();
        assert!(matches!(err, CoreError::NoProvider));
    }

    #[tokio::test]
    async fn history_is_sorted() {
        let svc = PriceService::new(registry_of(vec![Box::new(MockPriceProvider::new("A"))]));
        let points = svc.fetch_history("BTC", day(0), day(5)).await.unwrap();
        let prices: Vec<f64> = points.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![40_000.0, 41_000.0, 42_000.0]);
    }

    #[tokio::test]
    async fn history_falls_back_past_failures_and_empty_results() {
        let svc = PriceService::new(registry_of(vec![
            Box::new(FailingMockProvider),
            Box::new(MockPriceProvider::new("Empty").without_history()),
            Box::new(MockPriceProvider::new("Full")),
        ]));
        let points = svc.fetch_history("BTC", day(0), day(1)).await.unwrap();
        assert_eq!(points.len(), 2);
    }

    #[tokio::test]
    async fn history_with_no_data_anywhere() {
        let svc = PriceService::new(registry_of(vec![Box::new(
            MockPriceProvider::new("Empty").without_history(),
        )]));
        let err = svc.fetch_history("BTC", day(0), day(1)).await.unwrap_err();
        assert!(matches!(err, CoreError::PriceNotAvailable { symbol } if symbol == "BTC"));
    }

    #[tokio::test]
    async fn history_rejects_inverted_range() {
        let svc = PriceService::new(registry_of(vec![Box::new(MockPriceProvider::new("A"))]));
        let err = svc.fetch_history("BTC", day(2), day(1)).await.unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[test]
    fn provider_names_in_registration_order() {
        let svc = PriceService::new(registry_of(vec![
            Box::new(MockPriceProvider::new("First")),
            Box::new(FailingMockProvider),
        ]));
        assert_eq!(svc.get_provider_names(), vec!["First".to_string(), "FailingMock".to_string()]);
    }
}
