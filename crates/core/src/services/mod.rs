pub mod analytics_service;
pub mod chart_service;
pub mod estimator_service;
pub mod ledger_service;
pub mod portfolio_service;
pub mod price_service;
pub mod range_service;
pub mod series_service;
