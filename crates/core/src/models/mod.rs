pub mod analytics;
pub mod asset;
pub mod chart;
pub mod portfolio;
pub mod price;
pub mod range;
pub mod settings;
pub mod transaction;
