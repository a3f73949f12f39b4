mod data;
mod health;
mod plugins;
mod scrape;

pub use data::data_handler;
pub use health::health_handler;
pub use plugins::plugins_handler;
pub use scrape::scrape_handler;
