pub mod api;
pub mod archiver;
pub mod cli;
pub mod config;
pub mod crawler;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod frontier;
pub mod logging;
pub mod models;
pub mod parser;

pub use config::{Config, ScrapeConfig};
pub use error::{Result, ScrapeError};
pub use fetcher::{Fetch, HttpFetcher};
pub use models::Product;
