// Defaults for both crawl modes

use std::path::PathBuf;
use std::time::Duration;

pub struct Config;

impl Config {
    pub const BASE_URL: &'static str = "https://www.katespade.com";
    pub const USER_AGENT: &'static str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";
    pub const TIMEOUT_SECS: u64 = 30;
    pub const MAX_REDIRECTS: usize = 10;

    // HTML crawl
    pub const WORKERS: usize = 2;
    pub const QUEUE_MAX_SIZE: usize = 10_000;
    pub const HTML_MAX_PAGES: u32 = 1_000;

    // API crawl
    pub const API_MAX_PAGES: u32 = 1_000;
    pub const CATEGORIES: [&'static str; 6] = [
        "handbags",
        "wallets",
        "jewelry",
        "shoes",
        "clothing",
        "accessories",
    ];
    pub const EXCLUDED_CATEGORIES: [&'static str; 4] = ["new", "home", "gifts", "sale"];

    // Output
    pub const OUTPUT_PATH: &'static str = "data/products.json";
    pub const IMAGE_DIR: &'static str = "data/images";
    pub const CSV_PATH: &'static str = "data/products.csv";
    pub const SCRAPE_DATE_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";
}

/// Runtime settings shared by the API and HTML crawls.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub workers: usize,
    pub queue_max_size: usize,
    /// Listing pages per category (HTML) or API pages per category.
    pub max_pages: u32,
    pub categories: Vec<String>,
    pub excluded_categories: Vec<String>,
    pub output: PathBuf,
    pub image_dir: PathBuf,
    pub download_images: bool,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: Config::BASE_URL.to_string(),
            user_agent: Config::USER_AGENT.to_string(),
            timeout: Duration::from_secs(Config::TIMEOUT_SECS),
            workers: Config::WORKERS,
            queue_max_size: Config::QUEUE_MAX_SIZE,
            max_pages: Config::API_MAX_PAGES,
            categories: Config::CATEGORIES.iter().map(|c| c.to_string()).collect(),
            excluded_categories: Config::EXCLUDED_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            output: PathBuf::from(Config::OUTPUT_PATH),
            image_dir: PathBuf::from(Config::IMAGE_DIR),
            download_images: true,
        }
    }
}

impl ScrapeConfig {
    /// Test mode scrapes a single page per category.
    pub fn with_test_mode(mut self, test: bool) -> Self {
        if test {
            self.max_pages = 1;
        }
        self
    }

    pub fn is_excluded(&self, category: &str) -> bool {
        self.excluded_categories.iter().any(|c| c == category)
    }

    pub fn api_url(&self, category: &str, page: u32) -> String {
        format!(
            "{}/api/get-shop/{}/view-all?page={}",
            self.base_url.trim_end_matches('/'),
            category,
            page
        )
    }
}
