use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{Config, ScrapeConfig};

#[derive(Parser, Debug)]
#[command(name = "catalog-scraper")]
#[command(about = "Scrapes a retail product catalog into a JSON file")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(long, global = true, default_value = Config::BASE_URL, help = "Shop root URL")]
    pub base_url: String,

    #[arg(long, global = true, default_value = Config::USER_AGENT)]
    pub user_agent: String,

    #[arg(long, global = true, default_value_t = Config::TIMEOUT_SECS, help = "Request timeout in seconds")]
    pub timeout: u64,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Page through the shop's JSON API per category and download images.
    Api {
        #[arg(short, long, help = "Test mode: one page per category")]
        test: bool,

        #[arg(short, long = "category", help = "Category to scrape (repeatable; defaults to the built-in list)")]
        categories: Vec<String>,

        #[arg(long, default_value_t = Config::API_MAX_PAGES, value_parser = clap::value_parser!(u32).range(1..))]
        max_pages: u32,

        #[arg(short, long, default_value = Config::OUTPUT_PATH)]
        output: PathBuf,

        #[arg(long, default_value = Config::IMAGE_DIR)]
        image_dir: PathBuf,

        #[arg(long, help = "Record image filenames without downloading")]
        skip_images: bool,
    },

    /// Crawl category, listing and product pages from the homepage menu.
    Html {
        #[arg(short, long, help = "Test mode: one listing page per category")]
        test: bool,

        #[arg(short, long, default_value_t = Config::WORKERS)]
        workers: usize,

        #[arg(
            long,
            default_value_t = Config::HTML_MAX_PAGES,
            value_parser = clap::value_parser!(u32).range(1..),
            help = "Listing pages to follow per category"
        )]
        max_pages: u32,

        #[arg(long, default_value_t = Config::QUEUE_MAX_SIZE)]
        queue_size: usize,

        #[arg(short, long, default_value = Config::OUTPUT_PATH)]
        output: PathBuf,
    },

    /// Convert a products file into CSV.
    Export {
        #[arg(short, long, default_value = Config::OUTPUT_PATH)]
        input: PathBuf,

        #[arg(short, long, default_value = Config::CSV_PATH)]
        output: PathBuf,

        #[arg(long, default_value = Config::IMAGE_DIR)]
        image_dir: PathBuf,
    },
}

impl GlobalArgs {
    pub fn scrape_config(&self) -> ScrapeConfig {
        ScrapeConfig {
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout),
            ..ScrapeConfig::default()
        }
    }
}
