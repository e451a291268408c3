use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use url::Url;

use catalog_scraper::api::scrape_api;
use catalog_scraper::archiver::{load_products, save_products};
use catalog_scraper::cli::{Cli, Commands};
use catalog_scraper::crawler::HtmlCrawler;
use catalog_scraper::export::export_csv;
use catalog_scraper::logging::init_logging;
use catalog_scraper::{Config, HttpFetcher, ScrapeConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.log_json)?;

    let scrape_date = chrono::Local::now().format(Config::SCRAPE_DATE_FORMAT).to_string();
    let base = cli.global.scrape_config();

    match cli.command {
        Commands::Api {
            test,
            categories,
            max_pages,
            output,
            image_dir,
            skip_images,
        } => {
            let config = ScrapeConfig {
                max_pages,
                output,
                image_dir,
                download_images: !skip_images,
                categories: if categories.is_empty() { base.categories.clone() } else { categories },
                ..base
            }
            .with_test_mode(test);

            let fetcher = build_fetcher(&config)?;
            let products = scrape_api(&fetcher, &config, &scrape_date)?;
            save_products(&products, &config.output)
                .with_context(|| format!("writing {}", config.output.display()))?;
            info!(count = products.len(), path = %config.output.display(), "scraping complete");
        }
        Commands::Html {
            test,
            workers,
            max_pages,
            queue_size,
            output,
        } => {
            let config = ScrapeConfig {
                workers,
                max_pages,
                queue_max_size: queue_size,
                output,
                ..base
            }
            .with_test_mode(test);

            let fetcher = build_fetcher(&config)?;
            let products = HtmlCrawler::new(&fetcher, &config)?.run(&scrape_date)?;
            save_products(&products, &config.output)
                .with_context(|| format!("writing {}", config.output.display()))?;
            info!(count = products.len(), path = %config.output.display(), "crawl complete");
        }
        Commands::Export {
            input,
            output,
            image_dir,
        } => {
            let products = load_products(&input).with_context(|| format!("reading {}", input.display()))?;
            export_csv(&products, &image_dir, &output)?;
        }
    }

    Ok(())
}

fn build_fetcher(config: &ScrapeConfig) -> Result<HttpFetcher> {
    Url::parse(&config.base_url).with_context(|| format!("invalid base URL {}", config.base_url))?;
    Ok(HttpFetcher::new(&config.user_agent, config.timeout)?)
}
