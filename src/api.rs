use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::ScrapeConfig;
use crate::error::Result;
use crate::fetcher::Fetch;
use crate::models::{self, ApiProduct, Product};
use crate::parser;

/// Walks the shop API category by category, page by page.
///
/// A category ends at the first empty page, or at the first page that cannot
/// be fetched or decoded.
pub fn scrape_api<F: Fetch>(fetcher: &F, config: &ScrapeConfig, scrape_date: &str) -> Result<Vec<Product>> {
    if config.download_images {
        fs::create_dir_all(&config.image_dir)?;
    }

    let mut products = Vec::new();
    for category in &config.categories {
        if config.is_excluded(category) {
            info!(category = %category, "skipping category");
            continue;
        }
        info!(category = %category, "scraping category");
        scrape_category(fetcher, config, category, &mut products);
    }

    Ok(models::assemble(products, scrape_date))
}

fn scrape_category<F: Fetch>(fetcher: &F, config: &ScrapeConfig, category: &str, out: &mut Vec<Product>) {
    for page in 1..=config.max_pages {
        let url = config.api_url(category, page);
        info!(%url, "fetching API page");

        let body = match fetcher.get_text(&url) {
            Ok(body) => body,
            Err(e) => {
                warn!(%url, error = %e, "failed to fetch API page");
                break;
            }
        };
        let response = match parser::api_page(&body) {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, error = %e, "failed to parse API response");
                break;
            }
        };

        let items = response.page_data.products;
        if items.is_empty() {
            info!(category, "no more products");
            break;
        }

        for item in items {
            let product = to_product(fetcher, config, category, item);
            debug!(
                id = %product.id,
                title = %product.title,
                price = %product.price,
                image = %product.image,
                "scraped product"
            );
            out.push(product);
        }
    }
}

fn to_product<F: Fetch>(fetcher: &F, config: &ScrapeConfig, category: &str, item: ApiProduct) -> Product {
    let image = item.image_filename();

    if config.download_images {
        match (item.image_url(), &image) {
            (Some(src), Some(filename)) => {
                let path = config.image_dir.join(filename);
                if let Err(e) = download_image(fetcher, src, &path) {
                    warn!(id = %item.id, url = src, error = %e, "image download failed");
                }
            }
            (Some(src), None) => warn!(id = ?item.id, url = src, "unsafe product id, image not saved"),
            (None, _) => {}
        }
    }

    Product {
        price: item.formatted_price(),
        id: item.id,
        title: item.name,
        category: Some(category.to_string()),
        image: image.unwrap_or_default(),
        ..Product::default()
    }
}

pub fn download_image<F: Fetch>(fetcher: &F, url: &str, path: &Path) -> Result<()> {
    let bytes = fetcher.get_bytes(url)?;
    fs::write(path, bytes)?;
    Ok(())
}
