use parking_lot::Mutex;
use tracing::{debug, info, info_span, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::error::{Result, ScrapeError};
use crate::fetcher::Fetch;
use crate::frontier::{Frontier, PushOutcome, Task, TaskKind};
use crate::models::{self, Product};
use crate::parser::{self, Selectors};

/// HTML crawl: menu categories -> listing pages -> product detail pages.
pub struct HtmlCrawler<'a, F: Fetch> {
    fetcher: &'a F,
    config: &'a ScrapeConfig,
    selectors: Selectors,
    frontier: Frontier,
    products: Mutex<Vec<Product>>,
}

impl<'a, F: Fetch> HtmlCrawler<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a ScrapeConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| ScrapeError::url(&config.base_url, e))?;
        let allowed_host = base.host_str().map(str::to_string);

        Ok(Self {
            fetcher,
            config,
            selectors: Selectors::new()?,
            frontier: Frontier::new(allowed_host, config.queue_max_size),
            products: Mutex::new(Vec::new()),
        })
    }

    /// Runs the crawl to completion. Only a failure on the homepage is fatal.
    pub fn run(self, scrape_date: &str) -> Result<Vec<Product>> {
        let seeded = self.seed_categories()?;
        info!(categories = seeded, workers = self.config.workers, "starting HTML crawl");

        std::thread::scope(|s| {
            for id in 0..self.config.workers.max(1) {
                let crawler = &self;
                s.spawn(move || {
                    let span = info_span!("worker", id);
                    let _enter = span.enter();
                    while let Some(guard) = crawler.frontier.next() {
                        crawler.process(&guard.task);
                    }
                    debug!("queue drained");
                });
            }
        });

        info!(pages = self.frontier.seen_count(), "HTML crawl finished");
        let products = self.products.into_inner();
        Ok(models::assemble(products, scrape_date))
    }

    fn seed_categories(&self) -> Result<usize> {
        let base_url = &self.config.base_url;
        let base = Url::parse(base_url).map_err(|e| ScrapeError::url(base_url, e))?;
        let home = self.fetcher.get_text(base_url)?;

        let links = self.selectors.category_links(&home);
        if links.is_empty() {
            return Err(ScrapeError::NoCategories(base_url.clone()));
        }

        let mut seeded = 0;
        for href in links {
            let category = parser::category_from_path(&href);
            if let Some(slug) = category.as_deref() {
                if self.config.is_excluded(slug) {
                    info!(category = slug, "skipping category");
                    continue;
                }
            }
            let url = match base.join(&href) {
                Ok(url) => url,
                Err(e) => {
                    warn!(href, error = %e, "unusable category link");
                    continue;
                }
            };
            info!(%url, "found category link");
            let task = Task {
                url: url.into(),
                category,
                kind: TaskKind::Listing { page: 1 },
            };
            if self.enqueue(task) {
                seeded += 1;
            }
        }
        Ok(seeded)
    }

    fn enqueue(&self, task: Task) -> bool {
        match self.frontier.push(task.clone()) {
            PushOutcome::Queued => true,
            PushOutcome::Full => {
                warn!(url = %task.url, "queue full, dropping URL");
                false
            }
            outcome => {
                debug!(url = %task.url, ?outcome, "not queued");
                false
            }
        }
    }

    fn process(&self, task: &Task) {
        let html = match self.fetcher.get_text(&task.url) {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %task.url, error = %e, "fetch failed, skipping");
                return;
            }
        };

        if let TaskKind::Listing { page } = task.kind {
            self.follow_listing(task, page, &html);
        }

        if let Some(mut product) = self.selectors.product_detail(&html) {
            product.category = task.category.clone();
            debug!(id = %product.id, title = %product.title, "scraped product");
            self.products.lock().push(product);
        }
    }

    fn follow_listing(&self, task: &Task, page: u32, html: &str) {
        let listing = match self.selectors.listing(html, &task.url) {
            Ok(listing) => listing,
            Err(e) => {
                warn!(url = %task.url, error = %e, "unparseable listing page");
                return;
            }
        };

        debug!(url = %task.url, products = listing.product_links.len(), "listing page");
        for link in listing.product_links {
            self.enqueue(Task {
                url: link,
                category: task.category.clone(),
                kind: TaskKind::Detail,
            });
        }

        match listing.next_page {
            Some(next) if page < self.config.max_pages => {
                info!(url = %next, page = page + 1, "found next page");
                self.enqueue(Task {
                    url: next,
                    category: task.category.clone(),
                    kind: TaskKind::Listing { page: page + 1 },
                });
            }
            Some(_) => debug!(url = %task.url, "page limit reached"),
            None => {}
        }
    }
}
