use std::collections::HashMap;

use catalog_scraper::{Fetch, Result, ScrapeError};
use parking_lot::Mutex;

/// In-memory site: URL -> body. Unknown URLs answer 404.
#[derive(Default)]
pub struct FakeSite {
    pages: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl FakeSite {
    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.as_bytes().to_vec());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn was_requested(&self, url: &str) -> bool {
        self.requests.lock().iter().any(|r| r == url)
    }

    fn lookup(&self, url: &str) -> Result<Vec<u8>> {
        self.requests.lock().push(url.to_string());
        self.pages.get(url).cloned().ok_or_else(|| ScrapeError::Status {
            status: 404,
            url: url.to_string(),
        })
    }
}

impl Fetch for FakeSite {
    fn get_text(&self, url: &str) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.lookup(url)?).into_owned())
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        self.lookup(url)
    }
}
