use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One catalog entry as written to the products file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub price: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub measurements: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrape_date: Option<String>,
}

impl Product {
    pub fn is_usable(&self) -> bool {
        !self.id.trim().is_empty()
    }
}

/// Final pass over collected records: drops records without an id, keeps the
/// first record per id and stamps the scrape date.
pub fn assemble(products: Vec<Product>, scrape_date: &str) -> Vec<Product> {
    let mut seen = HashSet::new();
    products
        .into_iter()
        .filter(Product::is_usable)
        .filter(|p| seen.insert(p.id.clone()))
        .map(|mut p| {
            p.scrape_date = Some(scrape_date.to_string());
            p
        })
        .collect()
}

// Shop API payload: {"pageData": {"products": [...]}}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    #[serde(default)]
    pub page_data: PageData,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageData {
    #[serde(default)]
    pub products: Vec<ApiProduct>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiProduct {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub prices: ApiPrices,
    #[serde(default)]
    pub media: ApiMedia,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPrices {
    #[serde(default)]
    pub current_price: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiMedia {
    #[serde(default)]
    pub full: Vec<ApiImage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiImage {
    #[serde(default)]
    pub src: String,
}

impl ApiProduct {
    pub fn formatted_price(&self) -> String {
        format!("${:.2}", self.prices.current_price)
    }

    pub fn image_url(&self) -> Option<&str> {
        self.media
            .full
            .first()
            .map(|image| image.src.as_str())
            .filter(|src| !src.is_empty())
    }

    /// `<id>.jpg`, or `None` when the id cannot name a file inside the image dir.
    pub fn image_filename(&self) -> Option<String> {
        image_filename(&self.id)
    }
}

pub fn image_filename(id: &str) -> Option<String> {
    let id = id.trim();
    if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
        return None;
    }
    Some(format!("{id}.jpg"))
}
