use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{Result, ScrapeError};
use crate::models::{ApiResponse, Product};

/// Links found on a category listing page.
#[derive(Debug, Default, PartialEq)]
pub struct Listing {
    pub product_links: Vec<String>,
    pub next_page: Option<String>,
}

/// Compiled CSS selectors for the shop's markup.
pub struct Selectors {
    menu_link: Selector,
    product_tile: Selector,
    product_name_link: Selector,
    next_page: Selector,
    detail: Selector,
    item_id: Selector,
    title: Selector,
    price: Selector,
    image: Selector,
    measurements: Selector,
    materials: Selector,
    features: Selector,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

fn collapse(text: impl Iterator<Item = impl AsRef<str>>) -> String {
    let joined: String = text.map(|t| t.as_ref().to_string()).collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse(element.text())
}

impl Selectors {
    pub fn new() -> Result<Self> {
        Ok(Self {
            menu_link: selector("div.menu-tier-1 a")?,
            product_tile: selector("div.product-tile")?,
            product_name_link: selector("div.product-name a")?,
            next_page: selector("a.pagination-next")?,
            detail: selector("div.product-detail")?,
            item_id: selector("div[data-item-id]")?,
            title: selector("h1.product-name")?,
            price: selector("span.product-sales-price")?,
            image: selector("img.primary-image")?,
            measurements: selector("ul.measurements-list li")?,
            materials: selector("ul.materials-list li")?,
            features: selector("ul.features-list li")?,
        })
    }

    /// Category "view-all" hrefs from the navigation menu, in page order.
    pub fn category_links(&self, html: &str) -> Vec<String> {
        let doc = Html::parse_document(html);
        let mut links: Vec<String> = Vec::new();
        for anchor in doc.select(&self.menu_link) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if href.starts_with("/shop/") && href.contains("view-all") && !links.iter().any(|l| l == href) {
                links.push(href.to_string());
            }
        }
        links
    }

    /// Product links and the next-page link, resolved against `page_url`.
    pub fn listing(&self, html: &str, page_url: &str) -> Result<Listing> {
        let base = Url::parse(page_url).map_err(|e| ScrapeError::url(page_url, e))?;
        let doc = Html::parse_document(html);

        let product_links = doc
            .select(&self.product_tile)
            .filter_map(|tile| tile.select(&self.product_name_link).next())
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| !href.trim().is_empty())
            .filter_map(|href| base.join(href.trim()).ok())
            .map(String::from)
            .collect();

        let next_page = doc
            .select(&self.next_page)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| base.join(href.trim()).ok())
            .map(String::from)
            .next();

        Ok(Listing {
            product_links,
            next_page,
        })
    }

    /// Extracts a product from a detail page, or `None` if the page has no detail block.
    pub fn product_detail(&self, html: &str) -> Option<Product> {
        let doc = Html::parse_document(html);
        let detail = doc.select(&self.detail).next()?;

        let first_text = |sel: &Selector| {
            detail
                .select(sel)
                .next()
                .map(element_text)
                .unwrap_or_default()
        };
        let first_attr = |sel: &Selector, attr: &str| {
            detail
                .select(sel)
                .next()
                .and_then(|e| e.value().attr(attr))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        let all_texts = |sel: &Selector| {
            detail
                .select(sel)
                .map(element_text)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
        };

        Some(Product {
            id: first_attr(&self.item_id, "data-item-id"),
            title: first_text(&self.title),
            category: None,
            price: first_text(&self.price),
            image: first_attr(&self.image, "src"),
            measurements: all_texts(&self.measurements),
            materials: all_texts(&self.materials),
            features: all_texts(&self.features),
            scrape_date: None,
        })
    }
}

pub fn api_page(body: &str) -> Result<ApiResponse> {
    Ok(serde_json::from_str(body)?)
}

/// Slug of a `/shop/<slug>/...` path or URL.
pub fn category_from_path(href: &str) -> Option<String> {
    let path = match Url::parse(href) {
        Ok(url) => url.path().to_string(),
        Err(_) => href.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    match (segments.next(), segments.next()) {
        (Some("shop"), Some(slug)) => Some(slug.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = r#"
        <html><body>
          <div class="menu-tier-1 css-1h5bbey">
            <div><a href="/shop/handbags/view-all">Handbags</a></div>
            <div><a href="/shop/wallets/view-all?sort=new">Wallets</a></div>
            <div><a href="/shop/handbags/view-all">Handbags again</a></div>
            <div><a href="/shop/sale">Sale</a></div>
            <div><a href="https://other.test/shop/x/view-all">External</a></div>
          </div>
          <a href="/shop/shoes/view-all">Outside the menu</a>
        </body></html>"#;

    const LISTING: &str = r#"
        <div class="product-tile"><div class="product-name"><a href="/products/tote/KA1.html">Tote</a></div></div>
        <div class="product-tile"><div class="product-name"><a href="">Empty</a></div></div>
        <div class="product-tile"><span>no link</span></div>
        <div class="product-tile"><div class="product-name"><a href="https://www.shop.test/products/clutch/KA2.html">Clutch</a></div></div>
        <a class="pagination-next" href="?page=2">Next</a>"#;

    const DETAIL: &str = r#"
        <div class="product-detail">
          <div data-item-id="KA1"></div>
          <h1 class="product-name">  Knott
             Large Tote </h1>
          <span class="product-sales-price">$298.00</span>
          <img class="primary-image" src="https://img.test/KA1.jpg">
          <ul class="measurements-list"><li>11" H</li><li>14" W</li></ul>
          <ul class="materials-list"><li>Pebbled leather</li></ul>
          <ul class="features-list"><li>Zip top</li><li> </li></ul>
        </div>"#;

    #[test]
    fn extracts_menu_category_links() {
        let selectors = Selectors::new().unwrap();
        assert_eq!(
            selectors.category_links(HOME),
            vec!["/shop/handbags/view-all", "/shop/wallets/view-all?sort=new"]
        );
    }

    #[test]
    fn extracts_listing_links() {
        let selectors = Selectors::new().unwrap();
        let listing = selectors
            .listing(LISTING, "https://www.shop.test/shop/handbags/view-all")
            .unwrap();
        assert_eq!(
            listing.product_links,
            vec![
                "https://www.shop.test/products/tote/KA1.html",
                "https://www.shop.test/products/clutch/KA2.html",
            ]
        );
        assert_eq!(
            listing.next_page.as_deref(),
            Some("https://www.shop.test/shop/handbags/view-all?page=2")
        );
    }

    #[test]
    fn listing_rejects_bad_page_url() {
        let selectors = Selectors::new().unwrap();
        assert!(matches!(
            selectors.listing(LISTING, "not a url"),
            Err(ScrapeError::Url { .. })
        ));
    }

    #[test]
    fn extracts_product_detail() {
        let selectors = Selectors::new().unwrap();
        let product = selectors.product_detail(DETAIL).unwrap();
        assert_eq!(product.id, "KA1");
        assert_eq!(product.title, "Knott Large Tote");
        assert_eq!(product.price, "$298.00");
        assert_eq!(product.image, "https://img.test/KA1.jpg");
        assert_eq!(product.measurements, vec!["11\" H", "14\" W"]);
        assert_eq!(product.materials, vec!["Pebbled leather"]);
        assert_eq!(product.features, vec!["Zip top"]);
    }

    #[test]
    fn listing_page_is_not_a_product() {
        let selectors = Selectors::new().unwrap();
        assert!(selectors.product_detail(LISTING).is_none());
    }

    #[test]
    fn malformed_api_body_is_an_error() {
        assert!(api_page("<html>").is_err());
        assert!(api_page("{}").unwrap().page_data.products.is_empty());
    }

    #[test]
    fn category_slug_from_href() {
        assert_eq!(category_from_path("/shop/handbags/view-all").as_deref(), Some("handbags"));
        assert_eq!(
            category_from_path("https://www.shop.test/shop/wallets/view-all?page=2").as_deref(),
            Some("wallets")
        );
        assert_eq!(category_from_path("/products/tote.html"), None);
    }
}
