use std::fs;
use std::path::Path;

use csv::Writer;
use tracing::info;

use crate::error::Result;
use crate::models::{self, Product};

pub const IMAGE_NOT_FOUND: &str = "Image not found";

/// Writes a spreadsheet-friendly CSV of the catalog. The image column holds the
/// local image path when `<image_dir>/<id>.jpg` exists.
pub fn export_csv(products: &[Product], image_dir: &Path, output: &Path) -> Result<usize> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = Writer::from_path(output)?;
    writer.write_record(["ID", "Title", "Category", "Price", "Image"])?;

    let mut missing = 0;
    for product in products {
        let image_path = models::image_filename(&product.id).map(|name| image_dir.join(name));
        let image = match image_path {
            Some(path) if path.exists() => path.display().to_string(),
            _ => {
                missing += 1;
                IMAGE_NOT_FOUND.to_string()
            }
        };
        writer.write_record([
            product.id.as_str(),
            product.title.as_str(),
            product.category.as_deref().unwrap_or_default(),
            product.price.as_str(),
            image.as_str(),
        ])?;
    }
    writer.flush()?;

    info!(rows = products.len(), missing_images = missing, path = %output.display(), "exported CSV");
    Ok(products.len())
}
