use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::Path;

use crate::error::Result;
use crate::models::Product;

pub fn save_products(products: &[Product], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(products)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_products(path: &Path) -> Result<Vec<Product>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
