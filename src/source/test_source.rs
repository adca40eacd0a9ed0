//! Implements the `DataSource` trait using an embedded copy of a small feed.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the
//! whole app, top-to-bottom, without network access.

use crate::error::Res;
use crate::source::DataSource;
use anyhow::Context;
use serde_json::Value;

/// A `DataSource` that serves a JSON document held in memory. By default it is seeded with a
/// dozen items spread across three months.
pub(crate) struct TestSource {
    json: String,
}

impl TestSource {
    pub(crate) fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl Default for TestSource {
    fn default() -> Self {
        Self::new(SEED_DATA)
    }
}

#[async_trait::async_trait]
impl DataSource for TestSource {
    async fn fetch(&self) -> Res<Vec<Value>> {
        serde_json::from_str(&self.json).context("The test feed is not a JSON array")
    }
}

/// Seed feed data.
const SEED_DATA: &str = r##"[
  {"id": 1, "title": "Fjallraven Foldsack No 1 Backpack", "price": 329.85, "description": "Your perfect pack for everyday use", "category": "men's clothing", "image": "https://example.com/1.jpg", "sold": false, "dateOfSale": "2021-11-27T20:29:54+05:30"},
  {"id": 2, "title": "Mens Casual Premium Slim Fit T-Shirts", "price": 44.6, "description": "Slim-fitting style", "category": "men's clothing", "image": "https://example.com/2.jpg", "sold": false, "dateOfSale": "2021-10-27T20:29:54+05:30"},
  {"id": 3, "title": "Mens Cotton Jacket", "price": 615.89, "description": "Great outerwear jacket", "category": "men's clothing", "image": "https://example.com/3.jpg", "sold": true, "dateOfSale": "2022-07-27T20:29:54+05:30"},
  {"id": 4, "title": "Mens Casual Slim Fit", "price": 31.98, "description": "The color could be slightly different", "category": "men's clothing", "image": "https://example.com/4.jpg", "sold": false, "dateOfSale": "2021-10-27T20:29:54+05:30"},
  {"id": 5, "title": "John Hardy Women's Legends Naga Bracelet", "price": 6950, "description": "From our Legends Collection", "category": "jewelery", "image": "https://example.com/5.jpg", "sold": false, "dateOfSale": "2022-07-27T20:29:54+05:30"},
  {"id": 6, "title": "Solid Gold Petite Micropave", "price": 168, "description": "Satisfaction Guaranteed", "category": "jewelery", "image": "https://example.com/6.jpg", "sold": true, "dateOfSale": "2021-11-27T20:29:54+05:30"},
  {"id": 7, "title": "White Gold Plated Princess", "price": 9.99, "description": "Classic Created Wedding Engagement Solitaire Diamond Promise Ring", "category": "jewelery", "image": "https://example.com/7.jpg", "sold": true, "dateOfSale": "2021-10-27T20:29:54+05:30"},
  {"id": 8, "title": "Pierced Owl Rose Gold Plated Stainless Steel Double", "price": 10.99, "description": "Rose Gold Plated Double Flared Tunnel Plug Earrings", "category": "jewelery", "image": "https://example.com/8.jpg", "sold": false, "dateOfSale": "2022-07-27T20:29:54+05:30"},
  {"id": 9, "title": "WD 2TB Elements Portable External Hard Drive", "price": 64, "description": "USB 3.0 and USB 2.0 compatibility", "category": "electronics", "image": "https://example.com/9.jpg", "sold": true, "dateOfSale": "2021-11-27T20:29:54+05:30"},
  {"id": 10, "title": "SanDisk SSD PLUS 1TB Internal SSD", "price": 109, "description": "Easy upgrade for faster boot up", "category": "electronics", "image": "https://example.com/10.jpg", "sold": false, "dateOfSale": "2022-07-27T20:29:54+05:30"},
  {"id": 11, "title": "Silicon Power 256GB SSD", "price": 109.5, "description": "3D NAND flash", "category": "electronics", "image": "https://example.com/11.jpg", "sold": true, "dateOfSale": "2021-11-27T20:29:54+05:30"},
  {"id": 12, "title": "WD 4TB Gaming Drive", "price": 114, "description": "Expand your PS4 gaming experience", "category": "electronics", "image": "https://example.com/12.jpg", "sold": false, "dateOfSale": "2021-10-27T20:29:54+05:30"}
]"##;
