//! Listing search.
//!
//! A [`ListingSource`] returns candidate listings for a category under a
//! price cap. The evaluation engine assumes nothing about their order.

mod ebay;
mod sample;

pub use ebay::EbayClient;
pub use sample::SampleSource;

use crate::config::SourceConfig;
use crate::error::Result;
use crate::listing::Listing;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of machine searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Laptop,
    Pc,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Laptop => "laptop",
            Category::Pc => "pc",
        }
    }

    /// Human-readable plural used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Laptop => "Laptops",
            Category::Pc => "PCs",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "laptop" => Ok(Category::Laptop),
            "pc" => Ok(Category::Pc),
            other => Err(format!("unknown category '{}', expected laptop or pc", other)),
        }
    }
}

/// Something that can search for listings.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn search(&self, category: Category, max_price: u32) -> Result<Vec<Listing>>;

    /// True when results come from the built-in sample catalogue.
    fn is_sample(&self) -> bool {
        false
    }
}

/// Pick the eBay client when a token is configured, the sample catalogue otherwise.
pub fn from_config(config: &SourceConfig) -> Result<Box<dyn ListingSource>> {
    match &config.ebay_token {
        Some(token) => Ok(Box::new(EbayClient::new(
            token.clone(),
            config.marketplace_id.clone(),
            config.limit,
        )?)),
        None => Ok(Box::new(SampleSource)),
    }
}
