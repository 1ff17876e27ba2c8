//! eBay Browse API search client.

use super::{Category, ListingSource};
use crate::error::{CheckerError, Result};
use crate::listing::Listing;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const SEARCH_URL: &str = "https://api.ebay.com/buy/browse/v1/item_summary/search";
const MAX_LIMIT: u32 = 50;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    item_summaries: Vec<ItemSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemSummary {
    title: Option<String>,
    price: Option<Price>,
    item_web_url: Option<String>,
    condition: Option<String>,
    item_location: Option<ItemLocation>,
}

#[derive(Debug, Deserialize)]
struct Price {
    value: Option<Value>,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ItemLocation {
    country: Option<String>,
}

/// Client for the eBay `item_summary/search` endpoint.
#[derive(Clone)]
pub struct EbayClient {
    client: Client,
    token: String,
    marketplace_id: String,
    limit: u32,
    search_url: String,
}

impl EbayClient {
    pub fn new(token: String, marketplace_id: String, limit: u32) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            token,
            marketplace_id,
            limit,
            search_url: SEARCH_URL.to_string(),
        })
    }

    /// Point the client at a different search endpoint.
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    fn query(&self, category: Category, max_price: u32) -> Vec<(&'static str, String)> {
        let term = match category {
            Category::Laptop => "laptop",
            Category::Pc => "gaming pc",
        };

        vec![
            ("q", term.to_string()),
            ("limit", self.limit.min(MAX_LIMIT).to_string()),
            ("filter", format!("price:[..{}],priceCurrency:EUR", max_price)),
            ("sort", "price".to_string()),
        ]
    }
}

#[async_trait]
impl ListingSource for EbayClient {
    async fn search(&self, category: Category, max_price: u32) -> Result<Vec<Listing>> {
        debug!(%category, max_price, "Searching eBay");

        let response = self
            .client
            .get(&self.search_url)
            .query(&self.query(category, max_price))
            .bearer_auth(&self.token)
            .header("X-EBAY-C-MARKETPLACE-ID", &self.marketplace_id)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CheckerError::Search(format!(
                "Request failed ({}): {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: SearchResponse = serde_json::from_str(&body)?;
        Ok(parsed
            .item_summaries
            .into_iter()
            .filter_map(|item| match into_listing(item) {
                Ok(listing) => Some(listing),
                Err(e) => {
                    warn!(error = %e, "Skipping eBay item");
                    None
                }
            })
            .collect())
    }
}

fn into_listing(item: ItemSummary) -> Result<Listing> {
    let (price, currency) = match item.price {
        Some(price) => (parse_price(price.value.as_ref())?, price.currency),
        None => (0.0, None),
    };

    let listing = Listing::new(
        item.title.unwrap_or_else(|| "untitled".to_string()),
        price,
        item.item_web_url.unwrap_or_else(|| "#".to_string()),
    )?
    .with_currency(currency.unwrap_or_else(|| "EUR".to_string()))
    .with_condition(item.condition.unwrap_or_else(|| "unknown".to_string()))
    .with_location(
        item.item_location
            .and_then(|loc| loc.country)
            .unwrap_or_else(|| "unknown".to_string()),
    );

    Ok(listing)
}

/// eBay sends prices as decimal strings; numbers are accepted too.
fn parse_price(value: Option<&Value>) -> Result<f64> {
    match value {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| CheckerError::Search(format!("unusable price {}", n))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| CheckerError::Search(format!("unusable price '{}'", s))),
        Some(other) => Err(CheckerError::Search(format!("unusable price {}", other))),
    }
}
