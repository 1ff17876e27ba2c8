//! Built-in sample catalogue used when no marketplace token is configured.

use super::{Category, ListingSource};
use crate::error::Result;
use crate::listing::Listing;
use async_trait::async_trait;

const SAMPLE_URL: &str = "https://www.ebay.de/";

#[derive(Debug, Clone, Copy, Default)]
pub struct SampleSource;

impl SampleSource {
    /// Sample listings for a category. One entry per category is priced at
    /// the cap, but never above 200.
    pub fn listings(category: Category, max_price: u32) -> Result<Vec<Listing>> {
        let capped = f64::from(max_price.min(200));

        let rows: [(&str, f64, &str); 3] = match category {
            Category::Pc => [
                ("Gaming PC Ryzen 5 3600 16GB RAM GTX 1660", capped, "Used"),
                ("Office PC Intel i5-8500 8GB RAM Intel UHD", 129.0, "Used"),
                ("Gaming Rechner i7-8700 16GB RAM GTX 1070", 199.0, "Refurbished"),
            ],
            Category::Laptop => [
                ("Lenovo ThinkPad T480 i5-8250U 16GB RAM", 199.0, "Used"),
                ("HP 250 G7 Intel i3-7020U 8GB RAM", 179.0, "Used"),
                ("Dell Latitude 5590 i5-8350U 16GB RAM", capped, "Refurbished"),
            ],
        };

        rows.into_iter()
            .map(|(title, price, condition)| -> Result<Listing> {
                Ok(Listing::new(title, price, SAMPLE_URL)?
                    .with_condition(condition)
                    .with_location("DE"))
            })
            .collect()
    }
}

#[async_trait]
impl ListingSource for SampleSource {
    async fn search(&self, category: Category, max_price: u32) -> Result<Vec<Listing>> {
        Self::listings(category, max_price)
    }

    fn is_sample(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_laptops() {
        let listings = SampleSource.search(Category::Laptop, 150).await.unwrap();
        assert_eq!(listings.len(), 3);
        assert_eq!(listings[0].title(), "Lenovo ThinkPad T480 i5-8250U 16GB RAM");
        assert_eq!(listings[2].price(), 150.0);
        assert!(listings.iter().all(|l| l.location() == "DE"));
    }

    #[test]
    fn test_sample_price_cap_never_exceeds_200() {
        let listings = SampleSource::listings(Category::Pc, 900).unwrap();
        assert_eq!(listings[0].price(), 200.0);
        assert_eq!(listings[2].condition(), "Refurbished");
    }
}
