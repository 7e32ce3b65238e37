// Listing-page parsing: product links of the laptop category
use crate::model::ParserError;
use crate::parser::{selector, PageParser};
use scraper::Html;
use std::collections::HashSet;

pub struct ListingParser {
    link_prefix: String,
}

impl ListingParser {
    pub fn new(link_prefix: &str) -> Self {
        Self {
            link_prefix: link_prefix.to_string(),
        }
    }

    fn is_product_link(&self, link: &str) -> bool {
        link.starts_with(&self.link_prefix) && !link.ends_with("#priceagent") && !link.contains("galleri")
    }
}

impl PageParser for ListingParser {
    type Output = Vec<String>;

    /// Product links in page order, without duplicates.
    fn parse(&self, html: &str) -> Result<Vec<String>, ParserError> {
        let document = Html::parse_document(html);

        let list_selector = selector("ul.product-result.product-list")?;
        let link_selector = selector("a[href]")?;

        let list = document
            .select(&list_selector)
            .next()
            .ok_or_else(|| ParserError::MissingField("product list".into()))?;

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for anchor in list.select(&link_selector) {
            let Some(link) = anchor.value().attr("href") else {
                continue;
            };
            if self.is_product_link(link) && seen.insert(link.to_string()) {
                links.push(link.to_string());
            }
        }

        Ok(links)
    }
}
