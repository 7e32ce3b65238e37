// Product-page parsing: spec table and price
use crate::model::{ParserError, SpecRecord};
use crate::parser::{selector, PageParser};
use crate::utils::{clean_text, parse_price};
use scraper::Html;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct SpecParser;

impl SpecParser {
    pub fn new() -> Self {
        Self
    }
}

impl PageParser for SpecParser {
    /// `None` when the page has no spec list.
    type Output = Option<SpecRecord>;

    fn parse(&self, html: &str) -> Result<Option<SpecRecord>, ParserError> {
        let document = Html::parse_document(html);

        let spec_selector = selector("div.ProductSpecList")?;
        let row_selector = selector("tr")?;
        let cell_selector = selector("td")?;
        let price_selector = selector("div.floatLeft[content]")?;

        let Some(spec_list) = document.select(&spec_selector).next() else {
            return Ok(None);
        };

        let mut fields = BTreeMap::new();
        for row in spec_list.select(&row_selector) {
            let cells: Vec<_> = row.select(&cell_selector).collect();
            if cells.len() > 1 {
                let label = clean_text(cells[0].text());
                let value = clean_text(cells[1].text());
                if !label.is_empty() {
                    fields.insert(label, value);
                }
            }
        }

        let price = document
            .select(&price_selector)
            .next()
            .and_then(|node| node.value().attr("content"))
            .and_then(parse_price)
            .ok_or_else(|| ParserError::MissingField("price".into()))?;

        Ok(Some(SpecRecord { fields, price }))
    }
}
