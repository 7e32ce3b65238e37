// Parser module: HTML extraction for listing, product and benchmark pages.

pub mod benchmark_parser;
pub mod listing_parser;
pub mod spec_parser;

use crate::model::ParserError;
use scraper::Selector;

pub use benchmark_parser::BenchmarkParser;
pub use listing_parser::ListingParser;
pub use spec_parser::SpecParser;

pub trait PageParser {
    type Output;

    fn parse(&self, html: &str) -> Result<Self::Output, ParserError>;
}

pub(crate) fn selector(css: &str) -> Result<Selector, ParserError> {
    Selector::parse(css).map_err(|e| ParserError::HtmlParseError(e.to_string()))
}
