// Scraper module: HTTP fetching with a politeness delay and bounded concurrency.

pub mod fetcher;
pub mod traits;

pub use fetcher::ScraperImpl;
pub use traits::Scraper;
