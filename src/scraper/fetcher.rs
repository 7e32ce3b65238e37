use crate::config::AppConfig;
use crate::model::ScraperError;
use crate::scraper::traits::Scraper;

use futures::stream::{self, StreamExt};
use rand::Rng;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

pub struct ScraperImpl {
    client: Client,
}

impl ScraperImpl {
    pub fn new(config: &AppConfig) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Scraper for ScraperImpl {
    async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScraperError::InvalidResponse {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}

/// Spaces request starts at least `delay` (plus random jitter) apart,
/// regardless of how many workers are waiting.
pub struct Throttle {
    next_slot: Mutex<Instant>,
    delay: Duration,
    jitter_ms: u64,
}

impl Throttle {
    pub fn new(delay: Duration, jitter_ms: u64) -> Self {
        Self {
            next_slot: Mutex::new(Instant::now()),
            delay,
            jitter_ms,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(Duration::from_millis(config.request_delay_ms), config.request_jitter_ms)
    }

    pub async fn wait(&self) {
        let extra = if self.jitter_ms > 0 {
            rand::rng().random_range(0..=self.jitter_ms)
        } else {
            0
        };

        let slot = {
            let mut next = self.next_slot.lock().await;
            let slot = (*next).max(Instant::now());
            *next = slot + self.delay + Duration::from_millis(extra);
            slot
        };
        sleep_until(slot).await;
    }
}

/// Fetches every url through a bounded worker pool. Results come back in
/// completion order, each paired with its url.
pub async fn fetch_all<S>(
    scraper: &S,
    throttle: &Throttle,
    urls: Vec<String>,
    max_concurrent: usize,
) -> Vec<(String, Result<String, ScraperError>)>
where
    S: Scraper + ?Sized,
{
    stream::iter(urls)
        .map(move |url| async move {
            throttle.wait().await;
            let result = scraper.fetch(&url).await;
            (url, result)
        })
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeScraper {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Scraper for FakeScraper {
        async fn fetch(&self, url: &str) -> Result<String, ScraperError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if url.ends_with("404") {
                return Err(ScraperError::InvalidResponse {
                    status: 404,
                    body: String::new(),
                });
            }
            Ok(format!("<html>{}</html>", url))
        }
    }

    #[tokio::test]
    async fn fetch_all_returns_every_url_and_keeps_failures() {
        let scraper = FakeScraper { calls: AtomicUsize::new(0) };
        let throttle = Throttle::new(Duration::ZERO, 0);
        let urls = vec!["/a".to_string(), "/b".to_string(), "/c/404".to_string()];

        let mut results = fetch_all(&scraper, &throttle, urls, 2).await;
        results.sort_by(|a, b| a.0.cmp(&b.0));

        assert_eq!(scraper.calls.load(Ordering::SeqCst), 3);
        assert_eq!(results[0].1.as_deref().unwrap(), "<html>/a</html>");
        assert!(matches!(
            results[2].1,
            Err(ScraperError::InvalidResponse { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn throttle_spaces_requests() {
        let throttle = Throttle::new(Duration::from_millis(20), 0);
        let started = Instant::now();
        for _ in 0..3 {
            throttle.wait().await;
        }
        assert!(started.elapsed() >= Duration::from_millis(40));
    }
}
