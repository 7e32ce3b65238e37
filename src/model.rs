// Core structs: benchmark tables, spec records, match results, laptop scores
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareClass {
    Cpu,
    Gpu,
}

impl HardwareClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            HardwareClass::Cpu => "cpu",
            HardwareClass::Gpu => "gpu",
        }
    }
}

impl fmt::Display for HardwareClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkEntry {
    pub name: String,
    pub score: u32,
}

/// Canonical model name → benchmark score for one hardware class.
///
/// Built once from a scraped listing page and never modified afterwards;
/// workers share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct BenchmarkTable {
    class: HardwareClass,
    scores: BTreeMap<String, u32>,
}

impl BenchmarkTable {
    /// Later entries with the same name replace earlier ones.
    pub fn from_entries<I>(class: HardwareClass, entries: I) -> Result<Self, BenchmarkError>
    where
        I: IntoIterator<Item = BenchmarkEntry>,
    {
        let scores: BTreeMap<String, u32> = entries
            .into_iter()
            .map(|entry| (entry.name, entry.score))
            .collect();

        if scores.is_empty() {
            return Err(BenchmarkError::EmptyTable(class));
        }

        Ok(Self { class, scores })
    }

    pub fn class(&self) -> HardwareClass {
        self.class
    }

    pub fn score(&self, name: &str) -> Option<u32> {
        self.scores.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scores.contains_key(name)
    }

    /// Keys in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scores.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }
}

/// Raw spec table of one laptop as scraped from its product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecRecord {
    pub fields: BTreeMap<String, String>,
    /// Smallest currency unit.
    pub price: i64,
}

impl SpecRecord {
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields.get(label).map(String::as_str)
    }
}

/// Spec row as it sits in storage, before the payload has been decoded.
#[derive(Debug, Clone)]
pub struct StoredSpec {
    pub laptop_id: String,
    pub fields: String,
    pub price: Option<i64>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl StoredSpec {
    pub fn decode(&self) -> Result<SpecRecord, RateError> {
        let fields: BTreeMap<String, String> =
            serde_json::from_str(&self.fields).map_err(|e| RateError::MalformedRecord {
                laptop_id: self.laptop_id.clone(),
                reason: format!("unreadable spec fields: {}", e),
            })?;
        let price = self.price.ok_or_else(|| RateError::MalformedRecord {
            laptop_id: self.laptop_id.clone(),
            reason: "missing price".into(),
        })?;
        Ok(SpecRecord { fields, price })
    }

    /// Rows without a fetch time are always stale.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        self.fetched_at.is_some_and(|at| now - at <= max_age)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    Exact = 0,
    Substring = 1,
    Approximate = 2,
}

impl MatchTier {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(MatchTier::Exact),
            1 => Some(MatchTier::Substring),
            2 => Some(MatchTier::Approximate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// `None` when every tier failed.
    pub resolved_name: Option<String>,
    pub query_used: String,
    pub tier: Option<MatchTier>,
}

impl MatchResult {
    pub fn found(resolved_name: &str, query_used: String, tier: MatchTier) -> Self {
        Self {
            resolved_name: Some(resolved_name.to_string()),
            query_used,
            tier: Some(tier),
        }
    }

    pub fn not_found(query_used: String) -> Self {
        Self {
            resolved_name: None,
            query_used,
            tier: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_name.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LaptopScore {
    pub name: String,
    pub price: i64,
    pub cpu_score: u32,
    pub gpu_score: u32,
    pub original_cpu_name: String,
    pub matched_cpu_name: Option<String>,
    pub match_type_cpu: Option<MatchTier>,
    pub original_gpu_name: String,
    pub matched_gpu_name: Option<String>,
    pub match_type_gpu: Option<MatchTier>,
    /// Only set when price > 0.
    pub rating: Option<f64>,
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("http error: {0}")]
    HttpError(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected response status {status}")]
    InvalidResponse { status: u16, body: String },
}

impl From<reqwest::Error> for ScraperError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ScraperError::Timeout
        } else {
            ScraperError::HttpError(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("html parse error: {0}")]
    HtmlParseError(String),
    #[error("missing field: {0}")]
    MissingField(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error("{0} benchmark table is empty")]
    EmptyTable(HardwareClass),
}

#[derive(Debug, Error)]
pub enum RateError {
    #[error("{laptop_id}: missing field '{label}'")]
    MissingField { laptop_id: String, label: String },
    #[error("{laptop_id}: malformed record ({reason})")]
    MalformedRecord { laptop_id: String, reason: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum RatingError {
    #[error("price must be positive, got {0}")]
    NonPositivePrice(i64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scraper(#[from] ScraperError),
    #[error(transparent)]
    Parser(#[from] ParserError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Benchmark(#[from] BenchmarkError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u32) -> BenchmarkEntry {
        BenchmarkEntry { name: name.into(), score }
    }

    #[test]
    fn last_scraped_score_wins() {
        let table = BenchmarkTable::from_entries(
            HardwareClass::Cpu,
            vec![entry("Core i5-8250U", 6000), entry("Core i5-8250U", 6100)],
        )
        .unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.score("Core i5-8250U"), Some(6100));
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = BenchmarkTable::from_entries(HardwareClass::Gpu, Vec::new()).unwrap_err();
        assert!(matches!(err, BenchmarkError::EmptyTable(HardwareClass::Gpu)));
    }

    #[test]
    fn stored_spec_without_price_is_malformed() {
        let stored = StoredSpec {
            laptop_id: "acer-swift-3".into(),
            fields: r#"{"Processornr.":"i5-8250U"}"#.into(),
            price: None,
            fetched_at: None,
        };
        assert!(matches!(stored.decode(), Err(RateError::MalformedRecord { .. })));
    }

    #[test]
    fn stored_spec_with_garbage_fields_is_malformed() {
        let stored = StoredSpec {
            laptop_id: "broken".into(),
            fields: "[1, 2".into(),
            price: Some(4999),
            fetched_at: None,
        };
        assert!(matches!(stored.decode(), Err(RateError::MalformedRecord { .. })));
    }

    #[test]
    fn spec_freshness_follows_fetch_time() {
        let now = Utc::now();
        let mut stored = StoredSpec {
            laptop_id: "msi-modern-14".into(),
            fields: "{}".into(),
            price: Some(3499),
            fetched_at: Some(now - Duration::hours(3)),
        };
        assert!(stored.is_fresh(now, Duration::hours(24)));
        assert!(!stored.is_fresh(now, Duration::hours(1)));

        stored.fetched_at = None;
        assert!(!stored.is_fresh(now, Duration::hours(24)));
    }

    #[test]
    fn match_tier_round_trips_through_integer() {
        for tier in [MatchTier::Exact, MatchTier::Substring, MatchTier::Approximate] {
            assert_eq!(MatchTier::from_u8(tier.as_u8()), Some(tier));
        }
        assert_eq!(MatchTier::from_u8(3), None);
    }
}
