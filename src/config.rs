use crate::model::{ConfigError, HardwareClass};
use serde::Deserialize;
use std::fs;

/// Spec-table labels as they appear on the retailer's product pages.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub processor_model: String,
    pub processor_type: String,
    pub gpu: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            processor_model: "Processornr.".into(),
            processor_type: "Processor type".into(),
            gpu: "Grafikprocessor".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub site_base_url: String,
    /// `{count}` is replaced by `listing_count`.
    pub listing_url: String,
    pub listing_count: u32,
    pub link_prefix: String,
    pub cpu_benchmark_url: String,
    pub gpu_benchmark_url: String,
    pub user_agent: String,
    pub db_path: String,
    pub request_delay_ms: u64,
    pub request_jitter_ms: u64,
    pub request_timeout_seconds: u64,
    pub max_concurrent_requests: usize,
    /// Stored specs older than this are fetched again; `null` disables refetching.
    pub spec_max_age_hours: Option<u64>,
    pub similarity_floor: f64,
    pub labels: LabelConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            site_base_url: "http://www.edbpriser.dk".into(),
            listing_url: "http://www.edbpriser.dk/computer/baerbar-laptop.aspx?count={count}&sort=TotalPrice&rlm=List".into(),
            listing_count: 2000,
            link_prefix: "/baerbar-laptop/".into(),
            cpu_benchmark_url: "https://www.cpubenchmark.net/cpu_list.php".into(),
            gpu_benchmark_url: "http://www.videocardbenchmark.net/gpu_list.php".into(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:56.0) Gecko/20100101 Firefox/56.0".into(),
            db_path: "data.db".into(),
            request_delay_ms: 200,
            request_jitter_ms: 100,
            request_timeout_seconds: 20,
            max_concurrent_requests: 8,
            spec_max_age_hours: Some(168),
            similarity_floor: 0.6,
            labels: LabelConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn listing_page_url(&self) -> String {
        self.listing_url
            .replace("{count}", &self.listing_count.to_string())
    }

    pub fn product_url(&self, link: &str) -> String {
        format!("{}{}", self.site_base_url, link)
    }

    pub fn benchmark_url(&self, class: HardwareClass) -> &str {
        match class {
            HardwareClass::Cpu => &self.cpu_benchmark_url,
            HardwareClass::Gpu => &self.gpu_benchmark_url,
        }
    }

    /// `None` keeps stored specs forever.
    pub fn spec_max_age(&self) -> Option<chrono::Duration> {
        self.spec_max_age_hours
            .map(|hours| {
                i64::try_from(hours)
                    .ok()
                    .and_then(chrono::Duration::try_hours)
                    .unwrap_or(chrono::Duration::MAX)
            })
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{ "listing_count": 50, "labels": { "gpu": "GPU" } }"#).unwrap();
        assert_eq!(cfg.listing_count, 50);
        assert_eq!(cfg.labels.gpu, "GPU");
        assert_eq!(cfg.labels.processor_model, "Processornr.");
        assert!((cfg.similarity_floor - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn listing_url_substitutes_count() {
        let cfg = AppConfig {
            listing_url: "http://shop/laptops?count={count}".into(),
            listing_count: 25,
            ..AppConfig::default()
        };
        assert_eq!(cfg.listing_page_url(), "http://shop/laptops?count=25");
        assert_eq!(cfg.product_url("/baerbar-laptop/x"), "http://www.edbpriser.dk/baerbar-laptop/x");
        assert_eq!(cfg.benchmark_url(HardwareClass::Cpu), cfg.cpu_benchmark_url);
    }

    #[test]
    fn spec_max_age_defaults_to_a_week_and_can_be_disabled() {
        assert_eq!(AppConfig::default().spec_max_age(), Some(chrono::Duration::hours(168)));

        let cfg: AppConfig = serde_json::from_str(r#"{ "spec_max_age_hours": null }"#).unwrap();
        assert_eq!(cfg.spec_max_age(), None);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config("definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
