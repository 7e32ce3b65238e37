use crate::analyzer::rating;
use crate::analyzer::resolver::HardwareResolver;
use crate::config::LabelConfig;
use crate::model::{BenchmarkTable, LaptopScore, MatchResult, RateError, SpecRecord, StoredSpec};
use tracing::warn;

/// Trait defining the interface for a laptop rater.
pub trait Rater {
    fn rate(
        &self,
        laptop_id: &str,
        spec: &SpecRecord,
        cpus: &BenchmarkTable,
        gpus: &BenchmarkTable,
    ) -> Result<LaptopScore, RateError>;
}

/// Result of rating a whole batch of stored specs.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub scores: Vec<LaptopScore>,
    pub skipped: Vec<RateError>,
}

pub struct LaptopRater {
    resolver: HardwareResolver,
    labels: LabelConfig,
}

impl LaptopRater {
    pub fn new(resolver: HardwareResolver, labels: LabelConfig) -> Self {
        Self { resolver, labels }
    }

    /// Rates every stored spec. Malformed records are skipped and collected,
    /// the rest of the batch carries on.
    pub fn rate_all(&self, specs: &[StoredSpec], cpus: &BenchmarkTable, gpus: &BenchmarkTable) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for stored in specs {
            let rated = stored
                .decode()
                .and_then(|spec| self.rate(&stored.laptop_id, &spec, cpus, gpus));
            match rated {
                Ok(score) => outcome.scores.push(score),
                Err(e) => {
                    warn!("Skipping laptop: {}", e);
                    outcome.skipped.push(e);
                }
            }
        }
        outcome
    }

    fn required<'s>(&self, laptop_id: &str, spec: &'s SpecRecord, label: &str) -> Result<&'s str, RateError> {
        spec.field(label).ok_or_else(|| RateError::MissingField {
            laptop_id: laptop_id.to_string(),
            label: label.to_string(),
        })
    }
}

impl Rater for LaptopRater {
    fn rate(
        &self,
        laptop_id: &str,
        spec: &SpecRecord,
        cpus: &BenchmarkTable,
        gpus: &BenchmarkTable,
    ) -> Result<LaptopScore, RateError> {
        let raw_cpu = self.required(laptop_id, spec, &self.labels.processor_model)?;
        let raw_gpu = self.required(laptop_id, spec, &self.labels.gpu)?;
        let family = spec.field(&self.labels.processor_type);

        let cpu = self.resolver.resolve(raw_cpu, family, cpus);
        let gpu = self.resolver.resolve(raw_gpu, None, gpus);
        let cpu_score = score_of(laptop_id, &cpu, cpus);
        let gpu_score = score_of(laptop_id, &gpu, gpus);

        let rating = if spec.price > 0 {
            rating::compute(cpu_score, gpu_score, spec.price).ok()
        } else {
            warn!("{}: price {} cannot be rated", laptop_id, spec.price);
            None
        };

        Ok(LaptopScore {
            name: laptop_id.to_string(),
            price: spec.price,
            cpu_score,
            gpu_score,
            original_cpu_name: cpu.query_used,
            matched_cpu_name: cpu.resolved_name,
            match_type_cpu: cpu.tier,
            original_gpu_name: gpu.query_used,
            matched_gpu_name: gpu.resolved_name,
            match_type_gpu: gpu.tier,
            rating,
        })
    }
}

fn score_of(laptop_id: &str, result: &MatchResult, table: &BenchmarkTable) -> u32 {
    if !result.is_resolved() {
        warn!(
            "{} not found for {}: '{}'",
            table.class().as_str().to_uppercase(),
            laptop_id,
            result.query_used
        );
        return 0;
    }
    result
        .resolved_name
        .as_deref()
        .and_then(|name| table.score(name))
        .unwrap_or_default()
}
