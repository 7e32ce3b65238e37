use crate::model::{BenchmarkTable, HardwareClass, MatchResult, MatchTier};
use crate::normalizer::normalize;
use strsim::normalized_levenshtein;

/// Default minimum similarity for the approximate tier.
pub const DEFAULT_SIMILARITY_FLOOR: f64 = 0.6;

/// Maps noisy spec-table hardware names onto benchmark-table keys.
///
/// Tiers are tried from least to most error-prone and the first hit wins:
/// exact key, unique case-insensitive substring, closest edit-distance match.
/// CPUs get one extra attempt with the processor family prepended.
#[derive(Debug, Clone)]
pub struct HardwareResolver {
    similarity_floor: f64,
}

impl Default for HardwareResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_FLOOR)
    }
}

impl HardwareResolver {
    pub fn new(similarity_floor: f64) -> Self {
        Self { similarity_floor }
    }

    /// Resolves `raw_name` against `table`, using the table's hardware class
    /// for normalization. `family` is the record's processor-type value and is
    /// ignored for GPUs.
    pub fn resolve(&self, raw_name: &str, family: Option<&str>, table: &BenchmarkTable) -> MatchResult {
        let class = table.class();
        let name = normalize(raw_name, class);

        // An empty query is contained in every key, so only enrichment can help.
        if !name.is_empty() {
            if let Some(found) = self.match_tiers(&name, table) {
                return found;
            }
        }

        if class == HardwareClass::Cpu {
            if let Some(enriched) = enrich(&name, family) {
                // The family is now a prefix, so this cannot enrich again.
                if let Some(found) = self.match_tiers(&enriched, table) {
                    return found;
                }
            }
        }

        MatchResult::not_found(name)
    }

    fn match_tiers(&self, name: &str, table: &BenchmarkTable) -> Option<MatchResult> {
        if table.contains(name) {
            return Some(MatchResult::found(name, name.to_string(), MatchTier::Exact));
        }

        let lowered = name.to_lowercase();
        if let Some(key) = unique_containing(&lowered, table) {
            return Some(MatchResult::found(key, lowered, MatchTier::Substring));
        }

        self.closest(name, table)
            .map(|key| MatchResult::found(key, name.to_string(), MatchTier::Approximate))
    }

    /// Highest-similarity key at or above the floor; ties go to the first key
    /// in table order.
    fn closest<'t>(&self, name: &str, table: &'t BenchmarkTable) -> Option<&'t str> {
        let mut best: Option<(&str, f64)> = None;
        for key in table.names() {
            let similarity = normalized_levenshtein(name, key);
            if similarity < self.similarity_floor {
                continue;
            }
            match best {
                Some((_, top)) if similarity <= top => {}
                _ => best = Some((key, similarity)),
            }
        }
        best.map(|(key, _)| key)
    }
}

/// The only key whose lowercase form contains `lowered`, if there is exactly one.
fn unique_containing<'t>(lowered: &str, table: &'t BenchmarkTable) -> Option<&'t str> {
    let mut hits = table
        .names()
        .filter(|key| key.to_lowercase().contains(lowered));
    let first = hits.next()?;
    if hits.next().is_some() {
        return None;
    }
    Some(first)
}

fn enrich(name: &str, family: Option<&str>) -> Option<String> {
    let family = family.map(str::trim).filter(|f| !f.is_empty())?;
    if name.starts_with(family) {
        return None;
    }
    if name.is_empty() {
        return Some(family.to_string());
    }
    Some(format!("{} {}", family, name))
}
