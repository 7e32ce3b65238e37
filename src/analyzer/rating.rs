use crate::model::{LaptopScore, RatingError};
use std::cmp::Ordering;

/// Value-for-money rating: `cpu² × gpu / price²`.
pub fn compute(cpu_score: u32, gpu_score: u32, price: i64) -> Result<f64, RatingError> {
    if price <= 0 {
        return Err(RatingError::NonPositivePrice(price));
    }
    let cpu = f64::from(cpu_score);
    let gpu = f64::from(gpu_score);
    let price = price as f64;
    Ok(cpu * cpu * gpu / (price * price))
}

/// Rated laptops in report order plus those that could not be rated.
#[derive(Debug, Default)]
pub struct Ranking {
    /// Ascending by rating; the best value comes last.
    pub ranked: Vec<LaptopScore>,
    pub invalid: Vec<LaptopScore>,
}

pub fn rank(scores: Vec<LaptopScore>) -> Ranking {
    let (mut ranked, invalid): (Vec<_>, Vec<_>) = scores
        .into_iter()
        .partition(|score| score.rating.is_some_and(f64::is_finite));

    ranked.sort_by(|a, b| {
        let ra = a.rating.unwrap_or_default();
        let rb = b.rating.unwrap_or_default();
        ra.partial_cmp(&rb)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    Ranking { ranked, invalid }
}
