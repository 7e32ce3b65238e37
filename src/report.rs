// Plain-text rendering of a ranking
use crate::analyzer::rating::Ranking;
use crate::model::{LaptopScore, MatchTier};
use std::fmt::Write as _;

fn tier(tier: Option<MatchTier>) -> String {
    tier.map(|t| t.as_u8().to_string()).unwrap_or_else(|| "-".into())
}

fn matched(name: Option<&str>) -> &str {
    name.unwrap_or("(not found)")
}

fn write_laptop(out: &mut String, laptop: &LaptopScore) {
    let _ = writeln!(
        out,
        "Score:\t{:.2}\t{}\t{}",
        laptop.rating.unwrap_or_default(),
        laptop.price,
        laptop.name
    );
    let _ = writeln!(out, "\tOriginal:\t{:<30}\tOriginal:\t{:<30}", laptop.original_cpu_name, laptop.original_gpu_name);
    let _ = writeln!(
        out,
        "\tMatched:\t{:<30}\tMatched:\t{:<30}",
        matched(laptop.matched_cpu_name.as_deref()),
        matched(laptop.matched_gpu_name.as_deref())
    );
    let _ = writeln!(
        out,
        "\tMatchType:\t{:<30}\tMatchType:\t{:<30}",
        tier(laptop.match_type_cpu),
        tier(laptop.match_type_gpu)
    );
    let _ = writeln!(out, "\tScore:\t\t{:<30}\tScore:\t\t{:<30}", laptop.cpu_score, laptop.gpu_score);
    out.push('\n');
}

/// Ranked laptops from worst to best value, then the ones that could not be rated.
pub fn render(ranking: &Ranking) -> String {
    let mut out = String::new();
    for laptop in &ranking.ranked {
        write_laptop(&mut out, laptop);
    }

    if !ranking.invalid.is_empty() {
        let _ = writeln!(out, "Not rated (price must be positive):");
        for laptop in &ranking.invalid {
            let _ = writeln!(out, "\t{}\t{}", laptop.price, laptop.name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rating::rank;

    fn laptop(name: &str, price: i64, rating: Option<f64>) -> LaptopScore {
        LaptopScore {
            name: name.into(),
            price,
            cpu_score: 10204,
            gpu_score: 2900,
            original_cpu_name: "i5-1135g7".into(),
            matched_cpu_name: Some("Intel Core i5-1135G7 @ 2.40GHz".into()),
            match_type_cpu: Some(MatchTier::Substring),
            original_gpu_name: "Iris Xe".into(),
            matched_gpu_name: None,
            match_type_gpu: None,
            rating,
        }
    }

    #[test]
    fn best_value_is_printed_last() {
        let ranking = rank(vec![laptop("best", 3000, Some(9.5)), laptop("worst", 9000, Some(1.25))]);
        let text = render(&ranking);
        let worst = text.find("worst").unwrap();
        let best = text.find("best").unwrap();
        assert!(worst < best);
        assert!(text.contains("Score:\t1.25\t9000\tworst"));
        assert!(text.contains("(not found)"));
        assert!(!text.contains("Not rated"));
    }

    #[test]
    fn unrated_laptops_are_listed_separately() {
        let ranking = rank(vec![laptop("gift", 0, None)]);
        let text = render(&ranking);
        assert!(text.starts_with("Not rated"));
        assert!(text.contains("\t0\tgift"));
    }
}
