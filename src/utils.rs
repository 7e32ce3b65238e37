// Utility functions
use chrono::{DateTime, Utc};

/// Parses an RFC 3339 string into `DateTime<Utc>`, if possible.
pub fn parse_datetime(date_str: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(date_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Laptop identifier derived from its product link, e.g.
/// `/baerbar-laptop/lenovo-ideapad-3` → `lenovo-ideapad-3`.
pub fn laptop_id_from_link(link: &str, prefix: &str) -> String {
    link.strip_prefix(prefix).unwrap_or(link).trim_matches('/').replace('/', "_")
}

/// Joins text nodes and collapses whitespace runs.
pub fn clean_text<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let joined: String = parts.into_iter().collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn parse_price(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(price) = text.parse::<i64>() {
        return Some(price);
    }
    text.parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .map(|p| p.round() as i64)
}

/// Benchmark scores are printed with thousands separators ("13,112").
pub fn parse_score(text: &str) -> Option<u32> {
    let digits: String = text.chars().filter(|c| !matches!(c, ',' | ' ')).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn laptop_id_strips_category_prefix() {
        assert_eq!(
            laptop_id_from_link("/baerbar-laptop/hp-15s-fq2035no", "/baerbar-laptop/"),
            "hp-15s-fq2035no"
        );
        assert_eq!(laptop_id_from_link("/other/x/y", "/baerbar-laptop/"), "other_x_y");
    }

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text(["  Intel", "\n Iris ", " Xe "]), "Intel Iris Xe");
        assert_eq!(clean_text(Vec::<&str>::new()), "");
    }

    #[test]
    fn prices_and_scores() {
        assert_eq!(parse_price(" 4999 "), Some(4999));
        assert_eq!(parse_price("4999.50"), Some(5000));
        assert_eq!(parse_price("kr."), None);
        assert_eq!(parse_score("13,112"), Some(13112));
        assert_eq!(parse_score("NA"), None);
    }

    #[test]
    fn datetime_round_trip() {
        let now = Utc::now();
        assert_eq!(parse_datetime(&now.to_rfc3339()), Some(now));
        assert_eq!(parse_datetime("yesterday"), None);
    }
}
