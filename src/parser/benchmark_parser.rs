// Benchmark listing parsing (cpubenchmark.net / videocardbenchmark.net)
use crate::model::{BenchmarkEntry, ParserError};
use crate::parser::{selector, PageParser};
use crate::utils::{clean_text, parse_score};
use scraper::Html;

#[derive(Debug, Default)]
pub struct BenchmarkParser;

impl BenchmarkParser {
    pub fn new() -> Self {
        Self
    }
}

impl PageParser for BenchmarkParser {
    type Output = Vec<BenchmarkEntry>;

    /// Rows that lack a name link or a numeric score are skipped.
    fn parse(&self, html: &str) -> Result<Vec<BenchmarkEntry>, ParserError> {
        let document = Html::parse_document(html);

        let body_selector = selector("tbody")?;
        let row_selector = selector("tr")?;
        let link_selector = selector("a")?;
        let cell_selector = selector("td")?;

        let body = document
            .select(&body_selector)
            .next()
            .ok_or_else(|| ParserError::MissingField("tbody".into()))?;

        let entries = body
            .select(&row_selector)
            .filter_map(|row| {
                let name = clean_text(row.select(&link_selector).next()?.text());
                let score = parse_score(&clean_text(row.select(&cell_selector).nth(1)?.text()))?;
                (!name.is_empty()).then_some(BenchmarkEntry { name, score })
            })
            .collect();

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <table id="cputable"><thead><tr><th>CPU</th><th>Mark</th></tr></thead>
        <tbody>
          <tr><td><a href="cpu.php?id=1">AMD Ryzen 5 5500U</a></td><td>13,112</td><td>1</td></tr>
          <tr><td><a href="cpu.php?id=2">Intel Core i5-1135G7 @ 2.40GHz</a></td><td>10,204</td></tr>
          <tr><td><a href="cpu.php?id=3">Mystery Chip</a></td><td>NA</td></tr>
          <tr><td>no link</td><td>100</td></tr>
        </tbody></table>"#;

    #[test]
    fn reads_name_and_score_per_row() {
        let entries = BenchmarkParser::new().parse(PAGE).unwrap();
        assert_eq!(
            entries,
            vec![
                BenchmarkEntry { name: "AMD Ryzen 5 5500U".into(), score: 13112 },
                BenchmarkEntry { name: "Intel Core i5-1135G7 @ 2.40GHz".into(), score: 10204 },
            ]
        );
    }

    #[test]
    fn missing_table_body_is_an_error() {
        assert!(matches!(
            BenchmarkParser::default().parse("<p>blocked</p>"),
            Err(ParserError::MissingField(_))
        ));
    }
}
