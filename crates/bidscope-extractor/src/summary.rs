//! Roll per-chunk cost estimates up into one bid figure

use crate::types::ExtractionResult;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Costs summed across every parsed chunk answer
///
/// Reads `total_bid` and `section_costs` from each answer. Missing keys
/// contribute nothing; numbers written as strings (`"$12,500"`) are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BidSummary {
    /// Results added
    pub chunks_seen: usize,
    /// Results whose answer decoded as JSON
    pub chunks_parsed: usize,
    /// Sum of every `total_bid`
    pub total_bid: f64,
    /// Sum per `section_costs` key
    pub section_costs: BTreeMap<String, f64>,
}

impl BidSummary {
    /// Fold one result into the summary
    pub fn add(&mut self, result: &ExtractionResult) {
        self.chunks_seen += 1;

        let Some(answer) = &result.parsed_answer else {
            return;
        };
        self.chunks_parsed += 1;

        if let Some(total) = answer.get("total_bid").and_then(as_amount) {
            self.total_bid += total;
        }

        if let Some(Value::Object(sections)) = answer.get("section_costs") {
            for (key, value) in sections {
                if let Some(amount) = as_amount(value) {
                    *self.section_costs.entry(key.clone()).or_insert(0.0) += amount;
                }
            }
        }
    }

    /// Summarize a sequence of results
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ExtractionResult>,
    {
        let mut summary = Self::default();
        for result in results {
            summary.add(result);
        }
        summary
    }

    /// Sum of all section costs
    pub fn section_total(&self) -> f64 {
        self.section_costs.values().sum()
    }
}

fn as_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
                .collect();
            cleaned.parse().ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(index: usize, answer: Option<Value>) -> ExtractionResult {
        ExtractionResult {
            chunk_index: index,
            chunk_text: String::new(),
            raw_answer_text: String::new(),
            parsed_answer: answer,
            parse_failure: None,
            total_chunks: 3,
        }
    }

    #[test]
    fn test_sums_across_chunks() {
        let results = vec![
            result(
                0,
                Some(json!({
                    "section_costs": {"materials": 10000, "labor": 15000},
                    "total_bid": 25000
                })),
            ),
            result(
                1,
                Some(json!({
                    "section_costs": {"materials": "$2,500", "equipment": 500.5},
                    "total_bid": "3,000.5"
                })),
            ),
            result(2, None),
        ];

        let summary = BidSummary::from_results(&results);
        assert_eq!(summary.chunks_seen, 3);
        assert_eq!(summary.chunks_parsed, 2);
        assert_eq!(summary.total_bid, 28000.5);
        assert_eq!(summary.section_costs["materials"], 12500.0);
        assert_eq!(summary.section_costs["labor"], 15000.0);
        assert_eq!(summary.section_costs["equipment"], 500.5);
        assert_eq!(summary.section_total(), 28000.5);
    }

    #[test]
    fn test_ignores_unusable_values() {
        let summary = BidSummary::from_results(&[result(
            0,
            Some(json!({
                "section_costs": {"permits_and_licenses": "TBD", "labor": null},
                "total_bid": [1, 2]
            })),
        )]);
        assert_eq!(summary.chunks_parsed, 1);
        assert_eq!(summary.total_bid, 0.0);
        assert!(summary.section_costs.is_empty());
    }

    #[test]
    fn test_answer_without_costs() {
        let summary = BidSummary::from_results(&[result(0, Some(json!([])))]);
        assert_eq!(summary.chunks_parsed, 1);
        assert_eq!(summary.total_bid, 0.0);
    }

    #[test]
    fn test_amount_parsing() {
        assert_eq!(as_amount(&json!(12)), Some(12.0));
        assert_eq!(as_amount(&json!("$ 1,200")), Some(1200.0));
        assert_eq!(as_amount(&json!("n/a")), None);
        assert_eq!(as_amount(&json!(true)), None);
    }
}
