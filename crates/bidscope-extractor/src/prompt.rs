//! LLM prompt engineering for construction cost extraction

use crate::config::SchemaKind;

/// One top-level key the reply must contain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSection {
    /// JSON key
    pub key: &'static str,
    /// What belongs under the key
    pub description: &'static str,
}

/// The set of fields the extraction prompt asks for
///
/// A value rather than a code path: the detailed and compact variants
/// differ only in flags, and both render through [`PromptBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSchema {
    sections: Vec<SchemaSection>,
    reasoning_and_evidence: bool,
    cost_explanations: bool,
    guidance: &'static [&'static str],
}

const SECTIONS: &[SchemaSection] = &[
    SchemaSection {
        key: "metadata",
        description: "{title, location, owner, contact, issue_date, closing_date, other_dates}",
    },
    SchemaSection {
        key: "materials",
        description: "[list of all major and minor materials/parts, make sure material list is comprehensive. For each, provide: name/description, estimated required amount and units (e.g., pounds, square feet, cubic feet, metric, etc.), estimated cost per unit, reasoning for that material and number, evidence for that material and number, reasoning/evidence for materials that were intentionally left out (materials that were considered but not applicable, if necessary), and total estimated cost for that material.]",
    },
    SchemaSection {
        key: "labor",
        description: "[list of labor types/trades, certifications, etc., and for each, estimate the number of manhours required based on the timeline, project size, and difficulty]",
    },
    SchemaSection {
        key: "equipment",
        description: "[list of equipment, and for each, estimate the quantity or usage required for the project]",
    },
    SchemaSection {
        key: "permits_and_licenses",
        description: "[list]",
    },
    SchemaSection {
        key: "insurance_and_bonds",
        description: "[list]",
    },
    SchemaSection {
        key: "subcontractors_and_vendors",
        description: "[list]",
    },
    SchemaSection {
        key: "timeline_and_scheduling",
        description: "[list or description]",
    },
    SchemaSection {
        key: "site_conditions_and_preparation",
        description: "[list]",
    },
    SchemaSection {
        key: "safety_and_compliance",
        description: "[list]",
    },
    SchemaSection {
        key: "overhead_and_profit",
        description: "[list or description]",
    },
    SchemaSection {
        key: "contingencies_and_allowances",
        description: "[list]",
    },
    SchemaSection {
        key: "quality_control_and_testing",
        description: "[list]",
    },
    SchemaSection {
        key: "closeout_and_warranty",
        description: "[list]",
    },
];

const DETAILED_GUIDANCE: &[&str] = &[
    "For each section, provide a concise bullet-point list or a short description.",
    "For 'materials', provide a detailed breakdown as described above.",
    "For 'labor', estimate the number of manhours for each labor type based on the timeline, size, and difficulty.",
    "For 'equipment', estimate the quantity or usage required for each type.",
    "For 'materials' and 'labor', suggest options if possible.",
    "For 'labor', also note if wage selection is required or if average wages can be used.",
];

const COMPACT_GUIDANCE: &[&str] =
    &["For each section, provide a concise bullet-point list or a short description."];

impl ExtractionSchema {
    /// Full construction-estimator schema
    pub fn detailed() -> Self {
        Self {
            sections: SECTIONS.to_vec(),
            reasoning_and_evidence: true,
            cost_explanations: true,
            guidance: DETAILED_GUIDANCE,
        }
    }

    /// Same sections without per-section reasoning or cost explanations
    pub fn compact() -> Self {
        Self {
            sections: SECTIONS.to_vec(),
            reasoning_and_evidence: false,
            cost_explanations: false,
            guidance: COMPACT_GUIDANCE,
        }
    }

    /// Schema for a configured kind
    pub fn for_kind(kind: SchemaKind) -> Self {
        match kind {
            SchemaKind::Detailed => Self::detailed(),
            SchemaKind::Compact => Self::compact(),
        }
    }

    /// Section keys in prompt order
    pub fn section_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sections.iter().map(|s| s.key)
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// True when the schema has no sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Default for ExtractionSchema {
    fn default() -> Self {
        Self::detailed()
    }
}

/// Builds prompts for the LLM to extract cost estimates
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    schema: ExtractionSchema,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(schema: ExtractionSchema) -> Self {
        Self { schema }
    }

    /// Schema this builder renders
    pub fn schema(&self) -> &ExtractionSchema {
        &self.schema
    }

    /// Build the complete extraction prompt for one chunk
    ///
    /// The chunk text is appended last; nothing else depends on it.
    pub fn build(&self, chunk_text: &str) -> String {
        let mut prompt = String::new();
        let count = self.schema.len();

        // 1. Role and sections
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        for (i, section) in self.schema.sections.iter().enumerate() {
            prompt.push_str(&format!("{}. {}: {}\n", i + 1, section.key, section.description));
        }
        prompt.push('\n');

        // 2. Per-section justification
        if self.schema.reasoning_and_evidence {
            prompt.push_str(&format!(
                "For each of the {} sections above, in addition to the main content, include two fields: 'reasoning' (a concise explanation of how you determined the estimate or number for that section) and 'evidence' (direct textual evidence or references from the RFP text that support your estimate). Both fields should be specific and clear.\n",
                count
            ));
        }

        // 3. Output format
        prompt.push_str("Return your answer as a valid JSON object with these keys. ");
        prompt.push_str(&self.schema.guidance.join(" "));
        prompt.push_str("\n\n");

        // 4. Cost summary
        prompt.push_str(&format!(
            "At the end of your response, you must: (1) Provide a JSON object called 'section_costs' with estimated costs for each of the {} sections above (use the same keys). {} (2) Provide a 'total_bid' field with the sum of all section costs. ",
            count, COST_ESTIMATE_RULE
        ));
        if self.schema.cost_explanations {
            prompt.push_str(COST_EXPLANATION_INSTRUCTIONS);
        } else {
            prompt.push_str(COMPACT_COST_EXAMPLE);
        }
        prompt.push_str(" Return all of these as part of the main JSON object.\n\n");

        // 5. The text to analyze
        prompt.push_str(chunk_text);

        prompt
    }
}

const EXTRACTION_INSTRUCTIONS: &str = "You are an expert construction estimator. \
Read the following RFP excerpt and extract the following sections as a JSON object, with each section clearly labeled. \
If a section is not mentioned, use an empty list or null. \
Sections:\n";

const COST_ESTIMATE_RULE: &str = "For each section, estimate a reasonable cost based on the RFP text, industry standards, or typical project requirements. \
Do not leave any section at zero unless there is clear evidence in the RFP that the cost is truly zero.";

const COST_EXPLANATION_INSTRUCTIONS: &str = "(3) Provide a JSON object called 'section_costs_explanation' with, for each section, a 'reasoning' and 'evidence' field explaining and supporting the cost estimate. \
Example: {'section_costs': {'materials': 10000, 'labor': 15000, 'equipment': 5000, ...}, 'total_bid': 40000, \
'section_costs_explanation': {'materials': {'reasoning': '...', 'evidence': '...'}, 'labor': {'reasoning': '...', 'evidence': '...'}, ...}}.";

const COMPACT_COST_EXAMPLE: &str =
    "Example: {'section_costs': {'materials': 10000, 'labor': 15000, 'equipment': 5000, ...}, 'total_bid': 40000}.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_ends_with_chunk_text() {
        let prompt = PromptBuilder::default().build("Roof replacement, 12,000 SF");
        assert!(prompt.ends_with("Roof replacement, 12,000 SF"));
    }

    #[test]
    fn test_prompt_lists_every_section() {
        let builder = PromptBuilder::new(ExtractionSchema::detailed());
        let prompt = builder.build("text");
        for (i, key) in builder.schema().section_keys().enumerate() {
            assert!(prompt.contains(&format!("{}. {}:", i + 1, key)), "missing {}", key);
        }
        assert_eq!(builder.schema().len(), 14);
    }

    #[test]
    fn test_detailed_prompt_requests_explanations() {
        let prompt = PromptBuilder::new(ExtractionSchema::detailed()).build("text");
        assert!(prompt.contains("'reasoning'"));
        assert!(prompt.contains("section_costs_explanation"));
        assert!(prompt.contains("total_bid"));
        assert!(prompt.contains("For each of the 14 sections above"));
    }

    #[test]
    fn test_compact_prompt_omits_explanations() {
        let prompt = PromptBuilder::new(ExtractionSchema::compact()).build("text");
        assert!(!prompt.contains("section_costs_explanation"));
        assert!(!prompt.contains("'evidence'"));
        assert!(prompt.contains("section_costs"));
        assert!(prompt.contains("total_bid"));
    }

    #[test]
    fn test_prompt_prefix_independent_of_chunk() {
        let builder = PromptBuilder::default();
        let a = builder.build("first chunk");
        let b = builder.build("second");
        assert_eq!(
            a.strip_suffix("first chunk").unwrap(),
            b.strip_suffix("second").unwrap()
        );
    }

    #[test]
    fn test_schema_for_kind() {
        assert_eq!(
            ExtractionSchema::for_kind(SchemaKind::Compact),
            ExtractionSchema::compact()
        );
        assert_eq!(
            ExtractionSchema::for_kind(SchemaKind::Detailed),
            ExtractionSchema::detailed()
        );
    }
}
