//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gpt-4o-mini-2024-07-18";

/// System instruction sent with every chunk
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are an expert construction estimator.";

/// Which extraction schema the prompt asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaKind {
    /// All sections with per-section reasoning/evidence and cost explanations
    #[default]
    Detailed,
    /// Same sections, bare content plus section costs and total
    Compact,
}

impl std::str::FromStr for SchemaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "detailed" => Ok(SchemaKind::Detailed),
            "compact" => Ok(SchemaKind::Compact),
            other => Err(format!("unknown schema '{}' (expected detailed or compact)", other)),
        }
    }
}

/// What the runner does when a chunk's backend call fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Report the failure and move on to the next chunk
    #[default]
    SkipAndContinue,
    /// Report the failure and abort the run
    HaltOnError,
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Words per chunk
    pub chunk_size: usize,

    /// Upper bound on generated tokens per chunk
    pub max_output_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Backend model identifier
    pub model_id: String,

    /// System instruction sent with every chunk
    pub system_instruction: String,

    /// Extraction schema rendered into the prompt
    pub schema: SchemaKind,

    /// Behaviour on per-chunk backend failure
    pub failure_policy: FailurePolicy,

    /// Maximum time for a single backend call (seconds)
    pub call_timeout_secs: u64,
}

impl ExtractorConfig {
    /// Get the per-call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        if self.max_output_tokens == 0 {
            return Err("max_output_tokens must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature {} out of range [0.0, 2.0]",
                self.temperature
            ));
        }
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        if self.model_id.trim().is_empty() {
            return Err("model_id must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Full schema, 8000-word chunks, low temperature
    fn default() -> Self {
        Self {
            chunk_size: 8_000,
            max_output_tokens: 4_096,
            temperature: 0.2,
            model_id: DEFAULT_MODEL.to_string(),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            schema: SchemaKind::Detailed,
            failure_policy: FailurePolicy::SkipAndContinue,
            call_timeout_secs: 120,
        }
    }
}

impl ExtractorConfig {
    /// Fast preset: compact schema, small chunks, short timeout
    pub fn fast() -> Self {
        Self {
            chunk_size: 2_000,
            schema: SchemaKind::Compact,
            call_timeout_secs: 60,
            ..Self::default()
        }
    }

    /// Thorough preset: detailed schema, medium chunks, long timeout
    pub fn thorough() -> Self {
        Self {
            chunk_size: 4_000,
            max_output_tokens: 8_192,
            schema: SchemaKind::Detailed,
            call_timeout_secs: 300,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
        assert!(ExtractorConfig::fast().validate().is_ok());
        assert!(ExtractorConfig::thorough().validate().is_ok());
    }

    #[test]
    fn test_invalid_chunk_size() {
        let config = ExtractorConfig {
            chunk_size: 0,
            ..ExtractorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_temperature() {
        let config = ExtractorConfig {
            temperature: 2.5,
            ..ExtractorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_timeout_and_tokens() {
        let mut config = ExtractorConfig::default();
        config.call_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.max_output_tokens = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::fast();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ExtractorConfig::from_toml(
            "chunk_size = 500\nfailure_policy = \"halt_on_error\"\nschema = \"compact\"\n",
        )
        .unwrap();
        assert_eq!(parsed.chunk_size, 500);
        assert_eq!(parsed.failure_policy, FailurePolicy::HaltOnError);
        assert_eq!(parsed.schema, SchemaKind::Compact);
        assert_eq!(parsed.model_id, DEFAULT_MODEL);
        assert_eq!(parsed.call_timeout_secs, 120);
    }

    #[test]
    fn test_schema_kind_from_str() {
        assert_eq!("Compact".parse::<SchemaKind>(), Ok(SchemaKind::Compact));
        assert_eq!("detailed".parse::<SchemaKind>(), Ok(SchemaKind::Detailed));
        assert!("verbose".parse::<SchemaKind>().is_err());
    }
}
