//! Configuration for manifest imports

use serde::{Deserialize, Serialize};

/// Configuration for an [`ImportPipeline`](crate::ImportPipeline) run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Rows processed between commits
    pub batch_size: usize,

    /// Bytes read up front to detect the delimiter
    pub sample_bytes: usize,

    /// Data-quality tag written on every flight
    pub data_quality: String,

    /// Tail number attached to every imported flight (blank for none)
    pub default_aircraft: Option<String>,

    /// Source tag written on every flight (defaults to the input file name)
    pub source_tag: Option<String>,
}

impl ImportConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 {
            return Err("batch_size must be greater than 0".to_string());
        }
        if self.sample_bytes == 0 {
            return Err("sample_bytes must be greater than 0".to_string());
        }
        if self.data_quality.trim().is_empty() {
            return Err("data_quality must not be blank".to_string());
        }
        Ok(())
    }

    /// Tail number to attach to flights; a blank setting means none
    pub fn aircraft(&self) -> Option<&str> {
        self.default_aircraft
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            sample_bytes: 1024,
            data_quality: "standard".to_string(),
            default_aircraft: Some("N908JE".to_string()),
            source_tag: None,
        }
    }
}
