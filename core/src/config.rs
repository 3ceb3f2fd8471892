use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Number of results returned when a caller does not ask for a limit.
pub const DEFAULT_TOP_K: usize = 10;

/// Default saturation constant `k` used by the scoring function.
pub const DEFAULT_SATURATION: f32 = 1.0;

pub const DEFAULT_LANGUAGE: &str = "english";

/// Tunables for [`crate::SearchEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Saturation constant `k` in the length normalization term. Lower values
    /// suit corpora of long documents, higher values suit short ones.
    pub saturation: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { saturation: DEFAULT_SATURATION }
    }
}

impl EngineConfig {
    pub fn with_saturation(saturation: f32) -> Self {
        Self { saturation }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.saturation.is_finite() || self.saturation <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "saturation must be a positive finite number, got {}",
                self.saturation
            )));
        }
        Ok(())
    }
}

/// Settings for [`crate::Normalizer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Language selecting both the built-in stopword list and the stemmer.
    pub language: String,
    /// Optional file with one extra stopword per line.
    pub stopwords_path: Option<PathBuf>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self { language: DEFAULT_LANGUAGE.to_string(), stopwords_path: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturation_must_be_positive() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(EngineConfig::with_saturation(0.0).validate().is_err());
        assert!(EngineConfig::with_saturation(-1.5).validate().is_err());
        assert!(EngineConfig::with_saturation(f32::NAN).validate().is_err());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let engine: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(engine, EngineConfig::default());
        let normalizer: NormalizerConfig =
            serde_json::from_str(r#"{"stopwords_path":"extra.txt"}"#).unwrap();
        assert_eq!(normalizer.language, "english");
        assert_eq!(normalizer.stopwords_path, Some(PathBuf::from("extra.txt")));
    }
}
