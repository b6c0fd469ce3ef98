use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use validator::Validate;

use crate::analysis::insights::UsageStats;
use crate::error::AnalysisError;

const ENV_MAX_KEYWORDS: &str = "TRANSCRIPT_MAX_KEYWORDS";
const ENV_MAX_CATEGORIES: &str = "TRANSCRIPT_MAX_CATEGORIES";
const ENV_MAX_RECOMMENDATIONS: &str = "TRANSCRIPT_MAX_RECOMMENDATIONS";
const ENV_MAX_PATTERN_LEN: &str = "TRANSCRIPT_MAX_PATTERN_LEN";

/// Engine-wide limits, fixed at construction.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
pub struct EngineConfig {
    /// Number of keywords reported in `topics.keywords`.
    #[validate(range(min = 1, max = 50))]
    pub max_keywords: usize,
    /// Number of category names reported in `topics.categories`.
    #[validate(range(min = 1, max = 8))]
    pub max_categories: usize,
    /// Upper bound on `insights.recommendations`.
    #[validate(range(min = 1, max = 10))]
    pub max_recommendations: usize,
    /// Longest regex source accepted by `add_custom_pattern`.
    #[validate(range(min = 16, max = 2048))]
    pub max_custom_pattern_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_keywords: 15,
            max_categories: 5,
            max_recommendations: 5,
            max_custom_pattern_len: 512,
        }
    }
}

impl EngineConfig {
    /// Loads the configuration from the environment (and a `.env` file if present).
    ///
    /// Unset variables keep their defaults. Malformed or out-of-range values
    /// are reported as [`AnalysisError::Config`].
    pub fn from_env() -> Result<Self, AnalysisError> {
        dotenv::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            max_keywords: read_var(ENV_MAX_KEYWORDS, defaults.max_keywords)?,
            max_categories: read_var(ENV_MAX_CATEGORIES, defaults.max_categories)?,
            max_recommendations: read_var(ENV_MAX_RECOMMENDATIONS, defaults.max_recommendations)?,
            max_custom_pattern_len: read_var(ENV_MAX_PATTERN_LEN, defaults.max_custom_pattern_len)?,
        };
        config.validate()?;
        Ok(config)
    }
}

fn read_var<T: FromStr>(name: &str, default: T) -> Result<T, AnalysisError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AnalysisError::Config(format!("{} has invalid value '{}'", name, raw))),
        Err(_) => Ok(default),
    }
}

/// Per-call switches for [`crate::analysis::AnalysisEngine::process_text`].
///
/// Every field is optional on the wire, so `{}` is a valid options object.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessOptions {
    /// Leave `sentiment` at its neutral default.
    pub skip_sentiment: bool,
    /// Leave `actionItems` empty.
    pub skip_action_items: bool,
    /// Leave `topics` empty.
    pub skip_topics: bool,
    /// Replace synthesized insights with the generic fallback.
    pub skip_insights: bool,
    /// The caller intends to persist the result. Only reflected in
    /// `privacy.noDataStored`; the engine itself never stores anything.
    pub store_results: bool,
    /// Memory/usage statistics provided by the host application.
    pub usage_stats: Option<UsageStats>,
}
