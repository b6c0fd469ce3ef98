//! # Analysis Module
//!
//! On-device transcript analysis. No network calls, no ML inference:
//! dictionaries, regex pattern banks and frequency statistics only.
//!
//! ## Components
//! - `preprocess`: normalization, sentence splitting, tokenization
//! - `sentiment`: dictionary scoring with negation and intensifiers
//! - `actions`: categorized regex bank for action items
//! - `topics`: keyword relevance and category scoring
//! - `insights`: rule-based mood/energy/focus synthesis
//! - `result`: output data structure
//! - `pipeline`: main orchestrator

pub mod actions;
pub mod insights;
pub mod pipeline;
pub mod preprocess;
pub mod result;
pub mod sentiment;
pub mod topics;

pub use actions::{ActionCheck, ActionPatternRegistry, PatternEntry, Priority};
pub use insights::{Energy, Focus, InsightSummary, InsightSynthesizer, Mood, UsageStats};
pub use pipeline::{AnalysisEngine, EngineStats};
pub use preprocess::{TextPreprocessor, Token};
pub use result::AnalysisResult;
pub use sentiment::{QuickSentiment, SentimentDictionary, SentimentLabel, SentimentOutcome};
pub use topics::{CategoryScore, TopicExtractor, TopicKeyword};
