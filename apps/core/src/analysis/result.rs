//! Analysis Result - the single artifact returned by the engine.
//!
//! Field names serialize in camelCase; they are the wire contract for any
//! collaborator that persists or transmits results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::actions::{ActionDetection, PatternMatches};
use super::insights::InsightSummary;
use super::sentiment::SentimentOutcome;
use super::topics::{TopicAnalysis, TopicKeyword};
use crate::error::AnalysisError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItemsSection {
    pub items: Vec<String>,
    pub patterns: Vec<PatternMatches>,
    pub total_count: usize,
}

impl From<ActionDetection> for ActionItemsSection {
    fn from(detection: ActionDetection) -> Self {
        let items = detection.items();
        Self {
            total_count: items.len(),
            items,
            patterns: detection.patterns,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicsSection {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub keywords: Vec<TopicKeyword>,
    pub categories: Vec<String>,
}

impl From<TopicAnalysis> for TopicsSection {
    fn from(analysis: TopicAnalysis) -> Self {
        Self {
            categories: analysis.category_names(),
            primary: analysis.primary,
            secondary: analysis.secondary,
            keywords: analysis.keywords,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyNotice {
    pub data_processed_locally: bool,
    pub no_external_calls: bool,
    pub no_data_stored: bool,
}

impl PrivacyNotice {
    pub fn new(store_results: bool) -> Self {
        Self {
            data_processed_locally: true,
            no_external_calls: true,
            no_data_stored: !store_results,
        }
    }
}

/// Complete analysis of one transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub original_text: String,
    pub processed_text: String,
    pub word_count: usize,
    pub sentence_count: usize,
    pub sentiment: SentimentOutcome,
    pub action_items: ActionItemsSection,
    pub topics: TopicsSection,
    pub insights: InsightSummary,
    /// Wall-clock duration of the call in milliseconds.
    pub processing_time: u64,
    pub timestamp: DateTime<Utc>,
    pub privacy: PrivacyNotice,
}

impl AnalysisResult {
    /// Every analysis section at its zero value, generic insights. Also the
    /// starting point the pipeline fills in, so an aborted run keeps the
    /// sections it already wrote.
    pub fn new(original_text: String, store_results: bool) -> Self {
        Self {
            original_text,
            processed_text: String::new(),
            word_count: 0,
            sentence_count: 0,
            sentiment: SentimentOutcome::default(),
            action_items: ActionItemsSection::default(),
            topics: TopicsSection::default(),
            insights: InsightSummary::fallback(),
            processing_time: 0,
            timestamp: Utc::now(),
            privacy: PrivacyNotice::new(store_results),
        }
    }

    pub fn to_json(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One-line description for logs.
    pub fn summary(&self) -> String {
        format!(
            "Words: {}, Sentiment: {} ({:.2}), Actions: {}, Topics: {}, Mood: {:?}, Time: {}ms",
            self.word_count,
            self.sentiment.label,
            self.sentiment.score,
            self.action_items.total_count,
            self.topics.primary.len(),
            self.insights.mood,
            self.processing_time
        )
    }
}
