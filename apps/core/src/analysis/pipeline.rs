//! Analysis Engine - main orchestrator for the analysis module.
//!
//! Runs preprocessing, sentiment, action detection, topic extraction and
//! insight synthesis in sequence and assembles an [`AnalysisResult`].
//!
//! Construction builds every dictionary and compiles the pattern bank, so it
//! is worth doing once and sharing the engine (it is `Send + Sync`). The
//! sentiment dictionary and pattern registry sit behind `RwLock`s: analysis
//! takes read locks, the `add_custom_*` calls take the write lock.

use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{PoisonError, RwLock};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::actions::{ActionCheck, ActionDetection, ActionPatternRegistry, Priority};
use super::insights::{InsightInputs, InsightSummary, InsightSynthesizer};
use super::preprocess::TextPreprocessor;
use super::result::AnalysisResult;
use super::sentiment::{QuickSentiment, SentimentDictionary, SentimentOutcome};
use super::topics::{TopicAnalysis, TopicExtractor};
use crate::config::{EngineConfig, ProcessOptions};
use crate::error::AnalysisError;

/// Introspection snapshot returned by [`AnalysisEngine::stats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub dictionary_size: usize,
    pub pattern_count: usize,
    pub topic_categories: usize,
    pub is_ready: bool,
}

pub struct AnalysisEngine {
    config: EngineConfig,
    preprocessor: TextPreprocessor,
    sentiment: RwLock<SentimentDictionary>,
    actions: RwLock<ActionPatternRegistry>,
    topics: TopicExtractor,
    insights: InsightSynthesizer,
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs one stage, turning an error or a panic into `None`.
fn run_stage<T>(stage: &str, f: impl FnOnce() -> Result<T, AnalysisError>) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            warn!("{} stage failed, using defaults: {}", stage, e);
            None
        }
        Err(_) => {
            warn!("{} stage panicked, using defaults", stage);
            None
        }
    }
}

/// Runs the pipeline body. A panic keeps whatever sections were already
/// written and resets the insights to the generic fallback.
fn guarded(result: &mut AnalysisResult, pipeline: impl FnOnce(&mut AnalysisResult)) {
    if panic::catch_unwind(AssertUnwindSafe(|| pipeline(&mut *result))).is_err() {
        warn!("Pipeline aborted, returning partial result");
        result.insights = InsightSummary::fallback();
    }
}

impl AnalysisEngine {
    /// Create an engine with default limits.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with explicit limits.
    ///
    /// Builds the dictionaries and compiles the pattern bank.
    ///
    /// # Arguments
    ///
    /// * `config` - Validated limits, usually from [`EngineConfig::from_env`].
    pub fn with_config(config: EngineConfig) -> Self {
        let start = Instant::now();
        let engine = Self {
            preprocessor: TextPreprocessor::new(),
            sentiment: RwLock::new(SentimentDictionary::new()),
            actions: RwLock::new(ActionPatternRegistry::new()),
            topics: TopicExtractor::with_config(config.max_keywords, config.max_categories),
            insights: InsightSynthesizer::with_config(config.max_recommendations),
            config,
        };
        info!(
            "Analysis engine ready in {:?}: {} patterns, {} dictionary words",
            start.elapsed(),
            engine.actions.read().map(|a| a.len()).unwrap_or(0),
            engine.sentiment.read().map(|s| s.len()).unwrap_or(0),
        );
        engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze one transcript. Never fails: internal errors degrade the
    /// affected sections to their defaults.
    ///
    /// # Arguments
    ///
    /// * `text` - The raw transcript, any length, possibly empty.
    /// * `options` - Per-call switches; see [`ProcessOptions`].
    ///
    /// # Returns
    ///
    /// A complete [`AnalysisResult`]. If the pipeline aborts midway, the
    /// sections computed so far are kept and the insights fall back to the
    /// generic recommendation.
    #[instrument(skip(self, text, options), fields(request_id = %Uuid::new_v4(), len = text.len()))]
    pub fn process_text(&self, text: &str, options: &ProcessOptions) -> AnalysisResult {
        let start = Instant::now();
        let mut result = AnalysisResult::new(text.to_string(), options.store_results);

        guarded(&mut result, |result| self.run_pipeline(text, options, result));

        result.processing_time = start.elapsed().as_millis() as u64;
        debug!("{}", result.summary());
        result
    }

    fn run_pipeline(&self, text: &str, options: &ProcessOptions, result: &mut AnalysisResult) {
        // 1. Preprocess once
        let prepared = self.preprocessor.prepare(text);
        result.processed_text = prepared.cleaned.clone();
        result.word_count = prepared.word_count();
        result.sentence_count = prepared.sentence_count();

        // 2. Sentiment
        let sentiment: Option<SentimentOutcome> = if options.skip_sentiment {
            None
        } else {
            run_stage("sentiment", || Ok(self.sentiment.read()?.analyze(&prepared.tokens)))
        };
        if let Some(sentiment) = &sentiment {
            result.sentiment = sentiment.clone();
        }

        // 3. Action items
        let actions: Option<ActionDetection> = if options.skip_action_items {
            None
        } else {
            run_stage("actions", || Ok(self.actions.read()?.detect(&prepared.cleaned)))
        };
        if let Some(actions) = &actions {
            result.action_items = actions.clone().into();
        }

        // 4. Topics
        let topics: Option<TopicAnalysis> = if options.skip_topics {
            None
        } else {
            run_stage("topics", || Ok(self.topics.extract(&prepared.raw_words)))
        };
        if let Some(topics) = &topics {
            result.topics = topics.clone().into();
        }

        debug!(
            words = result.word_count,
            sentences = result.sentence_count,
            actions = result.action_items.total_count,
            keywords = result.topics.keywords.len(),
            "Stages complete"
        );

        // 5. Insights over whatever was produced
        result.insights = if options.skip_insights {
            InsightSummary::fallback()
        } else {
            run_stage("insights", || {
                Ok(self.insights.synthesize(InsightInputs {
                    sentiment: sentiment.as_ref(),
                    actions: actions.as_ref(),
                    topics: topics.as_ref(),
                    usage: options.usage_stats.as_ref(),
                }))
            })
            .unwrap_or_else(InsightSummary::fallback)
        };
    }

    /// Context-free sentiment for live feedback while the user is speaking.
    pub fn quick_sentiment(&self, text: &str) -> QuickSentiment {
        let words: Vec<String> = self
            .preprocessor
            .tokenize(text)
            .iter()
            .map(|w| TextPreprocessor::normalize_word(w))
            .filter(|w| !w.is_empty())
            .collect();
        // Poisoned locks still hold a usable dictionary.
        let dictionary = self.sentiment.read().unwrap_or_else(PoisonError::into_inner);
        dictionary.quick_analyze(&words)
    }

    /// Cheap probe for action items without cleaning or deduplication.
    pub fn has_action_items(&self, text: &str) -> Result<ActionCheck, AnalysisError> {
        let cleaned = self.preprocessor.clean(text);
        Ok(self.actions.read()?.has_action_items(&cleaned))
    }

    pub fn stats(&self) -> EngineStats {
        let dictionary_size = self.sentiment.read().map(|s| s.len());
        let pattern_count = self.actions.read().map(|a| a.len());
        let is_ready = dictionary_size.is_ok() && pattern_count.is_ok();
        EngineStats {
            dictionary_size: dictionary_size.unwrap_or(0),
            pattern_count: pattern_count.unwrap_or(0),
            topic_categories: self.topics.category_count(),
            is_ready,
        }
    }

    /// Registers a pattern for all subsequent calls. Blocks until in-flight
    /// analyses release the registry.
    #[instrument(skip(self, regex, description))]
    pub fn add_custom_pattern(
        &self,
        name: &str,
        regex: &str,
        priority: Priority,
        category: &str,
        description: &str,
    ) -> Result<(), AnalysisError> {
        let mut registry = self.actions.write()?;
        registry.add_custom_pattern(
            name,
            regex,
            priority,
            category,
            description,
            self.config.max_custom_pattern_len,
        )?;
        info!("Registered custom pattern '{}' ({} total)", name, registry.len());
        Ok(())
    }

    /// Extends the sentiment vocabularies. Returns how many words were added.
    #[instrument(skip(self, positive, negative))]
    pub fn add_custom_words(
        &self,
        positive: &[String],
        negative: &[String],
    ) -> Result<usize, AnalysisError> {
        let mut dictionary = self.sentiment.write()?;
        let added = dictionary.add_custom_words(positive, negative);
        info!("Added {} custom sentiment words ({} total)", added, dictionary.len());
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sentiment::SentimentLabel;

    #[test]
    fn test_basic_analysis() {
        let engine = AnalysisEngine::new();
        let result = engine.process_text("I am happy with the progress.", &ProcessOptions::default());

        assert_eq!(result.original_text, "I am happy with the progress.");
        assert_eq!(result.word_count, 6);
        assert_eq!(result.sentence_count, 1);
        assert_eq!(result.sentiment.label, SentimentLabel::Positive);
        assert!(result.processing_time < 5000);
    }

    #[test]
    fn test_skip_flags_leave_defaults() {
        let engine = AnalysisEngine::new();
        let options = ProcessOptions {
            skip_sentiment: true,
            skip_action_items: true,
            skip_topics: true,
            skip_insights: true,
            ..ProcessOptions::default()
        };
        let result = engine.process_text("I need to finish the terrible report urgently", &options);

        assert_eq!(result.sentiment, SentimentOutcome::default());
        assert_eq!(result.action_items.total_count, 0);
        assert!(result.topics.keywords.is_empty());
        assert_eq!(result.insights, InsightSummary::fallback());
        assert!(result.word_count > 0);
    }

    #[test]
    fn test_stats() {
        let engine = AnalysisEngine::new();
        let stats = engine.stats();
        assert!(stats.is_ready);
        assert_eq!(stats.pattern_count, 18);
        assert_eq!(stats.topic_categories, 8);
        assert!(stats.dictionary_size >= 90);
    }

    #[test]
    fn test_quick_sentiment() {
        let engine = AnalysisEngine::new();
        let quick = engine.quick_sentiment("What a wonderful, great day!");
        assert_eq!(quick.label, SentimentLabel::Positive);
        assert_eq!(quick.emoji, "😊");
    }

    #[test]
    fn test_custom_pattern_applies_to_next_call() {
        let engine = AnalysisEngine::new();
        let text = "Water the ferns on the balcony";
        let options = ProcessOptions::default();
        assert_eq!(engine.process_text(text, &options).action_items.total_count, 0);

        engine
            .add_custom_pattern("plants", r"water the \w+[^.!?]*", Priority::Low, "personal", "Plant care")
            .unwrap();
        let result = engine.process_text(text, &options);
        assert_eq!(result.action_items.items, vec!["water the ferns on the balcony"]);
        assert_eq!(engine.stats().pattern_count, 19);
    }

    #[test]
    fn test_custom_words_change_scoring() {
        let engine = AnalysisEngine::new();
        let options = ProcessOptions::default();
        assert_eq!(
            engine.process_text("that was rad", &options).sentiment.label,
            SentimentLabel::Neutral
        );
        engine.add_custom_words(&["rad".to_string()], &[]).unwrap();
        assert_eq!(
            engine.process_text("that was rad", &options).sentiment.label,
            SentimentLabel::Positive
        );
    }

    #[test]
    fn test_run_stage_failures_yield_none() {
        let failed: Option<u32> =
            run_stage("test", || Err(AnalysisError::Internal("boom".to_string())));
        assert!(failed.is_none());

        let panicked: Option<u32> = run_stage("test", || panic!("stage blew up"));
        assert!(panicked.is_none());

        assert_eq!(run_stage("test", || Ok(7)), Some(7));
    }

    #[test]
    fn test_failed_stage_keeps_other_sections() {
        let engine = AnalysisEngine::new();
        // A writer that panics while holding the lock poisons the registry.
        let _ = panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = engine.actions.write().unwrap();
            panic!("writer died");
        }));
        assert!(engine.actions.is_poisoned());

        let result = engine.process_text(
            "I am happy to finish the report urgently for the team meeting",
            &ProcessOptions::default(),
        );

        assert_eq!(result.action_items.total_count, 0);
        assert_eq!(result.sentiment.label, SentimentLabel::Positive);
        assert!(!result.topics.keywords.is_empty());
        assert!(result.word_count > 0);
        assert!(!result.insights.recommendations.is_empty());
        assert!(!engine.stats().is_ready);
    }

    #[test]
    fn test_aborted_pipeline_keeps_partial_result() {
        let mut result = AnalysisResult::new("Call the bank.".to_string(), false);
        guarded(&mut result, |result| {
            result.processed_text = "Call the bank.".to_string();
            result.word_count = 3;
            result.sentence_count = 1;
            result.insights.recommendations.clear();
            panic!("pipeline blew up");
        });

        assert_eq!(result.processed_text, "Call the bank.");
        assert_eq!(result.word_count, 3);
        assert_eq!(result.sentence_count, 1);
        assert_eq!(result.insights, InsightSummary::fallback());
        assert!(!result.insights.recommendations.is_empty());
    }

    #[test]
    fn test_has_action_items() {
        let engine = AnalysisEngine::new();
        assert!(engine.has_action_items("Send the invoice asap").unwrap().has_action_items);
        assert!(!engine.has_action_items("").unwrap().has_action_items);
    }
}
