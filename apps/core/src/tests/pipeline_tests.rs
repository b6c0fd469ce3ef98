//! Pipeline Tests
//!
//! Whole transcripts through `AnalysisEngine::process_text`.

use crate::analysis::{AnalysisEngine, AnalysisResult, Mood, SentimentLabel};
use crate::config::ProcessOptions;

fn analyze(text: &str) -> AnalysisResult {
    AnalysisEngine::new().process_text(text, &ProcessOptions::default())
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn test_urgent_call_yields_high_priority_item() {
        let result = analyze("I need to call John urgently about the deadline tomorrow");

        assert!(result.action_items.total_count > 0);
        let first = &result.action_items.items[0];
        assert!(
            first.contains("call john urgently") || first.contains("need to call"),
            "unexpected first item: {}",
            first
        );
        assert!(result
            .action_items
            .patterns
            .iter()
            .any(|p| p.priority == crate::analysis::Priority::High));
        assert_ne!(result.sentiment.label, SentimentLabel::Positive);
    }

    #[test]
    fn test_negated_positive_and_negative_word() {
        let result = analyze("I am not happy with the results, this is terrible");

        assert_eq!(result.sentiment.label, SentimentLabel::Negative);
        assert!(result.sentiment.score < 0.0);
        assert!(result.sentiment.breakdown.negators.contains(&"not".to_string()));
        assert!(result
            .sentiment
            .breakdown
            .negative_words
            .contains(&"terrible".to_string()));
    }

    #[test]
    fn test_empty_input() {
        let result = analyze("");

        assert_eq!(result.word_count, 0);
        assert_eq!(result.sentence_count, 0);
        assert_eq!(result.sentiment.label, SentimentLabel::Neutral);
        assert_eq!(result.action_items.total_count, 0);
        assert!(result.topics.primary.is_empty());
        assert!(!result.insights.recommendations.is_empty());
    }

    #[test]
    fn test_whitespace_only_input() {
        let result = analyze("   \n\t  ");
        assert_eq!(result.word_count, 0);
        assert_eq!(result.processed_text, "");
    }

    #[test]
    fn test_repeated_work_terms_rank_work_first() {
        let text = "work meeting project deadline ".repeat(5);
        let result = analyze(&text);

        assert_eq!(result.topics.categories.first().map(String::as_str), Some("work"));
        assert!(result.topics.primary.contains(&"work".to_string()));
    }

    #[test]
    fn test_punctuation_only_input() {
        let result = analyze("?!... ,,, ;;");
        assert_eq!(result.word_count, 0);
        assert_eq!(result.sentence_count, 0);
        assert_eq!(result.action_items.total_count, 0);
    }

    #[test]
    fn test_original_text_is_preserved() {
        let text = "  Call Mum \u{2014} she\u{2019}s waiting!  ";
        let result = analyze(text);
        assert_eq!(result.original_text, text);
        assert!(!result.processed_text.starts_with(' '));
    }
}

#[cfg(test)]
mod sentiment_property_tests {
    use super::*;

    #[test]
    fn test_negation_flips_sign() {
        let plain = analyze("I am happy").sentiment.score;
        let negated = analyze("I am not happy").sentiment.score;

        assert!(plain > 0.0);
        assert!(negated <= 0.0);
    }

    #[test]
    fn test_intensifier_increases_magnitude() {
        let plain = analyze("happy").sentiment.score;
        let intensified = analyze("very happy").sentiment.score;
        assert!(intensified.abs() > plain.abs());
    }

    #[test]
    fn test_uplifting_entry_reads_positive_mood() {
        let result = analyze("Today was absolutely amazing and I feel so grateful and happy");
        assert_eq!(result.sentiment.label, SentimentLabel::Positive);
        assert!(matches!(result.insights.mood, Mood::Excited | Mood::Happy));
    }
}

#[cfg(test)]
mod ordering_tests {
    use super::*;

    #[test]
    fn test_high_priority_sorts_before_low() {
        let result =
            analyze("Maybe repaint the garden fence in spring. Urgent: renew the car insurance.");
        let items = &result.action_items.items;

        let high = items.iter().position(|i| i.contains("renew the car insurance"));
        let low = items.iter().position(|i| i.contains("repaint the garden fence"));
        assert!(high.is_some(), "missing high item in {:?}", items);
        assert!(low.is_some(), "missing low item in {:?}", items);
        assert!(high < low);
    }

    #[test]
    fn test_identical_input_is_idempotent() {
        let engine = AnalysisEngine::new();
        let options = ProcessOptions::default();
        let text = "Need to email the client about the budget. Feeling a bit stressed but hopeful.";

        let first = engine.process_text(text, &options);
        let mut second = engine.process_text(text, &options);
        second.processing_time = first.processing_time;
        second.timestamp = first.timestamp;

        assert_eq!(first, second);
    }

    #[test]
    fn test_wire_output_uses_camel_case() {
        let result = analyze("Schedule a meeting with the team next week");
        let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();

        assert!(json["actionItems"]["totalCount"].as_u64().unwrap() > 0);
        assert!(json["topics"]["keywords"].is_array());
        assert!(json["privacy"]["noDataStored"].as_bool().unwrap());
    }
}
