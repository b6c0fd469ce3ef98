//! Actor Tests
//!
//! Behavior of `AnalysisHandle` under concurrent use.

use std::time::Duration;

use crate::actors::AnalysisHandle;
use crate::analysis::{AnalysisEngine, Priority, SentimentLabel};
use crate::config::ProcessOptions;
use crate::error::{ActorError, AnalysisError};

#[cfg(test)]
mod handle_tests {
    use super::*;

    #[tokio::test]
    async fn test_batch_keeps_input_order() {
        let handle = AnalysisHandle::new(AnalysisEngine::new());
        let texts = vec![
            "I am so happy today".to_string(),
            "This is terrible and awful".to_string(),
            String::new(),
        ];

        let results = handle.process_batch(texts.clone(), ProcessOptions::default()).await;

        assert_eq!(results.len(), 3);
        let results: Vec<_> = results.into_iter().map(|r| r.unwrap()).collect();
        for (result, text) in results.iter().zip(&texts) {
            assert_eq!(&result.original_text, text);
        }
        assert_eq!(results[0].sentiment.label, SentimentLabel::Positive);
        assert_eq!(results[1].sentiment.label, SentimentLabel::Negative);
        assert_eq!(results[2].word_count, 0);
    }

    #[tokio::test]
    async fn test_quick_sentiment() {
        let handle = AnalysisHandle::new(AnalysisEngine::new());
        let quick = handle.quick_sentiment("awful, just awful".to_string()).await.unwrap();
        assert_eq!(quick.label, SentimentLabel::Negative);
        assert_eq!(quick.emoji, "😔");
    }

    #[tokio::test]
    async fn test_registration_applies_to_later_requests() {
        let handle = AnalysisHandle::new(AnalysisEngine::new());
        handle
            .add_custom_pattern(
                "plants".to_string(),
                r"water the \w+[^.!?]*".to_string(),
                Priority::Low,
                "personal".to_string(),
                "Plant care".to_string(),
            )
            .await
            .unwrap();

        let result = handle
            .process_text("Water the ferns on the balcony".to_string(), ProcessOptions::default())
            .await
            .unwrap();
        assert_eq!(result.action_items.items, vec!["water the ferns on the balcony"]);
        assert_eq!(handle.stats().await.unwrap().pattern_count, 19);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_registration_is_invisible_to_earlier_requests() {
        for round in 0..25 {
            let handle = AnalysisHandle::new(AnalysisEngine::new());
            let text = "Water the ferns on the balcony".to_string();

            // The first branch of join! is polled first, so the analysis is queued first.
            let (earlier, registered, later) = tokio::join!(
                handle.process_text(text.clone(), ProcessOptions::default()),
                handle.add_custom_pattern(
                    format!("plants{}", round),
                    r"water the \w+[^.!?]*".to_string(),
                    Priority::Low,
                    "personal".to_string(),
                    String::new(),
                ),
                handle.process_text(text.clone(), ProcessOptions::default()),
            );

            registered.unwrap();
            assert_eq!(earlier.unwrap().action_items.total_count, 0, "round {}", round);
            assert_eq!(later.unwrap().action_items.total_count, 1, "round {}", round);
        }
    }

    #[tokio::test]
    async fn test_custom_words_are_invisible_to_earlier_requests() {
        let handle = AnalysisHandle::new(AnalysisEngine::new());
        let (earlier, added) = tokio::join!(
            handle.process_text("that was rad".to_string(), ProcessOptions::default()),
            handle.add_custom_words(vec!["rad".to_string()], vec![]),
        );

        assert_eq!(added.unwrap(), 1);
        assert_eq!(earlier.unwrap().sentiment.label, SentimentLabel::Neutral);
        let later = handle
            .process_text("that was rad".to_string(), ProcessOptions::default())
            .await
            .unwrap();
        assert_eq!(later.sentiment.label, SentimentLabel::Positive);
    }

    #[tokio::test]
    async fn test_rejected_pattern_surfaces_engine_error() {
        let handle = AnalysisHandle::new(AnalysisEngine::new());
        let err = handle
            .add_custom_pattern(
                "urgent".to_string(),
                "pressing".to_string(),
                Priority::High,
                "urgent".to_string(),
                String::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ActorError::Rejected(AnalysisError::DuplicatePattern(_))
        ));
    }

    #[tokio::test]
    async fn test_custom_words_count() {
        let handle = AnalysisHandle::new(AnalysisEngine::new());
        let added = handle
            .add_custom_words(vec!["stoked".to_string()], vec!["gutted".to_string()])
            .await
            .unwrap();
        assert_eq!(added, 2);
    }

    #[tokio::test]
    async fn test_clones_share_one_engine() {
        let handle = AnalysisHandle::new(AnalysisEngine::new());
        let clone = handle.clone();
        clone
            .add_custom_words(vec!["stoked".to_string()], vec![])
            .await
            .unwrap();

        let result = handle
            .process_text("stoked about it".to_string(), ProcessOptions::default())
            .await
            .unwrap();
        assert_eq!(result.sentiment.label, SentimentLabel::Positive);
    }

    #[tokio::test]
    async fn test_concurrent_requests_all_answer() {
        let handle = AnalysisHandle::with_timeout(AnalysisEngine::new(), Duration::from_secs(10));
        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let handle = handle.clone();
                tokio::spawn(async move {
                    handle
                        .process_text(format!("Need to email client {} about the budget", i), ProcessOptions::default())
                        .await
                })
            })
            .collect();

        for task in tasks {
            let result = task.await.unwrap().unwrap();
            assert!(result.action_items.total_count > 0);
        }
    }
}
