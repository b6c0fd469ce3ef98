//! Dictionary-based sentiment scoring with negation and intensifier context.
//!
//! Each sentiment word contributes a tiered base score (±0.8 / ±0.6 / ±0.4).
//! A negator up to two tokens back flips and damps the score, an intensifier
//! right before or after amplifies it. The final score is the mean
//! contribution clamped to `[-1, 1]`.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::preprocess::Token;

const STRONG_POSITIVE: &[&str] = &[
    "amazing", "awesome", "brilliant", "delighted", "ecstatic", "excellent", "fantastic",
    "incredible", "love", "loved", "outstanding", "perfect", "superb", "thrilled", "wonderful",
];

const MODERATE_POSITIVE: &[&str] = &[
    "beautiful", "celebrate", "enjoy", "enjoyed", "excited", "glad", "grateful", "great",
    "happy", "inspired", "joy", "pleased", "proud", "success", "successful", "thankful",
];

const MILD_POSITIVE: &[&str] = &[
    "agree", "better", "calm", "comfortable", "easy", "fine", "fun", "good", "helpful",
    "hopeful", "interesting", "like", "liked", "nice", "okay", "positive", "productive",
    "progress", "relaxed", "satisfied", "thanks", "useful",
];

const STRONG_NEGATIVE: &[&str] = &[
    "awful", "devastated", "disgusting", "dreadful", "furious", "hate", "hated", "hopeless",
    "horrible", "miserable", "terrible", "worst",
];

const MODERATE_NEGATIVE: &[&str] = &[
    "afraid", "angry", "annoyed", "anxious", "bad", "depressed", "disappointed", "fail",
    "failed", "failure", "frustrated", "hurt", "lonely", "sad", "scared", "stressed",
    "upset", "worried",
];

const MILD_NEGATIVE: &[&str] = &[
    "boring", "concerned", "confused", "difficult", "hard", "issue", "mistake", "nervous",
    "pain", "problem", "sick", "slow", "tired", "unfortunately", "worse", "wrong",
];

const INTENSIFIERS: &[&str] = &[
    "absolutely", "completely", "deeply", "especially", "extremely", "highly", "incredibly",
    "particularly", "quite", "really", "remarkably", "so", "super", "too", "totally", "truly",
    "very",
];

const NEGATORS: &[&str] = &[
    "aren't", "barely", "can't", "cannot", "cant", "couldn't", "didn't", "doesn't", "don't",
    "dont", "hardly", "isn't", "isnt", "neither", "never", "no", "nobody", "none", "nor",
    "not", "nothing", "nowhere", "shouldn't", "wasn't", "weren't", "without", "won't",
    "wont", "wouldn't",
];

const NEGATION_DAMPING: f32 = 0.8;
const PRECEDING_INTENSIFIER: f32 = 1.3;
const FOLLOWING_INTENSIFIER: f32 = 1.2;
const NEGATION_WINDOW: usize = 2;

/// Base score given to words registered through [`SentimentDictionary::add_custom_words`].
pub const CUSTOM_WORD_SCORE: f32 = 0.6;

/// Sentiment polarity derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl SentimentLabel {
    /// Maps a score onto a label using the fixed ±0.1 thresholds.
    pub fn from_score(score: f32) -> Self {
        if score > 0.1 {
            SentimentLabel::Positive
        } else if score < -0.1 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "😊",
            SentimentLabel::Negative => "😔",
            SentimentLabel::Neutral => "😐",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Tokens that contributed to a score, in first-seen order without repeats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentBreakdown {
    pub positive_words: Vec<String>,
    pub negative_words: Vec<String>,
    pub intensifiers: Vec<String>,
    pub negators: Vec<String>,
}

fn push_unique(list: &mut Vec<String>, word: &str) {
    if !list.iter().any(|w| w == word) {
        list.push(word.to_string());
    }
}

/// Result of a full contextual sentiment pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentOutcome {
    pub score: f32,
    pub confidence: f32,
    pub label: SentimentLabel,
    pub breakdown: SentimentBreakdown,
}

/// Result of the context-free [`SentimentDictionary::quick_analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickSentiment {
    pub label: SentimentLabel,
    pub confidence: f32,
    pub emoji: String,
}

pub struct SentimentDictionary {
    positive: HashSet<String>,
    negative: HashSet<String>,
    intensifiers: HashSet<String>,
    negators: HashSet<String>,
    /// Signed base score per sentiment word.
    scores: HashMap<String, f32>,
}

impl Default for SentimentDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentDictionary {
    pub fn new() -> Self {
        let mut dictionary = Self {
            positive: HashSet::new(),
            negative: HashSet::new(),
            intensifiers: INTENSIFIERS.iter().map(|s| s.to_string()).collect(),
            negators: NEGATORS.iter().map(|s| s.to_string()).collect(),
            scores: HashMap::new(),
        };

        for (words, score) in [
            (STRONG_POSITIVE, 0.8),
            (MODERATE_POSITIVE, 0.6),
            (MILD_POSITIVE, 0.4),
        ] {
            for word in words {
                dictionary.insert_positive(word, score);
            }
        }
        for (words, score) in [
            (STRONG_NEGATIVE, -0.8),
            (MODERATE_NEGATIVE, -0.6),
            (MILD_NEGATIVE, -0.4),
        ] {
            for word in words {
                dictionary.insert_negative(word, score);
            }
        }

        dictionary
    }

    fn insert_positive(&mut self, word: &str, score: f32) {
        self.negative.remove(word);
        self.positive.insert(word.to_string());
        self.scores.insert(word.to_string(), score);
    }

    fn insert_negative(&mut self, word: &str, score: f32) {
        self.positive.remove(word);
        self.negative.insert(word.to_string());
        self.scores.insert(word.to_string(), score);
    }

    /// Number of positive plus negative words.
    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_positive(&self, word: &str) -> bool {
        self.positive.contains(word)
    }

    pub fn is_negative(&self, word: &str) -> bool {
        self.negative.contains(word)
    }

    pub fn is_intensifier(&self, word: &str) -> bool {
        self.intensifiers.contains(word)
    }

    pub fn is_negator(&self, word: &str) -> bool {
        self.negators.contains(word)
    }

    /// Extends the vocabularies. Words are trimmed and lowercased; blanks are
    /// skipped. A word moves between polarities if it was already known.
    /// Returns how many words were inserted.
    pub fn add_custom_words(&mut self, positive: &[String], negative: &[String]) -> usize {
        let mut added = 0;
        for word in positive.iter().map(|w| w.trim().to_lowercase()) {
            if !word.is_empty() {
                self.insert_positive(&word, CUSTOM_WORD_SCORE);
                added += 1;
            }
        }
        for word in negative.iter().map(|w| w.trim().to_lowercase()) {
            if !word.is_empty() {
                self.insert_negative(&word, -CUSTOM_WORD_SCORE);
                added += 1;
            }
        }
        added
    }

    /// Contextual scoring over positional tokens.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Normalized tokens from [`super::preprocess::TextPreprocessor::prepare`].
    ///
    /// # Returns
    ///
    /// A [`SentimentOutcome`] with `score` in `[-1, 1]` and `confidence` in
    /// `[0, 0.95]`. Input without sentiment words is neutral with zero
    /// confidence.
    pub fn analyze(&self, tokens: &[Token]) -> SentimentOutcome {
        let mut breakdown = SentimentBreakdown::default();
        let mut total = 0.0f32;
        let mut sentiment_words = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            let word = token.word.as_str();

            if self.is_intensifier(word) {
                push_unique(&mut breakdown.intensifiers, word);
                continue;
            }
            if self.is_negator(word) {
                push_unique(&mut breakdown.negators, word);
                continue;
            }

            let Some(&base) = self.scores.get(word) else {
                continue;
            };
            if base > 0.0 {
                push_unique(&mut breakdown.positive_words, word);
            } else {
                push_unique(&mut breakdown.negative_words, word);
            }

            let mut score = base;

            let window_start = i.saturating_sub(NEGATION_WINDOW);
            if tokens[window_start..i].iter().any(|t| self.is_negator(&t.word)) {
                score = -score * NEGATION_DAMPING;
            }

            let preceded = i > 0 && self.is_intensifier(&tokens[i - 1].word);
            let followed = tokens
                .get(i + 1)
                .is_some_and(|t| self.is_intensifier(&t.word));
            let multiplier = match (preceded, followed) {
                (true, true) => PRECEDING_INTENSIFIER.max(FOLLOWING_INTENSIFIER),
                (true, false) => PRECEDING_INTENSIFIER,
                (false, true) => FOLLOWING_INTENSIFIER,
                (false, false) => 1.0,
            };

            total += score * multiplier;
            sentiment_words += 1;
        }

        if sentiment_words == 0 {
            return SentimentOutcome {
                breakdown,
                ..SentimentOutcome::default()
            };
        }

        let score = (total / sentiment_words as f32).clamp(-1.0, 1.0);
        let word_density = sentiment_words as f32 / tokens.len() as f32;
        let consistency = total.abs() / sentiment_words as f32;
        let confidence = (word_density * 2.0 + consistency * 0.5).min(0.95);

        SentimentOutcome {
            score,
            confidence,
            label: SentimentLabel::from_score(score),
            breakdown,
        }
    }

    /// Counts positive and negative hits without context. Cheap enough for
    /// keystroke-level feedback.
    pub fn quick_analyze(&self, words: &[String]) -> QuickSentiment {
        let mut positive = 0usize;
        let mut negative = 0usize;
        for word in words {
            if self.is_positive(word) {
                positive += 1;
            } else if self.is_negative(word) {
                negative += 1;
            }
        }

        let hits = positive + negative;
        let label = if hits == 0 {
            SentimentLabel::Neutral
        } else {
            let ratio = positive as f32 / hits as f32;
            if ratio > 0.6 {
                SentimentLabel::Positive
            } else if ratio < 0.4 {
                SentimentLabel::Negative
            } else {
                SentimentLabel::Neutral
            }
        };
        let confidence = if words.is_empty() {
            0.0
        } else {
            (hits as f32 / words.len() as f32 * 2.0).min(0.9)
        };

        QuickSentiment {
            label,
            confidence,
            emoji: label.emoji().to_string(),
        }
    }
}
