//! Text preprocessing: normalization, sentence splitting and tokenization.
//!
//! Stateless. Every downstream stage consumes the output of a single
//! [`TextPreprocessor::prepare`] call so they all agree on word positions.

use regex::Regex;
use std::sync::LazyLock;

// NOTE: expect() is acceptable here: the patterns are constants and covered by tests.
static DISALLOWED_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\s.,!?;:'\-]").expect("Invalid regex: disallowed characters")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex: whitespace"));

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("Invalid regex: sentence terminators"));

/// A lowercase word with its index in the token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub word: String,
    pub position: usize,
}

/// Output of one preprocessing pass.
#[derive(Debug, Clone, Default)]
pub struct PreparedText {
    /// Normalized text (`processedText` on the wire).
    pub cleaned: String,
    pub sentences: Vec<String>,
    /// Whitespace-separated words with their original casing.
    pub raw_words: Vec<String>,
    /// Lowercased words stripped of surrounding punctuation.
    pub tokens: Vec<Token>,
}

impl PreparedText {
    pub fn word_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    /// Token words without positions.
    pub fn words(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.word.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextPreprocessor;

impl TextPreprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Normalizes typographic quotes and dashes, drops characters that would
    /// confuse the pattern bank, and collapses whitespace.
    pub fn clean(&self, text: &str) -> String {
        let normalized: String = text
            .chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' | '\u{02BC}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2013}' | '\u{2014}' => '-',
                '\u{2026}' => '.',
                other => other,
            })
            .collect();
        let stripped = DISALLOWED_CHARS.replace_all(&normalized, " ");
        WHITESPACE.replace_all(&stripped, " ").trim().to_string()
    }

    /// Splits on `.`, `!` and `?`. A trailing fragment without terminal
    /// punctuation is still a sentence.
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        SENTENCE_END
            .split(text)
            .map(str::trim)
            .filter(|s| s.chars().any(char::is_alphanumeric))
            .map(str::to_string)
            .collect()
    }

    /// Splits on whitespace, keeping the original casing.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    /// Lowercases a raw word and trims punctuation from both ends. Inner
    /// apostrophes survive so contractions like "don't" stay recognizable.
    pub fn normalize_word(word: &str) -> String {
        word.trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase()
    }

    /// Runs the three steps once and builds positional tokens.
    pub fn prepare(&self, text: &str) -> PreparedText {
        let cleaned = self.clean(text);
        let sentences = self.split_sentences(&cleaned);
        let raw_words = self.tokenize(&cleaned);
        let tokens = raw_words
            .iter()
            .map(|w| Self::normalize_word(w))
            .filter(|w| !w.is_empty())
            .enumerate()
            .map(|(position, word)| Token { word, position })
            .collect();

        PreparedText {
            cleaned,
            sentences,
            raw_words,
            tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_collapses_whitespace() {
        let pre = TextPreprocessor::new();
        assert_eq!(pre.clean("  hello \n\t world  "), "hello world");
    }

    #[test]
    fn test_clean_strips_symbols_but_keeps_words() {
        let pre = TextPreprocessor::new();
        assert_eq!(
            pre.clean("Call @John re: #budget (today)!"),
            "Call John re: budget today !"
        );
        assert_eq!(pre.clean("don\u{2019}t stop"), "don't stop");
    }

    #[test]
    fn test_split_sentences_without_terminal_punctuation() {
        let pre = TextPreprocessor::new();
        let sentences = pre.split_sentences("First one. Second one! And a third");
        assert_eq!(sentences, vec!["First one", "Second one", "And a third"]);
    }

    #[test]
    fn test_split_sentences_ignores_punctuation_runs() {
        let pre = TextPreprocessor::new();
        assert_eq!(pre.split_sentences("Really?!... Yes."), vec!["Really", "Yes"]);
    }

    #[test]
    fn test_tokens_are_lowercase_and_positioned() {
        let pre = TextPreprocessor::new();
        let prepared = pre.prepare("I am NOT happy, really.");
        let words: Vec<&str> = prepared.tokens.iter().map(|t| t.word.as_str()).collect();
        assert_eq!(words, vec!["i", "am", "not", "happy", "really"]);
        assert_eq!(prepared.tokens[3].position, 3);
        assert_eq!(prepared.raw_words[2], "NOT");
    }

    #[test]
    fn test_empty_input() {
        let pre = TextPreprocessor::new();
        let prepared = pre.prepare("");
        assert!(prepared.cleaned.is_empty());
        assert!(prepared.sentences.is_empty());
        assert!(prepared.tokens.is_empty());
        assert_eq!(prepared.word_count(), 0);
    }
}
