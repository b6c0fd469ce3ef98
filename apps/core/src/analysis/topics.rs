//! Topic extraction from word frequency, domain relevance and position.
//!
//! Relevance blends four signals:
//! `0.4 * freq/max_freq + 0.4 * domain_score + length_bonus + position_bonus`.
//! Keywords are then matched against eight fixed categories to produce the
//! primary and secondary topic lists.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

const STOPWORDS: &[&str] = &[
    "the", "and", "but", "nor", "for", "yet", "you", "she", "they", "him", "her", "them",
    "your", "his", "its", "our", "their", "mine", "yours", "hers", "ours", "theirs", "this",
    "that", "these", "those", "who", "whom", "which", "what", "whose", "are", "was", "were",
    "been", "being", "have", "has", "had", "having", "does", "did", "doing", "will", "would",
    "shall", "should", "can", "could", "may", "might", "must", "from", "with", "about",
    "against", "between", "into", "through", "during", "before", "after", "above", "below",
    "out", "off", "over", "under", "again", "further", "here", "there", "where", "when", "why",
    "how", "all", "each", "every", "both", "few", "more", "most", "other", "some", "any", "not",
    "only", "own", "same", "than", "too", "very", "just", "also", "now", "then", "once",
    "always", "never", "because", "until", "while", "although", "though", "yes", "maybe",
    "dont", "doesnt", "didnt", "cant", "wont", "isnt", "arent", "wasnt", "werent", "ive",
    "youre", "theyre", "were", "thats", "theres", "lets", "its", "really", "like", "yeah",
    "okay", "gonna", "wanna", "gotta", "get", "got", "getting", "going", "think", "know",
    "thing", "things", "stuff", "lot", "lots", "well", "even", "still", "much", "many", "one",
    "two", "need", "want", "make", "made", "today", "tomorrow", "said", "say", "something",
    "anything", "everything", "kind", "sort", "actually", "basically", "probably", "pretty",
    "quite", "around", "via", "per", "let", "put", "see", "way", "back", "able",
];

/// (category, keywords)
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "work",
        &[
            "work", "job", "office", "meeting", "meetings", "project", "projects", "deadline",
            "deadlines", "client", "clients", "boss", "manager", "team", "colleague",
            "colleagues", "career", "presentation", "report", "email", "emails", "task", "tasks",
            "business", "company", "interview",
        ],
    ),
    (
        "health",
        &[
            "health", "exercise", "workout", "gym", "doctor", "sleep", "diet", "running",
            "yoga", "medication", "therapy", "fitness", "weight", "eating", "walking",
            "hospital", "dentist", "stress", "energy",
        ],
    ),
    (
        "relationships",
        &[
            "family", "friend", "friends", "partner", "wife", "husband", "mother", "father",
            "parents", "kids", "children", "daughter", "sister", "brother", "girlfriend",
            "boyfriend", "wedding", "relationship", "dinner",
        ],
    ),
    (
        "finance",
        &[
            "money", "budget", "bills", "rent", "salary", "payment", "savings", "invest",
            "investment", "bank", "expenses", "taxes", "loan", "mortgage", "price", "cost",
            "spending", "invoice",
        ],
    ),
    (
        "learning",
        &[
            "learn", "learning", "study", "course", "class", "book", "books", "reading",
            "school", "university", "lecture", "exam", "research", "skill", "skills",
            "practice", "lesson", "tutorial",
        ],
    ),
    (
        "personal",
        &[
            "goal", "goals", "habit", "habits", "journal", "mindfulness", "meditation", "hobby",
            "reflection", "growth", "morning", "routine", "feelings", "mood", "weekend", "home",
            "house", "chores",
        ],
    ),
    (
        "creativity",
        &[
            "idea", "ideas", "design", "writing", "music", "artwork", "painting", "photo",
            "photography", "create", "creative", "story", "drawing", "song", "video", "blog",
        ],
    ),
    (
        "travel",
        &[
            "travel", "trip", "flight", "flights", "vacation", "holiday", "hotel", "airport",
            "visit", "journey", "abroad", "beach", "tickets", "passport", "train",
        ],
    ),
];

/// Words with a curated base relevance; anything else scores [`DEFAULT_DOMAIN_SCORE`].
const DOMAIN_SCORES: &[(&str, f32)] = &[
    ("deadline", 0.9),
    ("project", 0.8),
    ("meeting", 0.8),
    ("client", 0.8),
    ("presentation", 0.8),
    ("budget", 0.8),
    ("work", 0.7),
    ("team", 0.6),
    ("report", 0.7),
    ("health", 0.8),
    ("doctor", 0.8),
    ("exercise", 0.7),
    ("workout", 0.7),
    ("sleep", 0.6),
    ("stress", 0.7),
    ("family", 0.8),
    ("friend", 0.6),
    ("friends", 0.6),
    ("relationship", 0.7),
    ("money", 0.7),
    ("rent", 0.6),
    ("savings", 0.7),
    ("investment", 0.8),
    ("learning", 0.7),
    ("course", 0.6),
    ("exam", 0.8),
    ("goal", 0.7),
    ("goals", 0.7),
    ("habit", 0.6),
    ("idea", 0.6),
    ("ideas", 0.6),
    ("design", 0.6),
    ("travel", 0.7),
    ("trip", 0.7),
    ("flight", 0.7),
    ("vacation", 0.7),
];

const DEFAULT_DOMAIN_SCORE: f32 = 0.3;
const MIN_WORD_LENGTH: usize = 3;
const MAX_WORD_LENGTH: usize = 20;
const MIN_KEYWORD_RELEVANCE: f32 = 0.2;
const PRIMARY_RELEVANCE: f32 = 0.5;
const SECONDARY_RELEVANCE: f32 = 0.3;
const EDGE_FRACTION: f32 = 0.2;

/// A ranked keyword and the frequency behind its relevance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicKeyword {
    pub word: String,
    pub frequency: usize,
    pub relevance: f32,
}

/// Aggregate relevance of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub name: String,
    pub score: f32,
}

/// Output of [`TopicExtractor::extract`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicAnalysis {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    /// Top keywords by relevance, truncated for display.
    pub keywords: Vec<TopicKeyword>,
    /// Top categories by score, truncated for display.
    pub categories: Vec<CategoryScore>,
}

impl TopicAnalysis {
    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }
}

struct WordStats {
    frequency: usize,
    first: usize,
    last: usize,
}

pub struct TopicExtractor {
    stopwords: HashSet<&'static str>,
    domain_scores: HashMap<&'static str, f32>,
    max_keywords: usize,
    max_categories: usize,
}

impl Default for TopicExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TopicExtractor {
    pub fn new() -> Self {
        Self::with_config(15, 5)
    }

    /// Creates an extractor with custom output limits.
    ///
    /// # Arguments
    ///
    /// * `max_keywords` - How many ranked keywords [`TopicExtractor::extract`] reports.
    /// * `max_categories` - How many scored categories it reports.
    pub fn with_config(max_keywords: usize, max_categories: usize) -> Self {
        Self {
            stopwords: STOPWORDS.iter().copied().collect(),
            domain_scores: DOMAIN_SCORES.iter().copied().collect(),
            max_keywords,
            max_categories,
        }
    }

    pub fn category_count(&self) -> usize {
        CATEGORIES.len()
    }

    fn normalize(word: &str) -> String {
        word.chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect::<String>()
            .to_lowercase()
    }

    fn is_candidate(&self, word: &str) -> bool {
        let len = word.chars().count();
        (MIN_WORD_LENGTH..MAX_WORD_LENGTH).contains(&len)
            && !self.stopwords.contains(word)
            && !word.chars().all(|c| c.is_ascii_digit())
    }

    fn domain_score(&self, word: &str) -> f32 {
        self.domain_scores
            .get(word)
            .copied()
            .unwrap_or(DEFAULT_DOMAIN_SCORE)
    }

    /// Ranks every surviving word by relevance, most relevant first.
    /// Ties keep first-appearance order.
    pub fn rank_keywords(&self, words: &[String]) -> Vec<TopicKeyword> {
        let normalized: Vec<String> = words.iter().map(|w| Self::normalize(w)).collect();
        let total = normalized.len();

        let mut order: Vec<&str> = Vec::new();
        let mut stats: HashMap<&str, WordStats> = HashMap::new();
        for (position, word) in normalized.iter().enumerate() {
            if !self.is_candidate(word) {
                continue;
            }
            stats
                .entry(word.as_str())
                .and_modify(|s| {
                    s.frequency += 1;
                    s.last = position;
                })
                .or_insert_with(|| {
                    order.push(word.as_str());
                    WordStats {
                        frequency: 1,
                        first: position,
                        last: position,
                    }
                });
        }

        let Some(max_frequency) = stats.values().map(|s| s.frequency).max() else {
            return vec![];
        };

        let mut keywords: Vec<TopicKeyword> = order
            .into_iter()
            .filter_map(|word| {
                let s = stats.get(word)?;
                let normalized_frequency = s.frequency as f32 / max_frequency as f32;
                let length_bonus = ((word.chars().count() - MIN_WORD_LENGTH) as f32 * 0.05).min(0.3);
                let first_ratio = s.first as f32 / total as f32;
                let last_ratio = s.last as f32 / total as f32;
                let position_bonus =
                    if first_ratio < EDGE_FRACTION || last_ratio >= 1.0 - EDGE_FRACTION {
                        0.1
                    } else {
                        0.0
                    };
                let relevance = 0.4 * normalized_frequency
                    + 0.4 * self.domain_score(word)
                    + length_bonus
                    + position_bonus;

                (relevance > MIN_KEYWORD_RELEVANCE).then(|| TopicKeyword {
                    word: word.to_string(),
                    frequency: s.frequency,
                    relevance,
                })
            })
            .collect();

        keywords.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        keywords
    }

    /// Scores each category: full relevance for an exact keyword match, half
    /// for a substring overlap in either direction. Zero-score categories
    /// are dropped; ties keep the fixed category order.
    pub fn score_categories(&self, keywords: &[TopicKeyword]) -> Vec<CategoryScore> {
        let mut scores: Vec<CategoryScore> = CATEGORIES
            .iter()
            .filter_map(|(name, words)| {
                let score: f32 = keywords
                    .iter()
                    .map(|k| {
                        if words.contains(&k.word.as_str()) {
                            k.relevance
                        } else if words
                            .iter()
                            .any(|w| w.contains(k.word.as_str()) || k.word.contains(w))
                        {
                            k.relevance * 0.5
                        } else {
                            0.0
                        }
                    })
                    .sum();
                (score > 0.0).then(|| CategoryScore {
                    name: name.to_string(),
                    score,
                })
            })
            .collect();

        scores.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scores
    }

    /// Full extraction over whitespace-split words.
    ///
    /// # Arguments
    ///
    /// * `words` - Raw whitespace tokens; punctuation and case are normalized here.
    ///
    /// # Returns
    ///
    /// A [`TopicAnalysis`] whose keyword and category lists are truncated to
    /// the configured limits. Primary and secondary topics are drawn only
    /// from those truncated lists.
    pub fn extract(&self, words: &[String]) -> TopicAnalysis {
        let mut keywords = self.rank_keywords(words);
        let mut categories = self.score_categories(&keywords);
        keywords.truncate(self.max_keywords);
        categories.truncate(self.max_categories);

        let mut primary: Vec<String> = Vec::new();
        for keyword in keywords.iter().take(5) {
            if keyword.relevance > PRIMARY_RELEVANCE {
                push_unique(&mut primary, &keyword.word);
            }
        }
        for category in categories.iter().take(2) {
            push_unique(&mut primary, &category.name);
        }

        let mut secondary: Vec<String> = Vec::new();
        for keyword in keywords.iter().skip(5).take(5) {
            if keyword.relevance > SECONDARY_RELEVANCE && !primary.contains(&keyword.word) {
                push_unique(&mut secondary, &keyword.word);
            }
        }
        for category in categories.iter().skip(2).take(2) {
            if !primary.contains(&category.name) {
                push_unique(&mut secondary, &category.name);
            }
        }

        TopicAnalysis {
            primary,
            secondary,
            keywords,
            categories,
        }
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_filters_stopwords_digits_and_length() {
        let extractor = TopicExtractor::new();
        let keywords = extractor.rank_keywords(&words("the and 2024 ab supercalifragilisticexpialidocious"));
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_relevance_formula() {
        let extractor = TopicExtractor::new();
        // 10 tokens; "budget" at index 0 (first 20%), "garden" at index 5.
        let keywords = extractor.rank_keywords(&words(
            "budget a a a a garden a a a a",
        ));
        let budget = keywords.iter().find(|k| k.word == "budget").unwrap();
        let garden = keywords.iter().find(|k| k.word == "garden").unwrap();

        assert!((budget.relevance - (0.4 + 0.4 * 0.8 + 0.15 + 0.1)).abs() < 1e-5);
        assert!((garden.relevance - (0.4 + 0.4 * 0.3 + 0.15)).abs() < 1e-5);
        assert_eq!(keywords[0].word, "budget");
    }

    #[test]
    fn test_last_occurrence_near_end_earns_position_bonus() {
        let extractor = TopicExtractor::new();
        // 10 tokens; "garden" first at index 4 and last at index 9, "lamp" at index 6.
        let keywords = extractor.rank_keywords(&words("a a a a garden a lamp a a garden"));
        let garden = keywords.iter().find(|k| k.word == "garden").unwrap();
        let lamp = keywords.iter().find(|k| k.word == "lamp").unwrap();

        assert_eq!(garden.frequency, 2);
        assert!((garden.relevance - (0.4 + 0.4 * 0.3 + 0.15 + 0.1)).abs() < 1e-5);
        assert!((lamp.relevance - (0.4 * 0.5 + 0.4 * 0.3 + 0.05)).abs() < 1e-5);
    }

    #[test]
    fn test_punctuation_is_stripped() {
        let extractor = TopicExtractor::new();
        let keywords = extractor.rank_keywords(&words("Project, project! PROJECT."));
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].word, "project");
        assert_eq!(keywords[0].frequency, 3);
    }

    #[test]
    fn test_work_category_ranks_first() {
        let extractor = TopicExtractor::new();
        let text = "work meeting project deadline ".repeat(5);
        let analysis = extractor.extract(&words(&text));
        assert_eq!(analysis.categories[0].name, "work");
        assert!(analysis.primary.contains(&"work".to_string()));
    }

    #[test]
    fn test_substring_overlap_scores_half() {
        let extractor = TopicExtractor::new();
        let keywords = vec![TopicKeyword {
            word: "workouts".to_string(),
            frequency: 1,
            relevance: 0.8,
        }];
        let categories = extractor.score_categories(&keywords);
        let health = categories.iter().find(|c| c.name == "health").unwrap();
        assert!((health.score - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_primary_and_secondary_are_disjoint() {
        let extractor = TopicExtractor::new();
        let text = "Planning the vacation budget with family, then the flight and hotel, \
                    then a doctor visit, a course on photography, and the client presentation \
                    for the project deadline at the office";
        let analysis = extractor.extract(&words(text));
        for topic in &analysis.secondary {
            assert!(!analysis.primary.contains(topic));
        }
        assert!(analysis.keywords.len() <= 15);
        assert!(analysis.categories.len() <= 5);
    }

    #[test]
    fn test_empty_input() {
        let extractor = TopicExtractor::new();
        let analysis = extractor.extract(&[]);
        assert!(analysis.primary.is_empty());
        assert!(analysis.secondary.is_empty());
        assert!(analysis.keywords.is_empty());
        assert!(analysis.categories.is_empty());
    }
}
