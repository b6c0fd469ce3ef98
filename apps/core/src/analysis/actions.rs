//! Action item detection using a bank of categorized regex patterns.
//!
//! Every pattern is matched globally against the cleaned transcript. Matches
//! are normalized into short fragments, filtered by length, deduplicated and
//! ranked by the highest priority that produced them, then by length.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use crate::error::AnalysisError;

/// Inclusive lower bound on a cleaned fragment's length, in characters.
pub const MIN_ACTION_LENGTH: usize = 10;
/// Exclusive upper bound on a cleaned fragment's length, in characters.
pub const MAX_ACTION_LENGTH: usize = 200;

const CUSTOM_PATTERN_SIZE_LIMIT: usize = 1 << 20;

// NOTE: expect() is acceptable here: the patterns are constants and covered by tests.
static EDGE_NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\W+|\W+$").expect("Invalid regex: edge punctuation"));

static INNER_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex: whitespace"));

static LEADING_PRONOUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:i|we|you|he|she|they|it)\s+").expect("Invalid regex: leading pronoun")
});

/// Priority tier of an action pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Ranking weight: high=3, medium=2, low=1.
    pub fn score(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A compiled, immutable pattern record.
#[derive(Debug, Clone)]
pub struct PatternEntry {
    pub name: String,
    pub regex: Regex,
    pub priority: Priority,
    pub category: String,
    pub description: String,
}

/// A ranked, cleaned fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCandidate {
    pub text: String,
    /// First pattern that produced the fragment at its winning priority.
    pub pattern: String,
    pub priority: Priority,
}

/// Surviving matches of one pattern (`actionItems.patterns[]` on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatches {
    pub pattern: String,
    pub matches: Vec<String>,
    pub priority: Priority,
}

/// Output of [`ActionPatternRegistry::detect`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionDetection {
    pub candidates: Vec<ActionCandidate>,
    pub patterns: Vec<PatternMatches>,
    /// Categories of the patterns that produced at least one fragment.
    pub categories: Vec<String>,
}

impl ActionDetection {
    pub fn items(&self) -> Vec<String> {
        self.candidates.iter().map(|c| c.text.clone()).collect()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn count_at(&self, priority: Priority) -> usize {
        self.candidates.iter().filter(|c| c.priority == priority).count()
    }
}

/// Result of the cheap [`ActionPatternRegistry::has_action_items`] probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCheck {
    pub has_action_items: bool,
    pub confidence: f32,
    pub match_count: usize,
    pub high_priority_count: usize,
}

/// (name, regex, priority, category, description)
const BUILTIN_PATTERNS: &[(&str, &str, Priority, &str, &str)] = &[
    (
        "urgent",
        r"(?i)[^.!?\n]*\b(?:urgent|urgently|asap|immediately|right away|as soon as possible)\b[^.!?\n]*",
        Priority::High,
        "urgent",
        "Statements flagged as urgent",
    ),
    (
        "important",
        r"(?i)[^.!?\n]*\b(?:important|top priority|critical|crucial|essential)\b[^.!?\n]*",
        Priority::High,
        "urgent",
        "Statements marked important or critical",
    ),
    (
        "deadline",
        r"(?i)[^.!?\n]*\b(?:deadline|due (?:date|by|on|today|tomorrow)|by (?:tomorrow|tonight|today|monday|tuesday|wednesday|thursday|friday|saturday|sunday|end of (?:the )?(?:day|week|month)))\b[^.!?\n]*",
        Priority::High,
        "deadline",
        "Work bound to a date or deadline",
    ),
    (
        "obligation",
        r"(?i)\b(?:(?:i|we|you)\s+)?(?:need to|needs to|have to|has to|must|got to|gotta)\s+[^.!?\n]+",
        Priority::High,
        "obligation",
        "Things that must be done",
    ),
    (
        "should",
        r"(?i)\b(?:(?:i|we|you)\s+)?(?:should|ought to|supposed to)\s+[^.!?\n]+",
        Priority::Medium,
        "obligation",
        "Things that ought to be done",
    ),
    (
        "todo",
        r"(?i)\b(?:to-do|todo|to do list|remember to|don't forget to|dont forget to|reminder to|note to self)\b[^.!?\n]*",
        Priority::Medium,
        "todo",
        "Explicit to-do markers and reminders",
    ),
    (
        "planning",
        r"(?i)\b(?:(?:i|we)\s+)?(?:plan to|planning to|going to|gonna|intend to|will)\s+[^.!?\n]+",
        Priority::Medium,
        "planning",
        "Stated plans and intentions",
    ),
    (
        "meeting",
        r"(?i)\b(?:schedule|set up|arrange|book|organize|meet with|meeting with)\s+[^.!?\n]*",
        Priority::Medium,
        "meeting",
        "Meetings and appointments to arrange",
    ),
    (
        "communication",
        r"(?i)\b(?:call|email|text|message|contact|reach out to|follow up with|ping|reply to|get back to)\s+[^.!?\n]+",
        Priority::Medium,
        "communication",
        "People to contact",
    ),
    (
        "research",
        r"(?i)\b(?:look into|research|find out|figure out|investigate|look up|check on|check whether|check if)\s+[^.!?\n]+",
        Priority::Medium,
        "research",
        "Things to look into",
    ),
    (
        "scheduled",
        r"(?i)[^.!?\n]*\b(?:at \d{1,2}(?::\d{2})?\s*(?:am|pm)|on (?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)|next (?:week|month|monday|tuesday|wednesday|thursday|friday))\b[^.!?\n]*",
        Priority::Medium,
        "scheduled",
        "Activities tied to a time slot",
    ),
    (
        "work_task",
        r"(?i)\b(?:finish|complete|submit|prepare|review|update|write|draft|deliver|send)\s+(?:the\s+|my\s+|our\s+|a\s+|an\s+)?(?:report|project|proposal|presentation|document|code|draft|budget|slides|analysis|invoice|spec)\b[^.!?\n]*",
        Priority::Medium,
        "work",
        "Concrete work deliverables",
    ),
    (
        "consideration",
        r"(?i)\b(?:maybe|perhaps|might|consider|considering|think about|thinking about)\s+[^.!?\n]+",
        Priority::Low,
        "consideration",
        "Ideas under consideration",
    ),
    (
        "aspiration",
        r"(?i)\b(?:want to|would like to|i'd like to|wish to|hope to|aim to|dream of)\s+[^.!?\n]+",
        Priority::Low,
        "aspiration",
        "Wishes and goals",
    ),
    (
        "someday",
        r"(?i)[^.!?\n]*\b(?:someday|some day|eventually|one day|at some point|sometime)\b[^.!?\n]*",
        Priority::Low,
        "someday",
        "Open-ended intentions",
    ),
    (
        "action_verbs",
        r"(?i)\b(?:buy|pick up|clean|pay|fix|order|return|cancel|renew|sort out|get some)\s+[^.!?\n]+",
        Priority::Low,
        "action",
        "Generic errands",
    ),
    (
        "question",
        r"(?i)[^.!?\n]*\b(?:how (?:do|can|should) (?:i|we)|what (?:should|do) (?:i|we)|should (?:i|we))\b[^.!?\n]*\?",
        Priority::Low,
        "question",
        "Open questions to resolve",
    ),
    (
        "personal",
        r"(?i)\b(?:go to the (?:gym|doctor|dentist|store)|work out|exercise|meditate|doctor's appointment|call (?:mom|dad|my (?:mom|dad|mother|father|parents|sister|brother)))\b[^.!?\n]*",
        Priority::Low,
        "personal",
        "Personal errands and self-care",
    ),
];

/// Fragment normalization applied to every raw regex match.
pub fn clean_match(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = EDGE_NON_WORD.replace_all(trimmed, "");
    let collapsed = INNER_WHITESPACE.replace_all(&stripped, " ").to_lowercase();
    LEADING_PRONOUN.replacen(&collapsed, 1, "").into_owned()
}

fn has_valid_length(fragment: &str) -> bool {
    let len = fragment.chars().count();
    (MIN_ACTION_LENGTH..MAX_ACTION_LENGTH).contains(&len)
}

/// Ordered list of patterns built once at engine construction.
pub struct ActionPatternRegistry {
    patterns: Vec<PatternEntry>,
}

impl Default for ActionPatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionPatternRegistry {
    pub fn new() -> Self {
        let patterns = BUILTIN_PATTERNS
            .iter()
            .filter_map(|(name, source, priority, category, description)| {
                match Regex::new(source) {
                    Ok(regex) => Some(PatternEntry {
                        name: name.to_string(),
                        regex,
                        priority: *priority,
                        category: category.to_string(),
                        description: description.to_string(),
                    }),
                    Err(e) => {
                        tracing::error!("Built-in pattern '{}' failed to compile: {}", name, e);
                        None
                    }
                }
            })
            .collect();

        Self { patterns }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PatternEntry> {
        self.patterns.iter().find(|p| p.name == name)
    }

    pub fn patterns(&self) -> &[PatternEntry] {
        &self.patterns
    }

    /// Compiles and appends a pattern. Matching is case-insensitive.
    ///
    /// Rejected without touching the registry when the name is blank or
    /// taken, the source is longer than `max_len`, the regex does not
    /// compile within the size limit, or it matches the empty string.
    pub fn add_custom_pattern(
        &mut self,
        name: &str,
        source: &str,
        priority: Priority,
        category: &str,
        description: &str,
        max_len: usize,
    ) -> Result<(), AnalysisError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AnalysisError::Validation("pattern name is empty".to_string()));
        }
        if self.get(name).is_some() {
            return Err(AnalysisError::DuplicatePattern(name.to_string()));
        }
        if source.trim().is_empty() {
            return Err(AnalysisError::Validation(format!("pattern '{}' has an empty regex", name)));
        }
        if source.len() > max_len {
            return Err(AnalysisError::Validation(format!(
                "pattern '{}' exceeds {} characters",
                name, max_len
            )));
        }

        let regex = RegexBuilder::new(source)
            .case_insensitive(true)
            .size_limit(CUSTOM_PATTERN_SIZE_LIMIT)
            .build()?;
        if regex.is_match("") {
            return Err(AnalysisError::Validation(format!(
                "pattern '{}' matches the empty string",
                name
            )));
        }

        self.patterns.push(PatternEntry {
            name: name.to_string(),
            regex,
            priority,
            category: category.trim().to_string(),
            description: description.to_string(),
        });
        Ok(())
    }

    /// Full detection: match, clean, filter, deduplicate and rank.
    ///
    /// Runs in time linear in the number of matched fragments.
    ///
    /// # Arguments
    ///
    /// * `text` - The cleaned transcript. Matching is case-insensitive.
    ///
    /// # Returns
    ///
    /// An [`ActionDetection`] whose candidates are unique, sized within
    /// [`MIN_ACTION_LENGTH`]..[`MAX_ACTION_LENGTH`] and ordered by the best
    /// priority that produced them, then by length (longest first).
    pub fn detect(&self, text: &str) -> ActionDetection {
        let mut patterns = Vec::new();
        let mut categories: Vec<String> = Vec::new();
        // (fragment, best priority, pattern that gave it) in first-seen order.
        let mut ranked: Vec<(String, Priority, String)> = Vec::new();
        let mut ranked_index: HashMap<String, usize> = HashMap::new();

        for entry in &self.patterns {
            let mut matches: Vec<String> = Vec::new();
            let mut seen: HashSet<String> = HashSet::new();
            for m in entry.regex.find_iter(text) {
                let fragment = clean_match(m.as_str());
                if has_valid_length(&fragment) && seen.insert(fragment.clone()) {
                    matches.push(fragment);
                }
            }
            if matches.is_empty() {
                continue;
            }

            for fragment in &matches {
                match ranked_index.get(fragment) {
                    Some(&i) => {
                        let existing = &mut ranked[i];
                        if entry.priority > existing.1 {
                            existing.1 = entry.priority;
                            existing.2 = entry.name.clone();
                        }
                    }
                    None => {
                        ranked_index.insert(fragment.clone(), ranked.len());
                        ranked.push((fragment.clone(), entry.priority, entry.name.clone()));
                    }
                }
            }

            if !categories.contains(&entry.category) {
                categories.push(entry.category.clone());
            }
            patterns.push(PatternMatches {
                pattern: entry.name.clone(),
                matches,
                priority: entry.priority,
            });
        }

        // Stable: equal priority and length keep first-seen order.
        ranked.sort_by(|a, b| {
            b.1.score()
                .cmp(&a.1.score())
                .then_with(|| b.0.chars().count().cmp(&a.0.chars().count()))
        });

        let candidates = ranked
            .into_iter()
            .map(|(text, priority, pattern)| ActionCandidate {
                text,
                pattern,
                priority,
            })
            .collect();

        ActionDetection {
            candidates,
            patterns,
            categories,
        }
    }

    /// Counts raw matches without cleaning or deduplication.
    pub fn has_action_items(&self, text: &str) -> ActionCheck {
        let mut match_count = 0usize;
        let mut high_priority_count = 0usize;
        for entry in &self.patterns {
            let count = entry.regex.find_iter(text).count();
            match_count += count;
            if entry.priority == Priority::High {
                high_priority_count += count;
            }
        }

        let confidence = (match_count as f32 * 0.3 + high_priority_count as f32 * 0.5).min(0.95);

        ActionCheck {
            has_action_items: match_count > 0,
            confidence,
            match_count,
            high_priority_count,
        }
    }
}
