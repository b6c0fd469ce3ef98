//! Rule-based insight synthesis.
//!
//! Combines whatever sentiment, action and topic outputs were produced into
//! a mood/energy/focus summary with short recommendations. Deterministic for
//! identical inputs, and the recommendation list is never empty.

use serde::{Deserialize, Serialize};

use super::actions::{ActionDetection, Priority};
use super::sentiment::SentimentOutcome;
use super::topics::TopicAnalysis;

/// Used whenever no rule produced a recommendation, and by fallback results.
pub const GENERIC_RECOMMENDATION: &str = "Keep recording your thoughts to surface more insights.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Excited,
    Happy,
    Content,
    #[default]
    Neutral,
    Thoughtful,
    Concerned,
    Stressed,
    Sad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Energy {
    High,
    Medium,
    #[default]
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    Clear,
    #[default]
    Mixed,
    Scattered,
}

/// Memory/usage statistics supplied by the host application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageStats {
    pub total_memories: u32,
    pub memories_this_week: u32,
    pub streak_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSummary {
    pub mood: Mood,
    pub energy: Energy,
    pub focus: Focus,
    pub recommendations: Vec<String>,
    pub patterns: Vec<String>,
}

impl Default for InsightSummary {
    fn default() -> Self {
        Self::fallback()
    }
}

impl InsightSummary {
    /// Neutral summary with the generic recommendation.
    pub fn fallback() -> Self {
        Self {
            mood: Mood::Neutral,
            energy: Energy::Low,
            focus: Focus::Mixed,
            recommendations: vec![GENERIC_RECOMMENDATION.to_string()],
            patterns: vec![],
        }
    }
}

/// Borrowed stage outputs. Skipped stages are `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsightInputs<'a> {
    pub sentiment: Option<&'a SentimentOutcome>,
    pub actions: Option<&'a ActionDetection>,
    pub topics: Option<&'a TopicAnalysis>,
    pub usage: Option<&'a UsageStats>,
}

/// Flat numbers every rule reads from.
struct Signals {
    score: f32,
    intensifiers: usize,
    negators: usize,
    mixed_polarity: bool,
    items: usize,
    high_items: usize,
    categories: usize,
    keywords: usize,
    reflective: bool,
    future_focused: bool,
    questioning: bool,
}

impl Signals {
    fn gather(inputs: &InsightInputs<'_>) -> Self {
        let (score, intensifiers, negators, mixed_polarity) = match inputs.sentiment {
            Some(s) => (
                s.score,
                s.breakdown.intensifiers.len(),
                s.breakdown.negators.len(),
                !s.breakdown.positive_words.is_empty() && !s.breakdown.negative_words.is_empty(),
            ),
            None => (0.0, 0, 0, false),
        };
        let (items, high_items, reflective, future_focused, questioning) = match inputs.actions {
            Some(a) => (
                a.candidates.len(),
                a.count_at(Priority::High),
                a.has_category("consideration") || a.has_category("question"),
                a.has_category("planning") || a.has_category("aspiration") || a.has_category("someday"),
                a.has_category("question"),
            ),
            None => (0, 0, false, false, false),
        };
        let (categories, keywords) = match inputs.topics {
            Some(t) => (t.categories.len(), t.keywords.len()),
            None => (0, 0),
        };

        Self {
            score,
            intensifiers,
            negators,
            mixed_polarity,
            items,
            high_items,
            categories,
            keywords,
            reflective,
            future_focused,
            questioning,
        }
    }
}

pub struct InsightSynthesizer {
    max_recommendations: usize,
}

impl Default for InsightSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightSynthesizer {
    pub fn new() -> Self {
        Self::with_config(5)
    }

    /// Creates a synthesizer with a custom recommendation limit.
    ///
    /// # Arguments
    ///
    /// * `max_recommendations` - Upper bound on returned recommendations;
    ///   values below 1 are raised to 1.
    pub fn with_config(max_recommendations: usize) -> Self {
        Self {
            max_recommendations: max_recommendations.max(1),
        }
    }

    fn mood(&self, s: &Signals) -> Mood {
        if s.score >= 0.5 && s.intensifiers > 0 {
            Mood::Excited
        } else if s.score > 0.3 {
            Mood::Happy
        } else if s.score > 0.1 {
            Mood::Content
        } else if s.score <= -0.4 && s.items >= 3 {
            Mood::Stressed
        } else if s.score <= -0.4 {
            Mood::Sad
        } else if s.score < -0.1 {
            Mood::Concerned
        } else if s.reflective || s.keywords >= 5 {
            Mood::Thoughtful
        } else {
            Mood::Neutral
        }
    }

    fn energy(&self, s: &Signals) -> Energy {
        let level = 0.5 * s.score.abs()
            + 0.15 * s.intensifiers.min(4) as f32
            + 0.1 * s.items.min(5) as f32;
        if level >= 0.6 {
            Energy::High
        } else if level >= 0.25 {
            Energy::Medium
        } else {
            Energy::Low
        }
    }

    fn focus(&self, s: &Signals) -> Focus {
        if s.categories == 0 && s.items == 0 {
            Focus::Mixed
        } else if s.categories <= 2 && s.items <= 5 {
            Focus::Clear
        } else if s.categories >= 4 {
            Focus::Scattered
        } else {
            Focus::Mixed
        }
    }

    fn recommendations(
        &self,
        inputs: &InsightInputs<'_>,
        s: &Signals,
        mood: Mood,
        focus: Focus,
    ) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();

        if let Some(top) = inputs
            .actions
            .and_then(|a| a.candidates.iter().find(|c| c.priority == Priority::High))
        {
            out.push(format!("Start with your top priority: \"{}\".", top.text));
        }
        if s.items > 5 {
            out.push(format!(
                "You mentioned {} action items; group them into a short plan.",
                s.items
            ));
        } else if s.items > 0 && s.high_items == 0 {
            out.push("Pick one action item and block out time for it.".to_string());
        }

        match mood {
            Mood::Stressed => out.push(
                "Things sound heavy; split big tasks into smaller steps and take a short break."
                    .to_string(),
            ),
            Mood::Sad => {
                out.push("Be kind to yourself today; consider talking to someone you trust.".to_string())
            }
            Mood::Concerned => out.push(
                "Write down what is worrying you and one small step to address it.".to_string(),
            ),
            Mood::Excited | Mood::Happy => {
                out.push("Capture what is going well so you can build on it.".to_string())
            }
            Mood::Thoughtful => {
                out.push("Revisit these reflections later to turn them into decisions.".to_string())
            }
            Mood::Content | Mood::Neutral => {}
        }

        if focus == Focus::Scattered {
            out.push("Several topics came up; choose one to focus on next.".to_string());
        }

        if let Some(topic) = inputs.topics.and_then(|t| t.primary.first()) {
            out.push(format!("Keep exploring \"{}\" in your next note.", topic));
        }

        if let Some(usage) = inputs.usage {
            if usage.streak_days >= 3 {
                out.push(format!(
                    "{}-day recording streak, keep it going.",
                    usage.streak_days
                ));
            } else if usage.total_memories == 0 {
                out.push("This is your first note; record regularly to reveal trends.".to_string());
            }
        }

        out.truncate(self.max_recommendations);
        if out.is_empty() {
            out.push(GENERIC_RECOMMENDATION.to_string());
        }
        out
    }

    fn patterns(&self, inputs: &InsightInputs<'_>, s: &Signals) -> Vec<String> {
        let mut out = Vec::new();
        if s.items >= 3 {
            out.push(format!("action-oriented: {} action items", s.items));
        }
        if s.categories >= 4 {
            out.push(format!("wide-ranging: {} topic areas", s.categories));
        }
        if s.future_focused {
            out.push("future-focused".to_string());
        }
        if s.questioning {
            out.push("open questions".to_string());
        }
        if s.mixed_polarity {
            out.push("mixed feelings".to_string());
        }
        if s.negators >= 2 {
            out.push("frequent negation".to_string());
        }
        if s.intensifiers >= 2 {
            out.push("emphatic language".to_string());
        }
        if inputs.usage.is_some_and(|u| u.memories_this_week >= 5) {
            out.push("frequent journaling".to_string());
        }
        out
    }

    /// Derives mood, energy, focus, recommendations and patterns.
    ///
    /// # Arguments
    ///
    /// * `inputs` - Whatever stage outputs exist. Missing stages count as
    ///   neutral sentiment, no action items and no topics.
    ///
    /// # Returns
    ///
    /// An [`InsightSummary`] with at least one recommendation. The same
    /// inputs always produce the same summary.
    pub fn synthesize(&self, inputs: InsightInputs<'_>) -> InsightSummary {
        let signals = Signals::gather(&inputs);
        let mood = self.mood(&signals);
        let energy = self.energy(&signals);
        let focus = self.focus(&signals);

        InsightSummary {
            mood,
            energy,
            focus,
            recommendations: self.recommendations(&inputs, &signals, mood, focus),
            patterns: self.patterns(&inputs, &signals),
        }
    }
}
