//! Self-help resource library, theme-driven recommendations and generated
//! resource content.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::or_fallback;
use crate::{framework::Error, gateway::Gateway, journal::JournalEntry};

/// How many of the newest entries feed the recommendations.
pub const RECOMMENDATION_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceTopic {
    Anxiety,
    Depression,
    Anger,
    Confidence,
    Relationships,
    Growth,
    General,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Resource {
    pub id: ResourceTopic,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

impl ResourceTopic {
    pub const ALL: [ResourceTopic; 7] = [
        ResourceTopic::Anxiety,
        ResourceTopic::Depression,
        ResourceTopic::Anger,
        ResourceTopic::Confidence,
        ResourceTopic::Relationships,
        ResourceTopic::Growth,
        ResourceTopic::General,
    ];

    pub fn resource(self) -> Resource {
        let (title, description, icon) = match self {
            ResourceTopic::Anxiety => (
                "Managing Anxiety",
                "Techniques to calm a worried mind and handle feelings of stress.",
                "🧠",
            ),
            ResourceTopic::Depression => (
                "Lifting Your Mood",
                "Strategies for when you're feeling down or unmotivated.",
                "☀️",
            ),
            ResourceTopic::Anger => (
                "Handling Anger",
                "Constructive ways to process and express anger without causing harm.",
                "💨",
            ),
            ResourceTopic::Confidence => (
                "Building Confidence",
                "Exercises to challenge self-doubt and recognize your strengths.",
                "💪",
            ),
            ResourceTopic::Relationships => (
                "Navigating Relationships",
                "Guidance on communication, boundaries, and connection with others.",
                "🤝",
            ),
            ResourceTopic::Growth => (
                "Mindfulness & Growth",
                "Cultivate awareness and continue your personal growth journey.",
                "🌱",
            ),
            ResourceTopic::General => (
                "General Wellness",
                "General tips and information for maintaining your mental well-being.",
                "❤️",
            ),
        };

        Resource {
            id: self,
            title,
            description,
            icon,
        }
    }

    /// Maps an AI-extracted theme onto a library topic, if any.
    pub fn for_theme(theme: &str) -> Option<ResourceTopic> {
        let topic = match theme.trim().to_lowercase().as_str() {
            "anxiety" | "stress" | "worry" => ResourceTopic::Anxiety,
            "sadness" | "low mood" | "depression" => ResourceTopic::Depression,
            "anger" | "frustration" => ResourceTopic::Anger,
            "self-doubt" | "insecurity" => ResourceTopic::Confidence,
            "relationships" | "family conflict" | "loneliness" => ResourceTopic::Relationships,
            "personal growth" | "mindfulness" => ResourceTopic::Growth,
            _ => return None,
        };

        Some(topic)
    }
}

pub fn library() -> Vec<Resource> {
    ResourceTopic::ALL.iter().map(|t| t.resource()).collect()
}

/// Topics suggested by the themes of the newest entries, in order of first
/// appearance. `entries` is expected newest first.
pub fn recommend(entries: &[JournalEntry]) -> Vec<ResourceTopic> {
    let window = &entries[..entries.len().min(RECOMMENDATION_WINDOW)];

    if window.len() < 2 {
        return vec![ResourceTopic::General];
    }

    let topics: Vec<_> = window
        .iter()
        .flat_map(|e| e.themes.iter())
        .filter_map(|theme| ResourceTopic::for_theme(theme))
        .unique()
        .collect();

    if topics.is_empty() {
        vec![ResourceTopic::General]
    } else {
        topics
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceContent {
    pub title: String,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub exercise: Exercise,
    pub affirmation: String,
}

impl ResourceContent {
    pub fn fallback() -> Self {
        Self {
            title: "Error Generating Content".to_string(),
            tips: vec![],
            exercise: Exercise::default(),
            affirmation: "Could not generate content at this time.".to_string(),
        }
    }
}

pub fn build_prompt(topic: &str) -> String {
    format!(
        r#"You are a compassionate psychologist writing helpful content for someone struggling with "{topic}".
Reply with a single JSON object and nothing else, using these keys:
- "title": the title of the resource (e.g. "Guidance for {topic}").
- "tips": an array of 3 to 4 short, actionable tips.
- "exercise": an object with "title" and "steps" (an array of strings) describing one simple, helpful exercise.
- "affirmation": a single encouraging affirmation.

Topic: "{topic}""#
    )
}

pub async fn generate_content(gateway: &Gateway, topic: ResourceTopic) -> ResourceContent {
    let prompt = build_prompt(topic.resource().title);
    let result = gateway.generate_json::<ResourceContent>(prompt).await;

    or_fallback("resources", result, |_| ResourceContent::fallback())
}
