use serde::{Deserialize, Serialize};

use super::or_fallback;
use crate::{framework::Error, gateway::Gateway};

pub const MIN_SENTIMENT: f64 = -10.0;
pub const MAX_SENTIMENT: f64 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntryAnalysis {
    pub sentiment_score: f64,
    #[serde(default)]
    pub emotions: Vec<String>,
    #[serde(default)]
    pub themes: Vec<String>,
}

impl EntryAnalysis {
    pub fn fallback() -> Self {
        Self {
            sentiment_score: 0.0,
            emotions: vec!["Analysis Error".to_string()],
            themes: vec![],
        }
    }
}

pub fn build_prompt(entry: &str) -> String {
    format!(
        r#"You are a compassionate psychologist reading a client's journal entry.
Reply with a single JSON object and nothing else, using these keys:
- "sentimentScore": a number from -10 (extremely negative) to 10 (extremely positive).
- "emotions": an array of 2 to 4 strings naming the dominant emotions (e.g. "Sadness", "Frustration", "Hope").
- "themes": an array of 2 to 3 strings naming the key themes or topics (e.g. "Work Stress", "Family Conflict").

Journal entry:
---
{entry}
---"#
    )
}

/// Scores the sentiment of an entry and extracts its emotions and themes.
///
/// Invalid input is rejected before any call is made. Any failure of the
/// call itself yields [`EntryAnalysis::fallback`].
pub async fn analyze_entry(gateway: &Gateway, entry: &str) -> Result<EntryAnalysis, Error> {
    let entry = gateway.validate(entry)?;

    let result = gateway
        .generate_json::<EntryAnalysis>(build_prompt(&entry))
        .await
        .map(|mut analysis| {
            analysis.sentiment_score = analysis.sentiment_score.clamp(MIN_SENTIMENT, MAX_SENTIMENT);
            analysis
        });

    Ok(or_fallback("analysis", result, |_| EntryAnalysis::fallback()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_entry() {
        let prompt = build_prompt("I finally slept well.");

        assert!(prompt.contains("---\nI finally slept well.\n---"));
        assert!(prompt.contains("\"sentimentScore\""));
    }

    #[test]
    fn decodes_camel_case_answer() {
        let analysis: EntryAnalysis = serde_json::from_str(
            r#"{ "sentimentScore": 7, "emotions": ["Joy", "Calm"], "themes": ["Rest"] }"#,
        )
        .unwrap();

        assert_eq!(analysis.sentiment_score, 7.0);
        assert_eq!(analysis.emotions, vec!["Joy", "Calm"]);
    }
}
