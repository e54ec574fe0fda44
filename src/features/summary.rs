use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::or_fallback;
use crate::{
    framework::Error,
    gateway::Gateway,
    journal::{recent_entries, JournalEntry},
    validate::sanitize,
};

pub const SUMMARY_WINDOW_DAYS: i64 = 7;
pub const MIN_ENTRIES: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub overall_feeling: String,
    #[serde(default)]
    pub key_themes: Vec<String>,
    #[serde(default)]
    pub positive_moment: String,
    pub gentle_suggestion: String,
}

impl WeeklySummary {
    pub fn fallback() -> Self {
        Self {
            overall_feeling: "An error occurred while analyzing your week.".to_string(),
            key_themes: vec![],
            positive_moment: String::new(),
            gentle_suggestion: "Try to be kind to yourself this week.".to_string(),
        }
    }
}

pub fn render_entries<'a>(entries: impl IntoIterator<Item = &'a JournalEntry>) -> String {
    entries
        .into_iter()
        .map(|e| {
            format!(
                "Entry on {}:\nTitle: {}\nContent: {}",
                e.display_date(),
                sanitize(&e.title),
                sanitize(&e.content)
            )
        })
        .join("\n\n---\n\n")
}

pub fn build_prompt(entries_text: &str) -> String {
    format!(
        r#"You are a compassionate psychologist reviewing a client's journal entries from the past week.
Write a gentle, insightful summary grounded in the text below.
Reply with a single JSON object and nothing else, using these keys:
- "overallFeeling": 2 to 3 sentences on the overall emotional tone of the week.
- "keyThemes": an array of 2 to 4 strings naming the most prominent themes.
- "positiveMoment": a short paragraph about one positive moment or feeling from the entries. If there is none, offer gentle encouragement instead.
- "gentleSuggestion": one forward-looking, encouraging suggestion for the week ahead.

Journal entries:
---
{entries_text}
---"#
    )
}

/// Summarizes the entries written in the week before `now`.
///
/// Fewer than [`MIN_ENTRIES`] entries in the window is a validation error and
/// no call is made.
pub async fn weekly_summary(
    gateway: &Gateway,
    entries: &[JournalEntry],
    now: DateTime<Utc>,
) -> Result<WeeklySummary, Error> {
    let recent = recent_entries(entries, now, SUMMARY_WINDOW_DAYS);

    if recent.len() < MIN_ENTRIES {
        return Err(Error::validation(format!(
            "you need at least {MIN_ENTRIES} entries in the last {SUMMARY_WINDOW_DAYS} days to generate a summary"
        )));
    }

    let prompt = build_prompt(&render_entries(recent));
    let result = gateway.generate_json::<WeeklySummary>(prompt).await;

    Ok(or_fallback("summary", result, |_| WeeklySummary::fallback()))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn renders_entries_with_separators() {
        let day = |d| Utc.with_ymd_and_hms(2025, 7, d, 8, 0, 0).unwrap();
        let entries = vec![
            JournalEntry::new("Run", "Ran <b>5k</b>", day(20)),
            JournalEntry::new("Call", "Talked to mom", day(19)),
        ];

        assert_eq!(
            render_entries(&entries),
            "Entry on 2025-07-20:\nTitle: Run\nContent: Ran 5k\n\n---\n\nEntry on 2025-07-19:\nTitle: Call\nContent: Talked to mom"
        );
    }
}
