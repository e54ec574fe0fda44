//! Dashboard figures computed from the entries themselves: mood distribution,
//! sentiment trend, mood-boosting activities, word cloud and the monthly
//! timeline. None of these reach the generative endpoint.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use strum_macros::{Display, EnumString};

use super::tally;
use crate::journal::{recent_entries, JournalEntry};

pub const SENTIMENT_WINDOW_DAYS: i64 = 30;
pub const POSITIVE_SENTIMENT: f64 = 2.0;
pub const TOP_ACTIVITIES: usize = 5;
pub const CLOUD_SIZE: usize = 40;
pub const MIN_CLOUD_WORDS: usize = 5;

lazy_static! {
    static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^a-z0-9]").unwrap();
    static ref STOP_WORDS: HashSet<&'static str> = [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
        "he", "him", "his", "himself", "she", "her", "hers", "herself", "it", "its", "itself",
        "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
        "that", "these", "those", "am", "is", "are", "was", "were", "be", "been", "being",
        "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and",
        "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for", "with",
        "about", "against", "between", "into", "through", "during", "before", "after", "above",
        "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under", "again",
        "further", "then", "once", "here", "there", "when", "where", "why", "how", "all", "any",
        "both", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not",
        "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just",
        "don", "should", "now", "ve", "ll", "m", "re",
    ]
    .into_iter()
    .collect();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Anxious,
    Neutral,
}

impl Mood {
    pub const ALL: [Mood; 5] = [Mood::Happy, Mood::Sad, Mood::Angry, Mood::Anxious, Mood::Neutral];

    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Angry => "Angry",
            Mood::Anxious => "Anxious",
            Mood::Neutral => "Neutral",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MoodCount {
    pub mood: Mood,
    pub name: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SentimentPoint {
    pub date: String,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActivityCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WordCount {
    pub text: String,
    pub value: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthGroup<'a> {
    pub label: String,
    pub entries: Vec<&'a JournalEntry>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsightsReport {
    pub mood_distribution: Vec<MoodCount>,
    pub sentiment_over_time: Vec<SentimentPoint>,
    pub mood_boosting_activities: Vec<ActivityCount>,
    pub word_cloud: Vec<WordCount>,
}

fn mood_of(entry: &JournalEntry) -> Option<Mood> {
    entry.mood.as_deref().and_then(|m| m.parse().ok())
}

/// Entry count per known mood, every mood listed even when unused.
pub fn mood_distribution(entries: &[JournalEntry]) -> Vec<MoodCount> {
    Mood::ALL
        .iter()
        .map(|&mood| MoodCount {
            mood,
            name: mood.label(),
            count: entries.iter().filter(|e| mood_of(e) == Some(mood)).count(),
        })
        .collect()
}

/// Scores of the last month, oldest first. `entries` is expected newest first.
pub fn sentiment_over_time(entries: &[JournalEntry], now: DateTime<Utc>) -> Vec<SentimentPoint> {
    recent_entries(entries, now, SENTIMENT_WINDOW_DAYS)
        .into_iter()
        .rev()
        .map(|e| SentimentPoint {
            date: e.created_at.format("%b %-d").to_string(),
            score: e.sentiment_score,
        })
        .collect()
}

fn is_positive(entry: &JournalEntry) -> bool {
    mood_of(entry) == Some(Mood::Happy)
        || entry
            .sentiment_score
            .map_or(false, |score| score > POSITIVE_SENTIMENT)
}

fn activity_name(id: &str) -> String {
    match id {
        "exercise" => "Exercise",
        "work" => "Work",
        "social" => "Socialized",
        "hobby" => "Hobby",
        "rest" => "Rested",
        "family" => "Family Time",
        "chores" => "Chores",
        "nature" => "Nature",
        other => other,
    }
    .to_string()
}

/// Activities most often tagged on positive days.
pub fn mood_boosting_activities(entries: &[JournalEntry]) -> Vec<ActivityCount> {
    let activities = entries
        .iter()
        .filter(|e| is_positive(e))
        .flat_map(|e| e.activities.iter().cloned());

    tally(activities)
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .take(TOP_ACTIVITIES)
        .map(|(id, count)| ActivityCount {
            name: activity_name(&id),
            count,
        })
        .collect()
}

/// Most used words across all entries, stop words left out. Empty when
/// there is too little text for a meaningful cloud.
pub fn word_cloud(entries: &[JournalEntry]) -> Vec<WordCount> {
    let text = entries.iter().map(|e| e.content.as_str()).join(" ").to_lowercase();

    let words = text
        .split_whitespace()
        .map(|word| NON_ALPHANUMERIC.replace_all(word, "").into_owned())
        .filter(|word| !word.is_empty() && !STOP_WORDS.contains(word.as_str()));

    let counts = tally(words);

    if counts.len() < MIN_CLOUD_WORDS {
        return vec![];
    }

    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .take(CLOUD_SIZE)
        .map(|(text, value)| WordCount { text, value })
        .collect()
}

/// Groups entries by month, in order of first appearance.
pub fn timeline(entries: &[JournalEntry]) -> Vec<MonthGroup<'_>> {
    let mut groups: Vec<MonthGroup> = Vec::new();

    for entry in entries {
        let label = entry.created_at.format("%B %Y").to_string();

        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.entries.push(entry),
            None => groups.push(MonthGroup {
                label,
                entries: vec![entry],
            }),
        }
    }

    groups
}

pub fn report(entries: &[JournalEntry], now: DateTime<Utc>) -> InsightsReport {
    InsightsReport {
        mood_distribution: mood_distribution(entries),
        sentiment_over_time: sentiment_over_time(entries, now),
        mood_boosting_activities: mood_boosting_activities(entries),
        word_cloud: word_cloud(entries),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 21, 20, 0, 0).unwrap()
    }

    fn entry(days_ago: i64, content: &str) -> JournalEntry {
        JournalEntry::new("", content, now() - Duration::days(days_ago))
    }

    fn tagged(mood: Option<&str>, score: Option<f64>, activities: &[&str]) -> JournalEntry {
        JournalEntry {
            mood: mood.map(String::from),
            sentiment_score: score,
            activities: activities.iter().map(|a| a.to_string()).collect(),
            ..entry(1, "text")
        }
    }

    #[test]
    fn counts_known_moods_only() {
        let entries = vec![
            tagged(Some("happy"), None, &[]),
            tagged(Some("happy"), None, &[]),
            tagged(Some("anxious"), None, &[]),
            tagged(Some("ecstatic"), None, &[]),
            tagged(None, None, &[]),
        ];

        let counts: Vec<_> = mood_distribution(&entries)
            .into_iter()
            .map(|m| (m.name, m.count))
            .collect();

        assert_eq!(
            counts,
            vec![("Happy", 2), ("Sad", 0), ("Angry", 0), ("Anxious", 1), ("Neutral", 0)]
        );
    }

    #[test]
    fn sentiment_trend_covers_last_month_oldest_first() {
        let entries = vec![
            JournalEntry {
                sentiment_score: Some(4.0),
                ..entry(0, "today")
            },
            entry(16, "unscored"),
            JournalEntry {
                sentiment_score: Some(-2.0),
                ..entry(20, "early july")
            },
            entry(30, "exactly a month"),
        ];

        assert_eq!(
            sentiment_over_time(&entries, now()),
            vec![
                SentimentPoint {
                    date: "Jul 1".to_string(),
                    score: Some(-2.0)
                },
                SentimentPoint {
                    date: "Jul 5".to_string(),
                    score: None
                },
                SentimentPoint {
                    date: "Jul 21".to_string(),
                    score: Some(4.0)
                },
            ]
        );
    }

    #[test]
    fn activities_come_from_positive_days() {
        let entries = vec![
            tagged(Some("happy"), None, &["exercise", "social"]),
            tagged(None, Some(5.0), &["social", "nature"]),
            tagged(None, Some(2.0), &["work"]),
            tagged(Some("sad"), Some(-3.0), &["chores"]),
            tagged(None, Some(8.0), &["social", "gardening"]),
        ];

        assert_eq!(
            mood_boosting_activities(&entries),
            vec![
                ActivityCount {
                    name: "Socialized".to_string(),
                    count: 3
                },
                ActivityCount {
                    name: "Exercise".to_string(),
                    count: 1
                },
                ActivityCount {
                    name: "Nature".to_string(),
                    count: 1
                },
                ActivityCount {
                    name: "gardening".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn keeps_top_five_activities() {
        let entries = vec![tagged(
            Some("happy"),
            None,
            &["exercise", "work", "social", "hobby", "rest", "family", "chores"],
        )];

        assert_eq!(mood_boosting_activities(&entries).len(), TOP_ACTIVITIES);
    }

    #[test]
    fn word_cloud_strips_punctuation_and_stop_words() {
        let entries = vec![
            entry(0, "I walked to the park. The park was quiet!"),
            entry(1, "Quiet morning, long walk, coffee."),
        ];

        let cloud: Vec<_> = word_cloud(&entries)
            .into_iter()
            .map(|w| (w.text, w.value))
            .collect();

        assert_eq!(
            cloud,
            vec![
                ("park".to_string(), 2),
                ("quiet".to_string(), 2),
                ("walked".to_string(), 1),
                ("morning".to_string(), 1),
                ("long".to_string(), 1),
                ("walk".to_string(), 1),
                ("coffee".to_string(), 1),
            ]
        );
    }

    #[test]
    fn word_cloud_needs_enough_words() {
        let entries = vec![entry(0, "The cat, the cat and a dog.")];

        assert!(word_cloud(&entries).is_empty());
    }

    #[test]
    fn timeline_groups_by_month() {
        let entries = vec![entry(0, "a"), entry(10, "b"), entry(15, "c"), entry(40, "d")];

        let groups: Vec<_> = timeline(&entries)
            .into_iter()
            .map(|g| (g.label, g.entries.iter().map(|e| e.content.as_str()).join("")))
            .collect();

        assert_eq!(
            groups,
            vec![
                ("July 2025".to_string(), "abc".to_string()),
                ("June 2025".to_string(), "d".to_string()),
            ]
        );
    }

    #[test]
    fn report_serializes_camel_case() {
        let value = serde_json::to_value(report(&[], now())).unwrap();

        assert_eq!(value["moodDistribution"][0]["mood"], "happy");
        assert!(value["wordCloud"].as_array().unwrap().is_empty());
    }
}
