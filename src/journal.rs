//! Journal entries as exported from the hosted store, plus local exports.

use std::{fs, path::Path};

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::framework::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub emotions: Vec<String>,
    #[serde(default)]
    pub themes: Vec<String>,
}

impl JournalEntry {
    pub fn new(title: impl Into<String>, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            content: content.into(),
            created_at,
            mood: None,
            activities: Vec::new(),
            sentiment_score: None,
            emotions: Vec::new(),
            themes: Vec::new(),
        }
    }

    pub fn display_date(&self) -> String {
        self.created_at.format("%Y-%m-%d").to_string()
    }
}

/// Parses a JSON array of entries, newest first.
pub fn parse_entries(json: &str) -> Result<Vec<JournalEntry>, Error> {
    let mut entries: Vec<JournalEntry> = serde_json::from_str(json).map_err(Error::parse)?;
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(entries)
}

pub fn load_entries(path: &Path) -> Result<Vec<JournalEntry>, Error> {
    let json = fs::read_to_string(path)?;
    parse_entries(&json)
}

/// Entries written strictly after `now - days`.
pub fn recent_entries(entries: &[JournalEntry], now: DateTime<Utc>, days: i64) -> Vec<&JournalEntry> {
    let since = now - Duration::days(days);

    entries.iter().filter(|e| e.created_at > since).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Txt,
    Csv,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Txt => "text/plain",
            ExportFormat::Csv => "text/csv",
        }
    }

    pub fn file_name(&self) -> String {
        format!("emote_journal_export.{self}")
    }
}

const CSV_HEADER: &str = "date,title,mood,content,sentimentScore,emotions,themes";

fn csv_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn csv_row(entry: &JournalEntry) -> String {
    [
        entry.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        csv_quote(&entry.title),
        csv_quote(entry.mood.as_deref().unwrap_or_default()),
        csv_quote(&entry.content),
        entry.sentiment_score.map(|s| s.to_string()).unwrap_or_default(),
        csv_quote(&entry.emotions.join(", ")),
        csv_quote(&entry.themes.join(", ")),
    ]
    .join(",")
}

fn text_block(entry: &JournalEntry) -> String {
    let title = if entry.title.is_empty() {
        "Untitled"
    } else {
        entry.title.as_str()
    };

    format!(
        "--------------------\nDate: {}\nTitle: {}\nMood: {}\n\n{}",
        entry.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        title,
        entry.mood.as_deref().unwrap_or("N/A"),
        entry.content
    )
}

pub fn export(entries: &[JournalEntry], format: ExportFormat) -> Result<String, Error> {
    let output = match format {
        ExportFormat::Json => serde_json::to_string_pretty(entries).map_err(Error::parse)?,
        ExportFormat::Txt => entries.iter().map(text_block).join("\n\n"),
        ExportFormat::Csv => {
            let rows = entries.iter().map(csv_row).join("\n");
            format!("{CSV_HEADER}\n{rows}")
        }
    };

    Ok(output)
}
