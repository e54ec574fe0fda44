use chrono::{DateTime, Utc};
use itertools::Itertools;

use super::or_fallback;
use crate::{
    framework::Error,
    gateway::Gateway,
    journal::{recent_entries, JournalEntry},
    validate::sanitize,
};

pub const CHAT_WINDOW_DAYS: i64 = 30;

const CONFUSED_REPLY: &str =
    "I'm having a little trouble thinking right now. Please try asking again.";

const OFFLINE_REPLY: &str =
    "Sorry, I couldn't connect to my brain. Please check your connection and try again.";

pub fn fallback_reply(err: &Error) -> String {
    match err {
        Error::MalformedResponse(_) => CONFUSED_REPLY,
        _ => OFFLINE_REPLY,
    }
    .to_string()
}

pub fn render_entries<'a>(entries: impl IntoIterator<Item = &'a JournalEntry>) -> String {
    entries
        .into_iter()
        .map(|e| format!("Date: {}\nContent: {}", e.display_date(), sanitize(&e.content)))
        .join("\n\n")
}

pub fn build_prompt(question: &str, entries_text: &str) -> String {
    format!(
        r#"You are "Emote", a compassionate and insightful assistant inside a personal journal app.
The user is asking about their past entries. Answer using only the entries below.
Do not invent details or give generic advice; ground the whole answer in the text provided.
Keep the tone conversational and supportive.

Question:
"{question}"

Journal entries from the last 30 days:
---
{entries_text}
---

Answer:"#
    )
}

/// Answers a question about the entries written in the 30 days before `now`.
pub async fn answer(
    gateway: &Gateway,
    question: &str,
    entries: &[JournalEntry],
    now: DateTime<Utc>,
) -> Result<String, Error> {
    let question = gateway.validate(question)?;

    let recent = recent_entries(entries, now, CHAT_WINDOW_DAYS);
    let prompt = build_prompt(&question, &render_entries(recent));

    let result = gateway.generate_text(prompt).await;

    Ok(or_fallback("chat", result, fallback_reply))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_answers_get_a_retry_hint() {
        assert_eq!(fallback_reply(&Error::malformed("empty")), CONFUSED_REPLY);
        assert_eq!(fallback_reply(&Error::Timeout), OFFLINE_REPLY);
        assert_eq!(fallback_reply(&Error::NotConfigured), OFFLINE_REPLY);
    }

    #[test]
    fn prompt_quotes_question() {
        let prompt = build_prompt("Why was Tuesday hard?", "Date: 2025-07-15\nContent: meetings");

        assert!(prompt.contains("\"Why was Tuesday hard?\""));
        assert!(prompt.contains("---\nDate: 2025-07-15\nContent: meetings\n---"));
    }
}
