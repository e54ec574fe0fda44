//! Goal suggestions for themes that keep coming back in recent entries.

use itertools::Itertools;

use super::tally;
use crate::journal::JournalEntry;

/// How many of the newest entries are looked at.
pub const SUGGESTION_WINDOW: usize = 5;
pub const MIN_ENTRIES: usize = 2;

fn goal_for(theme: &str) -> Option<&'static str> {
    let goal = match theme {
        "anxiety" => "Practice a 5-minute breathing exercise daily.",
        "stress" => "Take a 10-minute break away from screens each afternoon.",
        "self-doubt" => "Write down one personal accomplishment at the end of each day.",
        "loneliness" => "Reach out to one friend or family member this week.",
        "low mood" => "Spend 15 minutes outside in the sun each day.",
        _ => return None,
    };

    Some(goal)
}

/// Suggests a goal for every known theme mentioned more than once across the
/// newest entries. `entries` is expected newest first.
pub fn suggest(entries: &[JournalEntry]) -> Vec<&'static str> {
    let window = &entries[..entries.len().min(SUGGESTION_WINDOW)];

    if window.len() < MIN_ENTRIES {
        return vec![];
    }

    let themes = window
        .iter()
        .flat_map(|e| e.themes.iter())
        .map(|theme| theme.to_lowercase());

    tally(themes)
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .filter_map(|(theme, _)| goal_for(&theme))
        .unique()
        .collect()
}
