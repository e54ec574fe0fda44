//! Journal features.
//!
//! The AI-backed ones build their prompt from user content, ask the
//! [`Gateway`] for a free-text or JSON answer, and swap in a fallback value
//! when the call finally fails. Only validation problems reach the caller as
//! errors. Goals and insights are computed locally from the entries.
//!
//! [`Gateway`]: crate::gateway::Gateway

use std::collections::HashMap;

use tracing::{debug, error};

use crate::framework::Error;

pub mod analysis;
pub mod chat;
pub mod goals;
pub mod insights;
pub mod resources;
pub mod summary;

pub(crate) fn or_fallback<T>(feature: &str, result: Result<T, Error>, fallback: impl FnOnce(&Error) -> T) -> T {
    match result {
        Ok(value) => value,
        Err(err @ Error::NotConfigured) => {
            debug!(feature, "demo mode, serving fallback");
            fallback(&err)
        }
        Err(err) => {
            error!(feature, "ai call failed, serving fallback: {}", err);
            fallback(&err)
        }
    }
}

/// Counts occurrences, keeping items in order of first appearance.
pub(crate) fn tally<I>(items: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for item in items {
        match positions.get(&item) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_keeps_first_appearance_order() {
        let items = ["rest", "work", "rest", "family", "work", "rest"].map(String::from);

        assert_eq!(
            tally(items),
            vec![
                ("rest".to_string(), 3),
                ("work".to_string(), 2),
                ("family".to_string(), 1)
            ]
        );
    }
}
