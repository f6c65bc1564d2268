//! Player identity matching between the league catalog and the value feed.
//!
//! The value feed keys players by a `name_id` such as `"jamarrchasewr"`:
//! lowercased first and last name with spaces and punctuation removed,
//! followed by the position.

use crate::types::Player;

/// Derives lookup keys for a player, most specific first.
pub trait PlayerMatcher: Send + Sync {
    fn candidate_keys(&self, player: &Player) -> Vec<String>;
}

/// The value feed's `name_id` scheme, plus a first-initial fallback for
/// feeds that abbreviate first names.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameIdMatcher;

/// Lowercase and keep only word characters (`[a-z0-9_]`).
fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

impl PlayerMatcher for NameIdMatcher {
    fn candidate_keys(&self, player: &Player) -> Vec<String> {
        let first = normalize_name(&player.first_name);
        let last = normalize_name(&player.last_name);
        let position = player.position.to_lowercase();

        let mut keys = vec![format!("{first}{last}{position}")];

        if let Some(initial) = first.chars().next() {
            if !last.is_empty() {
                let abbreviated = format!("{initial}{last}{position}");
                if !keys.contains(&abbreviated) {
                    keys.push(abbreviated);
                }
            }
        }
        keys
    }
}
