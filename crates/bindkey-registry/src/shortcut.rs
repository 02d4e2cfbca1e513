use std::collections::BTreeSet;

use bindkey_engine::Action;
use chrono::{DateTime, Utc};
use mac_keycombo::KeyCombination;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted binding of one key combination to one action, plus metadata.
///
/// Owned exclusively by the [`crate::Registry`]; everything outside the
/// registry works on clones and refers back by id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shortcut {
    /// Stable unique identifier.
    pub id: Uuid,
    /// The combination this shortcut binds to.
    pub combo: KeyCombination,
    /// What to execute when the combination fires.
    pub action: Action,
    /// User-assigned tags for grouping.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Number of times this shortcut has been triggered.
    #[serde(default)]
    pub usage_count: u64,
    /// When this shortcut last fired, if ever.
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
}

impl Shortcut {
    /// Create a fresh shortcut with a new id and empty metadata.
    pub fn new(combo: KeyCombination, action: Action) -> Self {
        Self {
            id: Uuid::new_v4(),
            combo,
            action,
            tags: BTreeSet::new(),
            usage_count: 0,
            last_used_at: None,
        }
    }

    /// One-line description used in conflict messages and notifications,
    /// e.g. `shift+cmd+k -> Open Safari`.
    pub fn describe(&self) -> String {
        format!("{} -> {}", self.combo, self.action.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_includes_combo_and_action() {
        let combo = KeyCombination::parse("cmd+shift+k").expect("parse");
        let shortcut = Shortcut::new(
            combo,
            Action::LaunchApp {
                bundle_id: "com.apple.Safari".into(),
                name: "Safari".into(),
            },
        );
        assert_eq!(shortcut.describe(), "shift+cmd+k -> Open Safari");
    }

    #[test]
    fn serde_roundtrip() {
        let shortcut = Shortcut::new(
            KeyCombination::parse("ctrl+opt+t").expect("parse"),
            Action::RunNamedAutomation {
                name: "Morning".into(),
            },
        );
        let json = serde_json::to_string(&shortcut).expect("serialize");
        let back: Shortcut = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(shortcut, back);
    }
}
