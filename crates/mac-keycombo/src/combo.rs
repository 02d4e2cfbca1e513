use std::{
    collections::BTreeSet,
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use crate::{
    Modifier,
    labels::{keycode_for_label, label_for_keycode},
    modifiers_from_cg_flags,
};

/// A key combination: one non-modifier key plus a set of modifiers.
///
/// Equality and hashing cover `(keycode, modifiers)` only. The label is
/// derived display metadata and never affects identity, so two combinations
/// decoded on different layouts still compare equal when they name the same
/// physical chord.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyCombination {
    /// Hardware virtual keycode (`kVK_*`).
    pub keycode: u16,
    /// Display label derived from the keycode.
    pub label: String,
    /// Modifier keys held for this combination.
    pub modifiers: BTreeSet<Modifier>,
}

impl PartialEq for KeyCombination {
    fn eq(&self, other: &Self) -> bool {
        self.keycode == other.keycode && self.modifiers == other.modifiers
    }
}

impl Eq for KeyCombination {}

impl Hash for KeyCombination {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.keycode.hash(state);
        self.modifiers.hash(state);
    }
}

impl KeyCombination {
    /// Builds a combination from a keycode and an explicit modifier set,
    /// deriving the label.
    pub fn new(keycode: u16, modifiers: BTreeSet<Modifier>) -> Self {
        Self {
            keycode,
            label: label_for_keycode(keycode),
            modifiers,
        }
    }

    /// Decodes a raw key event (keycode + CGEventFlags bits) into a
    /// combination. Pure and total: unknown keycodes get a fallback label.
    pub fn from_event(keycode: u16, cg_flags: u64) -> Self {
        Self::new(keycode, modifiers_from_cg_flags(cg_flags))
    }

    /// Parses a spec of the form `"cmd+shift+k"`.
    ///
    /// Case-insensitive; components are separated by `+` and the last
    /// component is always the key label. Returns `None` when a modifier or
    /// the key label is unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts: Vec<&str> = s.split('+').collect();
        let key_raw = parts.pop()?.trim();
        let keycode = keycode_for_label(key_raw)?;
        let mut modifiers = BTreeSet::new();
        for part in parts {
            modifiers.insert(Modifier::from_spec(part.trim())?);
        }
        Some(Self::new(keycode, modifiers))
    }

    /// True when the combination carries at least one modifier.
    pub fn has_modifiers(&self) -> bool {
        !self.modifiers.is_empty()
    }

    /// Canonical display string: modifiers in ctrl/opt/shift/cmd order, then
    /// the lowercased key label, joined with `+` (e.g. `shift+cmd+k`).
    pub fn display_string(&self) -> String {
        let mut out: Vec<String> = self
            .modifiers
            .iter()
            .map(|m| m.to_spec().to_string())
            .collect();
        out.push(self.label.to_ascii_lowercase());
        out.join("+")
    }
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_string())
    }
}
