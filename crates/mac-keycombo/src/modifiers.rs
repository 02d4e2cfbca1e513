use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Modifier keys a combination can carry.
///
/// The derived `Ord` gives the canonical display order:
/// Control, Option, Shift, Command.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Modifier {
    /// Control (ctrl).
    Control,
    /// Option (opt / alt).
    Option,
    /// Shift.
    Shift,
    /// Command (cmd).
    Command,
}

impl Modifier {
    /// Parses a modifier spec. Case-insensitive, accepts the common alias
    /// words (cmd/command, ctrl/control, opt/option/alt, shift).
    pub fn from_spec(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Self::Control),
            "opt" | "option" | "alt" => Some(Self::Option),
            "shift" => Some(Self::Shift),
            "cmd" | "command" => Some(Self::Command),
            _ => None,
        }
    }

    /// Canonical spec string for this modifier, always lowercased.
    pub fn to_spec(self) -> &'static str {
        match self {
            Self::Control => "ctrl",
            Self::Option => "opt",
            Self::Shift => "shift",
            Self::Command => "cmd",
        }
    }
}

/// Construct a modifier set from macOS CGEventFlags bits.
///
/// Only the primary matching bits are considered:
/// - Shift (1 << 17)
/// - Control (1 << 18)
/// - Option/Alternate (1 << 19)
/// - Command (1 << 20)
pub fn modifiers_from_cg_flags(flags: u64) -> BTreeSet<Modifier> {
    let mut set = BTreeSet::new();
    if flags & (1 << 17) != 0 {
        set.insert(Modifier::Shift);
    }
    if flags & (1 << 18) != 0 {
        set.insert(Modifier::Control);
    }
    if flags & (1 << 19) != 0 {
        set.insert(Modifier::Option);
    }
    if flags & (1 << 20) != 0 {
        set.insert(Modifier::Command);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_bits_decode() {
        assert!(modifiers_from_cg_flags(0).is_empty());
        let set = modifiers_from_cg_flags((1 << 17) | (1 << 20));
        assert!(set.contains(&Modifier::Shift));
        assert!(set.contains(&Modifier::Command));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn modifier_specs() {
        assert_eq!(Modifier::from_spec("cmd"), Some(Modifier::Command));
        assert_eq!(Modifier::from_spec("CTRL"), Some(Modifier::Control));
        assert_eq!(Modifier::from_spec("alt"), Some(Modifier::Option));
        assert_eq!(Modifier::from_spec("shift"), Some(Modifier::Shift));
        assert_eq!(Modifier::from_spec("hyper"), None);

        assert_eq!(Modifier::Command.to_spec(), "cmd");
        assert_eq!(Modifier::Option.to_spec(), "opt");
    }

    #[test]
    fn canonical_order_is_ctrl_opt_shift_cmd() {
        let set: BTreeSet<Modifier> = [
            Modifier::Command,
            Modifier::Shift,
            Modifier::Control,
            Modifier::Option,
        ]
        .into_iter()
        .collect();
        let specs: Vec<&str> = set.iter().map(|m| m.to_spec()).collect();
        assert_eq!(specs, ["ctrl", "opt", "shift", "cmd"]);
    }
}
