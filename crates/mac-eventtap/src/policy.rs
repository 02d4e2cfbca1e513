use mac_keycombo::{KeyCombination, Modifier};

const KEY_A: u16 = 0;
const KEY_Z: u16 = 6;
const KEY_X: u16 = 7;
const KEY_C: u16 = 8;
const KEY_V: u16 = 9;
const KEY_Q: u16 = 12;
const KEY_W: u16 = 13;
const KEY_TAB: u16 = 48;

/// What the tap should send to the consumer, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    /// The combination is bound; the consumer should fire its action.
    Triggered,
    /// Modified chord nobody owns; the consumer may notify the user.
    Unknown,
}

/// Classification result for one key-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub emit: Option<Emit>,
    pub intercept: bool,
}

const PASS: Decision = Decision {
    emit: None,
    intercept: false,
};

/// System-critical chords that must reach the foreground app unless the
/// user has explicitly bound them: cmd+a/c/v/x/z/q/w/tab and cmd+shift+z.
pub fn is_reserved(combo: &KeyCombination) -> bool {
    let mods = &combo.modifiers;
    let cmd_only = mods.len() == 1 && mods.contains(&Modifier::Command);
    let cmd_shift = mods.len() == 2
        && mods.contains(&Modifier::Command)
        && mods.contains(&Modifier::Shift);
    match combo.keycode {
        KEY_A | KEY_C | KEY_V | KEY_X | KEY_Q | KEY_W | KEY_TAB => cmd_only,
        KEY_Z => cmd_only || cmd_shift,
        _ => false,
    }
}

/// Classify how the tap should handle a key-down.
///
/// - Unmodified keys always pass through untouched.
/// - A bound combination is swallowed and emitted as [`Emit::Triggered`],
///   even when it is on the reserved list (a binding overrides it).
/// - A reserved chord with no binding passes through untouched.
/// - Any other modified chord is swallowed and emitted as [`Emit::Unknown`].
/// - OS auto-repeats keep the press's interception but are never re-emitted,
///   so a held chord fires its action (or its notification) exactly once.
pub fn classify(combo: &KeyCombination, bound: bool, is_repeat: bool) -> Decision {
    if !combo.has_modifiers() {
        return PASS;
    }
    if bound {
        return Decision {
            emit: (!is_repeat).then_some(Emit::Triggered),
            intercept: true,
        };
    }
    if is_reserved(combo) {
        return PASS;
    }
    Decision {
        emit: (!is_repeat).then_some(Emit::Unknown),
        intercept: true,
    }
}
