//! Key combination model for macOS global shortcuts.
//!
//! A [`KeyCombination`] is the unit a shortcut binds to: a hardware virtual
//! keycode (`kVK_*`, the value CoreGraphics reports in
//! `kCGKeyboardEventKeycode`) plus a set of modifier keys. Decoding from a
//! raw event is a pure, total function: unrecognized keycodes get a fallback
//! label rather than an error.
//!
//! Two combinations are the same binding iff their keycode and modifier set
//! are equal; the label is display metadata only and never participates in
//! equality or hashing.

mod combo;
mod labels;
mod modifiers;

pub use combo::KeyCombination;
pub use labels::label_for_keycode;
pub use modifiers::{Modifier, modifiers_from_cg_flags};
