//! Display labels for macOS hardware virtual keycodes.
//!
//! The values are the `kVK_*` constants from `HIToolbox/Events.h` for the
//! ANSI layout. The mapping is total: codes without an entry fall back to a
//! generic `Key <n>` label so decoding never fails.

/// Known (keycode, label) pairs for the ANSI layout.
const LABELS: &[(u16, &str)] = &[
    (0, "A"),
    (1, "S"),
    (2, "D"),
    (3, "F"),
    (4, "H"),
    (5, "G"),
    (6, "Z"),
    (7, "X"),
    (8, "C"),
    (9, "V"),
    (11, "B"),
    (12, "Q"),
    (13, "W"),
    (14, "E"),
    (15, "R"),
    (16, "Y"),
    (17, "T"),
    (18, "1"),
    (19, "2"),
    (20, "3"),
    (21, "4"),
    (22, "6"),
    (23, "5"),
    (24, "="),
    (25, "9"),
    (26, "7"),
    (27, "-"),
    (28, "8"),
    (29, "0"),
    (30, "]"),
    (31, "O"),
    (32, "U"),
    (33, "["),
    (34, "I"),
    (35, "P"),
    (36, "Return"),
    (37, "L"),
    (38, "J"),
    (39, "'"),
    (40, "K"),
    (41, ";"),
    (42, "\\"),
    (43, ","),
    (44, "/"),
    (45, "N"),
    (46, "M"),
    (47, "."),
    (48, "Tab"),
    (49, "Space"),
    (50, "`"),
    (51, "Delete"),
    (53, "Escape"),
    (96, "F5"),
    (97, "F6"),
    (98, "F7"),
    (99, "F3"),
    (100, "F8"),
    (101, "F9"),
    (103, "F11"),
    (105, "F13"),
    (107, "F14"),
    (109, "F10"),
    (111, "F12"),
    (113, "F15"),
    (114, "Help"),
    (115, "Home"),
    (116, "PageUp"),
    (117, "ForwardDelete"),
    (118, "F4"),
    (119, "End"),
    (120, "F2"),
    (121, "PageDown"),
    (122, "F1"),
    (123, "LeftArrow"),
    (124, "RightArrow"),
    (125, "DownArrow"),
    (126, "UpArrow"),
];

/// Returns the display label for a keycode, falling back to `Key <n>` for
/// codes outside the known table.
pub fn label_for_keycode(keycode: u16) -> String {
    LABELS
        .iter()
        .find(|(c, _)| *c == keycode)
        .map(|(_, l)| (*l).to_string())
        .unwrap_or_else(|| format!("Key {keycode}"))
}

/// Reverse lookup used by spec parsing. Case-insensitive on the label.
pub(crate) fn keycode_for_label(label: &str) -> Option<u16> {
    LABELS
        .iter()
        .find(|(_, l)| l.eq_ignore_ascii_case(label))
        .map(|(c, _)| *c)
}
