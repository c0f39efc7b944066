//! Legacy key codes.
//!
//! Legacy callers identify keys by scan-code style numbers (`KEY_A` is 30,
//! `KEY_ESCAPE` is 1). Backends report keys as USB HID keyboard usage ids,
//! which is what SDL scancodes are. This module translates between the two
//! and maps legacy codes to their names.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Size of the legacy key space; every code is below this.
pub const KEYBOARD_SIZE: usize = 256;

/// No key, or a backend key with no legacy equivalent.
pub const KEY_NONE: i32 = 0;

pub const KEY_ESCAPE: i32 = 1;
pub const KEY_1: i32 = 2;
pub const KEY_2: i32 = 3;
pub const KEY_3: i32 = 4;
pub const KEY_4: i32 = 5;
pub const KEY_5: i32 = 6;
pub const KEY_6: i32 = 7;
pub const KEY_7: i32 = 8;
pub const KEY_8: i32 = 9;
pub const KEY_9: i32 = 10;
pub const KEY_0: i32 = 11;
pub const KEY_MINUS: i32 = 12;
pub const KEY_EQUALS: i32 = 13;
pub const KEY_BACK: i32 = 14;
pub const KEY_TAB: i32 = 15;
pub const KEY_Q: i32 = 16;
pub const KEY_W: i32 = 17;
pub const KEY_E: i32 = 18;
pub const KEY_R: i32 = 19;
pub const KEY_T: i32 = 20;
pub const KEY_Y: i32 = 21;
pub const KEY_U: i32 = 22;
pub const KEY_I: i32 = 23;
pub const KEY_O: i32 = 24;
pub const KEY_P: i32 = 25;
pub const KEY_LBRACKET: i32 = 26;
pub const KEY_RBRACKET: i32 = 27;
pub const KEY_RETURN: i32 = 28;
pub const KEY_LCONTROL: i32 = 29;
pub const KEY_A: i32 = 30;
pub const KEY_S: i32 = 31;
pub const KEY_D: i32 = 32;
pub const KEY_F: i32 = 33;
pub const KEY_G: i32 = 34;
pub const KEY_H: i32 = 35;
pub const KEY_J: i32 = 36;
pub const KEY_K: i32 = 37;
pub const KEY_L: i32 = 38;
pub const KEY_SEMICOLON: i32 = 39;
pub const KEY_APOSTROPHE: i32 = 40;
pub const KEY_GRAVE: i32 = 41;
pub const KEY_LSHIFT: i32 = 42;
pub const KEY_BACKSLASH: i32 = 43;
pub const KEY_Z: i32 = 44;
pub const KEY_X: i32 = 45;
pub const KEY_C: i32 = 46;
pub const KEY_V: i32 = 47;
pub const KEY_B: i32 = 48;
pub const KEY_N: i32 = 49;
pub const KEY_M: i32 = 50;
pub const KEY_COMMA: i32 = 51;
pub const KEY_PERIOD: i32 = 52;
pub const KEY_SLASH: i32 = 53;
pub const KEY_RSHIFT: i32 = 54;
pub const KEY_MULTIPLY: i32 = 55;
pub const KEY_LMENU: i32 = 56;
pub const KEY_SPACE: i32 = 57;
pub const KEY_CAPITAL: i32 = 58;
pub const KEY_F1: i32 = 59;
pub const KEY_F2: i32 = 60;
pub const KEY_F3: i32 = 61;
pub const KEY_F4: i32 = 62;
pub const KEY_F5: i32 = 63;
pub const KEY_F6: i32 = 64;
pub const KEY_F7: i32 = 65;
pub const KEY_F8: i32 = 66;
pub const KEY_F9: i32 = 67;
pub const KEY_F10: i32 = 68;
pub const KEY_NUMLOCK: i32 = 69;
pub const KEY_SCROLL: i32 = 70;
pub const KEY_NUMPAD7: i32 = 71;
pub const KEY_NUMPAD8: i32 = 72;
pub const KEY_NUMPAD9: i32 = 73;
pub const KEY_SUBTRACT: i32 = 74;
pub const KEY_NUMPAD4: i32 = 75;
pub const KEY_NUMPAD5: i32 = 76;
pub const KEY_NUMPAD6: i32 = 77;
pub const KEY_ADD: i32 = 78;
pub const KEY_NUMPAD1: i32 = 79;
pub const KEY_NUMPAD2: i32 = 80;
pub const KEY_NUMPAD3: i32 = 81;
pub const KEY_NUMPAD0: i32 = 82;
pub const KEY_DECIMAL: i32 = 83;
pub const KEY_F11: i32 = 87;
pub const KEY_F12: i32 = 88;
pub const KEY_F13: i32 = 100;
pub const KEY_F14: i32 = 101;
pub const KEY_F15: i32 = 102;
pub const KEY_NUMPADEQUALS: i32 = 141;
pub const KEY_NUMPADENTER: i32 = 156;
pub const KEY_RCONTROL: i32 = 157;
pub const KEY_DIVIDE: i32 = 181;
pub const KEY_SYSRQ: i32 = 183;
pub const KEY_RMENU: i32 = 184;
pub const KEY_PAUSE: i32 = 197;
pub const KEY_HOME: i32 = 199;
pub const KEY_UP: i32 = 200;
pub const KEY_PRIOR: i32 = 201;
pub const KEY_LEFT: i32 = 203;
pub const KEY_RIGHT: i32 = 205;
pub const KEY_END: i32 = 207;
pub const KEY_DOWN: i32 = 208;
pub const KEY_NEXT: i32 = 209;
pub const KEY_INSERT: i32 = 210;
pub const KEY_DELETE: i32 = 211;
pub const KEY_LMETA: i32 = 219;
pub const KEY_RMETA: i32 = 220;
pub const KEY_APPS: i32 = 221;

/// (HID usage, legacy code, legacy name)
const KEY_TABLE: &[(u32, i32, &str)] = &[
    (4, KEY_A, "A"),
    (5, KEY_B, "B"),
    (6, KEY_C, "C"),
    (7, KEY_D, "D"),
    (8, KEY_E, "E"),
    (9, KEY_F, "F"),
    (10, KEY_G, "G"),
    (11, KEY_H, "H"),
    (12, KEY_I, "I"),
    (13, KEY_J, "J"),
    (14, KEY_K, "K"),
    (15, KEY_L, "L"),
    (16, KEY_M, "M"),
    (17, KEY_N, "N"),
    (18, KEY_O, "O"),
    (19, KEY_P, "P"),
    (20, KEY_Q, "Q"),
    (21, KEY_R, "R"),
    (22, KEY_S, "S"),
    (23, KEY_T, "T"),
    (24, KEY_U, "U"),
    (25, KEY_V, "V"),
    (26, KEY_W, "W"),
    (27, KEY_X, "X"),
    (28, KEY_Y, "Y"),
    (29, KEY_Z, "Z"),
    (30, KEY_1, "1"),
    (31, KEY_2, "2"),
    (32, KEY_3, "3"),
    (33, KEY_4, "4"),
    (34, KEY_5, "5"),
    (35, KEY_6, "6"),
    (36, KEY_7, "7"),
    (37, KEY_8, "8"),
    (38, KEY_9, "9"),
    (39, KEY_0, "0"),
    (40, KEY_RETURN, "RETURN"),
    (41, KEY_ESCAPE, "ESCAPE"),
    (42, KEY_BACK, "BACK"),
    (43, KEY_TAB, "TAB"),
    (44, KEY_SPACE, "SPACE"),
    (45, KEY_MINUS, "MINUS"),
    (46, KEY_EQUALS, "EQUALS"),
    (47, KEY_LBRACKET, "LBRACKET"),
    (48, KEY_RBRACKET, "RBRACKET"),
    (49, KEY_BACKSLASH, "BACKSLASH"),
    (51, KEY_SEMICOLON, "SEMICOLON"),
    (52, KEY_APOSTROPHE, "APOSTROPHE"),
    (53, KEY_GRAVE, "GRAVE"),
    (54, KEY_COMMA, "COMMA"),
    (55, KEY_PERIOD, "PERIOD"),
    (56, KEY_SLASH, "SLASH"),
    (57, KEY_CAPITAL, "CAPITAL"),
    (58, KEY_F1, "F1"),
    (59, KEY_F2, "F2"),
    (60, KEY_F3, "F3"),
    (61, KEY_F4, "F4"),
    (62, KEY_F5, "F5"),
    (63, KEY_F6, "F6"),
    (64, KEY_F7, "F7"),
    (65, KEY_F8, "F8"),
    (66, KEY_F9, "F9"),
    (67, KEY_F10, "F10"),
    (68, KEY_F11, "F11"),
    (69, KEY_F12, "F12"),
    (70, KEY_SYSRQ, "SYSRQ"),
    (71, KEY_SCROLL, "SCROLL"),
    (72, KEY_PAUSE, "PAUSE"),
    (73, KEY_INSERT, "INSERT"),
    (74, KEY_HOME, "HOME"),
    (75, KEY_PRIOR, "PRIOR"),
    (76, KEY_DELETE, "DELETE"),
    (77, KEY_END, "END"),
    (78, KEY_NEXT, "NEXT"),
    (79, KEY_RIGHT, "RIGHT"),
    (80, KEY_LEFT, "LEFT"),
    (81, KEY_DOWN, "DOWN"),
    (82, KEY_UP, "UP"),
    (83, KEY_NUMLOCK, "NUMLOCK"),
    (84, KEY_DIVIDE, "DIVIDE"),
    (85, KEY_MULTIPLY, "MULTIPLY"),
    (86, KEY_SUBTRACT, "SUBTRACT"),
    (87, KEY_ADD, "ADD"),
    (88, KEY_NUMPADENTER, "NUMPADENTER"),
    (89, KEY_NUMPAD1, "NUMPAD1"),
    (90, KEY_NUMPAD2, "NUMPAD2"),
    (91, KEY_NUMPAD3, "NUMPAD3"),
    (92, KEY_NUMPAD4, "NUMPAD4"),
    (93, KEY_NUMPAD5, "NUMPAD5"),
    (94, KEY_NUMPAD6, "NUMPAD6"),
    (95, KEY_NUMPAD7, "NUMPAD7"),
    (96, KEY_NUMPAD8, "NUMPAD8"),
    (97, KEY_NUMPAD9, "NUMPAD9"),
    (98, KEY_NUMPAD0, "NUMPAD0"),
    (99, KEY_DECIMAL, "DECIMAL"),
    (101, KEY_APPS, "APPS"),
    (103, KEY_NUMPADEQUALS, "NUMPADEQUALS"),
    (104, KEY_F13, "F13"),
    (105, KEY_F14, "F14"),
    (106, KEY_F15, "F15"),
    (224, KEY_LCONTROL, "LCONTROL"),
    (225, KEY_LSHIFT, "LSHIFT"),
    (226, KEY_LMENU, "LMENU"),
    (227, KEY_LMETA, "LMETA"),
    (228, KEY_RCONTROL, "RCONTROL"),
    (229, KEY_RSHIFT, "RSHIFT"),
    (230, KEY_RMENU, "RMENU"),
    (231, KEY_RMETA, "RMETA"),
];

static HID_TO_LEGACY: LazyLock<HashMap<u32, i32>> = LazyLock::new(|| {
    KEY_TABLE.iter().map(|&(hid, code, _)| (hid, code)).collect()
});

static KEY_NAMES: LazyLock<HashMap<i32, &'static str>> = LazyLock::new(|| {
    KEY_TABLE.iter().map(|&(_, code, name)| (code, name)).collect()
});

static NAME_TO_KEY: LazyLock<HashMap<&'static str, i32>> = LazyLock::new(|| {
    KEY_TABLE.iter().map(|&(_, code, name)| (name, code)).collect()
});

/// Translate a backend HID usage id to a legacy key code.
///
/// Unmapped keys translate to [`KEY_NONE`].
pub fn from_hid_usage(usage: u32) -> i32 {
    HID_TO_LEGACY.get(&usage).copied().unwrap_or(KEY_NONE)
}

/// Name of a legacy key code, or `None` for unknown codes.
pub fn key_name(key: i32) -> Option<&'static str> {
    KEY_NAMES.get(&key).copied()
}

/// Legacy key code for a name. Unknown names map to [`KEY_NONE`].
pub fn key_index(name: &str) -> i32 {
    if let Some(&code) = NAME_TO_KEY.get(name) {
        return code;
    }
    NAME_TO_KEY
        .get(name.to_uppercase().as_str())
        .copied()
        .unwrap_or(KEY_NONE)
}

/// Number of legacy keys with a name.
pub fn key_count() -> usize {
    KEY_TABLE.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_follow_scan_code_layout() {
        assert_eq!(from_hid_usage(4), KEY_A);
        assert_eq!(KEY_A, 30);
        assert_eq!(from_hid_usage(7), KEY_D);
        assert_eq!(KEY_D, 32);
        assert_eq!(from_hid_usage(25), KEY_V);
        assert_eq!(from_hid_usage(29), KEY_Z);
    }

    #[test]
    fn test_digit_row() {
        assert_eq!(from_hid_usage(30), KEY_1);
        assert_eq!(from_hid_usage(38), KEY_9);
        assert_eq!(from_hid_usage(39), KEY_0);
        assert_eq!(KEY_0, 11);
    }

    #[test]
    fn test_navigation_and_modifiers() {
        assert_eq!(from_hid_usage(41), KEY_ESCAPE);
        assert_eq!(from_hid_usage(82), KEY_UP);
        assert_eq!(from_hid_usage(88), KEY_NUMPADENTER);
        assert_eq!(from_hid_usage(224), KEY_LCONTROL);
        assert_eq!(from_hid_usage(230), KEY_RMENU);
    }

    #[test]
    fn test_unmapped_usage_is_none() {
        assert_eq!(from_hid_usage(0), KEY_NONE);
        assert_eq!(from_hid_usage(100), KEY_NONE);
        assert_eq!(from_hid_usage(9999), KEY_NONE);
    }

    #[test]
    fn test_codes_are_unique_and_in_range() {
        let mut seen = std::collections::HashSet::new();
        for &(_, code, _) in KEY_TABLE {
            assert!(code > KEY_NONE && (code as usize) < KEYBOARD_SIZE);
            assert!(seen.insert(code), "duplicate key code {code}");
        }
        assert_eq!(key_count(), seen.len());
    }

    #[test]
    fn test_key_name_lookup() {
        assert_eq!(key_name(KEY_SPACE), Some("SPACE"));
        assert_eq!(key_name(KEY_F12), Some("F12"));
        assert_eq!(key_name(KEY_NONE), None);
    }

    #[test]
    fn test_key_index_lookup() {
        assert_eq!(key_index("RETURN"), KEY_RETURN);
        assert_eq!(key_index("lshift"), KEY_LSHIFT);
        assert_eq!(key_index("NotAKey"), KEY_NONE);
    }
}
