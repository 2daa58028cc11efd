#![forbid(unsafe_code)]

//! Platform-neutral key names and host keycode normalization.
//!
//! Hosts report keys as raw virtual-key codes whose meaning depends on the
//! operating system. [`KeyNormalizer`] maps those codes onto the small
//! [`Key`] vocabulary that chords are declared with, and recognizes the
//! three modifier keys tracked by a chordset.
//!
//! # Tables
//!
//! | Platform | Source of codes |
//! |----------|-----------------|
//! | Windows  | Win32 virtual-key codes (`VK_*`) |
//! | Mac      | Carbon virtual key codes (`kVK_*`) |
//!
//! Each table is built once per process on first use and is immutable
//! afterwards. Codes missing from a table normalize to [`Key::Code`], whose
//! display form is the decimal code, so no input is ever dropped.
//!
//! # Example
//!
//! ```
//! use crafty_core::keys::{Key, KeyInput, KeyNormalizer, Modifiers, Platform};
//!
//! let keys = KeyNormalizer::for_platform(Platform::Windows);
//! assert_eq!(keys.normalize(0x41), Key::Char('A'));
//! assert_eq!(keys.normalize(0x09), Key::Tab);
//! assert_eq!(keys.normalize(0xFFFF).to_string(), "65535");
//! assert_eq!(keys.classify(0x11), KeyInput::Modifier(Modifiers::CTRL_CMD));
//! ```

use std::fmt;
use std::sync::OnceLock;

use ahash::AHashMap;
use bitflags::bitflags;

bitflags! {
    /// Modifier keys tracked while matching chords.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE       = 0b000;
        /// Ctrl on Windows, Command on Mac.
        const CTRL_CMD   = 0b001;
        /// Alt on Windows, Option on Mac.
        const ALT_OPTION = 0b010;
        /// Shift.
        const SHIFT      = 0b100;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

impl Modifiers {
    /// The individual modifiers in display order.
    pub const ORDERED: [Modifiers; 3] = [Self::CTRL_CMD, Self::ALT_OPTION, Self::SHIFT];
}

/// A platform-neutral key name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// A printable key: `A`-`Z`, `0`-`9`, `,` or `.`.
    Char(char),
    Tab,
    Escape,
    /// Delete.
    Del,
    /// Insert.
    Ins,
    Space,
    /// Function key `F1`-`F12`.
    F(u8),
    /// A code missing from the platform table.
    Code(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{c}"),
            Self::Tab => f.write_str("Tab"),
            Self::Escape => f.write_str("Escape"),
            Self::Del => f.write_str("Del"),
            Self::Ins => f.write_str("Ins"),
            Self::Space => f.write_str("Space"),
            Self::F(n) => write!(f, "F{n}"),
            Self::Code(code) => write!(f, "{code}"),
        }
    }
}

impl Key {
    /// Whether this key belongs to the named vocabulary rather than being
    /// an unrecognized code.
    #[must_use]
    pub const fn is_named(&self) -> bool {
        !matches!(self, Self::Code(_))
    }
}

/// The host operating system, which selects keycode tables and modifier names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "config-file",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Platform {
    #[default]
    Windows,
    Mac,
}

impl Platform {
    /// The platform this process was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::Mac
        } else {
            Self::Windows
        }
    }

    /// Parse a platform name (`win`, `windows`, `mac`, `osx`, `macos`).
    #[must_use]
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" | "windows" | "platform_win" => Some(Self::Windows),
            "mac" | "osx" | "macos" | "platform_osx" => Some(Self::Mac),
            _ => None,
        }
    }

    /// Display names of [`Modifiers::ORDERED`] on this platform.
    #[must_use]
    pub const fn modifier_names(self) -> [&'static str; 3] {
        match self {
            Self::Windows => ["Ctrl", "Alt", "Shift"],
            Self::Mac => ["⌘", "Option", "Shift"],
        }
    }

    /// Display names of the modifiers set in `modifiers`, in fixed order.
    pub fn modifier_labels(self, modifiers: Modifiers) -> impl Iterator<Item = &'static str> {
        Modifiers::ORDERED
            .into_iter()
            .zip(self.modifier_names())
            .filter(move |(m, _)| modifiers.contains(*m))
            .map(|(_, name)| name)
    }
}

/// A classified host keycode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// One of the tracked modifier keys.
    Modifier(Modifiers),
    /// Any other key.
    Key(Key),
}

/// Immutable keycode lookup for one platform.
#[derive(Debug, Clone)]
pub struct KeyNormalizer {
    platform: Platform,
    keys: AHashMap<u32, Key>,
    modifiers: AHashMap<u32, Modifiers>,
}

static WINDOWS: OnceLock<KeyNormalizer> = OnceLock::new();
static MAC: OnceLock<KeyNormalizer> = OnceLock::new();

impl KeyNormalizer {
    /// Build the tables for `platform`.
    #[must_use]
    pub fn new(platform: Platform) -> Self {
        let mut keys = AHashMap::with_capacity(96);
        let mut modifiers = AHashMap::with_capacity(12);
        match platform {
            Platform::Windows => add_windows_codes(&mut keys, &mut modifiers),
            Platform::Mac => add_mac_codes(&mut keys, &mut modifiers),
        }
        Self {
            platform,
            keys,
            modifiers,
        }
    }

    /// The shared normalizer for `platform`, built on first use.
    #[must_use]
    pub fn for_platform(platform: Platform) -> &'static KeyNormalizer {
        let cell = match platform {
            Platform::Windows => &WINDOWS,
            Platform::Mac => &MAC,
        };
        cell.get_or_init(|| Self::new(platform))
    }

    /// The shared normalizer for [`Platform::current`].
    #[must_use]
    pub fn current() -> &'static KeyNormalizer {
        Self::for_platform(Platform::current())
    }

    /// The platform whose codes this normalizer understands.
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Map a host keycode to a key name.
    ///
    /// Unknown codes (modifier codes included) become [`Key::Code`].
    #[must_use]
    pub fn normalize(&self, code: u32) -> Key {
        self.keys.get(&code).copied().unwrap_or(Key::Code(code))
    }

    /// The modifier a keycode represents, if any.
    #[must_use]
    pub fn modifier(&self, code: u32) -> Option<Modifiers> {
        self.modifiers.get(&code).copied()
    }

    /// Classify a keycode as a modifier or a regular key.
    #[must_use]
    pub fn classify(&self, code: u32) -> KeyInput {
        match self.modifier(code) {
            Some(m) => KeyInput::Modifier(m),
            None => KeyInput::Key(self.normalize(code)),
        }
    }

    /// Every keycode present in the key table.
    pub fn known_codes(&self) -> impl Iterator<Item = u32> + '_ {
        self.keys.keys().copied()
    }
}

fn insert_run(keys: &mut AHashMap<u32, Key>, first: u32, chars: &str) {
    for (code, c) in (first..).zip(chars.chars()) {
        keys.insert(code, Key::Char(c));
    }
}

// https://learn.microsoft.com/windows/win32/inputdev/virtual-key-codes
fn add_windows_codes(keys: &mut AHashMap<u32, Key>, modifiers: &mut AHashMap<u32, Modifiers>) {
    keys.insert(0x09, Key::Tab);
    keys.insert(0x1B, Key::Escape);
    keys.insert(0x20, Key::Space);
    keys.insert(0x2D, Key::Ins);
    keys.insert(0x2E, Key::Del);
    insert_run(keys, 0x30, "0123456789");
    insert_run(keys, 0x41, "ABCDEFGHIJKLMNOPQRSTUVWXYZ");
    keys.insert(0xBC, Key::Char(','));
    keys.insert(0xBE, Key::Char('.'));
    // Numpad
    insert_run(keys, 0x60, "0123456789");
    for n in 0..12u8 {
        keys.insert(0x70 + u32::from(n), Key::F(n + 1));
    }

    modifiers.insert(0x10, Modifiers::SHIFT);
    modifiers.insert(0xA0, Modifiers::SHIFT);
    modifiers.insert(0xA1, Modifiers::SHIFT);
    modifiers.insert(0x11, Modifiers::CTRL_CMD);
    modifiers.insert(0xA2, Modifiers::CTRL_CMD);
    modifiers.insert(0xA3, Modifiers::CTRL_CMD);
    modifiers.insert(0x12, Modifiers::ALT_OPTION);
    modifiers.insert(0xA4, Modifiers::ALT_OPTION);
    modifiers.insert(0xA5, Modifiers::ALT_OPTION);
}

// Carbon HIToolbox Events.h (kVK_ANSI_*, kVK_F*)
fn add_mac_codes(keys: &mut AHashMap<u32, Key>, modifiers: &mut AHashMap<u32, Modifiers>) {
    #[rustfmt::skip]
    const LETTERS: [(u32, char); 37] = [
        (0x00, 'A'), (0x01, 'S'), (0x02, 'D'), (0x03, 'F'), (0x04, 'H'),
        (0x05, 'G'), (0x06, 'Z'), (0x07, 'X'), (0x08, 'C'), (0x09, 'V'),
        (0x0B, 'B'), (0x0C, 'Q'), (0x0D, 'W'), (0x0E, 'E'), (0x0F, 'R'),
        (0x10, 'Y'), (0x11, 'T'), (0x12, '1'), (0x13, '2'), (0x14, '3'),
        (0x15, '4'), (0x16, '6'), (0x17, '5'), (0x19, '9'), (0x1A, '7'),
        (0x1C, '8'), (0x1D, '0'), (0x1F, 'O'), (0x20, 'U'), (0x22, 'I'),
        (0x23, 'P'), (0x25, 'L'), (0x26, 'J'), (0x28, 'K'), (0x2B, ','),
        (0x2D, 'N'), (0x2E, 'M'),
    ];
    #[rustfmt::skip]
    const FUNCTION: [(u32, u8); 12] = [
        (0x7A, 1), (0x78, 2), (0x63, 3), (0x76, 4), (0x60, 5), (0x61, 6),
        (0x62, 7), (0x64, 8), (0x65, 9), (0x6D, 10), (0x67, 11), (0x6F, 12),
    ];

    for (code, c) in LETTERS {
        keys.insert(code, Key::Char(c));
    }
    keys.insert(0x2F, Key::Char('.'));
    keys.insert(0x30, Key::Tab);
    keys.insert(0x31, Key::Space);
    keys.insert(0x75, Key::Del);
    keys.insert(0x35, Key::Escape);
    keys.insert(0x72, Key::Ins);
    // Numpad
    insert_run(keys, 0x52, "01234567");
    keys.insert(0x5B, Key::Char('8'));
    keys.insert(0x5C, Key::Char('9'));
    for (code, n) in FUNCTION {
        keys.insert(code, Key::F(n));
    }

    modifiers.insert(0x37, Modifiers::CTRL_CMD);
    modifiers.insert(0x36, Modifiers::CTRL_CMD);
    modifiers.insert(0x3B, Modifiers::CTRL_CMD);
    modifiers.insert(0x3E, Modifiers::CTRL_CMD);
    modifiers.insert(0x3A, Modifiers::ALT_OPTION);
    modifiers.insert(0x3D, Modifiers::ALT_OPTION);
    modifiers.insert(0x38, Modifiers::SHIFT);
    modifiers.insert(0x3C, Modifiers::SHIFT);
}
