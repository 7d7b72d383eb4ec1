//! Running text style.
//!
//! A [`StyleState`] is a plain `Copy` value: every reducer returns a new
//! state and leaves the receiver alone, so a state handed out with a
//! styled run can never change behind the caller's back.

use std::fmt;

use super::colour::Colour;

bitflags::bitflags! {
    /// Text attributes set by SGR parameters 1..=9.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attributes: u16 {
        /// SGR 1
        const BOLD          = 1 << 0;
        /// SGR 2
        const DIM           = 1 << 1;
        /// SGR 3
        const ITALIC        = 1 << 2;
        /// SGR 4
        const UNDERLINE     = 1 << 3;
        /// SGR 5 and 6; slow and rapid blink are not distinguished.
        const BLINK         = 1 << 4;
        /// SGR 7
        const REVERSE       = 1 << 5;
        /// SGR 8
        const INVISIBLE     = 1 << 6;
        /// SGR 9
        const STRIKETHROUGH = 1 << 7;
    }
}

impl Attributes {
    /// Attribute selected by a single SGR digit, or empty for `0`.
    pub fn from_sgr_digit(digit: u8) -> Self {
        match digit {
            b'1' => Self::BOLD,
            b'2' => Self::DIM,
            b'3' => Self::ITALIC,
            b'4' => Self::UNDERLINE,
            b'5' | b'6' => Self::BLINK,
            b'7' => Self::REVERSE,
            b'8' => Self::INVISIBLE,
            b'9' => Self::STRIKETHROUGH,
            _ => Self::empty(),
        }
    }
}

impl fmt::Display for Attributes {
    /// Lower-case attribute names joined by `,`, or `-` when empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        let names: Vec<String> = self
            .iter_names()
            .map(|(name, _)| name.to_ascii_lowercase())
            .collect();
        f.write_str(&names.join(","))
    }
}

/// Foreground, background and attributes of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleState {
    pub foreground: Colour,
    pub background: Colour,
    pub attributes: Attributes,
}

impl StyleState {
    /// Default colours, no attributes.
    pub const DEFAULT: Self = Self {
        foreground: Colour::DEFAULT_FRONT,
        background: Colour::DEFAULT_BACK,
        attributes: Attributes::empty(),
    };

    /// Copy of this state with `attribute` added.
    pub fn with_attribute(self, attribute: Attributes) -> Self {
        Self {
            attributes: self.attributes | attribute,
            ..self
        }
    }

    /// Copy of this state with `attribute` removed.
    pub fn without_attribute(self, attribute: Attributes) -> Self {
        Self {
            attributes: self.attributes - attribute,
            ..self
        }
    }

    /// Copy of this state with the foreground replaced.
    pub fn with_foreground(self, colour: Colour) -> Self {
        Self {
            foreground: colour,
            ..self
        }
    }

    /// Copy of this state with the background replaced.
    pub fn with_background(self, colour: Colour) -> Self {
        Self {
            background: colour,
            ..self
        }
    }

    pub fn has(self, attribute: Attributes) -> bool {
        self.attributes.contains(attribute)
    }

    pub fn is_bold(self) -> bool {
        self.has(Attributes::BOLD)
    }
}

impl Default for StyleState {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for StyleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.foreground, self.background, self.attributes)
    }
}
