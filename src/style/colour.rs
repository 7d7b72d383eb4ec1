//! Abstract colours.
//!
//! Contains the colour values the style engine hands to the presentation
//! layer:
//! - `Ansi`: the 8 basic colours and their 8 brightened variants
//! - `XTerm`: the 256-colour xterm palette
//! - `Rgb`: 24-bit colour
//! - `Default`: whatever the terminal uses for text or background
//!
//! Colours never know how they are drawn. [`Colour::rgb`] gives a reference
//! approximation for callers that need one.

use std::fmt;

/// Names of the 8 basic ANSI colours, indexed by colour code.
const ANSI_NAMES: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

/// Reference RGB values of the 16 ANSI colours.
const ANSI_PALETTE: [(u8, u8, u8); 16] = [
    (0, 0, 0),       // 0: Black
    (192, 0, 0),     // 1: Red
    (0, 192, 0),     // 2: Green
    (192, 192, 0),   // 3: Yellow
    (0, 0, 192),     // 4: Blue
    (192, 0, 192),   // 5: Magenta
    (0, 192, 192),   // 6: Cyan
    (205, 205, 205), // 7: White
    (102, 102, 102), // 8: Bright Black
    (255, 0, 0),     // 9: Bright Red
    (0, 255, 0),     // 10: Bright Green
    (255, 255, 0),   // 11: Bright Yellow
    (0, 0, 255),     // 12: Bright Blue
    (255, 0, 255),   // 13: Bright Magenta
    (0, 255, 255),   // 14: Bright Cyan
    (255, 255, 255), // 15: Bright White
];

/// Which side of the text a default colour belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Text colour.
    Front,
    /// Background colour.
    Back,
}

/// An abstract terminal colour.
///
/// Equality is structural: `Ansi(2)` and `XTerm(2)` describe the same
/// palette slot on most terminals but are different colours here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    /// ANSI colour 0..=15; 8..=15 are the brightened variants of 0..=7.
    Ansi(u8),
    /// XTerm 256-colour palette index.
    XTerm(u8),
    /// 24-bit colour.
    Rgb(u8, u8, u8),
    /// The terminal's default text or background colour.
    Default { layer: Layer, bright: bool },
}

impl Colour {
    /// The default text colour.
    pub const DEFAULT_FRONT: Self = Self::Default {
        layer: Layer::Front,
        bright: false,
    };

    /// The default background colour.
    pub const DEFAULT_BACK: Self = Self::Default {
        layer: Layer::Back,
        bright: false,
    };

    /// Create an ANSI colour, returning `None` when `index` is not in 0..=15.
    pub fn ansi(index: u8) -> Option<Self> {
        (index < 16).then_some(Self::Ansi(index))
    }

    pub const fn xterm(index: u8) -> Self {
        Self::XTerm(index)
    }

    /// Create one of the 8 basic colours, optionally brightened.
    ///
    /// Returns `None` when `code` is not in 0..=7.
    pub fn basic(code: u8, bright: bool) -> Option<Self> {
        (code < 8).then(|| Self::Ansi(if bright { code + 8 } else { code }))
    }

    /// Create an XTerm colour from a position in the 6x6x6 colour cube.
    ///
    /// Returns `None` when any component is above 5.
    pub fn xterm_cube(r: u8, g: u8, b: u8) -> Option<Self> {
        (r <= 5 && g <= 5 && b <= 5).then(|| Self::XTerm(16 + 36 * r + 6 * g + b))
    }

    /// The brightened version of this colour.
    ///
    /// Bright ANSI colours and RGB colours are returned unchanged, as are
    /// XTerm colours outside the first 8 palette slots.
    pub fn brighten(self) -> Self {
        match self {
            Self::Ansi(index) if index < 8 => Self::Ansi(index + 8),
            Self::XTerm(index) if index < 8 => Self::XTerm(index + 8),
            Self::Default { layer, .. } => Self::Default {
                layer,
                bright: true,
            },
            other => other,
        }
    }

    /// The unbrightened version of this colour (inverse of [`brighten`](Self::brighten)).
    pub fn unbrighten(self) -> Self {
        match self {
            Self::Ansi(index) if (8..16).contains(&index) => Self::Ansi(index - 8),
            Self::XTerm(index) if (8..16).contains(&index) => Self::XTerm(index - 8),
            Self::Default { layer, .. } => Self::Default {
                layer,
                bright: false,
            },
            other => other,
        }
    }

    /// Whether this is a brightened ANSI colour or a brightened default.
    pub fn is_bright(self) -> bool {
        match self {
            Self::Ansi(index) | Self::XTerm(index) => (8..16).contains(&index),
            Self::Default { bright, .. } => bright,
            Self::Rgb(..) => false,
        }
    }

    /// Stable name of the colour.
    ///
    /// `green`, `brightgreen`, `x042`, `00ff7f`, `defaultfront`,
    /// `brightdefaultback`, ...
    pub fn name(self) -> String {
        match self {
            Self::Ansi(index) => {
                let base = ANSI_NAMES[usize::from(index % 8)];
                if index % 16 >= 8 {
                    format!("bright{}", base)
                } else {
                    base.to_string()
                }
            }
            Self::XTerm(index) => format!("x{:03}", index),
            Self::Rgb(r, g, b) => format!("{:02x}{:02x}{:02x}", r, g, b),
            Self::Default { layer, bright } => {
                let layer = match layer {
                    Layer::Front => "front",
                    Layer::Back => "back",
                };
                if bright {
                    format!("brightdefault{}", layer)
                } else {
                    format!("default{}", layer)
                }
            }
        }
    }

    /// Reference RGB approximation of this colour.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Ansi(index) => ANSI_PALETTE[usize::from(index % 16)],
            Self::XTerm(index) => xterm_to_rgb(index),
            Self::Rgb(r, g, b) => (r, g, b),
            Self::Default { layer, bright } => match (layer, bright) {
                (Layer::Back, false) => (0, 0, 0),
                (Layer::Front, false) => (205, 205, 205),
                (Layer::Back, true) => (102, 102, 102),
                (Layer::Front, true) => (255, 255, 255),
            },
        }
    }
}

/// Convert an XTerm palette index to its reference RGB value.
fn xterm_to_rgb(index: u8) -> (u8, u8, u8) {
    match index {
        0..=15 => ANSI_PALETTE[usize::from(index)],
        16..=231 => {
            let cube = index - 16;
            // The cube axis uses 0, 95, 135, 175, 215, 255
            let level = |i: u8| if i == 0 { 0 } else { 55 + 40 * i };
            (level(cube / 36), level((cube % 36) / 6), level(cube % 6))
        }
        232..=255 => {
            let grey = 8 + 10 * (index - 232);
            (grey, grey, grey)
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
