//! SGR (Select Graphic Rendition) handler.
//!
//! Applies the parameters of one `ESC [ ... m` sequence to a style:
//! - Reset (empty field or `0`)
//! - Attributes (`1`..`9` set, `2X` clear)
//! - Basic and bright colours (`30-37`, `39`, `40-47`, `49`, `90-97`, `99`, `100-107`, `109`)
//! - 256-colour and RGB colours (`38;5;N`, `38;2;R;G;B` and the `48` forms)
//!
//! An unrecognised field stops processing of the rest of the sequence;
//! whatever the earlier fields did is kept.

use tracing::trace;

use super::colour::{Colour, Layer};
use super::state::{Attributes, StyleState};

/// One command decoded from the fields of an SGR sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command<'a> {
    Reset,
    SetAttribute(u8),
    ClearAttribute(u8),
    Foreground { code: u8, bright: bool },
    Background { code: u8, bright: bool },
    XTerm { layer: Layer, index: &'a str },
    Rgb { layer: Layer, rgb: [&'a str; 3] },
}

/// Apply the parameter string of an SGR sequence (the text between
/// `ESC [` and `m`) to `style`.
pub fn apply_sgr(style: StyleState, params: &str) -> StyleState {
    let fields: Vec<&str> = params.split(';').collect();
    let mut style = style;
    let mut pos = 0;

    while pos < fields.len() {
        match next_command(&fields, pos) {
            Some((command, next)) => {
                style = apply_command(style, command);
                pos = next;
            }
            None => {
                trace!(
                    params = params,
                    field = fields[pos],
                    "Unsupported SGR field, ignoring rest of sequence"
                );
                break;
            }
        }
    }

    style
}

/// Decode the command starting at `fields[pos]`.
///
/// Returns the command and the index of the first field after it, or
/// `None` when the field is not supported.
fn next_command<'a>(fields: &[&'a str], pos: usize) -> Option<(Command<'a>, usize)> {
    let field = fields[pos];
    let bytes = field.as_bytes();
    if !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let command = match bytes {
        [] | [b'0'] => Command::Reset,
        [digit] => Command::SetAttribute(*digit),
        [b'2', digit] => Command::ClearAttribute(*digit),
        [b'3' | b'4', b'8'] => return extended_colour(fields, pos),
        [b'3', code] => Command::Foreground {
            code: *code,
            bright: false,
        },
        [b'9', b'8'] => return None,
        [b'9', code] => Command::Foreground {
            code: *code,
            bright: true,
        },
        [b'4', code] => Command::Background {
            code: *code,
            bright: false,
        },
        [b'1', b'0', b'8'] => return None,
        [b'1', b'0', code] => Command::Background {
            code: *code,
            bright: true,
        },
        _ => return None,
    };

    Some((command, pos + 1))
}

/// Decode `38;5;N`, `38;2;R;G;B` and their `48` counterparts.
fn extended_colour<'a>(fields: &[&'a str], pos: usize) -> Option<(Command<'a>, usize)> {
    let layer = if fields[pos] == "38" {
        Layer::Front
    } else {
        Layer::Back
    };

    match fields.get(pos + 1).copied() {
        Some("5") if pos + 2 < fields.len() => Some((
            Command::XTerm {
                layer,
                index: fields[pos + 2],
            },
            pos + 3,
        )),
        Some("2") if pos + 4 < fields.len() => Some((
            Command::Rgb {
                layer,
                rgb: [fields[pos + 2], fields[pos + 3], fields[pos + 4]],
            },
            pos + 5,
        )),
        _ => None,
    }
}

fn apply_command(style: StyleState, command: Command<'_>) -> StyleState {
    match command {
        Command::Reset => StyleState::default(),
        Command::SetAttribute(digit) => set_attribute(style, digit),
        Command::ClearAttribute(digit) => clear_attribute(style, digit),
        Command::Foreground { code, bright } => {
            let bright = bright || style.is_bold();
            match basic_colour(code, Layer::Front, bright) {
                Some(colour) => style.with_foreground(colour),
                None => style,
            }
        }
        Command::Background { code, bright } => match basic_colour(code, Layer::Back, bright) {
            Some(colour) => style.with_background(colour),
            None => style,
        },
        Command::XTerm { layer, index } => match index.parse::<u8>() {
            Ok(index) => match layer {
                Layer::Front => {
                    let colour = Colour::XTerm(index);
                    let colour = if style.is_bold() {
                        colour.brighten()
                    } else {
                        colour
                    };
                    style.with_foreground(colour)
                }
                Layer::Back => style.with_background(Colour::XTerm(index)),
            },
            Err(_) => style,
        },
        Command::Rgb { layer, rgb } => match parse_rgb(rgb) {
            Some((r, g, b)) => match layer {
                Layer::Front => style.with_foreground(Colour::Rgb(r, g, b)),
                Layer::Back => style.with_background(Colour::Rgb(r, g, b)),
            },
            None => style,
        },
    }
}

/// Set the attribute for an SGR digit; bold also brightens the foreground.
fn set_attribute(style: StyleState, digit: u8) -> StyleState {
    let attribute = Attributes::from_sgr_digit(digit);
    let style = if attribute == Attributes::BOLD {
        style.with_foreground(style.foreground.brighten())
    } else {
        style
    };
    style.with_attribute(attribute)
}

/// Clear the attribute for `2X`.
///
/// `22` clears both bold and dim. Clearing bold un-brightens the
/// foreground.
fn clear_attribute(style: StyleState, digit: u8) -> StyleState {
    let mut attribute = Attributes::from_sgr_digit(digit);
    if attribute == Attributes::DIM {
        attribute |= Attributes::BOLD;
    }
    let style = if attribute.contains(Attributes::BOLD) {
        style.with_foreground(style.foreground.unbrighten())
    } else {
        style
    };
    style.without_attribute(attribute)
}

/// Colour for the last digit of `3X`/`4X`/`9X`/`10X`.
fn basic_colour(code: u8, layer: Layer, bright: bool) -> Option<Colour> {
    match code {
        b'0'..=b'7' => Colour::basic(code - b'0', bright),
        b'9' => Some(Colour::Default { layer, bright }),
        _ => None,
    }
}

fn parse_rgb([r, g, b]: [&str; 3]) -> Option<(u8, u8, u8)> {
    Some((r.parse().ok()?, g.parse().ok()?, b.parse().ok()?))
}
