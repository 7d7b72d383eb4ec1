//! Incremental ANSI escape interpreter.
//!
//! Text from a server arrives in arbitrary pieces, so an escape sequence
//! may start at the end of one piece and finish in the next. The
//! interpreter keeps such an unfinished sequence and puts it in front of
//! the next piece instead of emitting it.

use tracing::{debug, trace};

use super::sgr::apply_sgr;
use super::state::StyleState;
use super::text::{StyledText, StyledTextBuilder};

const ESC: char = '\x1b';

/// Longest unfinished escape sequence kept between calls.
pub const MAX_INCOMPLETE_ESCAPE: usize = 64;

/// A piece of scanned input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    /// Text without escapes.
    Literal(&'a str),
    /// A complete escape sequence, starting with `ESC`.
    Escape(&'a str),
}

/// Turns decoded server text into styled runs.
///
/// Each call to [`parse`](Self::parse) continues with the style left by
/// the previous call, so plain text following a coloured line without a
/// reset stays coloured.
#[derive(Debug, Default)]
pub struct AnsiStyleInterpreter {
    /// Style applied to the next literal text.
    style: StyleState,
    /// Unfinished escape sequence from the end of the previous input.
    incomplete: String,
}

impl AnsiStyleInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The style that the next literal text will get.
    pub fn style(&self) -> StyleState {
        self.style
    }

    /// Forget the running style and any unfinished escape sequence.
    pub fn reset(&mut self) {
        self.style = StyleState::default();
        self.incomplete.clear();
    }

    /// Interpret `text`, continuing from the state left by earlier calls.
    ///
    /// An unfinished escape longer than [`MAX_INCOMPLETE_ESCAPE`] bytes is
    /// dropped, and whatever follows it is read as plain text.
    pub fn parse(&mut self, text: &str) -> StyledText {
        let mut input = std::mem::take(&mut self.incomplete);
        input.push_str(text);

        let (segments, tail) = scan(&input);
        let mut builder = StyledTextBuilder::new();

        for segment in segments {
            match segment {
                Segment::Literal(literal) => builder.append(literal, self.style),
                Segment::Escape(escape) => self.apply_escape(escape),
            }
        }

        if tail.len() > MAX_INCOMPLETE_ESCAPE {
            debug!(len = tail.len(), "Dropping unterminated escape sequence");
        } else {
            self.incomplete = tail.to_string();
        }
        builder.complete()
    }

    fn apply_escape(&mut self, escape: &str) {
        match escape
            .strip_prefix("\x1b[")
            .and_then(|rest| rest.strip_suffix('m'))
        {
            Some(params) => self.style = apply_sgr(self.style, params),
            None => trace!(escape = ?escape, "Ignoring non-SGR escape"),
        }
    }
}

/// Split `text` into literal and escape segments.
///
/// Returns the segments and the unfinished escape at the end of the text
/// (empty when there is none).
fn scan(text: &str) -> (Vec<Segment<'_>>, &str) {
    let mut segments = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        if text[pos..].starts_with(ESC) {
            match escape_end(text, pos) {
                Some(end) => {
                    segments.push(Segment::Escape(&text[pos..end]));
                    pos = end;
                }
                None => return (segments, &text[pos..]),
            }
        } else {
            let end = text[pos..].find(ESC).map_or(text.len(), |offset| pos + offset);
            segments.push(Segment::Literal(&text[pos..end]));
            pos = end;
        }
    }

    (segments, "")
}

/// End (exclusive) of the escape sequence that starts with the `ESC` at
/// `start`, or `None` if the text ends before the sequence does.
///
/// `ESC` followed by anything but `[` is a one-character escape. After
/// `ESC [`, digits and `;` are parameters and the first other character
/// terminates the sequence.
fn escape_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    match bytes.get(start + 1) {
        None => None,
        Some(b'[') => {
            let params_start = start + 2;
            let offset = bytes[params_start..]
                .iter()
                .position(|&b| b != b';' && !b.is_ascii_digit())?;
            let terminator = params_start + offset;
            let width = text[terminator..].chars().next().map_or(1, char::len_utf8);
            Some(terminator + width)
        }
        Some(_) => Some(start + 1),
    }
}
