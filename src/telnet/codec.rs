//! Streaming demultiplexer for telnet byte streams.
//!
//! A server sends UTF-8 text with telnet control sequences mixed in, and
//! reads may split either kind at any byte. [`StreamCodec`] keeps whatever
//! is unfinished between calls and hands out whole tokens only.

use std::io::{self, Read};
use std::str;

use tracing::{debug, trace, warn};

use super::code::{Decoded, TelnetCode, IAC};
use super::error::CodecError;
use crate::config::CodecConfig;

/// Outcome of one [`StreamCodec::probe`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Nothing complete yet; probe again later.
    NotReady,
    /// A text token is ready for [`StreamCodec::take_text`].
    Text,
    /// A control code is ready for [`StreamCodec::take_control`].
    Control,
    /// The source is exhausted and everything buffered has been emitted.
    EndOfStream,
}

/// Splits a byte source into text tokens and telnet control codes.
///
/// `probe` performs at most one read from the source and never blocks on
/// its own; timeouts of the underlying reader surface as
/// [`Probe::NotReady`].
#[derive(Debug)]
pub struct StreamCodec<R> {
    source: R,
    /// Raw bytes read but not yet classified, `intake[start..end]`.
    intake: Vec<u8>,
    start: usize,
    end: usize,
    /// Text bytes waiting for decoding; may end mid-codepoint.
    text: Vec<u8>,
    text_capacity: usize,
    /// Bytes of a control code in progress, starting with IAC.
    control: Vec<u8>,
    max_control: usize,
    ready_text: Option<String>,
    ready_control: Option<TelnetCode>,
    finished: bool,
}

impl<R: Read> StreamCodec<R> {
    /// Create a codec with the default buffer sizes.
    pub fn new(source: R) -> Self {
        Self::with_config(source, &CodecConfig::default())
    }

    pub fn with_config(source: R, config: &CodecConfig) -> Self {
        Self {
            source,
            intake: vec![0; config.read_buffer_size.max(1)],
            start: 0,
            end: 0,
            text: Vec::with_capacity(config.text_buffer_size),
            // Room for the longest UTF-8 sequence is needed to make progress.
            text_capacity: config.text_buffer_size.max(4),
            control: Vec::new(),
            // Shortest sub-negotiation, `IAC SB <opt> SE`.
            max_control: config.max_subnegotiation.max(4),
            ready_text: None,
            ready_control: None,
            finished: false,
        }
    }

    /// Advance the stream by at most one read and report what is ready.
    ///
    /// A token not taken before the next call is discarded.
    pub fn probe(&mut self) -> Result<Probe, CodecError> {
        self.ready_text = None;
        self.ready_control = None;

        if self.finished {
            return Ok(Probe::EndOfStream);
        }

        if self.start == self.end {
            match self.source.read(&mut self.intake) {
                Ok(0) => return Ok(self.finish()),
                Ok(n) => {
                    self.start = 0;
                    self.end = n;
                }
                Err(err) if is_transient(&err) => return Ok(Probe::NotReady),
                Err(err) => return Err(err.into()),
            }
        }

        if !self.control.is_empty() || self.intake[self.start] == IAC {
            Ok(self.probe_control())
        } else {
            Ok(self.probe_text())
        }
    }

    /// The text token announced by the last [`Probe::Text`].
    pub fn take_text(&mut self) -> Option<String> {
        self.ready_text.take()
    }

    /// The control code announced by the last [`Probe::Control`].
    pub fn take_control(&mut self) -> Option<TelnetCode> {
        self.ready_control.take()
    }

    /// Whether the source has reported end of stream.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn probe_control(&mut self) -> Probe {
        while self.start < self.end {
            self.control.push(self.intake[self.start]);
            self.start += 1;

            if self.control.len() > self.max_control {
                warn!(
                    len = self.control.len(),
                    limit = self.max_control,
                    "Discarding oversized telnet sub-negotiation"
                );
                self.control.clear();
                return Probe::NotReady;
            }

            match TelnetCode::decode(&self.control) {
                Decoded::Complete(code) => {
                    trace!(code = %code, "Telnet code decoded");
                    self.control.clear();
                    self.ready_control = Some(code);
                    return Probe::Control;
                }
                Decoded::Incomplete => {}
                Decoded::Invalid => {
                    debug!(bytes = ?self.control, "Discarding invalid telnet sequence");
                    self.control.clear();
                    return Probe::NotReady;
                }
            }
        }

        Probe::NotReady
    }

    fn probe_text(&mut self) -> Probe {
        let available = &self.intake[self.start..self.end];
        let room = self.text_capacity.saturating_sub(self.text.len());
        let len = available
            .iter()
            .take(room)
            .position(|&b| b == IAC)
            .unwrap_or_else(|| available.len().min(room));

        self.text.extend_from_slice(&available[..len]);
        self.start += len;

        let decoded = drain_utf8(&mut self.text);
        if decoded.is_empty() {
            return Probe::NotReady;
        }

        trace!(len = decoded.len(), pending = self.text.len(), "Text decoded");
        self.ready_text = Some(decoded);
        Probe::Text
    }

    /// Handle the source reporting end of stream.
    fn finish(&mut self) -> Probe {
        self.finished = true;

        if !self.control.is_empty() {
            debug!(
                bytes = ?self.control,
                "Dropping incomplete telnet code at end of stream"
            );
            self.control.clear();
        }

        if self.text.is_empty() {
            return Probe::EndOfStream;
        }

        let tail = String::from_utf8_lossy(&self.text).into_owned();
        self.text.clear();
        debug!(len = tail.len(), "Flushing incomplete UTF-8 at end of stream");
        self.ready_text = Some(tail);
        Probe::Text
    }
}

fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

/// Decode the complete UTF-8 prefix of `buf`, removing it from the buffer.
///
/// Each maximal invalid subsequence becomes one U+FFFD. An incomplete
/// sequence at the very end is left in `buf`.
fn drain_utf8(buf: &mut Vec<u8>) -> String {
    let mut decoded = String::new();
    let mut consumed = 0;

    while consumed < buf.len() {
        match str::from_utf8(&buf[consumed..]) {
            Ok(valid) => {
                decoded.push_str(valid);
                consumed = buf.len();
            }
            Err(err) => {
                let valid_end = consumed + err.valid_up_to();
                if let Ok(valid) = str::from_utf8(&buf[consumed..valid_end]) {
                    decoded.push_str(valid);
                }
                consumed = valid_end;
                match err.error_len() {
                    Some(len) => {
                        decoded.push(char::REPLACEMENT_CHARACTER);
                        consumed += len;
                    }
                    None => break,
                }
            }
        }
    }

    buf.drain(..consumed);
    decoded
}
