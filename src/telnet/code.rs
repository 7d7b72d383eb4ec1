//! Telnet control codes.
//!
//! Every control sequence on the wire has one of three shapes:
//!
//! ```text
//! IAC <X>                          bare command (2 bytes)
//! IAC <WILL|WONT|DO|DONT> <opt>    option negotiation (3 bytes)
//! IAC SB <opt> <payload> IAC SE    sub-negotiation (variable)
//! ```
//!
//! Some servers omit the `IAC` before the closing `SE` of a
//! sub-negotiation. Decoding accepts both forms; encoding always writes
//! the full one.

use std::fmt;

pub const SE: u8 = 240;
pub const NOP: u8 = 241;
pub const DAT: u8 = 242;
pub const BRK: u8 = 243;
pub const IP: u8 = 244;
pub const AO: u8 = 245;
pub const AYT: u8 = 246;
pub const EC: u8 = 247;
pub const EL: u8 = 248;
pub const GA: u8 = 249;
pub const SB: u8 = 250;
pub const WILL: u8 = 251;
pub const WONT: u8 = 252;
pub const DO: u8 = 253;
pub const DONT: u8 = 254;
pub const IAC: u8 = 255;

/// The four option negotiation verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Negotiation {
    Will,
    Wont,
    Do,
    Dont,
}

impl Negotiation {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            WILL => Some(Self::Will),
            WONT => Some(Self::Wont),
            DO => Some(Self::Do),
            DONT => Some(Self::Dont),
            _ => None,
        }
    }

    pub fn byte(self) -> u8 {
        match self {
            Self::Will => WILL,
            Self::Wont => WONT,
            Self::Do => DO,
            Self::Dont => DONT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Will => "WILL",
            Self::Wont => "WONT",
            Self::Do => "DO",
            Self::Dont => "DONT",
        }
    }
}

/// A complete telnet control sequence.
///
/// Command and option values are kept as raw bytes, so options this crate
/// knows nothing about decode just as well as the common ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TelnetCode {
    /// `IAC <command>`; `command` is never SB or one of the negotiation verbs.
    Bare(u8),
    /// `IAC <verb> <option>`.
    Negotiation { command: Negotiation, option: u8 },
    /// `IAC SB <option> <payload> IAC SE`.
    SubNegotiation { option: u8, payload: Vec<u8> },
}

/// Result of decoding a byte sequence as a telnet code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// The bytes form exactly one complete code.
    Complete(TelnetCode),
    /// The bytes are a valid prefix of a code.
    Incomplete,
    /// The bytes do not start with IAC, or run past the end of the code.
    Invalid,
}

impl TelnetCode {
    /// Decode `bytes` as a single telnet code.
    ///
    /// The streaming codec feeds this one byte at a time and stops at the
    /// first `Complete`; one-shot callers must pass exactly one code.
    pub fn decode(bytes: &[u8]) -> Decoded {
        match bytes {
            [] | [IAC] => Decoded::Incomplete,
            [IAC, SB, rest @ ..] => decode_subnegotiation(rest),
            [IAC, command, rest @ ..] => match Negotiation::from_byte(*command) {
                Some(verb) => match rest {
                    [] => Decoded::Incomplete,
                    [option] => Decoded::Complete(Self::Negotiation {
                        command: verb,
                        option: *option,
                    }),
                    _ => Decoded::Invalid,
                },
                None if rest.is_empty() => Decoded::Complete(Self::Bare(*command)),
                None => Decoded::Invalid,
            },
            _ => Decoded::Invalid,
        }
    }

    /// Canonical wire form of this code.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Bare(command) => vec![IAC, *command],
            Self::Negotiation { command, option } => vec![IAC, command.byte(), *option],
            Self::SubNegotiation { option, payload } => {
                let mut bytes = Vec::with_capacity(payload.len() + 5);
                bytes.extend_from_slice(&[IAC, SB, *option]);
                bytes.extend_from_slice(payload);
                bytes.extend_from_slice(&[IAC, SE]);
                bytes
            }
        }
    }

    /// The command byte following the leading IAC.
    pub fn command(&self) -> u8 {
        match self {
            Self::Bare(command) => *command,
            Self::Negotiation { command, .. } => command.byte(),
            Self::SubNegotiation { .. } => SB,
        }
    }

    /// The option byte, for negotiations and sub-negotiations.
    pub fn option(&self) -> Option<u8> {
        match self {
            Self::Bare(_) => None,
            Self::Negotiation { option, .. } | Self::SubNegotiation { option, .. } => {
                Some(*option)
            }
        }
    }
}

/// Decode the part of a sub-negotiation after `IAC SB`.
///
/// `rest` is `<option> <payload> [IAC] SE`; the option byte itself may be
/// any value, so the terminator is only looked for after it.
fn decode_subnegotiation(rest: &[u8]) -> Decoded {
    let Some((&option, body)) = rest.split_first() else {
        return Decoded::Incomplete;
    };

    match body.iter().position(|&b| b == SE) {
        None => Decoded::Incomplete,
        Some(end) if end + 1 != body.len() => Decoded::Invalid,
        Some(end) => {
            let payload = &body[..end];
            let payload = payload.strip_suffix(&[IAC]).unwrap_or(payload);
            Decoded::Complete(TelnetCode::SubNegotiation {
                option,
                payload: payload.to_vec(),
            })
        }
    }
}

fn bare_name(command: u8) -> Option<&'static str> {
    let name = match command {
        SE => "SE",
        NOP => "NOP",
        DAT => "DAT",
        BRK => "BRK",
        IP => "IP",
        AO => "AO",
        AYT => "AYT",
        EC => "EC",
        EL => "EL",
        GA => "GA",
        IAC => "IAC",
        _ => return None,
    };
    Some(name)
}

impl fmt::Display for TelnetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare(command) => match bare_name(*command) {
                Some(name) => write!(f, "IAC {}", name),
                None => write!(f, "IAC {}", command),
            },
            Self::Negotiation { command, option } => {
                write!(f, "IAC {} {}", command.name(), option)
            }
            Self::SubNegotiation { option, payload } => {
                write!(f, "IAC SB {}", option)?;
                for byte in payload {
                    write!(f, " {}", byte)?;
                }
                f.write_str(" IAC SE")
            }
        }
    }
}
