//! Telnet protocol layer.
//!
//! - code: the three shapes of telnet control sequence and their wire form
//! - codec: splitting a byte stream into text and control tokens

mod code;
mod codec;
mod error;

pub use code::{
    Decoded, Negotiation, TelnetCode, AO, AYT, BRK, DAT, DO, DONT, EC, EL, GA, IAC, IP, NOP, SB,
    SE, WILL, WONT,
};
pub use codec::{Probe, StreamCodec};
pub use error::CodecError;
