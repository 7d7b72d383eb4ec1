//! turtle library
//!
//! Telnet stream decoding and ANSI colour interpretation for text-based
//! network clients.

pub mod cli;
pub mod config;
pub mod connection;
pub mod style;
pub mod telnet;

pub use config::Config;
pub use connection::{Connection, ConnectionError, ConnectionEvent, Outbound, Outgoing};
pub use style::{AnsiStyleInterpreter, Colour, StyleState, StyledText};
pub use telnet::{CodecError, Probe, StreamCodec, TelnetCode};
