//! Style engine.
//!
//! Turns decoded server text into styled runs by following inline ANSI
//! SGR escape sequences:
//! - colour: abstract colours (ANSI 16, XTerm 256, RGB, terminal default)
//! - state: the running foreground/background/attribute state
//! - text: run accumulation with coalescing of equal styles
//! - interpreter: incremental escape parsing across calls
//!
//! Rendering colours is left to the caller.

mod colour;
mod interpreter;
mod sgr;
mod state;
mod text;

pub use colour::{Colour, Layer};
pub use interpreter::{AnsiStyleInterpreter, MAX_INCOMPLETE_ESCAPE};
pub use sgr::apply_sgr;
pub use state::{Attributes, StyleState};
pub use text::{StyledRun, StyledText, StyledTextBuilder};
