use std::io;

/// Errors surfaced by [`StreamCodec`](super::StreamCodec).
///
/// Timeouts and end of stream are not errors; they show up as
/// [`Probe::NotReady`](super::Probe::NotReady) and
/// [`Probe::EndOfStream`](super::Probe::EndOfStream).
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to read from byte source: {0}")]
    Io(#[from] io::Error),
}

impl CodecError {
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Io(err) => err.kind(),
        }
    }
}
