use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("host name is empty")]
    EmptyHost,

    #[error("invalid port: {0}")]
    InvalidPort(u16),

    #[error("unknown host: {0}")]
    UnknownHost(String),

    #[error("connection is closed")]
    Closed,

    #[error(transparent)]
    Io(#[from] io::Error),
}
