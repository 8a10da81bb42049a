use std::io;

/// Errors surfaced by the link layer.
///
/// `Io` closes the port and schedules a reconnect; `Protocol` and
/// `Domain` are always recoverable in place (see the dispatcher and
/// framer, which log and drop rather than propagate these).
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("serial i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("serial port error: {0}")]
    Port(#[from] serialport::Error),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("domain error: {0}")]
    Domain(String),
}

pub type Result<T> = std::result::Result<T, LinkError>;
