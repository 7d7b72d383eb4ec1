//! TCP connection to a telnet server.
//!
//! Opening a [`Connection`] starts two threads: a reader that runs a
//! [`StreamCodec`] over the socket and delivers [`ConnectionEvent`]s on the
//! caller's channel, and a writer fed through [`Outbound`] handles.
//!
//! The reader relies on the socket read timeout to notice a disconnect
//! request, so shutdown latency is bounded by `read_timeout_ms`. A peer
//! that stops reading holds the writer for at most `write_timeout_ms`.

mod error;
mod outbound;

pub use error::ConnectionError;
pub use outbound::{Outbound, Outgoing};

use std::io;
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::config::{CodecConfig, ConnectionConfig};
use crate::telnet::{Probe, StreamCodec, TelnetCode};

/// Something that happened on the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Decoded text from the server, styles still embedded.
    Text(String),
    /// A control code from the server.
    Telnet(TelnetCode),
    /// The connection ended; `remote` is false when we closed it.
    Closed { remote: bool },
    /// Reading from the socket failed; no further events follow.
    Failed(String),
}

/// An open connection with its reader and writer threads.
#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    stop: Arc<AtomicBool>,
    outbound: Outbound,
    reader: Option<JoinHandle<()>>,
    writer: Option<JoinHandle<io::Result<()>>>,
}

impl Connection {
    /// Connect to `host:port` and start delivering events to `events`.
    pub fn open(
        host: &str,
        port: u16,
        connection: &ConnectionConfig,
        codec: &CodecConfig,
        events: Sender<ConnectionEvent>,
    ) -> Result<Self, ConnectionError> {
        if host.trim().is_empty() {
            return Err(ConnectionError::EmptyHost);
        }
        if port == 0 {
            return Err(ConnectionError::InvalidPort(port));
        }

        let stream = connect(host, port, connection)?;
        let peer = stream.peer_addr()?;
        stream.set_read_timeout(Some(connection.read_timeout()))?;
        debug!(peer = %peer, "Connected");

        let sink = stream.try_clone()?;
        sink.set_write_timeout(Some(connection.write_timeout()))?;
        let (outbound, writer) = Outbound::spawn(sink)?;

        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let codec = StreamCodec::with_config(stream.try_clone()?, codec);
        let reader = thread::Builder::new()
            .name("turtle-reader".into())
            .spawn(move || reader_loop(codec, events, stop_flag))?;

        Ok(Self {
            stream,
            peer,
            stop,
            outbound,
            reader: Some(reader),
            writer: Some(writer),
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// A handle for queueing output from any thread.
    pub fn sender(&self) -> Outbound {
        self.outbound.clone()
    }

    pub fn send_line(&self, line: impl Into<String>) -> Result<(), ConnectionError> {
        self.outbound.send_line(line)
    }

    pub fn send_telnet(&self, code: TelnetCode) -> Result<(), ConnectionError> {
        self.outbound.send_telnet(code)
    }

    /// Close the connection and wait for both threads.
    ///
    /// Idempotent. The event channel receives `Closed { remote: false }`
    /// unless the reader had already stopped.
    pub fn disconnect(&mut self) {
        if self.reader.is_none() && self.writer.is_none() {
            return;
        }

        self.stop.store(true, Ordering::Relaxed);
        self.outbound.close();

        if let Some(writer) = self.writer.take() {
            match writer.join() {
                Ok(Err(err)) => debug!(error = %err, "Writer ended with error"),
                Err(_) => warn!("Writer thread panicked"),
                Ok(Ok(())) => {}
            }
        }

        let _ = self.stream.shutdown(Shutdown::Both);

        if let Some(reader) = self.reader.take() {
            if reader.join().is_err() {
                warn!("Reader thread panicked");
            }
        }

        debug!(peer = %self.peer, "Disconnected");
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn connect(host: &str, port: u16, config: &ConnectionConfig) -> Result<TcpStream, ConnectionError> {
    let addrs: Vec<SocketAddr> = (host, port)
        .to_socket_addrs()
        .map_err(|_| ConnectionError::UnknownHost(host.to_string()))?
        .collect();

    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, config.connect_timeout()) {
            Ok(stream) => return Ok(stream),
            Err(err) => {
                debug!(addr = %addr, error = %err, "Connect attempt failed");
                last_err = Some(err);
            }
        }
    }

    match last_err {
        Some(err) => Err(err.into()),
        None => Err(ConnectionError::UnknownHost(host.to_string())),
    }
}

fn reader_loop(
    mut codec: StreamCodec<TcpStream>,
    events: Sender<ConnectionEvent>,
    stop: Arc<AtomicBool>,
) {
    loop {
        if stop.load(Ordering::Relaxed) {
            let _ = events.send(ConnectionEvent::Closed { remote: false });
            break;
        }

        let event = match codec.probe() {
            Ok(Probe::NotReady) => continue,
            Ok(Probe::Text) => codec.take_text().map(ConnectionEvent::Text),
            Ok(Probe::Control) => codec.take_control().map(ConnectionEvent::Telnet),
            Ok(Probe::EndOfStream) => {
                let remote = !stop.load(Ordering::Relaxed);
                let _ = events.send(ConnectionEvent::Closed { remote });
                break;
            }
            Err(err) => {
                if stop.load(Ordering::Relaxed) {
                    let _ = events.send(ConnectionEvent::Closed { remote: false });
                } else {
                    warn!(error = %err, "Read failed, closing connection");
                    let _ = events.send(ConnectionEvent::Failed(err.to_string()));
                }
                break;
            }
        };

        if let Some(event) = event {
            if events.send(event).is_err() {
                debug!("Event receiver dropped, stopping reader");
                break;
            }
        }
    }
}
