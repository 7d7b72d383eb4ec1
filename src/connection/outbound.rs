//! Outbound queue.
//!
//! Any thread may enqueue lines or telnet codes through an [`Outbound`]
//! handle. A single writer thread owns the sink: it waits for the first
//! message, takes everything else already queued along with it, writes the
//! whole batch and flushes once.

use std::io::{self, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, trace};

use super::error::ConnectionError;
use crate::telnet::TelnetCode;

/// Something to send to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    /// A line of user input; a trailing `\n` is added when written.
    Line(String),
    /// A control code, written in its canonical encoding.
    Telnet(TelnetCode),
}

#[derive(Debug)]
enum Message {
    Send(Outgoing),
    Stop,
}

/// Clonable handle to the writer thread.
#[derive(Debug, Clone)]
pub struct Outbound {
    tx: Sender<Message>,
}

impl Outbound {
    /// Spawn the writer thread for `sink`.
    ///
    /// The thread ends after [`close`](Self::close), when every handle has
    /// been dropped, or on the first write error, which the join handle
    /// returns.
    pub fn spawn<W>(sink: W) -> io::Result<(Self, JoinHandle<io::Result<()>>)>
    where
        W: Write + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("turtle-writer".into())
            .spawn(move || writer_loop(sink, rx))?;
        Ok((Self { tx }, handle))
    }

    pub fn send(&self, item: Outgoing) -> Result<(), ConnectionError> {
        self.tx
            .send(Message::Send(item))
            .map_err(|_| ConnectionError::Closed)
    }

    pub fn send_line(&self, line: impl Into<String>) -> Result<(), ConnectionError> {
        self.send(Outgoing::Line(line.into()))
    }

    pub fn send_telnet(&self, code: TelnetCode) -> Result<(), ConnectionError> {
        self.send(Outgoing::Telnet(code))
    }

    /// Ask the writer to stop once everything queued so far is written.
    pub fn close(&self) {
        let _ = self.tx.send(Message::Stop);
    }
}

fn writer_loop<W: Write>(mut sink: W, rx: Receiver<Message>) -> io::Result<()> {
    while let Ok(first) = rx.recv() {
        let mut written = 0;
        let mut stop = false;

        for message in std::iter::once(first).chain(rx.try_iter()) {
            match message {
                Message::Send(item) => {
                    write_item(&mut sink, &item)?;
                    written += 1;
                }
                Message::Stop => {
                    stop = true;
                    break;
                }
            }
        }

        if written > 0 {
            sink.flush()?;
            trace!(count = written, "Flushed outbound batch");
        }

        if stop {
            debug!("Outbound writer stopped");
            break;
        }
    }

    Ok(())
}

fn write_item<W: Write>(sink: &mut W, item: &Outgoing) -> io::Result<()> {
    match item {
        Outgoing::Line(line) => {
            sink.write_all(line.as_bytes())?;
            sink.write_all(b"\n")
        }
        Outgoing::Telnet(code) => sink.write_all(&code.encode()),
    }
}
