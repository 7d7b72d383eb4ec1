//! Connect command handler

use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use tracing::debug;
use turtle::connection::{Connection, ConnectionEvent, Outbound};
use turtle::style::AnsiStyleInterpreter;
use turtle::telnet::{Negotiation, TelnetCode};
use turtle::Config;

/// Talk to `host:port` until either side closes the connection.
#[cfg(not(tarpaulin_include))]
pub fn handle(host: &str, port: u16, plain: bool, config: &Config) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut connection = Connection::open(host, port, &config.connection, &config.codec, tx)
        .with_context(|| format!("Failed to connect to {}:{}", host, port))?;
    eprintln!("Connected to {}", connection.peer_addr());

    forward_stdin(connection.sender())?;

    let mut interpreter = AnsiStyleInterpreter::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for event in rx {
        match event {
            ConnectionEvent::Text(text) => {
                if plain {
                    out.write_all(text.as_bytes())?;
                } else {
                    out.write_all(interpreter.parse(&text).full_text().as_bytes())?;
                }
                out.flush()?;
            }
            ConnectionEvent::Telnet(code) => {
                debug!(code = %code, "Server sent telnet code");
                if let Some(reply) = refusal(&code) {
                    debug!(reply = %reply, "Refusing option");
                    connection.send_telnet(reply)?;
                }
            }
            ConnectionEvent::Closed { remote } => {
                if remote {
                    eprintln!("Connection closed by server");
                }
                break;
            }
            ConnectionEvent::Failed(message) => {
                connection.disconnect();
                bail!("Connection failed: {}", message);
            }
        }
    }

    connection.disconnect();
    Ok(())
}

/// The reply refusing an option request, if `code` is one.
///
/// Options are never enabled, so `DO x` gets `WONT x` and `WILL x` gets
/// `DONT x`. Anything else needs no answer.
pub fn refusal(code: &TelnetCode) -> Option<TelnetCode> {
    let TelnetCode::Negotiation { command, option } = code else {
        return None;
    };
    let command = match command {
        Negotiation::Do => Negotiation::Wont,
        Negotiation::Will => Negotiation::Dont,
        Negotiation::Wont | Negotiation::Dont => return None,
    };
    Some(TelnetCode::Negotiation {
        command,
        option: *option,
    })
}

/// Send every line read from stdin to the server.
///
/// The thread is left running; it ends with stdin or the connection.
#[cfg(not(tarpaulin_include))]
fn forward_stdin(outbound: Outbound) -> Result<()> {
    thread::Builder::new()
        .name("turtle-stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if outbound.send_line(line).is_err() {
                    break;
                }
            }
            debug!("Stdin closed");
        })
        .context("Failed to spawn stdin thread")?;
    Ok(())
}
