//! Integration tests for connections against a loopback server

use std::io::{BufRead, BufReader, Read, Write};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use turtle::config::ConnectionConfig;
use turtle::telnet::{Negotiation, TelnetCode, DO, GA, IAC, SB, SE, WILL, WONT};
use turtle::{Connection, ConnectionError, ConnectionEvent};

use crate::helpers::{
    collect_events, spawn_server, test_codec_config, test_connection_config, EVENT_TIMEOUT,
};

fn open(port: u16, tx: mpsc::Sender<ConnectionEvent>) -> Connection {
    Connection::open(
        "127.0.0.1",
        port,
        &test_connection_config(),
        &test_codec_config(),
        tx,
    )
    .unwrap()
}

#[test]
fn server_text_and_codes_arrive_in_order() {
    let (port, server) = spawn_server(|mut stream| {
        stream.write_all(b"Welcome").unwrap();
        stream.write_all(&[IAC, WILL, 1]).unwrap();
        stream.write_all("caf\u{e9}\r\n".as_bytes()).unwrap();
        stream.write_all(&[IAC, SB, 24, 1, IAC, SE, IAC, GA]).unwrap();
    });

    let (tx, rx) = mpsc::channel();
    let mut connection = open(port, tx);
    server.join().unwrap();

    let events = collect_events(&rx);
    assert_eq!(
        events,
        vec![
            ConnectionEvent::Text("Welcome".to_string()),
            ConnectionEvent::Telnet(TelnetCode::Negotiation {
                command: Negotiation::Will,
                option: 1
            }),
            ConnectionEvent::Text("caf\u{e9}\r\n".to_string()),
            ConnectionEvent::Telnet(TelnetCode::SubNegotiation {
                option: 24,
                payload: vec![1]
            }),
            ConnectionEvent::Telnet(TelnetCode::Bare(GA)),
            ConnectionEvent::Closed { remote: true },
        ]
    );

    connection.disconnect();
}

#[test]
fn lines_and_codes_reach_the_server() {
    let (done_tx, done_rx) = mpsc::channel();
    let (port, server) = spawn_server(move |stream| {
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let mut code = [0u8; 3];
        reader.read_exact(&mut code).unwrap();
        done_tx.send((line, code)).unwrap();
    });

    let (tx, _rx) = mpsc::channel();
    let mut connection = open(port, tx);
    connection.send_line("look").unwrap();
    connection
        .send_telnet(TelnetCode::Negotiation {
            command: Negotiation::Wont,
            option: 31,
        })
        .unwrap();

    let (line, code) = done_rx.recv_timeout(EVENT_TIMEOUT).unwrap();
    assert_eq!(line, "look\n");
    assert_eq!(code, [IAC, WONT, 31]);

    server.join().unwrap();
    connection.disconnect();
}

#[test]
fn local_disconnect_reports_closed_not_remote() {
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let (port, server) = spawn_server(move |mut stream| {
        stream.write_all(&[IAC, DO, 3]).unwrap();
        // Keep the socket open until the test is done.
        let _ = release_rx.recv();
    });

    let (tx, rx) = mpsc::channel();
    let mut connection = open(port, tx);

    let first = rx.recv_timeout(EVENT_TIMEOUT).unwrap();
    assert_eq!(
        first,
        ConnectionEvent::Telnet(TelnetCode::Negotiation {
            command: Negotiation::Do,
            option: 3
        })
    );

    connection.disconnect();
    assert_eq!(
        rx.recv_timeout(EVENT_TIMEOUT).unwrap(),
        ConnectionEvent::Closed { remote: false }
    );

    // A second disconnect is a no-op.
    connection.disconnect();
    assert!(matches!(
        connection.send_line("x"),
        Err(ConnectionError::Closed)
    ));

    release_tx.send(()).unwrap();
    server.join().unwrap();
}

#[test]
fn disconnect_does_not_wait_for_a_stalled_peer() {
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let (port, server) = spawn_server(move |_stream| {
        // Accept and never read.
        let _ = release_rx.recv_timeout(Duration::from_secs(30));
    });

    let config = ConnectionConfig {
        write_timeout_ms: 200,
        ..test_connection_config()
    };
    let (tx, _rx) = mpsc::channel();
    let mut connection =
        Connection::open("127.0.0.1", port, &config, &test_codec_config(), tx).unwrap();

    let line = "x".repeat(1 << 20);
    for _ in 0..64 {
        let _ = connection.send_line(line.as_str());
    }

    let started = Instant::now();
    connection.disconnect();
    let elapsed = started.elapsed();
    assert!(elapsed < Duration::from_secs(10), "disconnect took {:?}", elapsed);

    release_tx.send(()).unwrap();
    server.join().unwrap();
}

#[test]
fn empty_host_is_rejected() {
    let (tx, _rx) = mpsc::channel();
    let result = Connection::open(
        "  ",
        23,
        &test_connection_config(),
        &test_codec_config(),
        tx,
    );
    assert!(matches!(result, Err(ConnectionError::EmptyHost)));
}

#[test]
fn port_zero_is_rejected() {
    let (tx, _rx) = mpsc::channel();
    let result = Connection::open(
        "localhost",
        0,
        &test_connection_config(),
        &test_codec_config(),
        tx,
    );
    assert!(matches!(result, Err(ConnectionError::InvalidPort(0))));
}

#[test]
fn unresolvable_host_is_unknown() {
    let (tx, _rx) = mpsc::channel();
    let result = Connection::open(
        "no such host.invalid",
        23,
        &test_connection_config(),
        &test_codec_config(),
        tx,
    );
    assert!(matches!(result, Err(ConnectionError::UnknownHost(_))));
}
