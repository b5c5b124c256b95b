//! Worker thread loop: receive a connection, read it, parse, resolve,
//! build the response, write it, log, close.
//!
//! Each worker owns its accepted socket and request buffer exclusively for
//! the lifetime of one exchange; nothing here is shared with another
//! worker. A worker never outlives its thread: [`run`] returns once the
//! channel is closed, which is how the acceptor signals shutdown.

use crate::config::Config;
use crate::errors::HttpError;
use crate::http::request::{self, Recovered};
use crate::http::types::Method;
use crate::logger::{Level, LogEntry, LoggerWriter};
use crate::resolver::{self, Artifact};
use crate::http::response;
use crate::server::channel::{self, PendingConnection};
use crossbeam::channel::Receiver;
use std::io::{self, Read, Write};
use std::net::TcpStream;

/// Runs the fixed receive/read/parse/resolve/write/log loop until the
/// channel closes (shutdown).
pub fn run(receiver: Receiver<PendingConnection>, config: &Config, logger: &LoggerWriter) {
    while let Some(conn) = channel::receive(&receiver) {
        serve(conn, config, logger);
    }
}

fn serve(mut conn: PendingConnection, config: &Config, logger: &LoggerWriter) {
    let outcome = match read_request(&mut conn.stream, config.page_size, config.max_request_size) {
        Ok(outcome) => outcome,
        Err(err) => {
            log::warn!("failed to read from {}: {err}", conn.origin);
            return;
        }
    };

    let mut buf = match outcome {
        ReadOutcome::ConnectionClosed => return,
        ReadOutcome::TooLarge => {
            respond_error(&mut conn, logger, HttpError::RequestTooLong, Recovered::default(), config);
            return;
        }
        ReadOutcome::Data(buf) => buf,
    };

    match request::parse(&mut buf, config.max_url_size, conn.origin) {
        Ok(req) => {
            let head = req.method == Method::Head;
            let artifact = resolver::resolve(&req, &config.public_root, &config.default_root);
            let response = response::build(artifact, config, head);
            let status = response.status.as_u16();
            write_response(&mut conn.stream, &response, conn.origin);
            logger.log(&LogEntry {
                level: Level::for_status(status),
                status,
                method: req.method.as_str(),
                uri_path: req.path,
            });
        }
        Err((err, recovered)) => respond_error(&mut conn, logger, err, recovered, config),
    }
}

/// Builds and writes the error response for a request that never made it
/// through `parse` (or was rejected before parsing, e.g. oversized), then
/// logs it using whatever `recovered` was able to fill in: a method/path
/// invalid before that field was reached (or a too-large request rejected
/// before parsing even started) logs as `-` / empty, but a request that
/// failed at the protocol or header stage still logs its real method and
/// path, matching what the pre-failure fields held.
fn respond_error(
    conn: &mut PendingConnection,
    logger: &LoggerWriter,
    err: HttpError,
    recovered: Recovered,
    config: &Config,
) {
    let response = response::build(Artifact::Error(err.status_code()), config, false);
    let status = response.status.as_u16();
    write_response(&mut conn.stream, &response, conn.origin);
    logger.log(&LogEntry {
        level: Level::for_status(status),
        status,
        method: recovered.method.map(Method::as_str).unwrap_or("-"),
        uri_path: recovered.path.unwrap_or(b""),
    });
}

fn write_response(
    stream: &mut TcpStream,
    built: &response::Response,
    origin: impl std::fmt::Debug,
) {
    let bytes = response::serialize(built);
    if let Err(err) = stream.write_all(&bytes) {
        log::warn!("failed to write response to {origin:?}: {err}");
    }
}

/// What the read phase produced.
enum ReadOutcome {
    /// The client closed the connection before sending any bytes.
    ConnectionClosed,
    /// The request exceeded `max_request_size`.
    TooLarge,
    Data(Vec<u8>),
}

/// Drains `stream` into a heap buffer: an initial blocking
/// read of `page_size` bytes, then — while each read fully occupied the
/// space offered to it — grow the buffer and keep reading in non-blocking
/// mode until a short read, a `WouldBlock`, or `max_request_size` is hit.
fn read_request(stream: &mut TcpStream, page_size: usize, max_request_size: usize) -> io::Result<ReadOutcome> {
    stream.set_nonblocking(false)?;

    let mut buf = vec![0u8; page_size];
    let mut filled = 0usize;
    let mut nonblocking = false;

    loop {
        if filled == buf.len() {
            if buf.len() >= max_request_size {
                return Ok(ReadOutcome::TooLarge);
            }
            let grown = (buf.len() * 2).min(max_request_size);
            buf.resize(grown, 0);
            if !nonblocking {
                stream.set_nonblocking(true)?;
                nonblocking = true;
            }
        }

        match stream.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => {
                let was_full = filled + n == buf.len();
                filled += n;
                if !was_full {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
            Err(e) => return Err(e),
        }
    }

    if filled == 0 {
        return Ok(ReadOutcome::ConnectionClosed);
    }

    buf.truncate(filled);
    Ok(ReadOutcome::Data(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    fn connected_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let client = thread::spawn(move || TcpStream::connect(addr).unwrap());
        let (server_side, _) = listener.accept().unwrap();
        (server_side, client.join().unwrap())
    }

    #[test]
    fn reads_a_short_request_in_one_blocking_pass() {
        let (mut server_side, mut client) = connected_pair();
        client.write_all(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();
        drop(client);

        match read_request(&mut server_side, 4096, 1024 * 1024).unwrap() {
            ReadOutcome::Data(buf) => assert_eq!(buf, b"GET / HTTP/1.1\r\nHost: x\r\n\r\n"),
            _ => panic!("expected data"),
        }
    }

    #[test]
    fn closed_connection_with_no_bytes_is_reported() {
        let (mut server_side, client) = connected_pair();
        drop(client);

        match read_request(&mut server_side, 4096, 1024 * 1024).unwrap() {
            ReadOutcome::ConnectionClosed => {}
            _ => panic!("expected connection closed"),
        }
    }

    #[test]
    fn grows_past_the_page_size_for_a_larger_request() {
        let (mut server_side, mut client) = connected_pair();
        let body = "x".repeat(100);
        let request = format!(
            "POST /submit HTTP/1.1\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        client.write_all(request.as_bytes()).unwrap();
        drop(client);

        match read_request(&mut server_side, 8, 1024 * 1024).unwrap() {
            ReadOutcome::Data(buf) => assert_eq!(buf, request.as_bytes()),
            _ => panic!("expected data"),
        }
    }

    #[test]
    fn a_protocol_invalid_request_still_logs_its_real_method_and_path() {
        use tempfile::tempdir;

        let (server_side, mut client) = connected_pair();
        client
            .write_all(b"GET / HTTP/1.0\r\nHost: x\r\n\r\n")
            .unwrap();
        drop(client);

        let dir = tempdir().unwrap();
        let mut config = Config::for_test();
        config.default_root = dir.path().to_path_buf();
        let log_path = dir.path().join("requests.txt");
        let logger = LoggerWriter::open(&log_path).unwrap();

        let conn = PendingConnection {
            stream: server_side,
            origin: "127.0.0.1:0".parse().unwrap(),
        };
        serve(conn, &config, &logger);

        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert!(
            contents.contains("505 GET /"),
            "expected the recovered method/path in the log line, got: {contents}"
        );
    }
}
