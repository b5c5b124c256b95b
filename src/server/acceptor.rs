//! `listen`/`accept` loop and worker-pool orchestration.
//!
//! One thread owns the listening socket and runs this loop;
//! [`crate::config::Config::worker_count`] worker threads are spawned
//! up front and fed through the [`RequestChannel`]. Shutdown is driven by
//! [`Shutdown`]: the accept loop polls it once per iteration, and once the
//! loop exits, dropping its [`crossbeam::channel::Sender`] closes the
//! channel so every blocked worker's `receive` returns cleanly.

use crate::config::Config;
use crate::errors::ServerError;
use crate::logger::LoggerWriter;
use crate::server::channel::{self, PendingConnection, RequestChannel};
use crate::server::shutdown::Shutdown;
use crate::server::worker;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How long the accept loop sleeps after an `EWOULDBLOCK` before polling
/// again. Keeps shutdown responsive without busy-spinning a core.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Binds the listening socket, spawns the worker pool, and runs the accept
/// loop until `shutdown` is requested. Joins every worker before returning.
pub fn run(config: Arc<Config>, shutdown: Arc<Shutdown>, logger: Arc<LoggerWriter>) -> Result<(), ServerError> {
    let listener = bind(&config)?;
    let channel = RequestChannel::new();

    let mut workers = Vec::with_capacity(config.worker_count);
    for id in 0..config.worker_count {
        let receiver = channel.receiver();
        let worker_config = config.clone();
        let worker_logger = logger.clone();
        let handle = thread::Builder::new()
            .name(format!("filehttpd-worker-{id}"))
            .spawn(move || worker::run(receiver, &worker_config, &worker_logger))
            .expect("failed to spawn worker thread");
        workers.push(handle);
    }

    let sender = channel.sender();
    // `channel` itself still holds one `Sender`/`Receiver` pair internally;
    // drop it now so the only remaining `Sender` is `sender` below — that
    // way dropping `sender` at shutdown is what actually closes the
    // channel and unblocks every worker's `recv`.
    drop(channel);
    log::info!("listening on {}", config.socket_addr());

    while !shutdown.is_requested() {
        match listener.accept() {
            Ok((stream, origin)) => {
                if !channel::post(&sender, PendingConnection { stream, origin }) {
                    break;
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL_INTERVAL);
            }
            Err(e) => return Err(ServerError::Accept(e)),
        }
    }

    drop(sender);
    for handle in workers {
        let _ = handle.join();
    }
    log::info!("shutdown complete");
    Ok(())
}

/// Creates a non-blocking, `SO_REUSEADDR` TCP listener bound to
/// `config.socket_addr()` with the configured backlog.
fn bind(config: &Config) -> Result<TcpListener, ServerError> {
    let addr = config.socket_addr();
    let domain = if addr.is_ipv4() { Domain::IPV4 } else { Domain::IPV6 };

    let to_bind_err = |source: std::io::Error| ServerError::Bind { addr, source };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP)).map_err(to_bind_err)?;
    socket.set_reuse_address(true).map_err(to_bind_err)?;
    socket.set_nonblocking(true).map_err(to_bind_err)?;
    socket.bind(&addr.into()).map_err(to_bind_err)?;
    socket.listen(config.backlog).map_err(to_bind_err)?;

    Ok(socket.into())
}
