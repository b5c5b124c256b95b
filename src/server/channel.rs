//! One-slot rendezvous between the acceptor and the worker pool.
//!
//! A mutex and two condition variables would get this done, but in Rust
//! the rendezvous is just a zero-capacity channel.
//! `crossbeam::channel::bounded(0)` blocks `send` until a `recv` is ready
//! for it and vice versa, which is exactly the one-slot hand-off this
//! needs — backpressure falls out of the channel itself rather than
//! needing to be hand-coded.
//!
//! Shutdown is modelled as closing the channel: the acceptor drops its
//! `Sender` when its accept loop exits, and every worker's blocked `recv`
//! then returns `Err`, which this wrapper turns into `None`.

use crossbeam::channel::{bounded, Receiver, Sender};
use std::net::{SocketAddr, TcpStream};

/// An accepted client socket, handed from the acceptor to a worker.
pub struct PendingConnection {
    pub stream: TcpStream,
    pub origin: SocketAddr,
}

pub struct RequestChannel {
    sender: Sender<PendingConnection>,
    receiver: Receiver<PendingConnection>,
}

impl RequestChannel {
    pub fn new() -> Self {
        let (sender, receiver) = bounded(0);
        RequestChannel { sender, receiver }
    }

    /// A handle the acceptor uses to `post`. Dropping every clone closes
    /// the channel and wakes every blocked worker.
    pub fn sender(&self) -> Sender<PendingConnection> {
        self.sender.clone()
    }

    /// A handle a worker uses to `receive`. Cheap to clone: `crossbeam`
    /// receivers are natively multi-consumer.
    pub fn receiver(&self) -> Receiver<PendingConnection> {
        self.receiver.clone()
    }
}

impl Default for RequestChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer side: blocks until a worker takes `conn`, or the channel is
/// already closed (shutdown in progress).
pub fn post(sender: &Sender<PendingConnection>, conn: PendingConnection) -> bool {
    sender.send(conn).is_ok()
}

/// Consumer side: blocks until a connection is posted, or the channel is
/// closed, in which case the worker should exit.
pub fn receive(receiver: &Receiver<PendingConnection>) -> Option<PendingConnection> {
    receiver.recv().ok()
}
