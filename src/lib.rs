//! filehttpd — a small, concurrent static-content HTTP/1.1 server.
//!
//! The engine is three tightly coupled pieces: [`http::request`] parses a
//! raw byte buffer into a structured request, [`resolver`] maps that
//! request onto a filesystem artifact (file, directory, redirect, or
//! error), and [`http::response`] serialises the artifact into response
//! bytes. Those three run inside a fixed pool of worker threads
//! ([`server::worker`]) fed by a single acceptor thread
//! ([`server::acceptor`]) through a one-slot rendezvous channel
//! ([`server::channel`]).
//!
//! # Non-goals
//!
//! HTTPS, HTTP/2, chunked transfer encoding, keep-alive, authentication,
//! range requests, caching validators, content negotiation, compression,
//! virtual hosts, and CGI/dynamic execution are all out of scope: every
//! response closes the connection, and every request is served from a
//! static filesystem root.

pub mod cli;
pub mod config;
pub mod errors;
pub mod http;
pub mod logger;
pub mod resolver;
pub mod server;

pub use crate::config::Config;
pub use crate::errors::{HttpError, ServerError};
