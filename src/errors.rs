//! Error taxonomies for the request-parsing hot path and for systemic
//! (startup/runtime) failures.
//!
//! These are deliberately two separate types. [`HttpError`] is sticky parser
//! state: it never leaves the worker as a `Result::Err`, it is carried as
//! data into the resolver so a well-formed HTTP response can still be sent
//! to the client. [`ServerError`] is a conventional `std::error::Error` for
//! failures that prevent the server from running at all.

use crate::http::types::StatusCode;
use std::io;
use std::path::PathBuf;

/// Sticky parse-time error taxonomy produced by [`crate::http::request::parse`].
///
/// Once one of these is set, every later stage of parsing short-circuits:
/// the request is considered unparseable and the resolver maps the kind
/// straight to an HTTP status code instead of inspecting the request
/// further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpError {
    MethodInvalid,
    UriEmpty,
    UriTooLong,
    RequestTooLong,
    ProtocolInvalid,
    HeadersEmpty,
}

impl HttpError {
    /// Maps a parse error to the response status code it produces.
    pub const fn status_code(self) -> StatusCode {
        match self {
            HttpError::MethodInvalid => StatusCode::NotImplemented,
            HttpError::UriEmpty
            | HttpError::UriTooLong
            | HttpError::RequestTooLong
            | HttpError::HeadersEmpty => StatusCode::BadRequest,
            HttpError::ProtocolInvalid => StatusCode::HttpVersionNotSupported,
        }
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            HttpError::MethodInvalid => "method invalid",
            HttpError::UriEmpty => "uri empty",
            HttpError::UriTooLong => "uri too long",
            HttpError::RequestTooLong => "request too long",
            HttpError::ProtocolInvalid => "protocol invalid",
            HttpError::HeadersEmpty => "headers empty",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for HttpError {}

/// Top-level operational error, surfaced by `main`'s fallible setup path.
///
/// Distinct from [`HttpError`]: nothing here is client-facing. These are the
/// failures that keep the process from ever reaching its accept loop, or
/// that force it to abort the loop early.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind listening socket on {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("failed to accept a client connection: {0}")]
    Accept(#[source] io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("public root {0:?} is not a directory")]
    PublicRootMissing(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
