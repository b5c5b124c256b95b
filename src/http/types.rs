//! Core HTTP protocol vocabulary: methods, versions and status codes.

use crate::errors::HttpError;

// METHOD

/// HTTP request methods recognised by the parser.
///
/// The parser accepts the full verb set below so that a well-formed but
/// unsupported method (e.g. `DELETE`) can be reported to the resolver as
/// `MethodInvalid` (→ 501) rather than rejected earlier as malformed input.
/// Only `Get` and `Post` are ever actually served (see the resolver).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Head,
    Patch,
    Delete,
    Options,
    Trace,
    Connect,
}

impl Method {
    #[inline(always)]
    pub(crate) fn from_bytes(src: &[u8]) -> Result<(Self, usize), HttpError> {
        match src {
            [b'G', b'E', b'T', b' ', ..] => Ok((Method::Get, 3)),
            [b'P', b'U', b'T', b' ', ..] => Ok((Method::Put, 3)),
            [b'P', b'O', b'S', b'T', b' ', ..] => Ok((Method::Post, 4)),
            [b'H', b'E', b'A', b'D', b' ', ..] => Ok((Method::Head, 4)),
            [b'P', b'A', b'T', b'C', b'H', b' ', ..] => Ok((Method::Patch, 5)),
            [b'T', b'R', b'A', b'C', b'E', b' ', ..] => Ok((Method::Trace, 5)),
            [b'D', b'E', b'L', b'E', b'T', b'E', b' ', ..] => Ok((Method::Delete, 6)),
            [b'O', b'P', b'T', b'I', b'O', b'N', b'S', b' ', ..] => Ok((Method::Options, 7)),
            [b'C', b'O', b'N', b'N', b'E', b'C', b'T', b' ', ..] => Ok((Method::Connect, 7)),
            _ => Err(HttpError::MethodInvalid),
        }
    }

    /// The wire form of the method, as written by the access logger.
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Head => "HEAD",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Connect => "CONNECT",
        }
    }
}

// VERSION

/// HTTP protocol version token from the request line.
///
/// Only `Http11` is accepted by this server; `Http10` is recognised
/// explicitly so it can be reported as `ProtocolInvalid` (→ 505) instead of
/// falling into the generic "anything else" bucket.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    Http11,
}

impl Version {
    #[inline(always)]
    pub(crate) const fn from_bytes(src: &[u8]) -> Result<Self, HttpError> {
        match src {
            b"HTTP/1.1" => Ok(Version::Http11),
            _ => Err(HttpError::ProtocolInvalid),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Version::Http11 => "HTTP/1.1",
        }
    }
}

// STATUS CODE

macro_rules! set_status_codes {
    ($(
        $name:ident = ($num:expr, $str:expr);
    )+) => {
        /// HTTP status codes this server is able to emit.
        ///
        /// Restricted to the set the response builder actually produces;
        /// a static table covering every other IANA-registered code
        /// would be dead weight here.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum StatusCode { $(
            $name = $num,
        )+ }

        impl StatusCode {
            /// Numeric status code, e.g. `404`.
            pub const fn as_u16(self) -> u16 {
                match self { $( StatusCode::$name => $num, )+ }
            }

            /// Reason phrase exactly as required by the serialisation rule.
            pub const fn reason_phrase(self) -> &'static str {
                match self { $( StatusCode::$name => $str, )+ }
            }

            /// Status line for this code under HTTP/1.1, e.g. `b"HTTP/1.1 404 Not Found\r\n"`.
            pub const fn status_line(self) -> &'static [u8] {
                match self { $(
                    StatusCode::$name => concat!("HTTP/1.1 ", $num, " ", $str, "\r\n").as_bytes(),
                )+ }
            }

            /// Name of the default error template for this code, e.g. `"404.html"`.
            pub const fn default_template(self) -> &'static str {
                match self { $(
                    StatusCode::$name => concat!(stringify!($num), ".html"),
                )+ }
            }
        }
    }
}

set_status_codes! {
    Ok = (200, "Ok");
    MovedPermanently = (301, "Moved Permanently");
    BadRequest = (400, "Bad Request");
    NotFound = (404, "Not Found");
    InternalServerError = (500, "Internal Server Error");
    NotImplemented = (501, "Not Implemented");
    HttpVersionNotSupported = (505, "HTTP Version Not Supported");
}

// HEADER

/// A single header as a borrowed `(name, value)` pair.
///
/// Borrowed from the request buffer (see [`crate::http::request::Request`]):
/// no header is ever copied out of the buffer it was parsed from.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Header<'a> {
    pub name: &'a [u8],
    pub value: &'a [u8],
}

impl<'a> Header<'a> {
    #[inline(always)]
    pub const fn new(name: &'a [u8], value: &'a [u8]) -> Self {
        Header { name, value }
    }
}
