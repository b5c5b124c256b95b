//! Single-pass HTTP/1.1 request-line, header and percent-decoding parser.
//!
//! The parser never allocates a copy of the input: every field on
//! [`Request`] borrows from the caller's buffer. Percent-decoding is the one
//! place the buffer is mutated — decoding only ever shrinks a byte range, so
//! it is done in place and the (shorter) decoded prefix is handed back as an
//! ordinary borrowed slice. There is no unsafe lifetime erasure here: because
//! each request owns its buffer for exactly one parse, a borrowed `Request<'a>`
//! tied to that buffer's lifetime is all that's needed.

use crate::errors::HttpError;
use crate::http::types::{Header, Method, Version};
use memchr::memchr;
use std::net::SocketAddr;

/// A parsed HTTP/1.1 request, borrowing every field from the raw request
/// buffer it was parsed out of.
#[derive(Debug)]
pub struct Request<'a> {
    pub method: Method,
    pub version: Version,
    /// Decoded path component, no query string (e.g. `/a b` for `/a%20b`).
    pub path: &'a [u8],
    /// Decoded query string, without the leading `?`. Empty if absent.
    pub query: &'a [u8],
    pub headers: Vec<Header<'a>>,
    pub body: &'a [u8],
    /// Client address, carried through for the access log.
    pub origin: SocketAddr,
}

impl<'a> Request<'a> {
    /// Looks up a header by case-insensitive name.
    pub fn header(&self, name: &[u8]) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value)
    }
}

/// Whatever `method`/`path` a failed parse had already recovered before the
/// sticky error fired.
///
/// Mirrors the field-by-field fill of a C `http_request` struct: each
/// sub-parser (method, then URI, then protocol, then headers) writes its
/// field before moving on, so a failure in a later stage still leaves the
/// earlier fields intact for the caller to log. Both fields are `None` only
/// when the failure happened before they could be recovered (e.g. an
/// unrecognised method, or a URI too long to even split into path/query).
#[derive(Debug, Clone, Copy, Default)]
pub struct Recovered<'a> {
    pub method: Option<Method>,
    pub path: Option<&'a [u8]>,
}

/// Parses `buf` as one HTTP/1.1 request.
///
/// `max_url_size` bounds the request-target; callers pass the
/// value from [`crate::config::Config`] rather than a hardcoded constant.
///
/// On failure, the error is paired with whatever [`Recovered`] fields the
/// parse managed to fill in before it short-circuited, so a caller logging
/// the failed attempt isn't forced to report a blank method/path.
pub fn parse<'a>(
    buf: &'a mut [u8],
    max_url_size: usize,
    origin: SocketAddr,
) -> Result<Request<'a>, (HttpError, Recovered<'a>)> {
    let mut recovered = Recovered::default();

    let (method, method_len) = match Method::from_bytes(buf) {
        Ok(v) => v,
        Err(err) => return Err((err, recovered)),
    };
    recovered.method = Some(method);
    let mut pos = method_len + 1;

    let target_rel_end = match memchr(b' ', buf.get(pos..).unwrap_or(&[])) {
        Some(v) => v,
        None => return Err((HttpError::UriEmpty, recovered)),
    };
    if target_rel_end == 0 {
        return Err((HttpError::UriEmpty, recovered));
    }
    if target_rel_end > max_url_size {
        return Err((HttpError::UriTooLong, recovered));
    }
    let target_start = pos;
    let target_end = pos + target_rel_end;
    pos = target_end + 1;

    let (path_start, path_end, query_start, query_end) =
        match memchr(b'?', &buf[target_start..target_end]) {
            Some(q) => (
                target_start,
                target_start + q,
                target_start + q + 1,
                target_end,
            ),
            None => (target_start, target_end, target_end, target_end),
        };

    // Decode path/query now, ahead of the protocol and header scans, so a
    // later failure still has a decoded path available to recover.
    let path_len = percent_decode_inplace(&mut buf[path_start..path_end]);
    let query_len = percent_decode_inplace(&mut buf[query_start..query_end]);
    let path = &buf[path_start..path_start + path_len];
    let query = &buf[query_start..query_start + query_len];
    recovered.path = Some(path);

    let proto_rel_end = match memchr(b'\r', buf.get(pos..).unwrap_or(&[])) {
        Some(v) => v,
        None => return Err((HttpError::ProtocolInvalid, recovered)),
    };
    if buf.get(pos + proto_rel_end + 1) != Some(&b'\n') {
        return Err((HttpError::ProtocolInvalid, recovered));
    }
    let version = match Version::from_bytes(&buf[pos..pos + proto_rel_end]) {
        Ok(v) => v,
        Err(err) => return Err((err, recovered)),
    };
    pos += proto_rel_end + 2;

    let mut header_ranges: Vec<(usize, usize, usize, usize)> = Vec::new();
    loop {
        if buf.get(pos) == Some(&b'\r') && buf.get(pos + 1) == Some(&b'\n') {
            pos += 2;
            break;
        }

        let colon_rel = match memchr(b':', buf.get(pos..).unwrap_or(&[])) {
            Some(v) => v,
            None => return Err((HttpError::HeadersEmpty, recovered)),
        };
        let name_start = pos;
        let name_end = pos + colon_rel;
        let mut value_start = name_end + 1;
        if buf.get(value_start) == Some(&b' ') {
            value_start += 1;
        }

        let line_rel = match memchr(b'\r', buf.get(value_start..).unwrap_or(&[])) {
            Some(v) => v,
            None => return Err((HttpError::HeadersEmpty, recovered)),
        };
        if buf.get(value_start + line_rel + 1) != Some(&b'\n') {
            return Err((HttpError::HeadersEmpty, recovered));
        }
        let value_end = value_start + line_rel;

        header_ranges.push((name_start, name_end, value_start, value_end));
        pos = value_end + 2;
    }

    if header_ranges.is_empty() {
        return Err((HttpError::HeadersEmpty, recovered));
    }

    let body_start = pos;

    let headers = header_ranges
        .iter()
        .map(|&(ns, ne, vs, ve)| Header::new(&buf[ns..ne], &buf[vs..ve]))
        .collect();
    let body = &buf[body_start..];

    Ok(Request {
        method,
        version,
        path,
        query,
        headers,
        body,
        origin,
    })
}

/// Decodes `%HH` escapes in place, compacting the result to the front of
/// `s`. Returns the decoded length. Any `%` not followed by two hex digits
/// is passed through unchanged.
fn percent_decode_inplace(s: &mut [u8]) -> usize {
    let mut read = 0;
    let mut write = 0;

    while read < s.len() {
        if s[read] == b'%'
            && read + 2 < s.len()
            && s[read + 1].is_ascii_hexdigit()
            && s[read + 2].is_ascii_hexdigit()
        {
            s[write] = (hex_val(s[read + 1]) << 4) | hex_val(s[read + 2]);
            read += 3;
        } else {
            s[write] = s[read];
            read += 1;
        }
        write += 1;
    }

    write
}

#[inline(always)]
fn hex_val(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn origin() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 9) // discard port, test-only
    }

    #[test]
    fn parses_a_well_formed_get() {
        let mut buf = b"GET /a/b?x=1 HTTP/1.1\r\nHost: x\r\n\r\n".to_vec();
        let req = parse(&mut buf, 2048, origin()).unwrap();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.version, Version::Http11);
        assert_eq!(req.path, b"/a/b");
        assert_eq!(req.query, b"x=1");
        assert_eq!(req.header(b"host"), Some(b"x".as_slice()));
        assert!(req.body.is_empty());
    }

    #[test]
    fn percent_decodes_path_in_place() {
        let mut buf = b"GET /a%20b HTTP/1.1\r\nHost: x\r\n\r\n".to_vec();
        let req = parse(&mut buf, 2048, origin()).unwrap();
        assert_eq!(req.path, b"/a b");
    }

    #[test]
    fn unknown_method_is_method_invalid() {
        let mut buf = b"FROB / HTTP/1.1\r\nHost: x\r\n\r\n".to_vec();
        let (err, recovered) = parse(&mut buf, 2048, origin()).unwrap_err();
        assert_eq!(err, HttpError::MethodInvalid);
        assert_eq!(recovered.method, None);
        assert_eq!(recovered.path, None);
    }

    #[test]
    fn oversized_target_is_uri_too_long() {
        let target = "/".repeat(20);
        let mut buf = format!("GET {target} HTTP/1.1\r\nHost: x\r\n\r\n").into_bytes();
        let (err, recovered) = parse(&mut buf, 10, origin()).unwrap_err();
        assert_eq!(err, HttpError::UriTooLong);
        assert_eq!(recovered.method, Some(Method::Get));
        assert_eq!(recovered.path, None);
    }

    #[test]
    fn non_http11_protocol_is_protocol_invalid() {
        let mut buf = b"GET / HTTP/1.0\r\nHost: x\r\n\r\n".to_vec();
        let (err, recovered) = parse(&mut buf, 2048, origin()).unwrap_err();
        assert_eq!(err, HttpError::ProtocolInvalid);
        assert_eq!(recovered.method, Some(Method::Get));
        assert_eq!(recovered.path, Some(b"/".as_slice()));
    }

    #[test]
    fn zero_headers_is_headers_empty() {
        let mut buf = b"GET / HTTP/1.1\r\n\r\n".to_vec();
        let (err, recovered) = parse(&mut buf, 2048, origin()).unwrap_err();
        assert_eq!(err, HttpError::HeadersEmpty);
        assert_eq!(recovered.method, Some(Method::Get));
        assert_eq!(recovered.path, Some(b"/".as_slice()));
    }

    #[test]
    fn protocol_invalid_recovers_the_percent_decoded_path_for_logging() {
        let mut buf = b"GET /a%20b HTTP/1.0\r\nHost: x\r\n\r\n".to_vec();
        let (err, recovered) = parse(&mut buf, 2048, origin()).unwrap_err();
        assert_eq!(err, HttpError::ProtocolInvalid);
        assert_eq!(recovered.path, Some(b"/a b".as_slice()));
    }

    #[test]
    fn body_follows_the_blank_line() {
        let mut buf = b"POST /submit HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello".to_vec();
        let req = parse(&mut buf, 2048, origin()).unwrap();
        assert_eq!(req.body, b"hello");
    }

    #[test]
    fn percent_decoding_is_idempotent_on_plain_paths() {
        let mut a = b"/already/plain/path".to_vec();
        let mut b = a.clone();
        let la = percent_decode_inplace(&mut a);
        let lb = percent_decode_inplace(&mut b[..la]);
        assert_eq!(&a[..la], &b[..lb]);
    }
}
