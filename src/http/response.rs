//! Builds a serialised HTTP/1.1 response from a resolved [`crate::resolver::Artifact`].
//!
//! One `Response` is built per request and dropped immediately after being
//! written to the socket. Headers are accumulated in insertion order
//! because the wire format is order-sensitive only insofar as the status
//! line must come first and the blank line must come last — header order
//! itself is not meaningful, but tests rely on `Content-Type`/`Content-Length`
//! being present, so insertion order is kept deterministic rather than
//! sorted for its own sake.

use crate::config::Config;
use crate::http::types::StatusCode;
use crate::resolver::Artifact;
use chrono::Utc;
use std::fs;
use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;

const SERVER_BANNER: &str = concat!("filehttpd/", env!("CARGO_PKG_VERSION"));

/// A fully-built HTTP/1.1 response, ready for [`serialize`].
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    fn new(status: StatusCode) -> Self {
        let mut headers = Vec::with_capacity(4);
        headers.push(("Connection".into(), "close".into()));
        headers.push(("Server".into(), SERVER_BANNER.into()));
        headers.push(("Date".into(), http_date_now()));
        Response {
            status,
            headers,
            body: Vec::new(),
        }
    }

    fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_owned(), value.into()));
        self
    }

    fn body(mut self, body: Vec<u8>) -> Self {
        self.headers
            .push(("Content-Length".into(), body.len().to_string()));
        self.body = body;
        self
    }
}

/// RFC 1123 `Date` header value, e.g. `Tue, 15 Nov 1994 08:12:31 GMT`.
fn http_date_now() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Builds the response for a resolved artifact.
///
/// `head` suppresses the body (the request method was `HEAD`) while still
/// reporting the `Content-Length` the body would have had.
pub fn build(artifact: Artifact, config: &Config, head: bool) -> Response {
    let response = match artifact {
        Artifact::Moved(destination) => Response::new(StatusCode::MovedPermanently)
            .header("Location", destination)
            .body(Vec::new()),
        Artifact::File(path) => match file_view(StatusCode::Ok, &path) {
            Ok(resp) => resp,
            Err(err) => {
                log::warn!("failed to read {path:?}: {err}");
                error_view(StatusCode::InternalServerError, config)
            }
        },
        Artifact::Directory(dir) => directory_view(dir, config),
        Artifact::Error(status) => error_view(status, config),
    };

    if head {
        strip_body_keep_length(response)
    } else {
        response
    }
}

fn strip_body_keep_length(mut response: Response) -> Response {
    response.body.clear();
    response
}

fn file_view(status: StatusCode, path: &Path) -> io::Result<Response> {
    let bytes = fs::read(path)?;
    let content_type = mime_for(path);
    Ok(Response::new(status)
        .header("Content-Type", content_type)
        .body(bytes))
}

fn error_view(status: StatusCode, config: &Config) -> Response {
    let path = config.default_root.join(status.default_template());
    match file_view(status, &path) {
        Ok(resp) => resp,
        // Missing template on disk still must not drop the connection:
        // fall back to an empty body carrying the right status and length.
        Err(_) => Response::new(status)
            .header("Content-Type", "text/html")
            .body(Vec::new()),
    }
}

fn directory_view(dir: std::path::PathBuf, config: &Config) -> Response {
    let index = dir.join("index.html");
    if index.is_file() {
        return match file_view(StatusCode::Ok, &index) {
            Ok(resp) => resp,
            Err(err) => {
                log::warn!("failed to read {index:?}: {err}");
                error_view(StatusCode::InternalServerError, config)
            }
        };
    }

    let template_path = config.default_root.join("directory.html");
    let mut body = fs::read(&template_path).unwrap_or_default();

    let is_public_root = dir == config.public_root;
    body.extend_from_slice(&listing_script(&dir, is_public_root));

    Response::new(StatusCode::Ok)
        .header("Content-Type", "text/html")
        .body(body)
}

/// Builds the `<script>d(...)</script>` / `<script>f(...)</script>` lines
/// for every entry in `dir`, `..` pinned first unless `dir` is the public
/// root.
fn listing_script(dir: &Path, is_public_root: bool) -> Vec<u8> {
    let mut out = Vec::new();

    if !is_public_root {
        out.extend_from_slice(b"<script>d(\"..\", 0);</script>\n");
    }

    let Ok(entries) = fs::read_dir(dir) else {
        return out;
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name == "." || name == ".." {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let mtime = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0);

        if metadata.is_dir() {
            out.extend_from_slice(format!("<script>d(\"{name}\", {mtime});</script>\n").as_bytes());
        } else if metadata.is_file() {
            let size = metadata.len();
            out.extend_from_slice(
                format!("<script>f(\"{name}\", {mtime}, {size});</script>\n").as_bytes(),
            );
        }
    }

    out
}

/// Extension → MIME type, per the fixed table below. Anything else maps
/// to `application/octet-stream`.
fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") => "text/html",
        Some("txt") => "text/plain",
        Some("jpe") | Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Serialises a response to the exact wire bytes.
pub fn serialize(response: &Response) -> Vec<u8> {
    let mut out = Vec::with_capacity(128 + response.body.len());
    out.extend_from_slice(b"HTTP/1.1 ");
    out.extend_from_slice(response.status.as_u16().to_string().as_bytes());
    out.push(b' ');
    out.extend_from_slice(response.status.reason_phrase().as_bytes());
    out.extend_from_slice(b"\r\n");

    for (name, value) in &response.headers {
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(b": ");
        out.extend_from_slice(value.as_bytes());
        out.extend_from_slice(b"\r\n");
    }

    out.extend_from_slice(b"\r\n");
    out.extend_from_slice(&response.body);
    out
}
