//! Maps a parsed request to a response artifact.
//!
//! Order is pinned redirect-first, then filesystem: a rule in
//! `default/.moved` shadows an existing file at the same path. Path
//! traversal is intentionally left unguarded; hardening it is out of
//! scope here.

use crate::http::request::Request;
use crate::http::types::{Method, StatusCode};
use std::fs;
use std::path::{Path, PathBuf};

/// What the response builder should produce for a given request.
pub enum Artifact {
    File(PathBuf),
    Directory(PathBuf),
    /// Redirect destination, verbatim from `default/.moved`.
    Moved(String),
    Error(StatusCode),
}

/// Resolves a request against `public_root`/`default_root`, in the fixed
/// order: method check, then redirect rules, then the filesystem.
pub fn resolve(req: &Request, public_root: &Path, default_root: &Path) -> Artifact {
    if !matches!(req.method, Method::Get | Method::Post) {
        return Artifact::Error(StatusCode::NotImplemented);
    }

    if let Some(destination) = lookup_redirect(req.path, default_root) {
        return Artifact::Moved(destination);
    }

    let candidate = join_public_path(public_root, req.path);
    match fs::metadata(&candidate) {
        Ok(meta) if meta.is_file() => Artifact::File(candidate),
        Ok(meta) if meta.is_dir() => Artifact::Directory(candidate),
        _ => Artifact::Error(StatusCode::NotFound),
    }
}

/// Joins a request path onto the public root. The leading `/` is stripped
/// so `Path::join` doesn't treat it as an absolute-path replacement.
fn join_public_path(public_root: &Path, request_path: &[u8]) -> PathBuf {
    let relative = request_path.strip_prefix(b"/").unwrap_or(request_path);
    let relative = String::from_utf8_lossy(relative);
    public_root.join(relative.as_ref())
}

/// Reads whitespace-separated `(origin destination)` pairs from
/// `default_root/.moved` and returns the destination for `path`, if any.
/// A missing file is not an error: it simply yields no rules.
fn lookup_redirect(path: &[u8], default_root: &Path) -> Option<String> {
    let contents = fs::read_to_string(default_root.join(".moved")).ok()?;
    let path = std::str::from_utf8(path).ok()?;

    let mut tokens = contents.split_whitespace();
    while let (Some(origin), Some(destination)) = (tokens.next(), tokens.next()) {
        if origin == path {
            return Some(destination.to_owned());
        }
    }
    None
}
