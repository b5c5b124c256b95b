//! End-to-end exercises of the parse → resolve → build → serialize
//! pipeline, run directly against the public API rather than through a
//! live socket.

use filehttpd::config::Config;
use filehttpd::http::request;
use filehttpd::http::response;
use filehttpd::resolver::{self, Artifact};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tempfile::tempdir;

fn origin() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
}

fn config_for(public_root: std::path::PathBuf, default_root: std::path::PathBuf) -> Config {
    Config {
        bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        public_root,
        default_root,
        log_path: std::env::temp_dir().join("filehttpd-integration-test.log"),
        worker_count: 1,
        backlog: 1,
        max_request_size: 1024 * 1024,
        page_size: 4096,
        max_url_size: 2048,
    }
}

fn serve(raw: &[u8], config: &Config) -> (u16, Vec<(String, String)>, Vec<u8>) {
    let mut buf = raw.to_vec();
    let response = match request::parse(&mut buf, config.max_url_size, origin()) {
        Ok(req) => {
            let artifact = resolver::resolve(&req, &config.public_root, &config.default_root);
            response::build(artifact, config, false)
        }
        Err((err, _recovered)) => response::build(Artifact::Error(err.status_code()), config, false),
    };
    (response.status.as_u16(), response.headers.clone(), response.body.clone())
}

fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[test]
fn scenario_1_index_file_is_served_as_200() {
    let root = tempdir().unwrap();
    let default = tempdir().unwrap();
    std::fs::write(root.path().join("index.html"), b"hi").unwrap();
    let config = config_for(root.path().to_path_buf(), default.path().to_path_buf());

    let (status, headers, body) = serve(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n", &config);

    assert_eq!(status, 200);
    assert_eq!(header(&headers, "Content-Type"), Some("text/html"));
    assert_eq!(header(&headers, "Content-Length"), Some("2"));
    assert_eq!(body, b"hi");
}

#[test]
fn scenario_2_missing_file_is_404_with_template_body() {
    let root = tempdir().unwrap();
    let default = tempdir().unwrap();
    std::fs::write(default.path().join("404.html"), b"not here").unwrap();
    let config = config_for(root.path().to_path_buf(), default.path().to_path_buf());

    let (status, _headers, body) = serve(b"GET /nope HTTP/1.1\r\nHost:x\r\n\r\n", &config);

    assert_eq!(status, 404);
    assert_eq!(body, b"not here");
}

#[test]
fn scenario_3_unsupported_method_is_501() {
    let root = tempdir().unwrap();
    let default = tempdir().unwrap();
    std::fs::write(default.path().join("501.html"), b"nope").unwrap();
    let config = config_for(root.path().to_path_buf(), default.path().to_path_buf());

    let (status, _headers, body) = serve(b"DELETE / HTTP/1.1\r\nHost:x\r\n\r\n", &config);

    assert_eq!(status, 501);
    assert_eq!(body, b"nope");
}

#[test]
fn scenario_4_wrong_protocol_version_is_505() {
    let root = tempdir().unwrap();
    let default = tempdir().unwrap();
    std::fs::write(default.path().join("505.html"), b"bad version").unwrap();
    let config = config_for(root.path().to_path_buf(), default.path().to_path_buf());

    let (status, _headers, body) = serve(b"GET / HTTP/1.0\r\nHost:x\r\n\r\n", &config);

    assert_eq!(status, 505);
    assert_eq!(body, b"bad version");
}

#[test]
fn scenario_5_moved_rule_yields_301_with_location_and_empty_body() {
    let root = tempdir().unwrap();
    let default = tempdir().unwrap();
    std::fs::write(default.path().join(".moved"), "/old /new\n").unwrap();
    let config = config_for(root.path().to_path_buf(), default.path().to_path_buf());

    let (status, headers, body) = serve(b"GET /old HTTP/1.1\r\nHost:x\r\n\r\n", &config);

    assert_eq!(status, 301);
    assert_eq!(header(&headers, "Location"), Some("/new"));
    assert!(body.is_empty());
}

#[test]
fn scenario_6_percent_encoded_path_resolves_to_the_decoded_file() {
    let root = tempdir().unwrap();
    let default = tempdir().unwrap();
    std::fs::write(root.path().join("a b"), b"spaced").unwrap();
    let config = config_for(root.path().to_path_buf(), default.path().to_path_buf());

    let (status, _headers, body) = serve(b"GET /a%20b HTTP/1.1\r\nHost:x\r\n\r\n", &config);

    assert_eq!(status, 200);
    assert_eq!(body, b"spaced");
}

#[test]
fn directory_listing_omits_dot_and_pins_dotdot_first_when_not_at_the_root() {
    let root = tempdir().unwrap();
    let default = tempdir().unwrap();
    std::fs::write(default.path().join("directory.html"), b"<html>").unwrap();
    std::fs::create_dir(root.path().join("sub")).unwrap();
    std::fs::write(root.path().join("sub").join("file.txt"), b"x").unwrap();
    let config = config_for(root.path().to_path_buf(), default.path().to_path_buf());

    let (status, _headers, body) = serve(b"GET /sub HTTP/1.1\r\nHost:x\r\n\r\n", &config);
    let body = String::from_utf8(body).unwrap();

    assert_eq!(status, 200);
    assert!(body.starts_with("<html>"));
    let dotdot_pos = body.find("d(\"..\"").expect("expected a `..` entry");
    let file_pos = body.find("f(\"file.txt\"").expect("expected file.txt listed");
    assert!(dotdot_pos < file_pos, "`..` must be pinned first");
    assert!(!body.contains("d(\".\","));
}

#[test]
fn directory_listing_at_the_public_root_has_no_dotdot_entry() {
    let root = tempdir().unwrap();
    let default = tempdir().unwrap();
    std::fs::write(default.path().join("directory.html"), b"<html>").unwrap();
    std::fs::write(root.path().join("file.txt"), b"x").unwrap();
    let config = config_for(root.path().to_path_buf(), default.path().to_path_buf());

    let (status, _headers, body) = serve(b"GET / HTTP/1.1\r\nHost:x\r\n\r\n", &config);
    let body = String::from_utf8(body).unwrap();

    assert_eq!(status, 200);
    assert!(!body.contains("d(\"..\""));
}

#[test]
fn redirect_rule_shadows_an_existing_file_at_the_same_path() {
    let root = tempdir().unwrap();
    let default = tempdir().unwrap();
    std::fs::write(root.path().join("old"), b"shadowed content").unwrap();
    std::fs::write(default.path().join(".moved"), "/old /elsewhere\n").unwrap();
    let config = config_for(root.path().to_path_buf(), default.path().to_path_buf());

    let (status, headers, body) = serve(b"GET /old HTTP/1.1\r\nHost:x\r\n\r\n", &config);

    assert_eq!(status, 301);
    assert_eq!(header(&headers, "Location"), Some("/elsewhere"));
    assert!(body.is_empty());
}
