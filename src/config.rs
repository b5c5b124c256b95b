//! Typed, validated server configuration.
//!
//! A single [`Config`] is built once at startup from CLI arguments plus
//! compiled-in defaults, wrapped in `Arc` by the caller, and never mutated
//! again. Every other component reads its tunables from here instead of
//! reaching for a free-standing constant, so tests can exercise non-default
//! limits without recompiling.

use crate::errors::ServerError;
use std::path::PathBuf;

/// `MAX_THREADS` from the original design: fixed worker pool size.
pub const DEFAULT_WORKER_COUNT: usize = 50;
/// `MAX_CONNECTIONS`: the listen backlog.
pub const DEFAULT_BACKLOG: i32 = 50;
/// Initial blocking read size for a request.
pub const DEFAULT_PAGE_SIZE: usize = 4096;
/// Hard ceiling on a single request's size, ~50 MiB.
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 50 * 1024 * 1024;
/// Hard ceiling on the request-target length.
pub const DEFAULT_MAX_URL_SIZE: usize = 2048;
/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: std::net::IpAddr,
    pub port: u16,
    pub public_root: PathBuf,
    pub default_root: PathBuf,
    pub log_path: PathBuf,
    pub worker_count: usize,
    pub backlog: i32,
    pub max_request_size: usize,
    pub page_size: usize,
    pub max_url_size: usize,
}

impl Config {
    /// Builds and validates a `Config` from parsed CLI arguments.
    ///
    /// This is the only place configuration is checked: every other
    /// component trusts the values it is handed.
    pub fn from_cli(cli: crate::cli::Cli) -> Result<Self, ServerError> {
        let port = cli.port.or(cli.positional_port).unwrap_or(DEFAULT_PORT);
        let public_root = cli.root.unwrap_or_else(|| PathBuf::from("www"));
        let default_root = cli.default_root.unwrap_or_else(|| PathBuf::from("default"));
        let log_path = cli.log.unwrap_or_else(|| PathBuf::from("log/requests.txt"));
        let worker_count = cli.workers.unwrap_or(DEFAULT_WORKER_COUNT);

        if worker_count == 0 {
            return Err(ServerError::Config(
                "worker count must be at least 1".into(),
            ));
        }
        if !public_root.is_dir() {
            return Err(ServerError::PublicRootMissing(public_root));
        }

        Ok(Config {
            bind_addr: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            port,
            public_root,
            default_root,
            log_path,
            worker_count,
            backlog: DEFAULT_BACKLOG,
            max_request_size: DEFAULT_MAX_REQUEST_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
            max_url_size: DEFAULT_MAX_URL_SIZE,
        })
    }

    pub fn socket_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::new(self.bind_addr, self.port)
    }

    /// A minimal config pointed at a throwaway temp directory, for unit
    /// tests that only need `Config` to exist, not to serve real files.
    #[cfg(test)]
    pub fn for_test() -> Self {
        Config {
            bind_addr: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            port: 0,
            public_root: std::env::temp_dir(),
            default_root: std::env::temp_dir(),
            log_path: std::env::temp_dir().join("filehttpd-test.log"),
            worker_count: 1,
            backlog: DEFAULT_BACKLOG,
            max_request_size: DEFAULT_MAX_REQUEST_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
            max_url_size: DEFAULT_MAX_URL_SIZE,
        }
    }
}
