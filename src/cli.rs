//! Command-line surface.
//!
//! Keeps the historical `<program> [port]` invocation working as a bare
//! positional argument while adding named flags for everything else a
//! deployable binary needs to be configurable without editing source.

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "filehttpd", version, about = "A small static-content HTTP/1.1 server")]
pub struct Cli {
    /// Listen port (positional form, kept for drop-in compatibility).
    #[arg(value_name = "PORT")]
    pub positional_port: Option<u16>,

    /// Listen port.
    #[arg(long)]
    pub port: Option<u16>,

    /// Public document root.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Directory holding status-page templates, `directory.html` and `.moved`.
    #[arg(long = "default-root", value_name = "DIR")]
    pub default_root: Option<PathBuf>,

    /// Access log path.
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Worker thread count.
    #[arg(long)]
    pub workers: Option<usize>,
}
