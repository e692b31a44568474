//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// sanideps - build sanitizer-instrumented OpenSSL and libyaml from source
#[derive(Parser)]
#[command(name = "sanideps")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to ~/.sanideps/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch, build and install the dependencies into a prefix
    Build(BuildArgs),

    /// Check a runtime install's command-line tools
    CliTest(CliTestArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Installation prefix
    #[arg(long, env = "SANIDEPS_PREFIX", value_name = "DIR")]
    pub prefix: Option<PathBuf>,

    /// C compiler, passed to configure as CC=
    #[arg(long)]
    pub cc: Option<String>,

    /// Compile flags, passed to configure as CFLAGS=
    #[arg(long, allow_hyphen_values = true)]
    pub cflags: Option<String>,

    /// Link flags, passed to configure as LDFLAGS=
    #[arg(long, allow_hyphen_values = true)]
    pub ldflags: Option<String>,

    /// Extra make arguments, shell-quoted (e.g. "-j8 V=1")
    #[arg(long, allow_hyphen_values = true)]
    pub makeopts: Option<String>,

    /// Certificate store directory for OpenSSL (skips `openssl version -d`)
    #[arg(long, value_name = "DIR")]
    pub openssldir: Option<PathBuf>,

    /// Parent directory for the temporary build workspace
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,
}

#[derive(Args)]
pub struct CliTestArgs {
    /// Runtime executable to query for its bindir and description
    #[arg(long)]
    pub runtime: Option<String>,

    /// Directory holding the runtime's tools
    #[arg(long, value_name = "DIR")]
    pub bindir: Option<PathBuf>,

    /// Expected output of `<runtime> -v`
    #[arg(long)]
    pub description: Option<String>,

    /// Output format: human or json
    #[arg(long, default_value = "human")]
    pub format: String,
}
