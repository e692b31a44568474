//! sanideps CLI - sanitizer-instrumented builds of native dependencies

use anyhow::Result;
use clap::Parser;
use sanideps::BuildError;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        if let Some(help) = e
            .chain()
            .find_map(|cause| cause.downcast_ref::<BuildError>())
            .and_then(BuildError::help_text)
        {
            eprintln!("help: {}", help);
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("sanideps=debug")
    } else {
        EnvFilter::new("sanideps=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Build(args) => commands::build::execute(args, config_path),
        Commands::CliTest(args) => commands::cli_test::execute(args, config_path),
    }
}
