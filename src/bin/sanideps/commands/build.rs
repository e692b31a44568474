//! `sanideps build` command

use std::path::Path;

use anyhow::Result;

use crate::cli::BuildArgs;
use sanideps::core::{BuildConfig, BuildOptions};
use sanideps::sources::HttpFetcher;
use sanideps::util::config::load_config;
use sanideps::util::SystemRunner;
use sanideps::BuildOrchestrator;

pub fn execute(args: BuildArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    // CLI > config file
    let mut options = config.build;
    options.merge(BuildOptions {
        prefix: args.prefix,
        cc: args.cc,
        cflags: args.cflags,
        ldflags: args.ldflags,
        makeopts: args.makeopts,
        openssl_dir: args.openssldir,
        workspace_root: args.workdir,
    });

    let build_config = BuildConfig::try_from(options)?;

    let runner = SystemRunner;
    let fetcher = HttpFetcher::new();
    let report = BuildOrchestrator::new(&runner, &fetcher).run(&build_config)?;

    println!();
    for dep in &report.dependencies {
        println!("    Installed {} v{}", dep.name, dep.version);
        for removed in &dep.removed {
            println!("      removed {}", removed.display());
        }
    }
    if let Some(ref cert_dir) = report.cert_dir {
        println!("    Certificate store: {}", cert_dir.display());
    }
    if !report.shared_libraries.is_empty() {
        println!("\nShared libraries in {}:", report.prefix.join("lib").display());
        for lib in &report.shared_libraries {
            println!("  - {}", lib.display());
        }
    }

    Ok(())
}
