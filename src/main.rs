use std::{fs::File, io, path::PathBuf, process};
#[macro_use]
extern crate log;

use anyhow::Context;
use clap::Parser;

mod features;
use features::{replay, write_summary, AccountRegistry, Console, SummaryFormat};

/// Savings and current accounts, kept in memory for one session
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Cli {
    /// Replay a CSV batch of operations instead of starting the interactive menu
    #[clap(short, long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Print every account once the session ends
    #[clap(long, value_enum)]
    summary: Option<SummaryFormat>,
}

fn main() {
    env_logger::init();
    if let Err(e) = run(Cli::parse()) {
        error!("{e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<AccountRegistry> {
    let mut registry = AccountRegistry::new();

    match cli.script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("Unable to open script {}", path.display()))?;
            let stats = replay(file, &mut registry)?;
            println!(
                "Applied {} operations, {} rejected",
                stats.applied, stats.rejected
            );
        }
        None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            Console::new(stdin.lock(), stdout.lock()).run(&mut registry)?;
        }
    }

    if let Some(format) = cli.summary {
        write_summary(format, &registry, io::stdout().lock())?;
    }

    Ok(registry)
}
