use anyhow::{Context, Result};
use clap::Parser;
use cli::args::{Cli, Commands};
use cli::registry::{self, Invocation};
use migrator_core::config;
use std::fs::File;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // stdout carries the manifest; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let registry = registry::builtin();

    if let Commands::ListCommands = cli.command {
        for (name, synopsis) in registry.list() {
            println!("{name:<30} {synopsis}");
        }
        return Ok(());
    }

    let mut cfg = config::load(cli.config.as_deref()).context("loading settings")?;
    cli.command.apply_overrides(&mut cfg);

    let handler = registry.get(cli.command.name())?;
    let input: Box<dyn Read + Send> = match cli.command.input_path() {
        Some(path) if path != "-" => {
            Box::new(File::open(path).with_context(|| format!("opening {path}"))?)
        }
        _ => Box::new(io::stdin()),
    };
    let mut stdout = io::stdout();

    handler
        .execute(Invocation {
            config: &cfg,
            format: cli.output.into(),
            input,
            output: &mut stdout,
        })
        .await
}
