use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use meta_config::MetaConfig;

mod cli;
mod commands;
mod context;
mod documents;
mod output;

use cli::{Commands, OutputFormat, SchemaCommands};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(error) => {
            eprintln!("metaedit error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<bool> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let mut flags = cli.global_flags();
    if let Commands::Schema {
        action: SchemaCommands::Output { name },
    } = &cli.command
    {
        return commands::schema::handle_output(name.as_deref(), &flags);
    }

    let config = MetaConfig::load_with_dotenv().context("failed to load metaedit configuration")?;
    if !config.general.pretty && flags.format == OutputFormat::Json {
        flags.format = OutputFormat::Raw;
    }

    let ctx = context::AppContext::init(&config, &flags)?;
    commands::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("METAEDIT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
