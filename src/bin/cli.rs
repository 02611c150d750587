//! Binary entry point for the Cypher query CLI.
#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sombra_cypher::{
    cli::{
        config::{default_config_path, CliConfig},
        render::{run_render, CliError, RenderConfig},
        OutputFormat,
    },
    query::{BuilderOptions, PropertyOrder},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "cli",
    version,
    about = "Render parameterized Cypher queries from query documents",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "SOMBRA_CYPHER_CONFIG",
        value_name = "FILE",
        help = "Config file (defaults to the user config directory)"
    )]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a query document and print the query with its parameters.
    Render(RenderCmd),
    /// Print the default config file location.
    ConfigPath,
}

#[derive(Args, Debug)]
struct RenderCmd {
    #[arg(value_name = "DOCUMENT", help = "Query document (.toml or .json)")]
    document: PathBuf,

    #[arg(long, value_enum, help = "Output format (overrides config)")]
    format: Option<OutputFormat>,

    #[arg(long, help = "Render properties and SET updates sorted by key")]
    sorted: bool,

    #[arg(long, value_name = "N", help = "Fail when more than N parameters are bound")]
    max_parameters: Option<usize>,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("error: {}", err.report());
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    match cli.command {
        Command::Render(cmd) => {
            let config = CliConfig::load(cli.config)?;
            let cfg = RenderConfig {
                options: build_options(config.builder_options(), &cmd),
                format: cmd
                    .format
                    .or_else(|| config.default_format())
                    .unwrap_or_default(),
                document: cmd.document,
            };
            println!("{}", run_render(&cfg)?);
        }
        Command::ConfigPath => match cli.config.or_else(default_config_path) {
            Some(path) => println!("{}", path.display()),
            None => return Err(CliError::NoConfigDir),
        },
    }
    Ok(())
}

fn build_options(base: &BuilderOptions, cmd: &RenderCmd) -> BuilderOptions {
    let mut opts = base.clone();
    if cmd.sorted {
        opts = opts.property_order(PropertyOrder::Sorted);
    }
    if let Some(max) = cmd.max_parameters {
        opts = opts.max_parameters(max);
    }
    opts
}
