mod cmd_filter;
mod cmd_flatten;
mod cmd_reverse;
mod cmd_validate;
mod io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "leafpath")]
#[command(about = "Flatten XML into value/path lines, reverse them, and filter by path")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Flatten an XML document into `value : path` lines
    Flatten {
        /// Input file (reads from stdin if not provided or `-`)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        policy: cmd_flatten::PolicyArgs,

        /// Walk the tree with an explicit stack instead of recursion
        #[arg(long)]
        iterative: bool,
    },
    /// Rebuild JSON records from `value : path` lines
    Reverse {
        /// Input file (reads from stdin if not provided or `-`)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit one nested object instead of a flat record list
        #[arg(long)]
        nested: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Keep only the lines whose path appears in a path list, or whose key matches
    Filter {
        /// Input file of `value : path` lines
        #[arg(short, long)]
        input: PathBuf,

        /// File listing wanted paths, one per line
        #[arg(long, required_unless_present = "key")]
        paths: Option<PathBuf>,

        /// Keep records whose last path segment is NAME
        #[arg(long, value_name = "NAME")]
        key: Option<String>,

        /// Compare paths with indexes and predicates removed
        #[arg(long)]
        loose: bool,

        /// Output file (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check that an XML document parses
    Validate {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "leafpath=debug" } else { "leafpath=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Flatten {
            input,
            output,
            policy,
            iterative,
        } => cmd_flatten::run(input, output, policy, iterative),
        Commands::Reverse {
            input,
            output,
            nested,
            pretty,
        } => cmd_reverse::run(input, output, nested, pretty),
        Commands::Filter {
            input,
            paths,
            key,
            loose,
            output,
        } => cmd_filter::run(input, paths, key, loose, output),
        Commands::Validate { input } => cmd_validate::run(input),
    }
}
