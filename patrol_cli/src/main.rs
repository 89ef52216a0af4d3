use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{evolve::EvolveArgs, simulate::SimulateArgs};

mod config;
mod evolve;
mod output;
mod parsers;
mod simulate;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs the constructive heuristic once
    #[command(visible_alias = "s")]
    Simulate {
        #[command(flatten)]
        args: SimulateArgs,
    },
    /// Runs the genetic scheduler once
    #[command(visible_alias = "e")]
    Evolve {
        #[command(flatten)]
        args: EvolveArgs,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Simulate { args } => simulate::run(args)?,
        Commands::Evolve { args } => evolve::run(args)?,
    }

    Ok(())
}
