use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use patrol_optimizer::{
    parsers::heuristic_seeds::HeuristicSeeds,
    solver::{
        genetic::{
            genetic_params::{Termination, Threads},
            genetic_scheduler::GeneticScheduler,
        },
        result_summary::GeneticSummary,
    },
    timed,
};
use tracing::info;

use crate::{
    config::{ConfigArgs, load_with_overrides},
    output, parsers,
};

#[derive(Args)]
pub struct EvolveArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Heuristic result file used to seed the initial population
    #[arg(long)]
    seed_file: Option<PathBuf>,

    /// Number of worker threads, 0 for one per core
    #[arg(short, long)]
    threads: Option<usize>,

    /// Stops the search after this long (e.g., "30s", "5m", "PT1H30M")
    #[arg(long, value_parser = parsers::parse_duration)]
    time_limit: Option<jiff::SignedDuration>,
}

pub fn run(args: EvolveArgs) -> Result<(), anyhow::Error> {
    let config = load_with_overrides(&args.config)?;
    let problem = config.build_problem()?;

    let mut params = config.genetic_params()?;
    if let Some(threads) = args.threads {
        params.threads = match threads {
            0 => Threads::Auto,
            1 => Threads::Single,
            threads => Threads::Multi(threads),
        };
    }
    if let Some(time_limit) = args.time_limit {
        params.terminations.push(Termination::Duration(time_limit));
    }

    let max_generations = params
        .terminations
        .iter()
        .find_map(|termination| match termination {
            Termination::Generations(generations) => Some(*generations),
            _ => None,
        })
        .unwrap_or_default();

    let mut scheduler = GeneticScheduler::new(problem, params)?;

    if let Some(seed_file) = &args.seed_file {
        let content = std::fs::read_to_string(seed_file)
            .with_context(|| format!("failed to read seed file {}", seed_file.display()))?;
        let seeds = HeuristicSeeds::parse(&content);
        info!("Loaded {} heuristic seeds from {:?}", seeds.len(), seed_file);
        scheduler.set_heuristic_seeds(seeds);
    }

    let bar = ProgressBar::new(max_generations as u64);
    bar.set_style(
        ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} generations {msg}")?,
    );
    let generation_bar = bar.clone();
    scheduler.on_generation(move |statistics| {
        generation_bar.inc(1);
        generation_bar.set_message(format!(
            "best {} (mutation {:.2})",
            statistics.best_ever_fitness, statistics.mutation_rate
        ));
    });

    let (result, elapsed) = timed!(scheduler.run());
    bar.finish_and_clear();

    info!(
        "Stopped after {} generations: {:?}",
        result.generations_run(),
        result.termination_reason
    );

    let problem = scheduler.problem();
    if args.config.table {
        println!(
            "{}",
            output::routes_table(result.best.routes(), problem.depot())
        );
    }
    if args.config.json {
        println!("{}", output::routes_json(result.best.routes())?);
    }

    let summary = GeneticSummary::from_result(problem, &result, Some(elapsed));
    print!("{summary}");

    Ok(())
}
