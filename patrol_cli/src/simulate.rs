use clap::Args;
use patrol_optimizer::{
    solver::{result_summary::ResultSummary, schedule_simulator::ScheduleSimulator},
    timed,
};
use tracing::info;

use crate::{
    config::{ConfigArgs, load_with_overrides},
    output,
};

#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Prints the per-vehicle route and timing report
    #[arg(long)]
    detailed: bool,
}

pub fn run(args: SimulateArgs) -> Result<(), anyhow::Error> {
    let config = load_with_overrides(&args.config)?;
    let problem = config.build_problem()?;
    let simulator = ScheduleSimulator::new(&problem, config.simulation_params()?)?;

    info!(
        "Simulating {} vehicles over {} shifts and {} locations",
        problem.vehicle_count(),
        problem.shift_count(),
        problem.location_count()
    );

    let (schedule, elapsed) = timed!(simulator.run());

    if args.detailed {
        print!("{schedule}");
    }
    if args.config.table {
        println!("{}", output::routes_table(schedule.routes(), problem.depot()));
    }
    if args.config.json {
        println!("{}", output::routes_json(schedule.routes())?);
    }

    let summary = ResultSummary::from_schedules(&problem, std::slice::from_ref(&schedule), Some(elapsed));
    print!("{summary}");

    Ok(())
}
