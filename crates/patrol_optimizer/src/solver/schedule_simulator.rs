use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{Level, debug, info, instrument};

use crate::problem::{
    configuration_error::ConfigurationError, patrol_problem::PatrolProblem,
    travel_time_matrix::TravelTimeMatrix,
};

use super::{
    location_state::LocationState,
    route::Route,
    route_builder::RouteBuilder,
    schedule::Schedule,
    schedule_table::ScheduleTable,
    selection_strategy::SelectionStrategy,
    simulation_params::{ProcessingOrder, SimulationParams},
};

/// Runs the constructive heuristic: one route per (shift, vehicle) pair over a
/// shared location state.
pub struct ScheduleSimulator<'a> {
    problem: &'a PatrolProblem,
    params: SimulationParams,
}

impl<'a> ScheduleSimulator<'a> {
    pub fn new(
        problem: &'a PatrolProblem,
        params: SimulationParams,
    ) -> Result<Self, ConfigurationError> {
        params.validate()?;
        Ok(ScheduleSimulator { problem, params })
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Runs once with an RNG seeded from `random_seed`.
    pub fn run(&self) -> Schedule {
        let mut rng = SmallRng::seed_from_u64(self.params.random_seed);
        self.run_with_rng(&mut rng)
    }

    /// Samples the travel times of this run, then simulates on them.
    pub fn run_with_rng<R>(&self, rng: &mut R) -> Schedule
    where
        R: Rng,
    {
        let (travel_times, fluctuated) = self
            .problem
            .network()
            .sample_travel_times(self.params.fluctuation_probability, rng);

        if fluctuated {
            info!("Fluctuating travel times for this run");
        } else {
            info!("Keeping travel times constant for this run");
        }

        self.simulate(&travel_times, rng)
    }

    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn simulate<R>(&self, travel_times: &TravelTimeMatrix, rng: &mut R) -> Schedule
    where
        R: Rng,
    {
        simulate_schedule(
            self.problem,
            travel_times,
            self.params.selection_strategy,
            self.params.processing_order,
            rng,
        )
    }
}

pub(crate) fn simulate_schedule<R>(
    problem: &PatrolProblem,
    travel_times: &TravelTimeMatrix,
    strategy: SelectionStrategy,
    order: ProcessingOrder,
    rng: &mut R,
) -> Schedule
where
    R: Rng,
{
    let builder = RouteBuilder::new(problem, travel_times, strategy);
    let mut state = LocationState::new(problem.num_locations());
    let mut routes: ScheduleTable<Route> =
        ScheduleTable::new(problem.shift_count(), problem.vehicle_count());
    let mut shifts = ScheduleTable::new(problem.shift_count(), problem.vehicle_count());

    for (shift_index, vehicle) in order.pairs(problem.shift_count(), problem.vehicle_count()) {
        let previous_route = shift_index
            .get()
            .checked_sub(1)
            .map(|previous| routes.get(previous.into(), vehicle));
        let shift = problem.shift_window(shift_index, previous_route);

        let route = builder.build_route(&shift, vehicle, &mut state, rng);

        debug!(
            "Vehicle {} shift {} [{} - {}]: {} stops",
            vehicle,
            shift_index,
            shift.start_time(),
            shift.end_time(),
            route.len()
        );

        routes.set(shift_index, vehicle, route);
        shifts.set(shift_index, vehicle, shift);
    }

    let distinct_locations_visited = state.distinct_locations_visited();
    let total_visits = state.total_visits();

    Schedule::new(
        routes,
        shifts,
        state.into_records(),
        distinct_locations_visited,
        total_visits,
        problem.depot(),
    )
}
