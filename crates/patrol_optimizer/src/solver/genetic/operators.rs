use rand::{Rng, seq::IteratorRandom};

use crate::{
    problem::{
        location::LocationIdx, patrol_problem::PatrolProblem, shift::ShiftIdx,
        travel_time_matrix::TravelTimeMatrix, vehicle::VehicleIdx,
    },
    solver::{
        location_state::LocationState, route::Route, route_builder::RouteBuilder,
        schedule_table::ScheduleTable, selection_strategy::SelectionStrategy,
    },
};

use super::individual::Individual;

/// Minimum route length, both depot stops included, for a mutation to apply.
const MIN_MUTABLE_ROUTE_LEN: usize = 4;

/// Uniform crossover: each gene is taken from either parent with equal probability.
pub fn crossover<R>(first: &Individual, second: &Individual, rng: &mut R) -> Individual
where
    R: Rng,
{
    let routes = ScheduleTable::from_fn(
        first.routes().shift_count(),
        first.routes().vehicle_count(),
        |shift, vehicle| {
            let parent = if rng.random_bool(0.5) { first } else { second };
            parent.route(shift, vehicle).clone()
        },
    );

    Individual::new(routes)
}

/// Rebuilds every gene that has no patrol stop with the randomized route builder.
///
/// Genes are processed shift by shift so each rebuilt route starts after the
/// vehicle's previous route in the same individual. Returns the number of
/// rebuilt genes.
pub fn repair_unset_genes<R>(
    individual: &mut Individual,
    problem: &PatrolProblem,
    travel_times: &TravelTimeMatrix,
    rng: &mut R,
) -> usize
where
    R: Rng,
{
    let depot = problem.depot();
    let builder = RouteBuilder::new(problem, travel_times, SelectionStrategy::ShuffleFirstFeasible);
    let mut repaired = 0;

    for shift_index in problem.shifts() {
        for vehicle in problem.vehicles() {
            if individual.route(shift_index, vehicle).has_patrol_stops(depot) {
                continue;
            }

            let previous_route = shift_index
                .get()
                .checked_sub(1)
                .map(|previous| individual.route(previous.into(), vehicle));
            let shift = problem.shift_window(shift_index, previous_route);

            let mut state = LocationState::new(problem.num_locations());
            let route = builder.build_route(&shift, vehicle, &mut state, rng);
            individual.set_route(shift_index, vehicle, route);
            repaired += 1;
        }
    }

    repaired
}

/// Swaps two interior stops of each long enough route with probability
/// `mutation_rate`. Returns the number of mutated routes.
pub fn mutate<R>(individual: &mut Individual, mutation_rate: f64, depot: LocationIdx, rng: &mut R) -> usize
where
    R: Rng,
{
    let shift_count = individual.routes().shift_count();
    let vehicle_count = individual.routes().vehicle_count();
    let mut mutated = 0;

    for shift in (0..shift_count).map(ShiftIdx::new) {
        for vehicle in (0..vehicle_count).map(VehicleIdx::new) {
            let route = individual.route_mut(shift, vehicle);
            if route.len() < MIN_MUTABLE_ROUTE_LEN || !rng.random_bool(mutation_rate) {
                continue;
            }

            if swap_interior_stops(route, depot, rng) {
                mutated += 1;
            }
        }
    }

    mutated
}

fn swap_interior_stops<R>(route: &mut Route, depot: LocationIdx, rng: &mut R) -> bool
where
    R: Rng,
{
    let positions = route.interior_range(depot).choose_multiple(rng, 2);
    if let [first, second] = positions[..] {
        route.swap_locations(first, second);
        true
    } else {
        false
    }
}
