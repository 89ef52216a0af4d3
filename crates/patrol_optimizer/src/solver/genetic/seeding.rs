use rand::{Rng, seq::IndexedRandom};
use tracing::warn;

use crate::{
    problem::{
        location::LocationIdx, patrol_problem::PatrolProblem, shift::Shift,
        travel_time_matrix::TravelTimeMatrix,
    },
    solver::{
        route::{Route, Stop},
        schedule_table::ScheduleTable,
    },
};

use super::individual::Individual;

/// Number of random sites each seeded route samples for a unique-location hint.
pub fn seed_sample_size(hint: f64, location_count: usize) -> usize {
    if !hint.is_finite() || hint < 1.0 {
        return 0;
    }
    (hint.floor() as usize).min(location_count)
}

/// Builds an individual whose routes visit `sample_size` random sites each.
///
/// Arrival times accumulate along the sampled order; sites without an edge from the
/// previous stop are dropped. The routes are not checked against shift windows.
pub fn seed_individual<R>(problem: &PatrolProblem, sample_size: usize, rng: &mut R) -> Individual
where
    R: Rng,
{
    if sample_size == 0 {
        warn!("Seeding individual with an empty sample, routes stay at the depot");
    }

    let sites: Vec<LocationIdx> = problem.sites().collect();
    let travel_times = problem.travel_times();
    let mut routes: ScheduleTable<Route> =
        ScheduleTable::new(problem.shift_count(), problem.vehicle_count());

    for shift_index in problem.shifts() {
        for vehicle in problem.vehicles() {
            let previous_route = shift_index
                .get()
                .checked_sub(1)
                .map(|previous| routes.get(previous.into(), vehicle));
            let shift = problem.shift_window(shift_index, previous_route);

            let sample: Vec<LocationIdx> = sites.choose_multiple(rng, sample_size).copied().collect();
            let route = synthetic_route(problem, travel_times, &shift, &sample);
            routes.set(shift_index, vehicle, route);
        }
    }

    Individual::new(routes)
}

fn synthetic_route(
    problem: &PatrolProblem,
    travel_times: &TravelTimeMatrix,
    shift: &Shift,
    sample: &[LocationIdx],
) -> Route {
    let depot = problem.depot();
    let mut route = Route::start(depot, shift.start_time());
    let mut current = depot;
    let mut current_time = shift.start_time();

    for &location in sample {
        let Some(travel_time) = travel_times.travel_time(current, location) else {
            continue;
        };

        let arrival_time = current_time + travel_time;
        route.push(Stop::new(location, arrival_time));
        current = location;
        current_time = arrival_time + problem.patrol_duration();
    }

    if let Some(travel_time) = travel_times.travel_time(current, depot) {
        route.push(Stop::new(depot, current_time + travel_time));
    }

    route
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};

    use crate::{
        problem::{shift::ShiftIdx, vehicle::VehicleIdx},
        test_utils,
    };

    use super::*;

    #[test]
    fn test_seed_sample_size() {
        assert_eq!(seed_sample_size(3.7, 10), 3);
        assert_eq!(seed_sample_size(25.0, 10), 10);
        assert_eq!(seed_sample_size(0.5, 10), 0);
        assert_eq!(seed_sample_size(f64::NAN, 10), 0);
    }

    #[test]
    fn test_seed_individual_routes() {
        let problem = test_utils::create_constant_problem(2, 6, 2, 10.0);
        let mut rng = SmallRng::seed_from_u64(21);

        let individual = seed_individual(&problem, 3, &mut rng);

        for (_, _, route) in individual.routes().iter() {
            assert_eq!(route.len(), 5);
            assert!(route.returns_to_depot(problem.depot()));
            assert_eq!(route.patrol_stops(problem.depot()).count(), 3);
        }

        // 0 -> a (10) -> b (25) -> c (40) -> depot (55), next shift after 10 minutes rest.
        let second = individual.route(ShiftIdx::new(1), VehicleIdx::new(1));
        assert_eq!(second.first().map(|stop| stop.arrival_time), Some(65.0));
    }

    #[test]
    fn test_seed_individual_drops_unreachable_sites() {
        let travel_times = TravelTimeMatrix::from_rows(
            vec![
                vec![None, Some(10.0), Some(10.0)],
                vec![Some(10.0), None, None],
                vec![Some(10.0), None, None],
            ],
            LocationIdx::new(0),
        )
        .unwrap();
        let problem = test_utils::create_problem_with_matrix(1, 1, travel_times, |_| {});
        let mut rng = SmallRng::seed_from_u64(2);

        let individual = seed_individual(&problem, 2, &mut rng);
        let route = individual.route(ShiftIdx::new(0), VehicleIdx::new(0));

        assert_eq!(route.len(), 3);
        assert!(route.returns_to_depot(problem.depot()));
    }
}
