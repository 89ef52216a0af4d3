use jiff::SignedDuration;
use patrol_optimizer::{
    json::types::JsonPatrolConfig,
    problem::{
        location::{DepotPlacement, LocationIdx},
        network::{NetworkMode, NetworkModel},
        patrol_problem::{PatrolProblem, PatrolProblemBuilder},
        shift::ShiftIdx,
        travel_time_matrix::TravelTimeMatrix,
    },
    solver::{
        genetic::{
            genetic_params::{GeneticParams, Termination, Threads},
            genetic_scheduler::GeneticScheduler,
            statistics::TerminationReason,
        },
        schedule_simulator::ScheduleSimulator,
        selection_strategy::SelectionStrategy,
        simulation_params::{ProcessingOrder, SimulationParams},
    },
};
use rand::{SeedableRng, rngs::SmallRng};

fn build_problem(
    vehicle_count: usize,
    shift_count: usize,
    network: NetworkModel,
) -> PatrolProblem {
    let mut builder = PatrolProblemBuilder::default();
    builder
        .set_vehicle_count(vehicle_count)
        .set_location_count(network.num_locations() - 1)
        .set_shift_count(shift_count)
        .set_network(network);
    builder.build().unwrap()
}

fn sparse_problem(
    vehicle_count: usize,
    location_count: usize,
    shift_count: usize,
    edge_probability: f64,
    seed: u64,
) -> PatrolProblem {
    sparse_problem_with_depot(
        vehicle_count,
        location_count,
        shift_count,
        edge_probability,
        DepotPlacement::First,
        seed,
    )
}

fn sparse_problem_with_depot(
    vehicle_count: usize,
    location_count: usize,
    shift_count: usize,
    edge_probability: f64,
    placement: DepotPlacement,
    seed: u64,
) -> PatrolProblem {
    let mut rng = SmallRng::seed_from_u64(seed);
    let network = NetworkModel::generate(
        location_count,
        NetworkMode::Sparse { edge_probability },
        placement,
        &mut rng,
    )
    .unwrap();
    build_problem(vehicle_count, shift_count, network)
}

#[test]
fn single_vehicle_covers_three_sites() {
    let problem = build_problem(
        1,
        1,
        NetworkModel::new(TravelTimeMatrix::from_constant(4, 10.0), LocationIdx::new(0)),
    );

    for strategy in [
        SelectionStrategy::NearestFromDepot,
        SelectionStrategy::NearestFromCurrent,
        SelectionStrategy::ShuffleFirstFeasible,
    ] {
        let params = SimulationParams {
            selection_strategy: strategy,
            fluctuation_probability: 0.0,
            ..SimulationParams::default()
        };
        let schedule = ScheduleSimulator::new(&problem, params).unwrap().run();

        assert_eq!(schedule.distinct_locations_visited(), 3, "{strategy:?}");
    }
}

#[test]
fn star_network_routes_visit_one_site() {
    let problem = sparse_problem(3, 15, 4, 0.0, 9);
    let params = SimulationParams {
        selection_strategy: SelectionStrategy::ShuffleFirstFeasible,
        ..SimulationParams::default()
    };
    let schedule = ScheduleSimulator::new(&problem, params).unwrap().run();

    for route in schedule.routes().values() {
        assert!(route.len() <= 3);
    }
}

#[test]
fn simulation_invariants_hold_on_sparse_network() {
    let problem = sparse_problem(3, 40, 5, 0.15, 21);
    let depot = problem.depot();
    let params = SimulationParams {
        selection_strategy: SelectionStrategy::NearestFromCurrent,
        fluctuation_probability: 1.0,
        random_seed: 4,
        ..SimulationParams::default()
    };
    let schedule = ScheduleSimulator::new(&problem, params).unwrap().run();

    assert!(schedule.distinct_locations_visited() <= problem.location_count());
    assert!(schedule.total_visits() >= schedule.distinct_locations_visited());

    for (shift, vehicle, route) in schedule.routes().iter() {
        let window = schedule.shifts().get(shift, vehicle);
        assert_eq!(route.first().map(|stop| stop.location), Some(depot));
        assert_eq!(
            route.first().map(|stop| stop.arrival_time),
            Some(window.start_time())
        );

        let mut patrolled: Vec<LocationIdx> =
            route.patrol_stops(depot).map(|stop| stop.location).collect();
        let count = patrolled.len();
        patrolled.sort();
        patrolled.dedup();
        assert_eq!(patrolled.len(), count);

        for leg in route.stops().windows(2) {
            assert!(
                problem
                    .travel_times()
                    .is_reachable(leg[0].location, leg[1].location)
            );
        }
    }
}

#[test]
fn vehicle_major_order_with_depot_last() {
    let problem = sparse_problem_with_depot(3, 20, 4, 0.3, DepotPlacement::Last, 12);
    let depot = problem.depot();
    assert_eq!(depot, LocationIdx::new(20));

    for strategy in [
        SelectionStrategy::NearestFromDepot,
        SelectionStrategy::NearestFromCurrent,
        SelectionStrategy::ShuffleFirstFeasible,
    ] {
        let params = SimulationParams {
            selection_strategy: strategy,
            processing_order: ProcessingOrder::VehicleMajor,
            random_seed: 6,
            ..SimulationParams::default()
        };
        let schedule = ScheduleSimulator::new(&problem, params).unwrap().run();
        assert!(schedule.distinct_locations_visited() > 0, "{strategy:?}");

        for (shift, vehicle, route) in schedule.routes().iter() {
            assert_eq!(route.first().map(|stop| stop.location), Some(depot));

            let mut patrolled: Vec<LocationIdx> =
                route.patrol_stops(depot).map(|stop| stop.location).collect();
            assert!(patrolled.iter().all(|&location| location != depot));
            let count = patrolled.len();
            patrolled.sort();
            patrolled.dedup();
            assert_eq!(patrolled.len(), count, "{strategy:?}");

            let window = schedule.shifts().get(shift, vehicle);
            if shift.get() > 0 {
                let previous = schedule
                    .routes()
                    .get(ShiftIdx::new(shift.get() - 1), vehicle);
                assert_eq!(
                    window.start_time(),
                    previous.last_timestamp().unwrap() + problem.rest_period()
                );
            } else {
                assert_eq!(window.start_time(), 0.0);
            }
            assert_eq!(
                route.first().map(|stop| stop.arrival_time),
                Some(window.start_time())
            );
        }
    }
}

#[test]
fn simulator_is_deterministic() {
    let problem = sparse_problem(2, 30, 3, 0.4, 2);
    let params = SimulationParams {
        selection_strategy: SelectionStrategy::ShuffleFirstFeasible,
        fluctuation_probability: 0.5,
        random_seed: 99,
        ..SimulationParams::default()
    };

    let first = ScheduleSimulator::new(&problem, params.clone()).unwrap().run();
    let second = ScheduleSimulator::new(&problem, params).unwrap().run();

    assert_eq!(first.routes(), second.routes());
    assert_eq!(first.total_visits(), second.total_visits());
}

#[test]
fn elites_reappear_after_one_generation() {
    let problem = sparse_problem(2, 20, 2, 0.5, 13);
    let params = GeneticParams {
        population_size: 10,
        elite_fraction: 0.2,
        terminations: vec![Termination::Generations(1)],
        random_seed: 8,
        ..GeneticParams::default()
    };
    let scheduler = GeneticScheduler::new(problem, params).unwrap();
    let mut rng = SmallRng::seed_from_u64(8);

    let population = scheduler.initialize_population(&mut rng);
    let elites: Vec<u64> = population
        .elites(2)
        .iter()
        .map(|elite| elite.fingerprint.value())
        .collect();

    let (next, _) = scheduler.evolve_generation(&population, 0.1, &mut rng);
    let fingerprints: Vec<u64> = next
        .individuals()
        .iter()
        .map(|individual| individual.fingerprint.value())
        .collect();

    for elite in elites {
        assert!(fingerprints.contains(&elite));
    }
}

#[test]
fn duration_limit_ends_the_run() {
    let problem = sparse_problem(2, 20, 2, 0.3, 3);
    let params = GeneticParams {
        population_size: 10,
        terminations: vec![
            Termination::Duration(SignedDuration::ZERO),
            Termination::Generations(50),
        ],
        ..GeneticParams::default()
    };

    let result = GeneticScheduler::new(problem, params).unwrap().run();

    assert_eq!(result.termination_reason, TerminationReason::Duration);
    assert_eq!(result.generations_run(), 0);
    assert!(result.best_fitness >= 0.0);
}

#[test]
fn one_generation_is_deterministic() {
    let run = || {
        let problem = sparse_problem(2, 20, 3, 0.3, 31);
        let params = GeneticParams {
            population_size: 16,
            terminations: vec![Termination::Generations(1)],
            random_seed: 123,
            ..GeneticParams::default()
        };
        GeneticScheduler::new(problem, params).unwrap().run()
    };

    let first = run();
    let second = run();

    assert_eq!(first.best, second.best);
    assert_eq!(first.generations, second.generations);
}

#[test]
fn parallel_and_serial_runs_agree() {
    let run = |threads: Threads| {
        let problem = sparse_problem(2, 25, 3, 0.3, 17);
        let params = GeneticParams {
            population_size: 20,
            terminations: vec![Termination::Generations(5)],
            random_seed: 77,
            threads,
            ..GeneticParams::default()
        };
        GeneticScheduler::new(problem, params).unwrap().run()
    };

    let serial = run(Threads::Single);
    let parallel = run(Threads::Multi(3));

    assert_eq!(serial.best, parallel.best);
    assert_eq!(serial.best_fitness_trace, parallel.best_fitness_trace);
    assert_eq!(serial.generations, parallel.generations);
}

#[test]
fn json_config_drives_both_engines() {
    let config = JsonPatrolConfig::from_json_str(
        r#"{
            "vehicle_count": 2,
            "location_count": 12,
            "shift_count": 2,
            "network_mode": "dense_normal",
            "population_size": 12,
            "generations": 3,
            "random_seed": 5
        }"#,
    )
    .unwrap();

    let problem = config.build_problem().unwrap();
    let schedule = ScheduleSimulator::new(&problem, config.simulation_params().unwrap())
        .unwrap()
        .run();
    assert!(schedule.distinct_locations_visited() > 0);

    let result = GeneticScheduler::new(problem, config.genetic_params().unwrap())
        .unwrap()
        .run();
    assert_eq!(result.generations_run(), 3);
    assert!(result.best_fitness >= 1.0);
}
