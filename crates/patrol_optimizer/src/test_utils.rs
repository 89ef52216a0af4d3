use crate::problem::{
    location::LocationIdx,
    network::NetworkModel,
    patrol_problem::{PatrolProblem, PatrolProblemBuilder},
    travel_time_matrix::{Time, TravelTimeMatrix},
};

/// Complete network with the depot at 0 and every edge taking `travel_time` minutes.
pub fn create_constant_problem(
    vehicle_count: usize,
    location_count: usize,
    shift_count: usize,
    travel_time: Time,
) -> PatrolProblem {
    create_problem_with_matrix(
        vehicle_count,
        shift_count,
        TravelTimeMatrix::from_constant(location_count + 1, travel_time),
        |_| {},
    )
}

/// Problem over an explicit matrix with the depot at 0. `configure` may override
/// any builder setting before the problem is built.
pub fn create_problem_with_matrix<F>(
    vehicle_count: usize,
    shift_count: usize,
    travel_times: TravelTimeMatrix,
    configure: F,
) -> PatrolProblem
where
    F: FnOnce(&mut PatrolProblemBuilder),
{
    let mut builder = PatrolProblemBuilder::default();
    builder
        .set_vehicle_count(vehicle_count)
        .set_location_count(travel_times.num_locations() - 1)
        .set_shift_count(shift_count)
        .set_network(NetworkModel::new(travel_times, LocationIdx::new(0)));

    configure(&mut builder);

    builder.build().unwrap()
}
