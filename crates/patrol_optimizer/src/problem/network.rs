use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    configuration_error::{ConfigurationError, ensure_probability},
    location::{DepotPlacement, LocationIdx},
    travel_time_matrix::{Time, TravelTimeMatrix},
};

pub const MIN_TRAVEL_TIME: i64 = 10;
pub const MAX_TRAVEL_TIME: i64 = 20;
pub const NORMAL_MEAN: Time = 15.0;
pub const NORMAL_STD_DEV: Time = 2.5;
pub const FLUCTUATION: Time = 2.0;
pub const MIN_FLUCTUATED_TRAVEL_TIME: Time = 1.0;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NetworkMode {
    /// Complete network, integer travel times drawn uniformly in [10, 20].
    DenseUniform,
    /// Complete network, travel times drawn from N(15, 2.5) clamped to [10, 20].
    DenseNormal,
    /// Each edge exists with `edge_probability`, every site keeps an edge to the depot.
    Sparse { edge_probability: f64 },
}

/// The base travel network of a problem.
///
/// The base matrix never changes. Perturbed copies are derived from it for each
/// simulation run or generation.
#[derive(Debug, Clone)]
pub struct NetworkModel {
    base: TravelTimeMatrix,
    depot: LocationIdx,
}

impl NetworkModel {
    pub fn new(base: TravelTimeMatrix, depot: LocationIdx) -> Self {
        NetworkModel { base, depot }
    }

    /// Generates a network of `location_count` patrol sites plus the depot.
    pub fn generate<R>(
        location_count: usize,
        mode: NetworkMode,
        depot_placement: DepotPlacement,
        rng: &mut R,
    ) -> Result<Self, ConfigurationError>
    where
        R: Rng,
    {
        let num_locations = location_count + 1;
        let depot = depot_placement.depot(location_count);
        let mut matrix = TravelTimeMatrix::unconnected(num_locations);

        match mode {
            NetworkMode::DenseUniform => {
                for (from, to) in pairs(num_locations) {
                    matrix.set_travel_time(from, to, uniform_travel_time(rng));
                }
            }
            NetworkMode::DenseNormal => {
                for (from, to) in pairs(num_locations) {
                    let z: f64 = rng.sample(StandardNormal);
                    let time = (NORMAL_MEAN + NORMAL_STD_DEV * z)
                        .clamp(MIN_TRAVEL_TIME as Time, MAX_TRAVEL_TIME as Time);
                    matrix.set_travel_time(from, to, time);
                }
            }
            NetworkMode::Sparse { edge_probability } => {
                ensure_probability("edge_probability", edge_probability)?;

                for (from, to) in pairs(num_locations) {
                    if rng.random_bool(edge_probability) {
                        matrix.set_travel_time(from, to, uniform_travel_time(rng));
                    }
                }

                let mut forced = 0;
                for location in (0..num_locations).map(LocationIdx::new) {
                    if !matrix.is_reachable(location, depot) {
                        matrix.set_travel_time(location, depot, uniform_travel_time(rng));
                        forced += 1;
                    }
                }

                debug!(
                    "Generated sparse network with {} edges, {} forced depot edges",
                    matrix.edge_count(),
                    forced
                );
            }
        }

        Ok(NetworkModel {
            base: matrix,
            depot,
        })
    }

    pub fn base(&self) -> &TravelTimeMatrix {
        &self.base
    }

    pub fn depot(&self) -> LocationIdx {
        self.depot
    }

    pub fn num_locations(&self) -> usize {
        self.base.num_locations()
    }

    /// Returns a fluctuated copy of the base matrix with the given probability,
    /// the base matrix otherwise. The flag tells whether fluctuation happened.
    pub fn sample_travel_times<R>(&self, probability: f64, rng: &mut R) -> (TravelTimeMatrix, bool)
    where
        R: Rng,
    {
        if probability > 0.0 && rng.random_bool(probability.min(1.0)) {
            (fluctuate(&self.base, rng), true)
        } else {
            (self.base.clone(), false)
        }
    }
}

/// Shifts every existing edge by -2 or +2 minutes, never below one minute.
pub fn fluctuate<R>(matrix: &TravelTimeMatrix, rng: &mut R) -> TravelTimeMatrix
where
    R: Rng,
{
    let mut fluctuated = matrix.clone();
    for (from, to, time) in matrix.edges() {
        let delta = if rng.random_bool(0.5) {
            FLUCTUATION
        } else {
            -FLUCTUATION
        };
        fluctuated.set_travel_time(from, to, (time + delta).max(MIN_FLUCTUATED_TRAVEL_TIME));
    }
    fluctuated
}

fn uniform_travel_time<R>(rng: &mut R) -> Time
where
    R: Rng,
{
    rng.random_range(MIN_TRAVEL_TIME..=MAX_TRAVEL_TIME) as Time
}

fn pairs(num_locations: usize) -> impl Iterator<Item = (LocationIdx, LocationIdx)> {
    (0..num_locations).flat_map(move |i| {
        ((i + 1)..num_locations).map(move |j| (LocationIdx::new(i), LocationIdx::new(j)))
    })
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};

    use super::*;

    #[test]
    fn test_dense_uniform_is_complete_and_symmetric() {
        let mut rng = SmallRng::seed_from_u64(7);
        let network =
            NetworkModel::generate(10, NetworkMode::DenseUniform, DepotPlacement::First, &mut rng)
                .unwrap();

        let matrix = network.base();
        assert_eq!(matrix.num_locations(), 11);
        assert_eq!(matrix.edge_count(), 11 * 10 / 2);
        assert!(matrix.is_symmetric());

        for (_, _, time) in matrix.edges() {
            assert!((10.0..=20.0).contains(&time));
            assert_eq!(time.fract(), 0.0);
        }
    }

    #[test]
    fn test_dense_normal_is_clamped() {
        let mut rng = SmallRng::seed_from_u64(3);
        let network =
            NetworkModel::generate(30, NetworkMode::DenseNormal, DepotPlacement::Last, &mut rng)
                .unwrap();

        assert_eq!(network.depot(), LocationIdx::new(30));
        for (_, _, time) in network.base().edges() {
            assert!((10.0..=20.0).contains(&time));
        }
    }

    #[test]
    fn test_sparse_without_edges_keeps_depot_star() {
        let mut rng = SmallRng::seed_from_u64(11);
        let network = NetworkModel::generate(
            8,
            NetworkMode::Sparse {
                edge_probability: 0.0,
            },
            DepotPlacement::First,
            &mut rng,
        )
        .unwrap();

        let matrix = network.base();
        assert_eq!(matrix.edge_count(), 8);
        for (from, _, _) in matrix.edges() {
            assert_eq!(from, network.depot());
        }
    }

    #[test]
    fn test_sparse_depot_always_reachable() {
        let mut rng = SmallRng::seed_from_u64(5);
        let network = NetworkModel::generate(
            25,
            NetworkMode::Sparse {
                edge_probability: 0.2,
            },
            DepotPlacement::Last,
            &mut rng,
        )
        .unwrap();

        let depot = network.depot();
        for location in (0..26).map(LocationIdx::new) {
            assert!(network.base().is_reachable(location, depot));
        }
        assert!(network.base().is_symmetric());
    }

    #[test]
    fn test_sparse_rejects_invalid_probability() {
        let mut rng = SmallRng::seed_from_u64(5);
        let result = NetworkModel::generate(
            5,
            NetworkMode::Sparse {
                edge_probability: 1.5,
            },
            DepotPlacement::First,
            &mut rng,
        );
        assert!(matches!(
            result,
            Err(ConfigurationError::ProbabilityOutOfRange { .. })
        ));
    }

    #[test]
    fn test_fluctuate_moves_every_edge_by_two() {
        let mut rng = SmallRng::seed_from_u64(1);
        let base = TravelTimeMatrix::from_constant(6, 10.0);
        let fluctuated = fluctuate(&base, &mut rng);

        assert!(fluctuated.is_symmetric());
        for (from, to, time) in fluctuated.edges() {
            assert!(time == 8.0 || time == 12.0, "{from} -> {to}: {time}");
        }
        assert_eq!(base, TravelTimeMatrix::from_constant(6, 10.0));
    }

    #[test]
    fn test_fluctuate_floors_at_one_minute() {
        let mut rng = SmallRng::seed_from_u64(1);
        let base = TravelTimeMatrix::from_constant(5, 1.5);
        let fluctuated = fluctuate(&base, &mut rng);

        for (_, _, time) in fluctuated.edges() {
            assert!(time >= MIN_FLUCTUATED_TRAVEL_TIME);
        }
    }

    #[test]
    fn test_sample_travel_times_probability_bounds() {
        let mut rng = SmallRng::seed_from_u64(9);
        let network = NetworkModel::new(TravelTimeMatrix::from_constant(4, 10.0), LocationIdx::new(0));

        let (matrix, fluctuated) = network.sample_travel_times(0.0, &mut rng);
        assert!(!fluctuated);
        assert_eq!(&matrix, network.base());

        let (matrix, fluctuated) = network.sample_travel_times(1.0, &mut rng);
        assert!(fluctuated);
        assert_ne!(&matrix, network.base());
    }
}
