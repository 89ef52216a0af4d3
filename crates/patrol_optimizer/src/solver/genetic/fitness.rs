use serde::{Deserialize, Serialize};

use crate::problem::patrol_problem::PatrolProblem;

use super::individual::Individual;

pub type Fitness = f64;

/// Total travel time is divided by this before being subtracted from the coverage.
pub const DISTANCE_PENALTY_DIVISOR: f64 = 1000.0;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FitnessFunction {
    /// Distinct patrol sites visited across all vehicles and shifts.
    #[default]
    Coverage,
    /// Coverage minus a small penalty on the total travel time over the base network.
    DistanceAware,
}

impl FitnessFunction {
    pub fn evaluate(&self, problem: &PatrolProblem, individual: &Individual) -> Fitness {
        let coverage = individual.distinct_locations(problem.depot(), problem.num_locations()) as Fitness;

        match self {
            FitnessFunction::Coverage => coverage,
            FitnessFunction::DistanceAware => {
                let total_travel_time: f64 = individual
                    .routes()
                    .values()
                    .map(|route| route.total_travel_time(problem.travel_times()))
                    .sum();
                coverage - total_travel_time / DISTANCE_PENALTY_DIVISOR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::location::LocationIdx,
        solver::{
            route::{Route, Stop},
            schedule_table::ScheduleTable,
        },
        test_utils,
    };

    use super::*;

    #[test]
    fn test_fitness_functions() {
        let problem = test_utils::create_constant_problem(1, 3, 1, 10.0);
        let route = Route::from_stops(
            [0, 1, 2, 0]
                .iter()
                .map(|&location| Stop::new(LocationIdx::new(location), 0.0))
                .collect(),
        );
        let individual = Individual::new(ScheduleTable::from_fn(1, 1, |_, _| route.clone()));

        assert_eq!(FitnessFunction::Coverage.evaluate(&problem, &individual), 2.0);
        assert_eq!(
            FitnessFunction::DistanceAware.evaluate(&problem, &individual),
            2.0 - 30.0 / 1000.0
        );
    }
}
