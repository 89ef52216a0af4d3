use jiff::SignedDuration;
use rand::{SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};

use crate::{
    problem::{
        configuration_error::{ConfigurationError, ensure_non_negative_duration},
        location::{DepotPlacement, LocationIdx},
        network::{NetworkMode, NetworkModel},
        patrol_problem::{PatrolProblem, PatrolProblemBuilder},
        revisit_policy::RevisitPolicy,
        shift::ShiftIdx,
        travel_time_matrix::{Time, TravelTimeMatrix},
        vehicle::VehicleIdx,
    },
    solver::{
        genetic::{
            fitness::FitnessFunction,
            genetic_params::{GeneticParams, Termination, Threads, TournamentSize},
        },
        route::Route,
        schedule_table::ScheduleTable,
        selection_strategy::SelectionStrategy,
        simulation_params::{ProcessingOrder, SimulationParams},
    },
};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum JsonNetworkMode {
    #[default]
    DenseUniform,
    DenseNormal,
    Sparse,
}

/// Flat run configuration shared by both engines.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "PatrolConfig")]
pub struct JsonPatrolConfig {
    pub vehicle_count: usize,
    pub location_count: usize,
    pub shift_count: usize,

    #[serde(default = "default_shift_length")]
    pub shift_length: Time,
    #[serde(default)]
    pub shift_lengths: Option<Vec<Time>>,
    #[serde(default = "default_patrol_duration")]
    pub patrol_duration: Time,
    #[serde(default = "default_rest_period")]
    pub rest_period: Time,
    #[serde(default = "default_cooldown_interval")]
    pub cooldown_interval: Time,
    #[serde(default)]
    pub max_revisits: Option<usize>,

    #[serde(default)]
    pub network_mode: JsonNetworkMode,
    #[serde(default = "default_edge_probability")]
    pub edge_probability: f64,
    #[serde(default)]
    pub depot_placement: DepotPlacement,
    /// Explicit symmetric matrix, `null` for a missing edge. Replaces the generated network.
    #[serde(default)]
    pub travel_times: Option<Vec<Vec<Option<Time>>>>,

    #[serde(default = "default_population_size")]
    pub population_size: usize,
    #[serde(default = "default_generations")]
    pub generations: usize,
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    #[serde(default = "default_elite_fraction")]
    pub elite_fraction: f64,
    #[serde(default)]
    pub tournament_size: Option<usize>,
    #[serde(default = "default_stagnation_threshold")]
    pub stagnation_threshold: Option<usize>,
    #[serde(default)]
    pub time_limit_seconds: Option<f64>,
    #[serde(default)]
    pub random_seed: u64,

    #[serde(default)]
    pub selection_strategy: SelectionStrategy,
    #[serde(default)]
    pub processing_order: ProcessingOrder,
    #[serde(default = "default_fluctuation_probability")]
    pub fluctuation_probability: f64,
    #[serde(default = "default_generation_fluctuation_probability")]
    pub generation_fluctuation_probability: f64,
    #[serde(default)]
    pub fitness: FitnessFunction,
    /// Worker threads of the genetic scheduler, `0` for one per core.
    #[serde(default)]
    pub threads: Option<usize>,
}

fn default_shift_length() -> Time {
    120.0
}

fn default_patrol_duration() -> Time {
    5.0
}

fn default_rest_period() -> Time {
    10.0
}

fn default_cooldown_interval() -> Time {
    30.0
}

fn default_edge_probability() -> f64 {
    0.3
}

fn default_population_size() -> usize {
    400
}

fn default_generations() -> usize {
    500
}

fn default_mutation_rate() -> f64 {
    0.1
}

fn default_elite_fraction() -> f64 {
    0.1
}

fn default_stagnation_threshold() -> Option<usize> {
    Some(25)
}

fn default_fluctuation_probability() -> f64 {
    0.25
}

fn default_generation_fluctuation_probability() -> f64 {
    0.5
}

impl JsonPatrolConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn network_mode(&self) -> NetworkMode {
        match self.network_mode {
            JsonNetworkMode::DenseUniform => NetworkMode::DenseUniform,
            JsonNetworkMode::DenseNormal => NetworkMode::DenseNormal,
            JsonNetworkMode::Sparse => NetworkMode::Sparse {
                edge_probability: self.edge_probability,
            },
        }
    }

    /// Builds the problem. A generated network draws from `random_seed`.
    pub fn build_problem(&self) -> Result<PatrolProblem, ConfigurationError> {
        let depot = self.depot_placement.depot(self.location_count);
        let network = match &self.travel_times {
            Some(rows) => NetworkModel::new(TravelTimeMatrix::from_rows(rows.clone(), depot)?, depot),
            None => {
                let mut rng = SmallRng::seed_from_u64(self.random_seed);
                NetworkModel::generate(
                    self.location_count,
                    self.network_mode(),
                    self.depot_placement,
                    &mut rng,
                )?
            }
        };

        let mut builder = PatrolProblemBuilder::default();
        builder
            .set_vehicle_count(self.vehicle_count)
            .set_location_count(self.location_count)
            .set_shift_count(self.shift_count)
            .set_shift_length(self.shift_length)
            .set_patrol_duration(self.patrol_duration)
            .set_rest_period(self.rest_period)
            .set_revisit_policy(RevisitPolicy::new(
                self.cooldown_interval,
                self.max_revisits,
            ))
            .set_network(network);

        if let Some(shift_lengths) = &self.shift_lengths {
            builder.set_shift_lengths(shift_lengths.clone());
        }

        builder.build()
    }

    pub fn simulation_params(&self) -> Result<SimulationParams, ConfigurationError> {
        let params = SimulationParams {
            selection_strategy: self.selection_strategy,
            processing_order: self.processing_order,
            fluctuation_probability: self.fluctuation_probability,
            random_seed: self.random_seed,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn genetic_params(&self) -> Result<GeneticParams, ConfigurationError> {
        let mut terminations = vec![Termination::Generations(self.generations)];
        if let Some(stagnation_threshold) = self.stagnation_threshold {
            terminations.push(Termination::GenerationsWithoutImprovement(
                stagnation_threshold,
            ));
        }
        if let Some(seconds) = self.time_limit_seconds {
            ensure_non_negative_duration("time_limit_seconds", seconds)?;
            let limit = SignedDuration::try_from_secs_f64(seconds).map_err(|_| {
                ConfigurationError::DurationOutOfRange {
                    name: "time_limit_seconds",
                    value: seconds,
                }
            })?;
            terminations.push(Termination::Duration(limit));
        }

        let params = GeneticParams {
            population_size: self.population_size,
            terminations,
            initial_mutation_rate: self.mutation_rate,
            elite_fraction: self.elite_fraction,
            tournament_size: self
                .tournament_size
                .map_or(TournamentSize::Proportional(0.05), TournamentSize::Fixed),
            fitness: self.fitness,
            fluctuation_probability: self.generation_fluctuation_probability,
            random_seed: self.random_seed,
            threads: match self.threads {
                None | Some(1) => Threads::Single,
                Some(0) => Threads::Auto,
                Some(threads) => Threads::Multi(threads),
            },
            ..GeneticParams::default()
        };
        params.validate()?;
        Ok(params)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename = "Stop")]
pub struct JsonStop {
    pub location: LocationIdx,
    pub arrival_time: Time,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename = "Route")]
pub struct JsonRoute {
    pub shift: ShiftIdx,
    pub vehicle: VehicleIdx,
    pub stops: Vec<JsonStop>,
}

impl JsonRoute {
    pub fn from_table(routes: &ScheduleTable<Route>) -> Vec<JsonRoute> {
        routes
            .iter()
            .map(|(shift, vehicle, route)| JsonRoute {
                shift,
                vehicle,
                stops: route
                    .stops()
                    .iter()
                    .map(|stop| JsonStop {
                        location: stop.location,
                        arrival_time: stop.arrival_time,
                    })
                    .collect(),
            })
            .collect()
    }
}
