use jiff::SignedDuration;

use crate::problem::configuration_error::{
    ConfigurationError, ensure_positive_count, ensure_probability,
};

use super::fitness::FitnessFunction;

#[derive(Clone, Debug)]
pub enum Termination {
    Generations(usize),
    GenerationsWithoutImprovement(usize),
    Duration(SignedDuration),
}

#[derive(Clone, Debug)]
pub enum Threads {
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => *num,
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TournamentSize {
    /// Fraction of the location count, at least 2.
    Proportional(f64),
    Fixed(usize),
}

impl TournamentSize {
    pub fn resolve(&self, location_count: usize, population_size: usize) -> usize {
        let size = match *self {
            TournamentSize::Proportional(fraction) => {
                ((fraction * location_count as f64).round() as usize).max(2)
            }
            TournamentSize::Fixed(size) => size,
        };
        size.min(population_size).max(1)
    }
}

#[derive(Clone, Debug)]
pub struct GeneticParams {
    pub population_size: usize,
    pub terminations: Vec<Termination>,

    pub initial_mutation_rate: f64,
    pub min_mutation_rate: f64,
    pub max_mutation_rate: f64,
    pub mutation_rate_step: f64,

    pub elite_fraction: f64,
    pub tournament_size: TournamentSize,
    pub fitness: FitnessFunction,

    /// Probability that a generation breeds on fluctuated travel times.
    pub fluctuation_probability: f64,
    pub max_seeded_individuals: usize,

    pub random_seed: u64,
    pub threads: Threads,
}

impl Default for GeneticParams {
    fn default() -> Self {
        GeneticParams {
            population_size: 400,
            terminations: vec![
                Termination::Generations(500),
                Termination::GenerationsWithoutImprovement(25),
            ],
            initial_mutation_rate: 0.1,
            min_mutation_rate: 0.1,
            max_mutation_rate: 1.0,
            mutation_rate_step: 0.01,
            elite_fraction: 0.1,
            tournament_size: TournamentSize::Proportional(0.05),
            fitness: FitnessFunction::Coverage,
            fluctuation_probability: 0.5,
            max_seeded_individuals: 10,
            random_seed: 0,
            threads: Threads::Single,
        }
    }
}

impl GeneticParams {
    pub fn elite_size(&self) -> usize {
        ((self.elite_fraction * self.population_size as f64).round() as usize)
            .min(self.population_size)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        ensure_positive_count("population_size", self.population_size)?;
        ensure_probability("elite_fraction", self.elite_fraction)?;
        ensure_probability("initial_mutation_rate", self.initial_mutation_rate)?;
        ensure_probability("min_mutation_rate", self.min_mutation_rate)?;
        ensure_probability("max_mutation_rate", self.max_mutation_rate)?;
        ensure_probability("fluctuation_probability", self.fluctuation_probability)?;

        match self.tournament_size {
            TournamentSize::Fixed(size) => {
                ensure_positive_count("tournament_size", size)?;
            }
            TournamentSize::Proportional(fraction) => {
                ensure_probability("tournament_size", fraction)?;
            }
        }

        if let Threads::Multi(threads) = self.threads {
            ensure_positive_count("threads", threads)?;
        }

        Ok(())
    }
}
