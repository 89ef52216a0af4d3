use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use jiff::Timestamp;
use parking_lot::{Mutex, RwLock};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{Level, debug, info, instrument};

use crate::{
    parsers::heuristic_seeds::{HeuristicSeedKey, HeuristicSeeds},
    problem::{
        configuration_error::ConfigurationError, patrol_problem::PatrolProblem,
        travel_time_matrix::TravelTimeMatrix,
    },
    selector::{select_individual::SelectIndividual, select_tournament::TournamentSelector},
    solver::{
        schedule_simulator::simulate_schedule, schedule_table::ScheduleTable,
        selection_strategy::SelectionStrategy, simulation_params::ProcessingOrder,
    },
    timer_debug,
};

use super::{
    fitness::Fitness,
    fitness_cache::FitnessCache,
    genetic_params::{GeneticParams, Termination},
    individual::Individual,
    operators::{crossover, mutate, repair_unset_genes},
    population::{Population, ScoredIndividual},
    seeding::{seed_individual, seed_sample_size},
    statistics::{GenerationStatistics, TerminationReason},
};

type BestIndividualHandler = Arc<Mutex<dyn FnMut(&ScoredIndividual) + Send + Sync + 'static>>;
type GenerationHandler = Arc<Mutex<dyn FnMut(&GenerationStatistics) + Send + Sync + 'static>>;

#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum SchedulerStatus {
    Initialized,
    Evolving,
    Terminated,
}

#[derive(Serialize, Debug, Clone)]
pub struct GeneticResult {
    pub best: Individual,
    pub best_fitness: Fitness,
    /// Best-ever fitness after each generation.
    pub best_fitness_trace: Vec<Fitness>,
    pub generations: Vec<GenerationStatistics>,
    pub termination_reason: TerminationReason,
    pub final_mutation_rate: f64,
    pub final_average_fitness: Fitness,
}

impl GeneticResult {
    pub fn generations_run(&self) -> usize {
        self.generations.len()
    }
}

/// Requests termination of a running scheduler at the next generation boundary.
#[derive(Clone, Debug)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

struct EvolutionState {
    start: Timestamp,
    generation: usize,
    generations_without_improvement: usize,
}

/// Evolves full multi-vehicle, multi-shift schedules towards maximum coverage.
pub struct GeneticScheduler {
    problem: Arc<PatrolProblem>,
    params: GeneticParams,
    seeds: Option<HeuristicSeeds>,
    fitness_cache: FitnessCache,
    thread_pool: rayon::ThreadPool,
    status: RwLock<SchedulerStatus>,
    is_stopped: Arc<AtomicBool>,
    on_best_individual_handler: Option<BestIndividualHandler>,
    on_generation_handler: Option<GenerationHandler>,
}

impl GeneticScheduler {
    pub fn new(problem: PatrolProblem, params: GeneticParams) -> Result<Self, ConfigurationError> {
        params.validate()?;

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(params.threads.number_of_threads())
            .build()?;

        Ok(GeneticScheduler {
            problem: Arc::new(problem),
            params,
            seeds: None,
            fitness_cache: FitnessCache::default(),
            thread_pool,
            status: RwLock::new(SchedulerStatus::Initialized),
            is_stopped: Arc::new(AtomicBool::new(false)),
            on_best_individual_handler: None,
            on_generation_handler: None,
        })
    }

    pub fn problem(&self) -> &PatrolProblem {
        &self.problem
    }

    pub fn params(&self) -> &GeneticParams {
        &self.params
    }

    pub fn status(&self) -> SchedulerStatus {
        *self.status.read()
    }

    pub fn fitness_cache(&self) -> &FitnessCache {
        &self.fitness_cache
    }

    pub fn set_heuristic_seeds(&mut self, seeds: HeuristicSeeds) {
        self.seeds = Some(seeds);
    }

    pub fn on_best_individual<F>(&mut self, callback: F)
    where
        F: FnMut(&ScoredIndividual) + Send + Sync + 'static,
    {
        self.on_best_individual_handler = Some(Arc::new(Mutex::new(callback)));
    }

    pub fn on_generation<F>(&mut self, callback: F)
    where
        F: FnMut(&GenerationStatistics) + Send + Sync + 'static,
    {
        self.on_generation_handler = Some(Arc::new(Mutex::new(callback)));
    }

    pub fn stop(&self) {
        self.is_stopped.store(true, Ordering::Relaxed);
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.is_stopped))
    }

    pub fn score(&self, individual: Individual) -> ScoredIndividual {
        let fingerprint = individual.fingerprint();
        let fitness = self.fitness_cache.get_or_compute(fingerprint, || {
            self.params.fitness.evaluate(&self.problem, &individual)
        });

        ScoredIndividual {
            individual,
            fitness,
            fingerprint,
        }
    }

    #[instrument(skip_all, level = Level::DEBUG)]
    pub fn run(&self) -> GeneticResult {
        self.is_stopped.store(false, Ordering::Relaxed);
        self.fitness_cache.clear();
        *self.status.write() = SchedulerStatus::Evolving;

        let mut rng = SmallRng::seed_from_u64(self.params.random_seed);
        let mut state = EvolutionState {
            start: Timestamp::now(),
            generation: 0,
            generations_without_improvement: 0,
        };

        let mut population = timer_debug!("Initialization", self.initialize_population(&mut rng));

        let mut best = population
            .best()
            .cloned()
            .unwrap_or_else(|| {
                self.score(Individual::new(ScheduleTable::new(
                    self.problem.shift_count(),
                    self.problem.vehicle_count(),
                )))
            });
        self.notify_best(&best);

        let mut mutation_rate = self.params.initial_mutation_rate;
        let mut previous_generation_best: Option<Fitness> = None;
        let mut best_fitness_trace = Vec::new();
        let mut generations = Vec::new();

        info!(
            "Evolving {} individuals, initial best fitness {}",
            population.len(),
            best.fitness
        );

        let termination_reason = loop {
            if let Some(reason) = self.should_terminate(&state) {
                break reason;
            }

            let (next_population, fluctuated) =
                self.evolve_generation(&population, mutation_rate, &mut rng);
            population = next_population;

            let generation_best = population.best().map_or(0.0, |best| best.fitness);
            if let Some(candidate) = population.best()
                && candidate.fitness > best.fitness
            {
                best = candidate.clone();
                state.generations_without_improvement = 0;
                self.notify_best(&best);
            } else {
                state.generations_without_improvement += 1;
            }

            mutation_rate = self.adapt_mutation_rate(
                mutation_rate,
                previous_generation_best,
                generation_best,
            );
            previous_generation_best = Some(generation_best);

            let statistics = GenerationStatistics {
                generation: state.generation,
                best_fitness: generation_best,
                best_ever_fitness: best.fitness,
                average_fitness: population.average_fitness(),
                mutation_rate,
                fluctuated,
                generations_without_improvement: state.generations_without_improvement,
            };

            debug!(
                "Generation {}, Best Fitness {}, Stagnation Count {}",
                state.generation, generation_best, state.generations_without_improvement
            );

            if let Some(callback) = &self.on_generation_handler {
                callback.lock()(&statistics);
            }

            best_fitness_trace.push(best.fitness);
            generations.push(statistics);
            state.generation += 1;
        };

        info!(
            "Terminated after {} generations ({:?}), best fitness {}",
            state.generation, termination_reason, best.fitness
        );

        *self.status.write() = SchedulerStatus::Terminated;

        GeneticResult {
            best_fitness: best.fitness,
            best: best.individual,
            best_fitness_trace,
            generations,
            termination_reason,
            final_mutation_rate: mutation_rate,
            final_average_fitness: population.average_fitness(),
        }
    }

    /// Seeded individuals first, then randomized simulations until the population is full.
    pub fn initialize_population(&self, rng: &mut SmallRng) -> Population {
        let population_size = self.params.population_size;
        let mut individuals = Vec::with_capacity(population_size);

        let key = HeuristicSeedKey {
            vehicles: self.problem.vehicle_count(),
            shifts: self.problem.shift_count(),
            locations: self.problem.location_count(),
        };
        if let Some(hint) = self.seeds.as_ref().and_then(|seeds| seeds.get(key)) {
            let count = self.params.max_seeded_individuals.min(population_size);
            let sample_size = seed_sample_size(hint, self.problem.location_count());
            info!(
                "Seeding {} individuals from heuristic hint {} ({} sites per route)",
                count, hint, sample_size
            );

            for _ in 0..count {
                individuals.push(seed_individual(&self.problem, sample_size, rng));
            }
        }

        let rngs: Vec<SmallRng> = (individuals.len()..population_size)
            .map(|_| SmallRng::from_rng(&mut *rng))
            .collect();
        let travel_times = self.problem.travel_times();

        let simulated: Vec<Individual> = self.thread_pool.install(|| {
            rngs.into_par_iter()
                .map(|mut individual_rng| {
                    let schedule = simulate_schedule(
                        &self.problem,
                        travel_times,
                        SelectionStrategy::ShuffleFirstFeasible,
                        ProcessingOrder::ShiftMajor,
                        &mut individual_rng,
                    );
                    Individual::new(schedule.into_routes())
                })
                .collect()
        });
        individuals.extend(simulated);

        let scored = self.score_all(individuals);
        Population::from_candidates(population_size, scored)
    }

    /// Breeds the next population. Returns it along with whether the generation
    /// used fluctuated travel times.
    pub fn evolve_generation(
        &self,
        population: &Population,
        mutation_rate: f64,
        rng: &mut SmallRng,
    ) -> (Population, bool) {
        let (travel_times, fluctuated) = self
            .problem
            .network()
            .sample_travel_times(self.params.fluctuation_probability, rng);

        let population_size = self.params.population_size;
        let mut candidates: Vec<ScoredIndividual> =
            population.elites(self.params.elite_size()).to_vec();

        let pairs = population_size.saturating_sub(candidates.len()).div_ceil(2);
        let rngs: Vec<SmallRng> = (0..pairs)
            .map(|_| SmallRng::from_rng(&mut *rng))
            .collect();

        let selector = TournamentSelector::new(
            self.params
                .tournament_size
                .resolve(self.problem.location_count(), population.len()),
        );

        let offspring: Vec<Vec<ScoredIndividual>> = self.thread_pool.install(|| {
            rngs.into_par_iter()
                .map(|mut pair_rng| {
                    self.breed_pair(
                        population,
                        &selector,
                        &travel_times,
                        mutation_rate,
                        &mut pair_rng,
                    )
                })
                .collect()
        });
        candidates.extend(offspring.into_iter().flatten());

        (
            Population::from_candidates(population_size, candidates),
            fluctuated,
        )
    }

    fn breed_pair<R>(
        &self,
        population: &Population,
        selector: &TournamentSelector,
        travel_times: &TravelTimeMatrix,
        mutation_rate: f64,
        rng: &mut R,
    ) -> Vec<ScoredIndividual>
    where
        R: Rng,
    {
        let individuals = population.individuals();
        let (Some(first), Some(second)) = (
            selector.select_individual(individuals, rng),
            selector.select_individual(individuals, rng),
        ) else {
            return Vec::new();
        };

        let depot = self.problem.depot();
        [
            crossover(&first.individual, &second.individual, rng),
            crossover(&second.individual, &first.individual, rng),
        ]
        .into_iter()
        .map(|mut child| {
            repair_unset_genes(&mut child, &self.problem, travel_times, rng);
            mutate(&mut child, mutation_rate, depot, rng);
            self.score(child)
        })
        .collect()
    }

    fn score_all(&self, individuals: Vec<Individual>) -> Vec<ScoredIndividual> {
        self.thread_pool.install(|| {
            individuals
                .into_par_iter()
                .map(|individual| self.score(individual))
                .collect()
        })
    }

    fn adapt_mutation_rate(
        &self,
        mutation_rate: f64,
        previous_generation_best: Option<Fitness>,
        generation_best: Fitness,
    ) -> f64 {
        if previous_generation_best == Some(generation_best) {
            (mutation_rate + self.params.mutation_rate_step).min(self.params.max_mutation_rate)
        } else {
            (mutation_rate - self.params.mutation_rate_step).max(self.params.min_mutation_rate)
        }
    }

    fn notify_best(&self, best: &ScoredIndividual) {
        if let Some(callback) = &self.on_best_individual_handler {
            callback.lock()(best);
        }
    }

    fn check_termination(
        &self,
        state: &EvolutionState,
        termination: &Termination,
    ) -> Option<TerminationReason> {
        let reached = match *termination {
            Termination::Generations(max_generations) => state.generation >= max_generations,
            Termination::GenerationsWithoutImprovement(max_generations) => {
                state.generations_without_improvement >= max_generations
            }
            Termination::Duration(max_duration) => {
                Timestamp::now().duration_since(state.start) >= max_duration
            }
        };

        reached.then_some(match termination {
            Termination::Generations(_) => TerminationReason::Generations,
            Termination::GenerationsWithoutImprovement(_) => TerminationReason::Stagnation,
            Termination::Duration(_) => TerminationReason::Duration,
        })
    }

    fn should_terminate(&self, state: &EvolutionState) -> Option<TerminationReason> {
        if self.is_stopped.load(Ordering::Relaxed) {
            return Some(TerminationReason::Stopped);
        }

        self.params
            .terminations
            .iter()
            .find_map(|termination| self.check_termination(state, termination))
    }
}
