use serde::Serialize;

use super::fitness::Fitness;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GenerationStatistics {
    pub generation: usize,
    pub best_fitness: Fitness,
    pub best_ever_fitness: Fitness,
    pub average_fitness: Fitness,
    pub mutation_rate: f64,
    pub fluctuated: bool,
    pub generations_without_improvement: usize,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    Generations,
    Stagnation,
    Duration,
    Stopped,
}
