use serde::Serialize;

use super::{
    fitness::Fitness,
    individual::{Fingerprint, Individual},
};

#[derive(Serialize, Debug, Clone)]
pub struct ScoredIndividual {
    pub individual: Individual,
    pub fitness: Fitness,
    pub fingerprint: Fingerprint,
}

impl ScoredIndividual {
    pub fn new(individual: Individual, fitness: Fitness) -> Self {
        let fingerprint = individual.fingerprint();
        ScoredIndividual {
            individual,
            fitness,
            fingerprint,
        }
    }
}

/// Individuals ranked by descending fitness.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<ScoredIndividual>,
}

impl Population {
    /// Ranks the candidates and keeps the `population_size` fittest. The sort is
    /// stable, candidates listed first win ties.
    pub fn from_candidates(population_size: usize, mut candidates: Vec<ScoredIndividual>) -> Self {
        candidates.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        candidates.truncate(population_size);

        Population {
            individuals: candidates,
        }
    }

    pub fn individuals(&self) -> &[ScoredIndividual] {
        &self.individuals
    }

    pub fn best(&self) -> Option<&ScoredIndividual> {
        self.individuals.first()
    }

    pub fn elites(&self, elite_size: usize) -> &[ScoredIndividual] {
        &self.individuals[..elite_size.min(self.individuals.len())]
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn average_fitness(&self) -> Fitness {
        if self.individuals.is_empty() {
            return 0.0;
        }

        self.individuals
            .iter()
            .map(|individual| individual.fitness)
            .sum::<Fitness>()
            / self.individuals.len() as Fitness
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::location::LocationIdx,
        solver::{route::Route, schedule_table::ScheduleTable},
    };

    use super::*;

    fn scored(tag: usize, fitness: Fitness) -> ScoredIndividual {
        let route = Route::start(LocationIdx::new(tag), 0.0);
        ScoredIndividual::new(
            Individual::new(ScheduleTable::from_fn(1, 1, |_, _| route.clone())),
            fitness,
        )
    }

    #[test]
    fn test_from_candidates_ranks_and_truncates() {
        let population = Population::from_candidates(
            3,
            vec![scored(0, 1.0), scored(1, 4.0), scored(2, 2.0), scored(3, 3.0)],
        );

        let fitnesses: Vec<Fitness> = population
            .individuals()
            .iter()
            .map(|individual| individual.fitness)
            .collect();
        assert_eq!(fitnesses, vec![4.0, 3.0, 2.0]);
        assert_eq!(population.best().map(|best| best.fitness), Some(4.0));
        assert_eq!(population.average_fitness(), 3.0);
    }

    #[test]
    fn test_ties_keep_candidate_order() {
        let first = scored(0, 2.0);
        let second = scored(1, 2.0);
        let expected = first.fingerprint;

        let population = Population::from_candidates(1, vec![first, second]);
        assert_eq!(population.individuals()[0].fingerprint, expected);
    }

    #[test]
    fn test_elites() {
        let population = Population::from_candidates(3, vec![scored(0, 1.0), scored(1, 4.0)]);
        assert_eq!(population.elites(1).len(), 1);
        assert_eq!(population.elites(5).len(), 2);
        assert_eq!(population.elites(0).len(), 0);
    }
}
