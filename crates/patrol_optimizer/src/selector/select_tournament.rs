use rand::seq::IteratorRandom;

use crate::solver::genetic::population::ScoredIndividual;

use super::select_individual::SelectIndividual;

/// Fittest of `tournament_size` distinct individuals drawn at random.
pub struct TournamentSelector {
    tournament_size: usize,
}

impl TournamentSelector {
    pub fn new(tournament_size: usize) -> Self {
        TournamentSelector {
            tournament_size: tournament_size.max(1),
        }
    }
}

impl SelectIndividual for TournamentSelector {
    fn select_individual<'a>(
        &self,
        individuals: &'a [ScoredIndividual],
        rng: &mut impl rand::Rng,
    ) -> Option<&'a ScoredIndividual> {
        if individuals.len() == 1 {
            return individuals.first();
        }

        individuals
            .iter()
            .choose_multiple(rng, self.tournament_size)
            .into_iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::SmallRng};

    use crate::solver::{
        genetic::individual::Individual, route::Route, schedule_table::ScheduleTable,
    };

    use super::*;

    fn scored(fitness: f64) -> ScoredIndividual {
        ScoredIndividual::new(Individual::new(ScheduleTable::<Route>::new(1, 1)), fitness)
    }

    #[test]
    fn test_empty_population() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(
            TournamentSelector::new(2)
                .select_individual(&[], &mut rng)
                .is_none()
        );
    }

    #[test]
    fn test_full_tournament_picks_best() {
        let mut rng = SmallRng::seed_from_u64(0);
        let individuals = vec![scored(1.0), scored(5.0), scored(3.0)];

        let selected = TournamentSelector::new(3)
            .select_individual(&individuals, &mut rng)
            .unwrap();
        assert_eq!(selected.fitness, 5.0);
    }

    #[test]
    fn test_tournament_never_picks_the_worst() {
        let mut rng = SmallRng::seed_from_u64(4);
        let individuals = vec![scored(1.0), scored(5.0), scored(3.0), scored(2.0)];
        let selector = TournamentSelector::new(2);

        for _ in 0..50 {
            let selected = selector.select_individual(&individuals, &mut rng).unwrap();
            assert!(selected.fitness > 1.0);
        }
    }
}
