use crate::solver::genetic::population::ScoredIndividual;

pub trait SelectIndividual {
    fn select_individual<'a>(
        &self,
        individuals: &'a [ScoredIndividual],
        rng: &mut impl rand::Rng,
    ) -> Option<&'a ScoredIndividual>;
}
