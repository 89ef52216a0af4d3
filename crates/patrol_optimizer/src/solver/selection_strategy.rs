use serde::{Deserialize, Serialize};

/// How the route builder picks the next location among eligible candidates.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Candidate closest to the depot. An infeasible pick ends the route.
    #[default]
    NearestFromDepot,
    /// Candidate closest to the current location. An infeasible pick ends the route.
    NearestFromCurrent,
    /// First feasible candidate in a random order.
    ShuffleFirstFeasible,
}
