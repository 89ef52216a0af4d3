use std::fmt;

use jiff::{SignedDuration, Zoned, civil::DateTime};
use serde::Serialize;

use crate::problem::patrol_problem::{PatrolProblem, ProblemSummary};

use super::{genetic::genetic_scheduler::GeneticResult, schedule::Schedule};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SEPARATOR: &str = "-----";

/// Averages of one or more simulation runs, rendered as a result block.
#[derive(Serialize, Debug, Clone)]
pub struct ResultSummary {
    pub timestamp: DateTime,
    pub problem: ProblemSummary,
    pub average_unique_locations: f64,
    pub average_total_visits: f64,
    pub execution_time: Option<SignedDuration>,
}

impl ResultSummary {
    /// Averages the given schedules. An empty slice averages to zero.
    pub fn from_schedules(
        problem: &PatrolProblem,
        schedules: &[Schedule],
        execution_time: Option<SignedDuration>,
    ) -> Self {
        let runs = schedules.len().max(1) as f64;
        let unique: usize = schedules
            .iter()
            .map(Schedule::distinct_locations_visited)
            .sum();
        let total: usize = schedules.iter().map(Schedule::total_visits).sum();

        ResultSummary {
            timestamp: Zoned::now().datetime(),
            problem: problem.summary(),
            average_unique_locations: unique as f64 / runs,
            average_total_visits: total as f64 / runs,
            execution_time,
        }
    }
}

impl fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timestamp: {}", self.timestamp.strftime(TIMESTAMP_FORMAT))?;
        writeln!(
            f,
            "{} => Average Unique Locations Visited: {:?}, Average Total Visits: {:?}.",
            DimensionsLine(&self.problem),
            self.average_unique_locations,
            self.average_total_visits
        )?;
        if let Some(execution_time) = self.execution_time {
            writeln!(f, "Execution Time: {:.2} seconds", execution_time.as_secs_f64())?;
        }
        writeln!(f, "{SEPARATOR}")
    }
}

/// Best fitness of a genetic run, rendered as a result block.
#[derive(Serialize, Debug, Clone)]
pub struct GeneticSummary {
    pub timestamp: DateTime,
    pub problem: ProblemSummary,
    pub best_fitness: f64,
    pub average_fitness: f64,
    pub execution_time: Option<SignedDuration>,
}

impl GeneticSummary {
    pub fn from_result(
        problem: &PatrolProblem,
        result: &GeneticResult,
        execution_time: Option<SignedDuration>,
    ) -> Self {
        GeneticSummary {
            timestamp: Zoned::now().datetime(),
            problem: problem.summary(),
            best_fitness: result.best_fitness,
            average_fitness: result.final_average_fitness,
            execution_time,
        }
    }
}

impl fmt::Display for GeneticSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timestamp: {}", self.timestamp.strftime(TIMESTAMP_FORMAT))?;
        writeln!(
            f,
            "{} => Best fitness (distinct locations visited): {:?}, Average fitness: {:?}",
            DimensionsLine(&self.problem),
            self.best_fitness,
            self.average_fitness
        )?;
        if let Some(execution_time) = self.execution_time {
            writeln!(f, "Execution Time: {:.2} seconds", execution_time.as_secs_f64())?;
        }
        writeln!(f, "{SEPARATOR}")
    }
}

struct DimensionsLine<'a>(&'a ProblemSummary);

impl fmt::Display for DimensionsLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vehicles, {} shifts, {} locations, {} rest time",
            self.0.vehicle_count, self.0.shift_count, self.0.location_count, self.0.rest_period
        )
    }
}
