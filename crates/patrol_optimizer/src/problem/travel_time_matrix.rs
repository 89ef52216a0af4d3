use std::sync::Arc;

use super::{configuration_error::ConfigurationError, location::LocationIdx};

pub type Time = f64;

const UNREACHABLE: Time = f64::INFINITY;

/// Symmetric travel times between every pair of network nodes, in minutes.
///
/// Pairs without a direct edge are unreachable. The buffer is shared so that
/// cloning a matrix for a simulation run is cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelTimeMatrix {
    times: Arc<Vec<Time>>,
    num_locations: usize,
}

impl TravelTimeMatrix {
    pub(crate) fn from_flat(times: Vec<Time>, num_locations: usize) -> Self {
        debug_assert_eq!(times.len(), num_locations * num_locations);
        TravelTimeMatrix {
            times: Arc::new(times),
            num_locations,
        }
    }

    pub(crate) fn unconnected(num_locations: usize) -> Self {
        let mut times = vec![UNREACHABLE; num_locations * num_locations];
        for i in 0..num_locations {
            times[i * num_locations + i] = 0.0;
        }
        Self::from_flat(times, num_locations)
    }

    /// Complete network where every edge takes `time` minutes.
    pub fn from_constant(num_locations: usize, time: Time) -> Self {
        let times = (0..num_locations * num_locations)
            .map(|index| {
                if index / num_locations == index % num_locations {
                    0.0
                } else {
                    time
                }
            })
            .collect();

        Self::from_flat(times, num_locations)
    }

    /// Builds a matrix from explicit rows, `None` marking a missing edge.
    ///
    /// Rows must form a square symmetric matrix with positive finite times off the
    /// diagonal, and every node must have a direct edge to the depot.
    pub fn from_rows(
        rows: Vec<Vec<Option<Time>>>,
        depot: LocationIdx,
    ) -> Result<Self, ConfigurationError> {
        let num_locations = rows.len();
        if num_locations < 2 {
            return Err(ConfigurationError::MalformedMatrix(format!(
                "expected at least 2 nodes, got {num_locations}"
            )));
        }

        if depot.get() >= num_locations {
            return Err(ConfigurationError::MalformedMatrix(format!(
                "depot {depot} is outside a network of {num_locations} nodes"
            )));
        }

        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != num_locations)
        {
            return Err(ConfigurationError::MalformedMatrix(format!(
                "row {i} has {} entries, expected {num_locations}",
                row.len()
            )));
        }

        let mut matrix = Self::unconnected(num_locations);
        let times = Arc::make_mut(&mut matrix.times);

        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if i == j {
                    continue;
                }

                if value != rows[j][i] {
                    return Err(ConfigurationError::MalformedMatrix(format!(
                        "travel time between {i} and {j} is not symmetric"
                    )));
                }

                if let Some(time) = value {
                    if !time.is_finite() || time <= 0.0 {
                        return Err(ConfigurationError::MalformedMatrix(format!(
                            "travel time between {i} and {j} must be a positive finite value, got {time}"
                        )));
                    }
                    times[i * num_locations + j] = time;
                }
            }
        }

        if let Some(isolated) = (0..num_locations)
            .map(LocationIdx::new)
            .find(|&location| !matrix.is_reachable(depot, location))
        {
            return Err(ConfigurationError::MalformedMatrix(format!(
                "location {isolated} has no edge to the depot"
            )));
        }

        Ok(matrix)
    }

    #[inline(always)]
    fn index(&self, from: LocationIdx, to: LocationIdx) -> usize {
        from.get() * self.num_locations + to.get()
    }

    /// Travel time of the direct edge between two nodes, `None` when they are not connected.
    #[inline(always)]
    pub fn travel_time(&self, from: LocationIdx, to: LocationIdx) -> Option<Time> {
        let time = self.times[self.index(from, to)];
        time.is_finite().then_some(time)
    }

    #[inline(always)]
    pub fn is_reachable(&self, from: LocationIdx, to: LocationIdx) -> bool {
        self.times[self.index(from, to)].is_finite()
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    /// Existing edges `(i, j, time)` with `i < j`.
    pub fn edges(&self) -> impl Iterator<Item = (LocationIdx, LocationIdx, Time)> + '_ {
        (0..self.num_locations).flat_map(move |i| {
            ((i + 1)..self.num_locations).filter_map(move |j| {
                let from = LocationIdx::new(i);
                let to = LocationIdx::new(j);
                self.travel_time(from, to).map(|time| (from, to, time))
            })
        })
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    pub(crate) fn set_travel_time(&mut self, from: LocationIdx, to: LocationIdx, time: Time) {
        let forward = self.index(from, to);
        let backward = self.index(to, from);
        let times = Arc::make_mut(&mut self.times);
        times[forward] = time;
        times[backward] = time;
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.num_locations).all(|i| {
            (0..self.num_locations).all(|j| {
                let a = self.times[i * self.num_locations + j];
                let b = self.times[j * self.num_locations + i];
                a == b || (a.is_infinite() && b.is_infinite())
            })
        })
    }
}
