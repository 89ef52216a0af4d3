use std::hash::Hasher;

use serde::Serialize;

use crate::problem::{
    location::LocationIdx,
    travel_time_matrix::{Time, TravelTimeMatrix},
};

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Stop {
    pub location: LocationIdx,
    pub arrival_time: Time,
}

impl Stop {
    pub fn new(location: LocationIdx, arrival_time: Time) -> Self {
        Stop {
            location,
            arrival_time,
        }
    }
}

/// Ordered stops of one vehicle during one shift, starting at the depot.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct Route {
    stops: Vec<Stop>,
}

impl Route {
    pub fn start(depot: LocationIdx, start_time: Time) -> Self {
        Route {
            stops: vec![Stop::new(depot, start_time)],
        }
    }

    pub fn from_stops(stops: Vec<Stop>) -> Self {
        Route { stops }
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn push(&mut self, stop: Stop) {
        self.stops.push(stop);
    }

    pub fn first(&self) -> Option<&Stop> {
        self.stops.first()
    }

    pub fn last(&self) -> Option<&Stop> {
        self.stops.last()
    }

    pub fn last_timestamp(&self) -> Option<Time> {
        self.stops.last().map(|stop| stop.arrival_time)
    }

    pub fn locations(&self) -> impl Iterator<Item = LocationIdx> + '_ {
        self.stops.iter().map(|stop| stop.location)
    }

    pub fn patrol_stops(&self, depot: LocationIdx) -> impl Iterator<Item = &Stop> + '_ {
        self.stops.iter().filter(move |stop| stop.location != depot)
    }

    pub fn has_patrol_stops(&self, depot: LocationIdx) -> bool {
        self.patrol_stops(depot).next().is_some()
    }

    pub fn returns_to_depot(&self, depot: LocationIdx) -> bool {
        self.stops.len() > 1 && self.stops.last().is_some_and(|stop| stop.location == depot)
    }

    /// Positions of the stops between the leading depot and the closing depot, if any.
    pub fn interior_range(&self, depot: LocationIdx) -> std::ops::Range<usize> {
        let end = if self.returns_to_depot(depot) {
            self.stops.len() - 1
        } else {
            self.stops.len()
        };
        1.min(end)..end
    }

    /// Swaps the locations of two stops, the arrival times stay where they are.
    pub fn swap_locations(&mut self, first: usize, second: usize) {
        let location = self.stops[first].location;
        self.stops[first].location = self.stops[second].location;
        self.stops[second].location = location;
    }

    /// Sum of consecutive leg durations, legs without an edge are skipped.
    pub fn total_travel_time(&self, travel_times: &TravelTimeMatrix) -> Time {
        self.stops
            .windows(2)
            .filter_map(|leg| travel_times.travel_time(leg[0].location, leg[1].location))
            .sum()
    }

    pub(crate) fn hash_into<H: Hasher>(&self, hasher: &mut H) {
        hasher.write_usize(self.stops.len());
        for stop in &self.stops {
            hasher.write_usize(stop.location.get());
            hasher.write_u64(stop.arrival_time.to_bits());
        }
    }
}
