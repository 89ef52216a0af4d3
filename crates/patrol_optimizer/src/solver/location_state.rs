use serde::Serialize;

use crate::problem::{
    location::LocationIdx, shift::ShiftIdx, travel_time_matrix::Time, vehicle::VehicleIdx,
};

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct VisitRecord {
    pub location: LocationIdx,
    pub shift: ShiftIdx,
    pub vehicle: VehicleIdx,
    pub timestamp: Time,
}

/// Visit history of every location during one simulation run.
///
/// Shared by all vehicles and shifts of the run, written only by the route
/// currently being built.
#[derive(Debug, Clone, Default)]
pub struct LocationState {
    last_visit: Vec<Option<Time>>,
    lock_until: Vec<Option<Time>>,
    visit_count: Vec<usize>,
    records: Vec<VisitRecord>,
}

impl LocationState {
    pub fn new(num_locations: usize) -> Self {
        LocationState {
            last_visit: vec![None; num_locations],
            lock_until: vec![None; num_locations],
            visit_count: vec![0; num_locations],
            records: Vec::new(),
        }
    }

    pub fn last_visit(&self, location: LocationIdx) -> Option<Time> {
        self.last_visit[location.get()]
    }

    pub fn lock_until(&self, location: LocationIdx) -> Option<Time> {
        self.lock_until[location.get()]
    }

    pub fn visit_count(&self, location: LocationIdx) -> usize {
        self.visit_count[location.get()]
    }

    pub fn record_visit(
        &mut self,
        location: LocationIdx,
        shift: ShiftIdx,
        vehicle: VehicleIdx,
        arrival_time: Time,
        patrol_duration: Time,
    ) {
        let index = location.get();
        self.last_visit[index] = Some(arrival_time);
        self.lock_until[index] = Some(arrival_time + patrol_duration);
        self.visit_count[index] += 1;
        self.records.push(VisitRecord {
            location,
            shift,
            vehicle,
            timestamp: arrival_time,
        });
    }

    pub fn records(&self) -> &[VisitRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<VisitRecord> {
        self.records
    }

    pub fn distinct_locations_visited(&self) -> usize {
        self.visit_count.iter().filter(|&&count| count > 0).count()
    }

    pub fn total_visits(&self) -> usize {
        self.visit_count.iter().sum()
    }
}
