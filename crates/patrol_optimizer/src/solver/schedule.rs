use std::fmt;

use serde::Serialize;

use crate::problem::{
    location::LocationIdx,
    shift::{Shift, ShiftIdx},
    vehicle::VehicleIdx,
};

use super::{location_state::VisitRecord, route::Route, schedule_table::ScheduleTable};

/// Outcome of one simulation run.
#[derive(Serialize, Debug, Clone)]
pub struct Schedule {
    routes: ScheduleTable<Route>,
    shifts: ScheduleTable<Shift>,
    visits: Vec<VisitRecord>,
    distinct_locations_visited: usize,
    total_visits: usize,
    depot: LocationIdx,
}

impl Schedule {
    pub fn new(
        routes: ScheduleTable<Route>,
        shifts: ScheduleTable<Shift>,
        visits: Vec<VisitRecord>,
        distinct_locations_visited: usize,
        total_visits: usize,
        depot: LocationIdx,
    ) -> Self {
        Schedule {
            routes,
            shifts,
            visits,
            distinct_locations_visited,
            total_visits,
            depot,
        }
    }

    pub fn routes(&self) -> &ScheduleTable<Route> {
        &self.routes
    }

    pub fn into_routes(self) -> ScheduleTable<Route> {
        self.routes
    }

    pub fn shifts(&self) -> &ScheduleTable<Shift> {
        &self.shifts
    }

    pub fn visits(&self) -> &[VisitRecord] {
        &self.visits
    }

    pub fn distinct_locations_visited(&self) -> usize {
        self.distinct_locations_visited
    }

    pub fn total_visits(&self) -> usize {
        self.total_visits
    }

    pub fn depot(&self) -> LocationIdx {
        self.depot
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Total distinct locations visited (excluding depots): {}",
            self.distinct_locations_visited
        )?;
        writeln!(f, "Total visits (including revisits): {}", self.total_visits)?;

        for vehicle in (0..self.routes.vehicle_count()).map(VehicleIdx::new) {
            writeln!(f, "Vehicle {vehicle}:")?;

            for shift_index in (0..self.routes.shift_count()).map(ShiftIdx::new) {
                let route = self.routes.get(shift_index, vehicle);
                let shift = self.shifts.get(shift_index, vehicle);
                let locations = route
                    .locations()
                    .map(|location| location.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");

                writeln!(
                    f,
                    "  Shift {} [{} - {}]:",
                    shift_index,
                    shift.start_time(),
                    shift.end_time()
                )?;
                writeln!(f, "    Route: [{locations}]")?;
                writeln!(f, "    Timing:")?;

                for stop in route.stops() {
                    let kind = if stop.location == self.depot {
                        "Depot"
                    } else {
                        "Location"
                    };
                    writeln!(
                        f,
                        "      {} {} at time {} minutes",
                        kind, stop.location, stop.arrival_time
                    )?;
                }
            }
        }

        Ok(())
    }
}
