use std::hash::Hasher;

use fixedbitset::FixedBitSet;
use fxhash::FxHasher64;
use serde::Serialize;

use crate::{
    problem::{location::LocationIdx, shift::ShiftIdx, vehicle::VehicleIdx},
    solver::{route::Route, schedule_table::ScheduleTable},
};

/// Structural hash of an individual's routes.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

impl Fingerprint {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A complete schedule, one route per (shift, vehicle) gene.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Individual {
    routes: ScheduleTable<Route>,
}

impl Individual {
    pub fn new(routes: ScheduleTable<Route>) -> Self {
        Individual { routes }
    }

    pub fn routes(&self) -> &ScheduleTable<Route> {
        &self.routes
    }

    pub fn route(&self, shift: ShiftIdx, vehicle: VehicleIdx) -> &Route {
        self.routes.get(shift, vehicle)
    }

    pub(crate) fn route_mut(&mut self, shift: ShiftIdx, vehicle: VehicleIdx) -> &mut Route {
        self.routes.get_mut(shift, vehicle)
    }

    pub(crate) fn set_route(&mut self, shift: ShiftIdx, vehicle: VehicleIdx, route: Route) {
        self.routes.set(shift, vehicle, route);
    }

    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = FxHasher64::default();
        hasher.write_usize(self.routes.shift_count());
        hasher.write_usize(self.routes.vehicle_count());
        for route in self.routes.values() {
            route.hash_into(&mut hasher);
        }
        Fingerprint(hasher.finish())
    }

    pub fn distinct_locations(&self, depot: LocationIdx, num_locations: usize) -> usize {
        let mut visited = FixedBitSet::with_capacity(num_locations);
        for route in self.routes.values() {
            for stop in route.patrol_stops(depot) {
                visited.insert(stop.location.get());
            }
        }
        visited.count_ones(..)
    }

    pub fn total_visits(&self, depot: LocationIdx) -> usize {
        self.routes
            .values()
            .map(|route| route.patrol_stops(depot).count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use crate::solver::route::Stop;

    use super::*;

    fn individual(routes: &[&[usize]]) -> Individual {
        let mut routes = routes.iter();
        Individual::new(ScheduleTable::from_fn(routes.len(), 1, |_, _| {
            let locations = routes.next().unwrap();
            Route::from_stops(
                locations
                    .iter()
                    .enumerate()
                    .map(|(index, &location)| Stop::new(LocationIdx::new(location), index as f64 * 10.0))
                    .collect(),
            )
        }))
    }

    #[test]
    fn test_distinct_and_total_visits() {
        let depot = LocationIdx::new(0);
        let individual = individual(&[&[0, 1, 2, 0], &[0, 2, 3, 0]]);

        assert_eq!(individual.distinct_locations(depot, 4), 3);
        assert_eq!(individual.total_visits(depot), 4);
    }

    #[test]
    fn test_fingerprint_is_structural() {
        let first = individual(&[&[0, 1, 2, 0], &[0, 2, 3, 0]]);
        let same = individual(&[&[0, 1, 2, 0], &[0, 2, 3, 0]]);
        let swapped = individual(&[&[0, 2, 1, 0], &[0, 2, 3, 0]]);

        assert_eq!(first.fingerprint(), same.fingerprint());
        assert_ne!(first.fingerprint(), swapped.fingerprint());
    }
}
