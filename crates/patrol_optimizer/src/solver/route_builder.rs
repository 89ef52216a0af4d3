use fixedbitset::FixedBitSet;
use rand::{Rng, seq::SliceRandom};
use tracing::debug;

use crate::problem::{
    location::LocationIdx,
    patrol_problem::PatrolProblem,
    shift::Shift,
    travel_time_matrix::{Time, TravelTimeMatrix},
    vehicle::VehicleIdx,
};

use super::{
    location_state::LocationState,
    route::{Route, Stop},
    selection_strategy::SelectionStrategy,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct PlannedVisit {
    location: LocationIdx,
    arrival_time: Time,
    departure_time: Time,
}

/// Builds the route of one vehicle during one shift.
pub struct RouteBuilder<'a> {
    problem: &'a PatrolProblem,
    travel_times: &'a TravelTimeMatrix,
    strategy: SelectionStrategy,
}

impl<'a> RouteBuilder<'a> {
    pub fn new(
        problem: &'a PatrolProblem,
        travel_times: &'a TravelTimeMatrix,
        strategy: SelectionStrategy,
    ) -> Self {
        RouteBuilder {
            problem,
            travel_times,
            strategy,
        }
    }

    pub fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }

    /// Visits eligible locations until the shift budget runs out, then returns to the
    /// depot if there is still time for it. Every visit is recorded in `state`.
    pub fn build_route<R>(
        &self,
        shift: &Shift,
        vehicle: VehicleIdx,
        state: &mut LocationState,
        rng: &mut R,
    ) -> Route
    where
        R: Rng,
    {
        let depot = self.problem.depot();
        let mut route = Route::start(depot, shift.start_time());
        let mut visited = FixedBitSet::with_capacity(self.problem.num_locations());
        let mut candidates: Vec<LocationIdx> = Vec::with_capacity(self.problem.location_count());

        let mut current = depot;
        let mut current_time = shift.start_time();

        loop {
            self.collect_candidates(current, current_time, &visited, state, &mut candidates);
            if candidates.is_empty() {
                break;
            }

            let Some(visit) =
                self.select(current, current_time, shift.end_time(), &mut candidates, rng)
            else {
                break;
            };

            route.push(Stop::new(visit.location, visit.arrival_time));
            visited.insert(visit.location.get());
            state.record_visit(
                visit.location,
                shift.index(),
                vehicle,
                visit.arrival_time,
                self.problem.patrol_duration(),
            );

            current = visit.location;
            current_time = visit.departure_time;
        }

        match self.travel_times.travel_time(current, depot) {
            Some(time) if current_time + time <= shift.end_time() => {
                route.push(Stop::new(depot, current_time + time));
            }
            _ => {
                debug!(
                    "Vehicle {} ends shift {} at location {} without returning to the depot",
                    vehicle,
                    shift.index(),
                    current
                );
            }
        }

        route
    }

    fn collect_candidates(
        &self,
        current: LocationIdx,
        now: Time,
        visited: &FixedBitSet,
        state: &LocationState,
        candidates: &mut Vec<LocationIdx>,
    ) {
        let policy = self.problem.revisit_policy();

        candidates.clear();
        candidates.extend(self.problem.sites().filter(|&location| {
            !visited.contains(location.get())
                && self.travel_times.is_reachable(current, location)
                && policy.needs_revisit(now, location, state)
        }));
    }

    fn select<R>(
        &self,
        current: LocationIdx,
        current_time: Time,
        end_time: Time,
        candidates: &mut [LocationIdx],
        rng: &mut R,
    ) -> Option<PlannedVisit>
    where
        R: Rng,
    {
        match self.strategy {
            SelectionStrategy::NearestFromDepot => {
                let next = self.nearest(self.problem.depot(), candidates)?;
                self.plan_visit(current, current_time, end_time, next)
            }
            SelectionStrategy::NearestFromCurrent => {
                let next = self.nearest(current, candidates)?;
                self.plan_visit(current, current_time, end_time, next)
            }
            SelectionStrategy::ShuffleFirstFeasible => {
                candidates.shuffle(rng);
                candidates
                    .iter()
                    .find_map(|&next| self.plan_visit(current, current_time, end_time, next))
            }
        }
    }

    /// Closest candidate to `origin`, the lowest id wins ties.
    fn nearest(&self, origin: LocationIdx, candidates: &[LocationIdx]) -> Option<LocationIdx> {
        candidates
            .iter()
            .filter_map(|&location| {
                self.travel_times
                    .travel_time(origin, location)
                    .map(|time| (location, time))
            })
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(location, _)| location)
    }

    fn plan_visit(
        &self,
        current: LocationIdx,
        current_time: Time,
        end_time: Time,
        next: LocationIdx,
    ) -> Option<PlannedVisit> {
        let arrival_time = current_time + self.travel_times.travel_time(current, next)?;
        let departure_time = arrival_time + self.problem.patrol_duration();
        let back_to_depot = self.travel_times.travel_time(next, self.problem.depot())?;

        (departure_time + back_to_depot <= end_time).then_some(PlannedVisit {
            location: next,
            arrival_time,
            departure_time,
        })
    }
}
