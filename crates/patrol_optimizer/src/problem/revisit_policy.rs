use serde::{Deserialize, Serialize};

use crate::solver::location_state::LocationState;

use super::{location::LocationIdx, travel_time_matrix::Time};

pub const DEFAULT_COOLDOWN: Time = 30.0;

/// Decides whether a location may be (re)visited at a given time.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct RevisitPolicy {
    cooldown: Time,
    max_revisits: Option<usize>,
}

impl Default for RevisitPolicy {
    fn default() -> Self {
        RevisitPolicy {
            cooldown: DEFAULT_COOLDOWN,
            max_revisits: None,
        }
    }
}

impl RevisitPolicy {
    pub fn new(cooldown: Time, max_revisits: Option<usize>) -> Self {
        RevisitPolicy {
            cooldown,
            max_revisits,
        }
    }

    pub fn cooldown(&self) -> Time {
        self.cooldown
    }

    pub fn max_revisits(&self) -> Option<usize> {
        self.max_revisits
    }

    pub fn needs_revisit(&self, now: Time, location: LocationIdx, state: &LocationState) -> bool {
        let cooled_down = state
            .last_visit(location)
            .is_none_or(|last_visit| now - last_visit >= self.cooldown);

        let unlocked = state
            .lock_until(location)
            .is_none_or(|lock_until| lock_until <= now);

        let under_cap = self
            .max_revisits
            .is_none_or(|max_revisits| state.visit_count(location) < max_revisits);

        cooled_down && unlocked && under_cap
    }
}

#[cfg(test)]
mod tests {
    use crate::problem::{shift::ShiftIdx, vehicle::VehicleIdx};

    use super::*;

    fn visited_state(location: LocationIdx, arrival: Time, patrol_duration: Time) -> LocationState {
        let mut state = LocationState::new(4);
        state.record_visit(
            location,
            ShiftIdx::new(0),
            VehicleIdx::new(0),
            arrival,
            patrol_duration,
        );
        state
    }

    #[test]
    fn test_unvisited_location_needs_revisit() {
        let policy = RevisitPolicy::default();
        let state = LocationState::new(4);
        assert!(policy.needs_revisit(0.0, LocationIdx::new(2), &state));
    }

    #[test]
    fn test_cooldown_boundary() {
        let policy = RevisitPolicy::new(30.0, None);
        let location = LocationIdx::new(1);
        let state = visited_state(location, 10.0, 5.0);

        assert!(!policy.needs_revisit(39.0, location, &state));
        assert!(policy.needs_revisit(40.0, location, &state));
    }

    #[test]
    fn test_lock_blocks_until_patrol_ends() {
        let policy = RevisitPolicy::new(0.0, None);
        let location = LocationIdx::new(1);
        let state = visited_state(location, 10.0, 5.0);

        assert!(!policy.needs_revisit(14.0, location, &state));
        assert!(policy.needs_revisit(15.0, location, &state));
    }

    #[test]
    fn test_max_revisits_cap() {
        let policy = RevisitPolicy::new(0.0, Some(1));
        let location = LocationIdx::new(3);
        let state = visited_state(location, 10.0, 5.0);

        assert!(!policy.needs_revisit(1000.0, location, &state));
        assert!(policy.needs_revisit(1000.0, LocationIdx::new(2), &state));
    }
}
