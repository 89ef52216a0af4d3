use serde::Serialize;

use crate::solver::route::Route;

use super::{
    configuration_error::{
        ConfigurationError, ensure_non_negative_duration, ensure_positive_count,
        ensure_positive_duration,
    },
    location::{LocationIdx, patrol_sites},
    network::NetworkModel,
    revisit_policy::RevisitPolicy,
    shift::{Shift, ShiftIdx},
    travel_time_matrix::{Time, TravelTimeMatrix},
    vehicle::VehicleIdx,
};

pub const DEFAULT_SHIFT_LENGTH: Time = 120.0;
pub const DEFAULT_PATROL_DURATION: Time = 5.0;
pub const DEFAULT_REST_PERIOD: Time = 10.0;

/// A validated patrol scheduling problem.
#[derive(Debug, Clone)]
pub struct PatrolProblem {
    vehicle_count: usize,
    location_count: usize,
    shift_lengths: Vec<Time>,
    patrol_duration: Time,
    rest_period: Time,
    revisit_policy: RevisitPolicy,
    network: NetworkModel,
}

impl PatrolProblem {
    pub fn vehicle_count(&self) -> usize {
        self.vehicle_count
    }

    /// Number of patrol sites, the depot excluded.
    pub fn location_count(&self) -> usize {
        self.location_count
    }

    /// Number of network nodes, the depot included.
    pub fn num_locations(&self) -> usize {
        self.location_count + 1
    }

    pub fn shift_count(&self) -> usize {
        self.shift_lengths.len()
    }

    pub fn shift_lengths(&self) -> &[Time] {
        &self.shift_lengths
    }

    pub fn shift_length(&self, shift: ShiftIdx) -> Time {
        self.shift_lengths[shift.get()]
    }

    pub fn patrol_duration(&self) -> Time {
        self.patrol_duration
    }

    pub fn rest_period(&self) -> Time {
        self.rest_period
    }

    pub fn revisit_policy(&self) -> &RevisitPolicy {
        &self.revisit_policy
    }

    pub fn network(&self) -> &NetworkModel {
        &self.network
    }

    pub fn travel_times(&self) -> &TravelTimeMatrix {
        self.network.base()
    }

    pub fn depot(&self) -> LocationIdx {
        self.network.depot()
    }

    pub fn is_depot(&self, location: LocationIdx) -> bool {
        location == self.depot()
    }

    pub fn sites(&self) -> impl Iterator<Item = LocationIdx> + Clone {
        patrol_sites(self.num_locations(), self.depot())
    }

    pub fn vehicles(&self) -> impl Iterator<Item = VehicleIdx> {
        (0..self.vehicle_count).map(VehicleIdx::new)
    }

    pub fn shifts(&self) -> impl Iterator<Item = ShiftIdx> {
        (0..self.shift_count()).map(ShiftIdx::new)
    }

    /// Window of `shift` for a vehicle whose previous shift produced `previous_route`.
    ///
    /// The first shift starts at time zero. Later shifts start once the rest period
    /// following the last timestamp of the previous route has elapsed.
    pub fn shift_window(&self, shift: ShiftIdx, previous_route: Option<&Route>) -> Shift {
        let start_time = previous_route
            .and_then(Route::last_timestamp)
            .map_or(0.0, |previous_end| previous_end + self.rest_period);

        Shift::new(shift, start_time, self.shift_length(shift))
    }

    pub fn summary(&self) -> ProblemSummary {
        ProblemSummary {
            vehicle_count: self.vehicle_count,
            shift_count: self.shift_count(),
            location_count: self.location_count,
            rest_period: self.rest_period,
        }
    }
}

/// The dimensions of a problem as they appear in result blocks and seed lookups.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ProblemSummary {
    pub vehicle_count: usize,
    pub shift_count: usize,
    pub location_count: usize,
    pub rest_period: Time,
}

#[derive(Default)]
pub struct PatrolProblemBuilder {
    vehicle_count: Option<usize>,
    location_count: Option<usize>,
    shift_count: Option<usize>,
    shift_length: Option<Time>,
    shift_lengths: Option<Vec<Time>>,
    patrol_duration: Option<Time>,
    rest_period: Option<Time>,
    revisit_policy: Option<RevisitPolicy>,
    network: Option<NetworkModel>,
}

impl PatrolProblemBuilder {
    pub fn set_vehicle_count(&mut self, vehicle_count: usize) -> &mut PatrolProblemBuilder {
        self.vehicle_count = Some(vehicle_count);
        self
    }

    pub fn set_location_count(&mut self, location_count: usize) -> &mut PatrolProblemBuilder {
        self.location_count = Some(location_count);
        self
    }

    pub fn set_shift_count(&mut self, shift_count: usize) -> &mut PatrolProblemBuilder {
        self.shift_count = Some(shift_count);
        self
    }

    /// Same length for every shift.
    pub fn set_shift_length(&mut self, shift_length: Time) -> &mut PatrolProblemBuilder {
        self.shift_length = Some(shift_length);
        self
    }

    /// One length per shift, overrides `set_shift_length`.
    pub fn set_shift_lengths(&mut self, shift_lengths: Vec<Time>) -> &mut PatrolProblemBuilder {
        self.shift_lengths = Some(shift_lengths);
        self
    }

    pub fn set_patrol_duration(&mut self, patrol_duration: Time) -> &mut PatrolProblemBuilder {
        self.patrol_duration = Some(patrol_duration);
        self
    }

    pub fn set_rest_period(&mut self, rest_period: Time) -> &mut PatrolProblemBuilder {
        self.rest_period = Some(rest_period);
        self
    }

    pub fn set_revisit_policy(&mut self, revisit_policy: RevisitPolicy) -> &mut PatrolProblemBuilder {
        self.revisit_policy = Some(revisit_policy);
        self
    }

    pub fn set_network(&mut self, network: NetworkModel) -> &mut PatrolProblemBuilder {
        self.network = Some(network);
        self
    }

    pub fn build(self) -> Result<PatrolProblem, ConfigurationError> {
        let vehicle_count = ensure_positive_count("vehicle_count", self.vehicle_count.unwrap_or(0))?;
        let location_count =
            ensure_positive_count("location_count", self.location_count.unwrap_or(0))?;
        let shift_count = ensure_positive_count("shift_count", self.shift_count.unwrap_or(0))?;

        let shift_lengths = match self.shift_lengths {
            Some(shift_lengths) => {
                if shift_lengths.len() != shift_count {
                    return Err(ConfigurationError::ShiftLengthsMismatch {
                        expected: shift_count,
                        actual: shift_lengths.len(),
                    });
                }
                shift_lengths
            }
            None => vec![self.shift_length.unwrap_or(DEFAULT_SHIFT_LENGTH); shift_count],
        };

        for &shift_length in &shift_lengths {
            ensure_positive_duration("shift_length", shift_length)?;
        }

        let patrol_duration = ensure_positive_duration(
            "patrol_duration",
            self.patrol_duration.unwrap_or(DEFAULT_PATROL_DURATION),
        )?;
        let rest_period = ensure_non_negative_duration(
            "rest_period",
            self.rest_period.unwrap_or(DEFAULT_REST_PERIOD),
        )?;

        let revisit_policy = self.revisit_policy.unwrap_or_default();
        ensure_non_negative_duration("cooldown", revisit_policy.cooldown())?;
        if let Some(max_revisits) = revisit_policy.max_revisits() {
            ensure_positive_count("max_revisits", max_revisits)?;
        }

        let network = self.network.ok_or(ConfigurationError::MissingNetwork)?;
        if network.num_locations() != location_count + 1 {
            return Err(ConfigurationError::MalformedMatrix(format!(
                "expected {} nodes for {location_count} locations and the depot, got {}",
                location_count + 1,
                network.num_locations()
            )));
        }
        if network.depot().get() >= network.num_locations() {
            return Err(ConfigurationError::MalformedMatrix(format!(
                "depot {} is outside the network",
                network.depot()
            )));
        }

        Ok(PatrolProblem {
            vehicle_count,
            location_count,
            shift_lengths,
            patrol_duration,
            rest_period,
            revisit_policy,
            network,
        })
    }
}
