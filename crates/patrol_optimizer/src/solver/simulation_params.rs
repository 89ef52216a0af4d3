use serde::{Deserialize, Serialize};

use crate::problem::{
    configuration_error::{ConfigurationError, ensure_probability},
    shift::ShiftIdx,
    vehicle::VehicleIdx,
};

use super::selection_strategy::SelectionStrategy;

/// Order in which (shift, vehicle) pairs are routed. It matters because all
/// routes of a run share the same location state.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingOrder {
    /// Every vehicle's shift 0, then every vehicle's shift 1, ...
    #[default]
    ShiftMajor,
    /// All shifts of vehicle 0, then all shifts of vehicle 1, ...
    VehicleMajor,
}

impl ProcessingOrder {
    pub fn pairs(
        &self,
        shift_count: usize,
        vehicle_count: usize,
    ) -> Box<dyn Iterator<Item = (ShiftIdx, VehicleIdx)>> {
        match self {
            ProcessingOrder::ShiftMajor => Box::new((0..shift_count).flat_map(move |shift| {
                (0..vehicle_count)
                    .map(move |vehicle| (ShiftIdx::new(shift), VehicleIdx::new(vehicle)))
            })),
            ProcessingOrder::VehicleMajor => Box::new((0..vehicle_count).flat_map(move |vehicle| {
                (0..shift_count)
                    .map(move |shift| (ShiftIdx::new(shift), VehicleIdx::new(vehicle)))
            })),
        }
    }
}

#[derive(Clone, Debug)]
pub struct SimulationParams {
    pub selection_strategy: SelectionStrategy,
    pub processing_order: ProcessingOrder,
    /// Probability that a run uses fluctuated travel times instead of the base network.
    pub fluctuation_probability: f64,
    pub random_seed: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            selection_strategy: SelectionStrategy::NearestFromDepot,
            processing_order: ProcessingOrder::ShiftMajor,
            fluctuation_probability: 0.25,
            random_seed: 0,
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        ensure_probability("fluctuation_probability", self.fluctuation_probability)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_orders() {
        let shift_major: Vec<(usize, usize)> = ProcessingOrder::ShiftMajor
            .pairs(2, 2)
            .map(|(shift, vehicle)| (shift.get(), vehicle.get()))
            .collect();
        assert_eq!(shift_major, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);

        let vehicle_major: Vec<(usize, usize)> = ProcessingOrder::VehicleMajor
            .pairs(2, 2)
            .map(|(shift, vehicle)| (shift.get(), vehicle.get()))
            .collect();
        assert_eq!(vehicle_major, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_validate_fluctuation_probability() {
        let params = SimulationParams {
            fluctuation_probability: -0.1,
            ..SimulationParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigurationError::ProbabilityOutOfRange { .. })
        ));
        assert!(SimulationParams::default().validate().is_ok());
    }
}
