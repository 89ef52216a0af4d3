use serde::Serialize;

use crate::problem::{shift::ShiftIdx, vehicle::VehicleIdx};

/// Dense table with one cell per (shift, vehicle) pair, stored shift-major.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScheduleTable<T> {
    shift_count: usize,
    vehicle_count: usize,
    cells: Vec<T>,
}

impl<T> ScheduleTable<T> {
    pub fn from_fn<F>(shift_count: usize, vehicle_count: usize, mut f: F) -> Self
    where
        F: FnMut(ShiftIdx, VehicleIdx) -> T,
    {
        let cells = (0..shift_count)
            .flat_map(|shift| (0..vehicle_count).map(move |vehicle| (shift, vehicle)))
            .map(|(shift, vehicle)| f(ShiftIdx::new(shift), VehicleIdx::new(vehicle)))
            .collect();

        ScheduleTable {
            shift_count,
            vehicle_count,
            cells,
        }
    }

    #[inline(always)]
    fn index(&self, shift: ShiftIdx, vehicle: VehicleIdx) -> usize {
        shift.get() * self.vehicle_count + vehicle.get()
    }

    pub fn shift_count(&self) -> usize {
        self.shift_count
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicle_count
    }

    pub fn get(&self, shift: ShiftIdx, vehicle: VehicleIdx) -> &T {
        &self.cells[self.index(shift, vehicle)]
    }

    pub fn get_mut(&mut self, shift: ShiftIdx, vehicle: VehicleIdx) -> &mut T {
        let index = self.index(shift, vehicle);
        &mut self.cells[index]
    }

    pub fn set(&mut self, shift: ShiftIdx, vehicle: VehicleIdx, value: T) {
        let index = self.index(shift, vehicle);
        self.cells[index] = value;
    }

    /// Cells in shift-major order with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (ShiftIdx, VehicleIdx, &T)> {
        self.cells.iter().enumerate().map(|(index, value)| {
            (
                ShiftIdx::new(index / self.vehicle_count),
                VehicleIdx::new(index % self.vehicle_count),
                value,
            )
        })
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }
}

impl<T: Default> ScheduleTable<T> {
    pub fn new(shift_count: usize, vehicle_count: usize) -> Self {
        Self::from_fn(shift_count, vehicle_count, |_, _| T::default())
    }
}
