use serde::Serialize;

use crate::define_index_newtype;

use super::travel_time_matrix::Time;

define_index_newtype!(ShiftIdx);

/// Time window in which one vehicle executes one route.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Shift {
    index: ShiftIdx,
    start_time: Time,
    end_time: Time,
}

impl Shift {
    pub fn new(index: ShiftIdx, start_time: Time, length: Time) -> Self {
        Shift {
            index,
            start_time,
            end_time: start_time + length,
        }
    }

    pub fn index(&self) -> ShiftIdx {
        self.index
    }

    pub fn start_time(&self) -> Time {
        self.start_time
    }

    pub fn end_time(&self) -> Time {
        self.end_time
    }

    pub fn length(&self) -> Time {
        self.end_time - self.start_time
    }
}
