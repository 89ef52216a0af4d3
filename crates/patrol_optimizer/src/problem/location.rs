use serde::{Deserialize, Serialize};

use crate::define_index_newtype;

define_index_newtype!(LocationIdx);

/// Where the depot sits in a network of `location_count` patrol sites plus one depot.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DepotPlacement {
    #[default]
    First,
    Last,
}

impl DepotPlacement {
    pub fn depot(&self, location_count: usize) -> LocationIdx {
        match self {
            DepotPlacement::First => LocationIdx::new(0),
            DepotPlacement::Last => LocationIdx::new(location_count),
        }
    }
}

/// Every node of the network except the depot.
pub fn patrol_sites(
    num_locations: usize,
    depot: LocationIdx,
) -> impl Iterator<Item = LocationIdx> + Clone {
    (0..num_locations)
        .map(LocationIdx::new)
        .filter(move |&location| location != depot)
}
