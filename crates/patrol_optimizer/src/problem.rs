pub mod configuration_error;
pub mod location;
pub mod network;
pub mod patrol_problem;
pub mod revisit_policy;
pub mod shift;
pub mod travel_time_matrix;
pub mod vehicle;
