pub mod genetic;
pub mod location_state;
pub mod result_summary;
pub mod route;
pub mod route_builder;
pub mod schedule;
pub mod schedule_simulator;
pub mod schedule_table;
pub mod selection_strategy;
pub mod simulation_params;
