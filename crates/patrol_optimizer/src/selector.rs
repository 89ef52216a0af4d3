pub mod select_individual;
pub mod select_tournament;
