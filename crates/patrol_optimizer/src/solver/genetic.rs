pub mod fitness;
pub mod fitness_cache;
pub mod genetic_params;
pub mod genetic_scheduler;
pub mod individual;
pub mod operators;
pub mod population;
pub mod seeding;
pub mod statistics;
