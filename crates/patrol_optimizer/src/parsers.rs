pub mod heuristic_seeds;
