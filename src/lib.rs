//! # aco_maze
//!
//! An ant colony optimization solver for grid mazes: generations of ants
//! lay pheromone along the routes they find, and the shortest route between
//! two cells emerges from the field. A genetic algorithm on top orders
//! product pick-ups along those routes.

pub mod error;
pub use error::AcoError;
pub use error::Result;

pub mod genetic;
pub use genetic::GeneticAlgorithm;

pub mod maze;
pub use maze::Maze;
pub use maze::SurroundingPheromone;

pub mod optimization;
pub use optimization::AntColonyOptimization;

pub mod route;
pub use route::Coordinate;
pub use route::Direction;
pub use route::PathSpecification;
pub use route::Route;

pub mod tsp;
pub use tsp::TspData;

mod ant;
mod trace;
