use crate::ant::Ant;
use crate::error::{AcoError, Result};
use crate::maze::Maze;
use crate::route::{PathSpecification, Route};
use crate::trace::{create_trace_logger, TraceLogger};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// The ant colony optimization loop.
/// Main entry point for finding the shortest route through a maze.
pub struct AntColonyOptimization {
    maze: Maze,
    ants_per_generation: usize,
    generations: usize,
    q: f64,
    evaporation: f64,
    max_route_length: usize,
    rng: StdRng,
    trace_logger: Box<dyn TraceLogger>,
}

impl AntColonyOptimization {
    /// Creates a new optimization over the given maze.
    ///
    /// # Arguments
    /// * `maze` - The maze to find routes in.
    /// * `ants_per_generation` - The number of ants released per generation.
    /// * `generations` - The number of generations to run.
    /// * `q` - The total amount of pheromone an ant spreads over its route.
    /// * `evaporation` - The fraction of pheromone lost after each generation, between 0 and 1.
    /// * `max_route_length` - The number of steps after which an ant gives up.
    /// * `seed` - The seed for the random number generator.
    /// * `trace_filename` - The filename to save the trace of the run to. If `None`, no trace will be saved.
    pub fn new(
        maze: Maze,
        ants_per_generation: usize,
        generations: usize,
        q: f64,
        evaporation: f64,
        max_route_length: usize,
        seed: u64,
        trace_filename: Option<String>,
    ) -> AntColonyOptimization {
        let trace_logger = create_trace_logger(trace_filename, maze.width(), maze.length());

        AntColonyOptimization {
            maze,
            ants_per_generation,
            generations,
            q,
            evaporation,
            max_route_length,
            rng: StdRng::seed_from_u64(seed),
            trace_logger,
        }
    }

    /// Releases generations of ants into the maze and returns the shortest
    /// route any of them found.
    ///
    /// The pheromone field is reset before the first generation. After each
    /// generation the field evaporates and every completed route deposits
    /// its pheromone, so later generations are drawn towards the shorter
    /// routes of earlier ones.
    ///
    /// # Arguments
    /// * `path_specification` - The start and end cells the route must connect.
    pub fn find_shortest_route(&mut self, path_specification: &PathSpecification) -> Result<Route> {
        let start = path_specification.start();
        let end = path_specification.end();

        if !self.maze.is_walkable(start) {
            return Err(AcoError::InvalidSpecification(format!(
                "start {} is not a walkable cell",
                start
            )));
        }
        if !self.maze.is_walkable(end) {
            return Err(AcoError::InvalidSpecification(format!(
                "end {} is not a walkable cell",
                end
            )));
        }

        self.maze.reset();
        self.trace_logger.clear();

        let mut shortest: Option<Route> = None;

        for generation in 0..self.generations {
            let mut completed = Vec::with_capacity(self.ants_per_generation);

            for ant in 0..self.ants_per_generation {
                let mut walker = Ant::new(&self.maze, start, end);

                match walker.find_route(&mut self.rng, self.max_route_length)? {
                    Some(route) => {
                        self.trace_logger
                            .log_route_completed(generation, ant, route.len());
                        completed.push(route);
                    }
                    None => self.trace_logger.log_unfinished(generation, ant),
                }
            }

            for route in &completed {
                let improved = match &shortest {
                    Some(best) => route.shorter_than(best),
                    None => true,
                };

                if improved {
                    self.trace_logger.log_new_best(generation, route.len());
                    shortest = Some(route.clone());
                }
            }

            let completed_count = completed.len();

            self.maze.evaporate(self.evaporation);

            // A walk whose start equals its end completes with an empty
            // route, which must not reach the pheromone field
            completed.retain(|route| !route.is_empty());
            self.maze.add_pheromone_routes(&completed, self.q)?;

            self.trace_logger.log_generation(
                generation,
                completed_count,
                shortest.as_ref().map(Route::len),
            );
        }

        self.trace_logger.save()?;

        shortest.ok_or(AcoError::NoRouteFound)
    }

    /// The maze the optimization runs in.
    pub fn maze(&self) -> &Maze {
        &self.maze
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{Coordinate, Direction};

    fn corridor() -> Maze {
        Maze::parse(
            "\
            3 1
            1 1 1",
        )
        .unwrap()
    }

    #[test]
    fn when_solving_a_corridor_the_route_and_the_field_match_the_deposit() {
        let maze = corridor();
        let mut optimization = AntColonyOptimization::new(maze, 1, 1, 1.0, 0.0, 100, 42, None);
        let specification =
            PathSpecification::new(Coordinate::new(0, 0), Coordinate::new(2, 0));

        let route = optimization.find_shortest_route(&specification).unwrap();

        assert_eq!(route.len(), 2);
        assert_eq!(route.directions(), &[Direction::East, Direction::East]);

        // One ant spread 1.0 pheromone over its two steps
        let maze = optimization.maze();
        assert!((maze.pheromone(Coordinate::new(0, 0)) - 1.0).abs() < 1e-12);
        assert!((maze.pheromone(Coordinate::new(1, 0)) - 1.5).abs() < 1e-12);
        assert!((maze.pheromone(Coordinate::new(2, 0)) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn when_running_zero_generations_no_route_is_found() {
        let maze = corridor();
        let mut optimization = AntColonyOptimization::new(maze, 1, 0, 1.0, 0.1, 100, 42, None);
        let specification =
            PathSpecification::new(Coordinate::new(0, 0), Coordinate::new(2, 0));

        let result = optimization.find_shortest_route(&specification);

        assert!(matches!(result, Err(AcoError::NoRouteFound)));
    }

    #[test]
    fn when_the_start_is_off_the_maze_the_specification_is_rejected() {
        let maze = corridor();
        let mut optimization = AntColonyOptimization::new(maze, 1, 1, 1.0, 0.1, 100, 42, None);
        let specification =
            PathSpecification::new(Coordinate::new(-1, 0), Coordinate::new(2, 0));

        let result = optimization.find_shortest_route(&specification);

        assert!(matches!(result, Err(AcoError::InvalidSpecification(_))));
    }

    #[test]
    fn when_the_end_is_on_a_wall_the_specification_is_rejected() {
        let maze = Maze::parse(
            "\
            3 1
            1 1 0",
        )
        .unwrap();
        let mut optimization = AntColonyOptimization::new(maze, 1, 1, 1.0, 0.1, 100, 42, None);
        let specification =
            PathSpecification::new(Coordinate::new(0, 0), Coordinate::new(2, 0));

        let result = optimization.find_shortest_route(&specification);

        assert!(matches!(result, Err(AcoError::InvalidSpecification(_))));
    }

    #[test]
    fn when_every_ant_gives_up_no_route_is_found() {
        let maze = corridor();
        // A one step limit is too short to cross the corridor
        let mut optimization = AntColonyOptimization::new(maze, 5, 3, 1.0, 0.1, 1, 42, None);
        let specification =
            PathSpecification::new(Coordinate::new(0, 0), Coordinate::new(2, 0));

        let result = optimization.find_shortest_route(&specification);

        assert!(matches!(result, Err(AcoError::NoRouteFound)));
    }

    #[test]
    fn when_the_start_equals_the_end_the_best_route_is_empty() {
        let maze = corridor();
        let mut optimization = AntColonyOptimization::new(maze, 3, 2, 1.0, 0.0, 100, 42, None);
        let specification =
            PathSpecification::new(Coordinate::new(1, 0), Coordinate::new(1, 0));

        let route = optimization.find_shortest_route(&specification).unwrap();

        assert!(route.is_empty());
        assert_eq!(route.start(), Coordinate::new(1, 0));
    }

    #[test]
    fn when_an_unreachable_end_is_searched_backtracking_underflows() {
        let maze = Maze::parse(
            "\
            3 1
            1 0 1",
        )
        .unwrap();
        let mut optimization = AntColonyOptimization::new(maze, 1, 1, 1.0, 0.1, 100, 42, None);
        let specification =
            PathSpecification::new(Coordinate::new(0, 0), Coordinate::new(2, 0));

        let result = optimization.find_shortest_route(&specification);

        assert!(matches!(result, Err(AcoError::BacktrackUnderflow(_))));
    }

    #[test]
    fn when_solving_with_the_same_seed_the_same_route_is_found() {
        let run = |seed| {
            let maze = Maze::new(vec![true; 16], 4, 4);
            let mut optimization =
                AntColonyOptimization::new(maze, 5, 5, 10.0, 0.1, 1000, seed, None);
            let specification =
                PathSpecification::new(Coordinate::new(0, 0), Coordinate::new(3, 3));
            optimization.find_shortest_route(&specification).unwrap()
        };

        assert_eq!(run(7), run(7));
    }

    #[test]
    fn when_generations_pass_the_best_route_only_improves() {
        let maze = Maze::new(vec![true; 25], 5, 5);
        let mut optimization = AntColonyOptimization::new(maze, 10, 10, 10.0, 0.1, 1000, 3, None);
        let specification =
            PathSpecification::new(Coordinate::new(0, 0), Coordinate::new(4, 4));

        let best = optimization.find_shortest_route(&specification).unwrap();

        // The shortest possible route is the Manhattan distance, and any
        // route between the corners has the same parity
        assert!(best.len() >= 8);
        assert_eq!(best.len() % 2, 0);
        assert_eq!(best.coordinates().last(), Some(&Coordinate::new(4, 4)));
    }
}
