use crate::error::{AcoError, Result};
use crate::maze::Maze;
use crate::route::{Coordinate, Direction, Route};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashSet;

// Directions are weighed and drawn in their route file encoding order
const DRAW_ORDER: [Direction; 4] = [
    Direction::East,
    Direction::North,
    Direction::West,
    Direction::South,
];

/// A single ant walking the maze towards a destination.
///
/// The walk is guided by the pheromone field: at every cell one of the
/// unvisited neighbors is drawn with probability proportional to its
/// level. Visited cells stay visited for the whole walk, so when every
/// neighbor is exhausted the ant backs out of the dead end step by step.
pub struct Ant<'a> {
    maze: &'a Maze,
    end: Coordinate,
    current_position: Coordinate,
    visited: HashSet<Coordinate>,
}

impl<'a> Ant<'a> {
    pub fn new(maze: &'a Maze, start: Coordinate, end: Coordinate) -> Ant<'a> {
        Ant {
            maze,
            end,
            current_position: start,
            visited: HashSet::new(),
        }
    }

    /// Walks until the destination is reached and returns the route taken.
    ///
    /// Returns `None` when the route grows to `max_route_length` steps
    /// without reaching the destination. Backing out of a dead end at the
    /// start cell, with nowhere left to go, is an error.
    pub fn find_route(
        &mut self,
        rng: &mut StdRng,
        max_route_length: usize,
    ) -> Result<Option<Route>> {
        let mut route = Route::new(self.current_position);

        while self.current_position != self.end {
            if route.len() >= max_route_length {
                return Ok(None);
            }

            self.visited.insert(self.current_position);

            let surrounding = self.maze.surrounding_pheromone(self.current_position);
            let mut levels = [0.0; 4];
            for (slot, direction) in DRAW_ORDER.iter().enumerate() {
                if !self.visited.contains(&self.current_position.add(*direction)) {
                    levels[slot] = surrounding.get(*direction);
                }
            }

            let total: f64 = levels.iter().sum();

            if total == 0.0 {
                let last = route
                    .remove_last()
                    .ok_or(AcoError::BacktrackUnderflow(self.current_position))?;
                self.current_position = self.current_position.subtract(last);
                continue;
            }

            let direction = Ant::draw_direction(rng, &levels, total);
            self.current_position = self.current_position.add(direction);
            route.add(direction);
        }

        Ok(Some(route))
    }

    /// Draws one direction with probability proportional to its level,
    /// using a single uniform draw over the cumulative levels.
    fn draw_direction(rng: &mut StdRng, levels: &[f64; 4], total: f64) -> Direction {
        let draw = rng.gen::<f64>();
        let mut cumulative = 0.0;
        let mut chosen = DRAW_ORDER[0];

        // Rounding can leave the cumulative sum just below 1, so the last
        // direction with any level catches the remainder
        for (slot, direction) in DRAW_ORDER.iter().enumerate() {
            if levels[slot] == 0.0 {
                continue;
            }

            chosen = *direction;
            cumulative += levels[slot] / total;
            if draw <= cumulative {
                break;
            }
        }

        chosen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn when_walking_a_straight_corridor_the_route_is_the_manhattan_distance() {
        let maze = Maze::parse(
            "\
            4 1
            1 1 1 1",
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut ant = Ant::new(&maze, Coordinate::new(0, 0), Coordinate::new(3, 0));

        let route = ant.find_route(&mut rng, 100).unwrap().unwrap();

        assert_eq!(route.len(), 3);
        assert_eq!(
            route.directions(),
            &[Direction::East, Direction::East, Direction::East]
        );
    }

    #[test]
    fn when_the_start_equals_the_end_the_route_is_empty() {
        let maze = Maze::new(vec![true; 4], 2, 2);
        let mut rng = StdRng::seed_from_u64(42);
        let mut ant = Ant::new(&maze, Coordinate::new(1, 1), Coordinate::new(1, 1));

        let route = ant.find_route(&mut rng, 100).unwrap().unwrap();

        assert!(route.is_empty());
        assert_eq!(route.start(), Coordinate::new(1, 1));
    }

    #[test]
    fn when_the_route_grows_past_the_limit_the_walk_is_abandoned() {
        let maze = Maze::parse(
            "\
            4 1
            1 1 1 1",
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut ant = Ant::new(&maze, Coordinate::new(0, 0), Coordinate::new(3, 0));

        assert_eq!(ant.find_route(&mut rng, 1).unwrap(), None);
    }

    #[test]
    fn when_the_start_is_enclosed_by_walls_backtracking_underflows() {
        let maze = Maze::parse(
            "\
            3 3
            1 0 1
            0 0 1
            1 1 1",
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut ant = Ant::new(&maze, Coordinate::new(0, 0), Coordinate::new(2, 2));

        let result = ant.find_route(&mut rng, 100);

        assert!(matches!(result, Err(AcoError::BacktrackUnderflow(_))));
    }

    #[test]
    fn when_a_dead_end_is_entered_the_ant_backs_out_and_still_arrives() {
        // The side corridor at (1, 1) leads nowhere
        let maze = Maze::parse(
            "\
            3 2
            1 1 1
            0 1 0",
        )
        .unwrap();

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut ant = Ant::new(&maze, Coordinate::new(0, 0), Coordinate::new(2, 0));

            let route = ant.find_route(&mut rng, 100).unwrap().unwrap();

            assert_eq!(route.coordinates().last(), Some(&Coordinate::new(2, 0)));
            assert_eq!(route.len(), 2);
        }
    }

    #[test]
    fn when_walking_with_the_same_seed_the_same_route_is_found() {
        let maze = Maze::new(vec![true; 16], 4, 4);

        let mut first_rng = StdRng::seed_from_u64(7);
        let mut first = Ant::new(&maze, Coordinate::new(0, 0), Coordinate::new(3, 3));
        let mut second_rng = StdRng::seed_from_u64(7);
        let mut second = Ant::new(&maze, Coordinate::new(0, 0), Coordinate::new(3, 3));

        let first_route = first.find_route(&mut first_rng, 1000).unwrap();
        let second_route = second.find_route(&mut second_rng, 1000).unwrap();

        assert_eq!(first_route, second_route);
    }
}
