use crate::error::{AcoError, Result};
use regex::Regex;
use std::fmt;
use std::fs;

/// A cell position in the maze.
///
/// `x` grows to the East and `y` grows to the South, matching the row order
/// of the maze file.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Coordinate {
        Coordinate { x, y }
    }

    /// Returns the coordinate one step away in the given direction.
    pub fn add(&self, direction: Direction) -> Coordinate {
        let (dx, dy) = direction.vector();
        Coordinate::new(self.x + dx, self.y + dy)
    }

    /// Returns the coordinate one step away against the given direction.
    pub fn subtract(&self, direction: Direction) -> Coordinate {
        self.add(direction.inverse())
    }

    /// Whether the coordinate lies inside a `width` by `length` grid.
    pub fn is_within(&self, width: usize, length: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < width && (self.y as usize) < length
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

/// The four directions an ant can move in.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// The direction that undoes this one.
    pub fn inverse(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// The integer this direction is encoded as in route files.
    pub fn to_int(&self) -> i32 {
        match self {
            Direction::East => 0,
            Direction::North => 1,
            Direction::West => 2,
            Direction::South => 3,
        }
    }

    fn vector(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// A path through the maze as a list of directions from a fixed start.
///
/// Directions are stored in travel order and the most recent step can be
/// undone, so a route doubles as the backtracking stack of an ant.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    start: Coordinate,
    directions: Vec<Direction>,
}

impl Route {
    pub fn new(start: Coordinate) -> Route {
        Route {
            start,
            directions: Vec::new(),
        }
    }

    pub fn start(&self) -> Coordinate {
        self.start
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Appends a step to the route.
    pub fn add(&mut self, direction: Direction) {
        self.directions.push(direction);
    }

    /// Removes and returns the most recent step, if any.
    pub fn remove_last(&mut self) -> Option<Direction> {
        self.directions.pop()
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Whether this route is strictly shorter than `other`.
    pub fn shorter_than(&self, other: &Route) -> bool {
        self.len() < other.len()
    }

    /// The cells the route passes through, starting with the start cell and
    /// ending with the cell reached by the final step.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        let mut current = self.start;
        let mut coordinates = vec![current];

        for direction in &self.directions {
            current = current.add(*direction);
            coordinates.push(current);
        }

        coordinates
    }

    /// Writes the route to a file in the solution format.
    ///
    /// # Arguments
    /// * `path` - The path to the file to write the route to.
    pub fn write_to_file(&self, path: &str) -> Result<()> {
        fs::write(path, self.to_string())?;
        Ok(())
    }
}

impl fmt::Display for Route {
    /// The solution file format: the number of steps, the start coordinate,
    /// then one direction integer per line, each line ending in `;`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{};", self.len())?;
        writeln!(f, "{};", self.start)?;

        for direction in &self.directions {
            writeln!(f, "{};", direction.to_int())?;
        }

        Ok(())
    }
}

/// The start and end cells a route must connect.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PathSpecification {
    start: Coordinate,
    end: Coordinate,
}

impl PathSpecification {
    pub fn new(start: Coordinate, end: Coordinate) -> PathSpecification {
        PathSpecification { start, end }
    }

    pub fn start(&self) -> Coordinate {
        self.start
    }

    pub fn end(&self) -> Coordinate {
        self.end
    }

    /// Parses a coordinates file: one `x, y;` pair per line, start first.
    pub fn parse(contents: &str) -> Result<PathSpecification> {
        let mut coordinates = Vec::new();

        for captures in Regex::new(r"(\d+)\s*,\s*(\d+)").unwrap().captures_iter(contents) {
            let x = captures[1]
                .parse()
                .map_err(|_| AcoError::MalformedCoordinates(format!("invalid x in {:?}", &captures[0])))?;
            let y = captures[2]
                .parse()
                .map_err(|_| AcoError::MalformedCoordinates(format!("invalid y in {:?}", &captures[0])))?;
            coordinates.push(Coordinate::new(x, y));
        }

        match coordinates[..] {
            [start, end, ..] => Ok(PathSpecification::new(start, end)),
            _ => Err(AcoError::MalformedCoordinates(
                "expected a start and an end coordinate".to_string(),
            )),
        }
    }

    /// Reads and parses a coordinates file.
    ///
    /// # Arguments
    /// * `path` - The path to the file containing the start and end coordinates.
    pub fn from_file(path: &str) -> Result<PathSpecification> {
        PathSpecification::parse(&fs::read_to_string(path)?)
    }
}
