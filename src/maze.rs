use crate::error::{AcoError, Result};
use crate::route::{Coordinate, Direction, Route};
use crossterm::{
    cursor::Hide,
    execute,
    style::{Color, Print, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io::{stdout, Write};

/// The maze the ants walk through.
///
/// Holds the immutable cell layout and the pheromone field laid on top of
/// it. The field starts at 1 on every passable cell and 0 on every wall,
/// and is the only state that changes over a run.
pub struct Maze {
    width: usize,
    length: usize,
    passable: Vec<bool>,
    pheromones: Vec<f64>,
}

/// The pheromone levels on the four cells around a position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurroundingPheromone {
    north: f64,
    east: f64,
    south: f64,
    west: f64,
}

impl SurroundingPheromone {
    /// The level in the given direction.
    pub fn get(&self, direction: Direction) -> f64 {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// The sum of the four levels.
    pub fn total(&self) -> f64 {
        self.north + self.east + self.south + self.west
    }
}

impl Maze {
    /// Creates a maze from a cell layout where `true` marks a passable cell.
    ///
    /// The layout is row-major: the cell at `(x, y)` sits at index
    /// `y * width + x`.
    pub fn new(passable: Vec<bool>, width: usize, length: usize) -> Maze {
        assert_eq!(
            passable.len(),
            width * length,
            "Layout does not match the {}x{} dimensions",
            width,
            length
        );

        let pheromones = Maze::initial_pheromones(&passable);

        Maze {
            width,
            length,
            passable,
            pheromones,
        }
    }

    /// Parses a maze file.
    ///
    /// The first line holds the width and the length, followed by one line
    /// per row of `0` (wall) and `1` (passable) cells.
    pub fn parse(contents: &str) -> Result<Maze> {
        let header = Regex::new(r"(\d+)\s+(\d+)")
            .unwrap()
            .captures(contents)
            .ok_or_else(|| AcoError::MalformedMaze("missing width and length header".to_string()))?;

        let width: usize = header[1]
            .parse()
            .map_err(|_| AcoError::MalformedMaze(format!("invalid width {:?}", &header[1])))?;
        let length: usize = header[2]
            .parse()
            .map_err(|_| AcoError::MalformedMaze(format!("invalid length {:?}", &header[2])))?;

        let mut passable = Vec::with_capacity(width * length);
        let mut rows = 0;

        for line in contents.lines().skip(1) {
            if line.trim().is_empty() {
                continue;
            }

            let mut cells = 0;
            for token in line.split_whitespace() {
                match token {
                    "0" => passable.push(false),
                    "1" => passable.push(true),
                    _ => {
                        return Err(AcoError::MalformedMaze(format!(
                            "invalid cell {:?} in row {}",
                            token, rows
                        )))
                    }
                }
                cells += 1;
            }

            if cells != width {
                return Err(AcoError::MalformedMaze(format!(
                    "expected {} cells in row {}, found {}",
                    width, rows, cells
                )));
            }
            rows += 1;
        }

        if rows != length {
            return Err(AcoError::MalformedMaze(format!(
                "expected {} rows, found {}",
                length, rows
            )));
        }

        Ok(Maze::new(passable, width, length))
    }

    /// Reads and parses a maze file.
    ///
    /// # Arguments
    /// * `path` - The path to the file containing the maze.
    pub fn from_file(path: &str) -> Result<Maze> {
        Maze::parse(&fs::read_to_string(path)?)
    }

    /// Restores the pheromone field to its initial state.
    pub fn reset(&mut self) {
        self.pheromones = Maze::initial_pheromones(&self.passable);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Whether the position is inside the maze and not a wall.
    pub fn is_walkable(&self, position: Coordinate) -> bool {
        position.is_within(self.width, self.length) && self.passable[self.index(position)]
    }

    /// The pheromone level at a position. Positions outside the maze have
    /// a level of 0.
    pub fn pheromone(&self, position: Coordinate) -> f64 {
        if position.is_within(self.width, self.length) {
            self.pheromones[self.index(position)]
        } else {
            0.0
        }
    }

    /// The pheromone levels on the four cells around a position.
    pub fn surrounding_pheromone(&self, position: Coordinate) -> SurroundingPheromone {
        SurroundingPheromone {
            north: self.pheromone(position.add(Direction::North)),
            east: self.pheromone(position.add(Direction::East)),
            south: self.pheromone(position.add(Direction::South)),
            west: self.pheromone(position.add(Direction::West)),
        }
    }

    /// Evaporates the whole field by the given factor.
    ///
    /// # Arguments
    /// * `evaporation` - The fraction of pheromone lost, between 0 and 1.
    pub fn evaporate(&mut self, evaporation: f64) {
        assert!(
            (0.0..=1.0).contains(&evaporation),
            "Evaporation must lie in [0, 1], got {}",
            evaporation
        );

        for level in &mut self.pheromones {
            *level *= 1.0 - evaporation;
        }
    }

    /// Spreads a total of `q` pheromone evenly over the cells of a route.
    ///
    /// The route is replayed from its start and every cell reached by a
    /// step receives `q / len`; the start cell itself receives nothing.
    /// The route must stay inside the maze.
    pub fn add_pheromone_route(&mut self, route: &Route, q: f64) -> Result<()> {
        if route.is_empty() {
            return Err(AcoError::EmptyRouteDeposit);
        }

        let reward = q / route.len() as f64;
        let mut position = route.start();

        for direction in route.directions() {
            position = position.add(*direction);
            let index = self.index(position);
            self.pheromones[index] += reward;
        }

        Ok(())
    }

    /// Spreads `q` pheromone over each route of a batch.
    pub fn add_pheromone_routes(&mut self, routes: &[Route], q: f64) -> Result<()> {
        for route in routes {
            self.add_pheromone_route(route, q)?;
        }

        Ok(())
    }

    /// Draws the maze to the console, with the route overlaid if given.
    pub fn draw(&self, route: Option<&Route>) -> Result<()> {
        let mut stdout = stdout();

        let mut route_cells = HashSet::new();
        let mut start = None;
        let mut end = None;
        if let Some(route) = route {
            let coordinates = route.coordinates();
            start = coordinates.first().copied();
            end = coordinates.last().copied();
            route_cells.extend(coordinates);
        }

        // Display information about the maze
        execute!(
            stdout,
            Clear(ClearType::All),
            Hide,
            Print("Maze: "),
            Print(self.width.to_string()),
            Print(" x "),
            Print(self.length.to_string())
        )?;

        if let Some(route) = route {
            execute!(
                stdout,
                Print("\nRoute: "),
                Print(route.len().to_string()),
                Print(" steps")
            )?;
        }
        execute!(stdout, Print("\n\n"))?;

        // Display the cells
        for y in 0..self.length {
            for x in 0..self.width {
                let position = Coordinate::new(x as i32, y as i32);
                let (value, color) = if start == Some(position) {
                    ('S', Color::Green)
                } else if end == Some(position) {
                    ('E', Color::Red)
                } else if route_cells.contains(&position) {
                    ('*', Color::Yellow)
                } else if self.is_walkable(position) {
                    ('.', Color::Reset)
                } else {
                    ('#', Color::DarkGrey)
                };

                execute!(
                    stdout,
                    SetForegroundColor(color),
                    Print(value),
                    SetForegroundColor(Color::Reset)
                )?;
            }
            execute!(stdout, Print("\n"))?;
        }

        stdout.flush()?;
        Ok(())
    }

    fn initial_pheromones(passable: &[bool]) -> Vec<f64> {
        passable
            .iter()
            .map(|&open| if open { 1.0 } else { 0.0 })
            .collect()
    }

    fn index(&self, position: Coordinate) -> usize {
        position.y as usize * self.width + position.x as usize
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} {}", self.width, self.length)?;

        for y in 0..self.length {
            let row: Vec<&str> = (0..self.width)
                .map(|x| if self.passable[y * self.width + x] { "1" } else { "0" })
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }

        Ok(())
    }
}
