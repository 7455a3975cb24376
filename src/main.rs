use aco_maze::{AcoError, AntColonyOptimization, Maze, PathSpecification};
use std::time::Instant;

fn main() -> Result<(), AcoError> {
    // Parameters
    let ants_per_generation = 10;
    let generations = 10;
    let q = 400.0;
    let evaporation = 0.1;
    let max_route_length = 1000;
    let seed = 42;

    // Construct the optimization objects
    let maze = Maze::from_file("./data/easy_maze.txt")?;
    let specification = PathSpecification::from_file("./data/easy_coordinates.txt")?;
    let mut optimization = AntColonyOptimization::new(
        maze,
        ants_per_generation,
        generations,
        q,
        evaporation,
        max_route_length,
        seed,
        Some("./data/easy_trace.json".to_string()),
    );

    // Run the optimization
    let timer = Instant::now();
    let route = optimization.find_shortest_route(&specification)?;
    println!("Time taken: {}", timer.elapsed().as_secs_f64());

    // Save the solution
    route.write_to_file("./data/easy_solution.txt")?;
    println!("Route size: {}", route.len());

    optimization.maze().draw(Some(&route))?;

    Ok(())
}
