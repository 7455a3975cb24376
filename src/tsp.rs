use crate::error::{AcoError, Result};
use crate::optimization::AntColonyOptimization;
use crate::route::{Coordinate, PathSpecification, Route};
use std::fs;

/// The routes between every pair of stops in a maze, as found by the
/// colony.
///
/// A stop is either a product location or the overall start or end of the
/// walk. Ordering the products with [`crate::GeneticAlgorithm`] and
/// serializing the order through [`TspData::write_action_file`] yields the
/// full pick-up walk.
pub struct TspData {
    product_locations: Vec<Coordinate>,
    specification: PathSpecification,
    start_routes: Vec<Route>,
    routes: Vec<Vec<Route>>,
    end_routes: Vec<Route>,
}

impl TspData {
    /// Creates the data from precomputed routes.
    ///
    /// # Arguments
    /// * `product_locations` - The cells the products sit on.
    /// * `specification` - The overall start and end of the walk.
    /// * `start_routes` - The route from the start to each product.
    /// * `routes` - The route between every ordered pair of products.
    /// * `end_routes` - The route from each product to the end.
    pub fn new(
        product_locations: Vec<Coordinate>,
        specification: PathSpecification,
        start_routes: Vec<Route>,
        routes: Vec<Vec<Route>>,
        end_routes: Vec<Route>,
    ) -> TspData {
        let products = product_locations.len();
        assert_eq!(start_routes.len(), products, "Expected one start route per product");
        assert_eq!(routes.len(), products, "Expected one route row per product");
        assert!(
            routes.iter().all(|row| row.len() == products),
            "Expected one route per ordered product pair"
        );
        assert_eq!(end_routes.len(), products, "Expected one end route per product");

        TspData {
            product_locations,
            specification,
            start_routes,
            routes,
            end_routes,
        }
    }

    /// Runs the colony between every pair of stops and collects the routes.
    ///
    /// Every pair is solved as its own optimization run, so the field is
    /// reset in between and the runs do not influence each other.
    ///
    /// # Arguments
    /// * `optimization` - The colony to find the routes with.
    /// * `product_locations` - The cells the products sit on.
    /// * `specification` - The overall start and end of the walk.
    pub fn calculate(
        optimization: &mut AntColonyOptimization,
        product_locations: Vec<Coordinate>,
        specification: PathSpecification,
    ) -> Result<TspData> {
        let products = product_locations.len();

        let mut start_routes = Vec::with_capacity(products);
        for &product in &product_locations {
            start_routes.push(optimization.find_shortest_route(&PathSpecification::new(
                specification.start(),
                product,
            ))?);
        }

        let mut routes = Vec::with_capacity(products);
        for &from in &product_locations {
            let mut row = Vec::with_capacity(products);
            for &to in &product_locations {
                if from == to {
                    row.push(Route::new(from));
                } else {
                    row.push(
                        optimization.find_shortest_route(&PathSpecification::new(from, to))?,
                    );
                }
            }
            routes.push(row);
        }

        let mut end_routes = Vec::with_capacity(products);
        for &product in &product_locations {
            end_routes.push(optimization.find_shortest_route(&PathSpecification::new(
                product,
                specification.end(),
            ))?);
        }

        Ok(TspData::new(
            product_locations,
            specification,
            start_routes,
            routes,
            end_routes,
        ))
    }

    /// The number of products.
    pub fn products(&self) -> usize {
        self.product_locations.len()
    }

    /// The number of steps between two products.
    pub fn distance(&self, from: usize, to: usize) -> usize {
        self.routes[from][to].len()
    }

    /// The number of steps from the start to a product.
    pub fn start_distance(&self, product: usize) -> usize {
        self.start_routes[product].len()
    }

    /// The number of steps from a product to the end.
    pub fn end_distance(&self, product: usize) -> usize {
        self.end_routes[product].len()
    }

    /// Serializes the walk that picks the products up in the given order.
    ///
    /// The format extends the solution file format: the total number of
    /// actions, the start coordinate, then one action per line, where an
    /// action is either a direction integer or `take product #n`. Taking a
    /// product counts as one action.
    ///
    /// # Arguments
    /// * `order` - The products in pick-up order, a permutation of all of them.
    pub fn action_file_string(&self, order: &[usize]) -> Result<String> {
        self.validate_order(order)?;

        let mut total = self.start_distance(order[0]) + order.len();
        for pair in order.windows(2) {
            total += self.distance(pair[0], pair[1]);
        }
        total += self.end_distance(order[order.len() - 1]);

        let mut contents = String::new();
        contents.push_str(&format!("{};\n", total));
        contents.push_str(&format!("{};\n", self.specification.start()));

        push_directions(&mut contents, &self.start_routes[order[0]]);
        contents.push_str(&format!("take product #{};\n", order[0] + 1));

        for pair in order.windows(2) {
            push_directions(&mut contents, &self.routes[pair[0]][pair[1]]);
            contents.push_str(&format!("take product #{};\n", pair[1] + 1));
        }

        push_directions(&mut contents, &self.end_routes[order[order.len() - 1]]);

        Ok(contents)
    }

    /// Writes the walk for the given pick-up order to a file.
    ///
    /// # Arguments
    /// * `order` - The products in pick-up order, a permutation of all of them.
    /// * `path` - The path to the file to write the walk to.
    pub fn write_action_file(&self, order: &[usize], path: &str) -> Result<()> {
        fs::write(path, self.action_file_string(order)?)?;
        Ok(())
    }

    fn validate_order(&self, order: &[usize]) -> Result<()> {
        let products = self.products();

        if order.is_empty() {
            return Err(AcoError::InvalidSpecification(
                "the pick-up order contains no products".to_string(),
            ));
        }

        let mut seen = vec![false; products];
        for &product in order {
            if product >= products || seen[product] {
                return Err(AcoError::InvalidSpecification(format!(
                    "the pick-up order is not a permutation of 0..{}",
                    products
                )));
            }
            seen[product] = true;
        }

        if order.len() != products {
            return Err(AcoError::InvalidSpecification(format!(
                "the pick-up order is not a permutation of 0..{}",
                products
            )));
        }

        Ok(())
    }
}

fn push_directions(contents: &mut String, route: &Route) {
    for direction in route.directions() {
        contents.push_str(&format!("{};\n", direction.to_int()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Maze;
    use crate::route::Direction;

    fn route_of(start: Coordinate, directions: &[Direction]) -> Route {
        let mut route = Route::new(start);
        for &direction in directions {
            route.add(direction);
        }
        route
    }

    fn corridor_data() -> TspData {
        // A 5x1 corridor with products at (1, 0) and (3, 0)
        let start = Coordinate::new(0, 0);
        let end = Coordinate::new(4, 0);
        let first = Coordinate::new(1, 0);
        let second = Coordinate::new(3, 0);
        let east = |n| vec![Direction::East; n];
        let west = |n| vec![Direction::West; n];

        TspData::new(
            vec![first, second],
            PathSpecification::new(start, end),
            vec![route_of(start, &east(1)), route_of(start, &east(3))],
            vec![
                vec![Route::new(first), route_of(first, &east(2))],
                vec![route_of(second, &west(2)), Route::new(second)],
            ],
            vec![route_of(first, &east(3)), route_of(second, &east(1))],
        )
    }

    #[test]
    fn when_reading_the_data_the_route_lengths_are_the_distances() {
        let data = corridor_data();

        assert_eq!(data.products(), 2);
        assert_eq!(data.start_distance(0), 1);
        assert_eq!(data.start_distance(1), 3);
        assert_eq!(data.distance(0, 1), 2);
        assert_eq!(data.distance(1, 0), 2);
        assert_eq!(data.distance(0, 0), 0);
        assert_eq!(data.end_distance(0), 3);
        assert_eq!(data.end_distance(1), 1);
    }

    #[test]
    fn when_serializing_a_pick_up_order_the_action_format_is_produced() {
        let data = corridor_data();

        let contents = data.action_file_string(&[0, 1]).unwrap();

        assert_eq!(
            contents,
            "6;\n0, 0;\n0;\ntake product #1;\n0;\n0;\ntake product #2;\n0;\n"
        );
    }

    #[test]
    fn when_serializing_an_incomplete_order_an_error_is_raised() {
        let data = corridor_data();

        assert!(matches!(
            data.action_file_string(&[0]),
            Err(AcoError::InvalidSpecification(_))
        ));
        assert!(matches!(
            data.action_file_string(&[]),
            Err(AcoError::InvalidSpecification(_))
        ));
        assert!(matches!(
            data.action_file_string(&[0, 0]),
            Err(AcoError::InvalidSpecification(_))
        ));
        assert!(matches!(
            data.action_file_string(&[0, 2]),
            Err(AcoError::InvalidSpecification(_))
        ));
    }

    #[test]
    fn when_calculating_from_a_maze_the_colony_fills_every_pair() {
        let maze = Maze::parse(
            "\
            5 1
            1 1 1 1 1",
        )
        .unwrap();
        let mut optimization = AntColonyOptimization::new(maze, 1, 1, 1.0, 0.0, 100, 42, None);

        let data = TspData::calculate(
            &mut optimization,
            vec![Coordinate::new(2, 0)],
            PathSpecification::new(Coordinate::new(0, 0), Coordinate::new(4, 0)),
        )
        .unwrap();

        assert_eq!(data.products(), 1);
        assert_eq!(data.start_distance(0), 2);
        assert_eq!(data.distance(0, 0), 0);
        assert_eq!(data.end_distance(0), 2);
    }
}
