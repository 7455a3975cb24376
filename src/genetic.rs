use crate::error::{AcoError, Result};
use crate::tsp::TspData;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use std::collections::HashSet;

/// A genetic algorithm that orders product pick-ups along the routes of a
/// [`TspData`].
///
/// Chromosomes are permutations of the product indices. Shorter total
/// walks are fitter, parents are drawn by roulette wheel, and children are
/// bred with order preserving crossover and swap mutation.
pub struct GeneticAlgorithm {
    generations: usize,
    population_size: usize,
    crossover_probability: f64,
    mutation_probability: f64,
    rng: StdRng,
}

impl GeneticAlgorithm {
    /// Creates a new algorithm.
    ///
    /// # Arguments
    /// * `generations` - The number of generations to breed.
    /// * `population_size` - The number of chromosomes per generation.
    /// * `crossover_probability` - The chance that a parent pair is crossed over.
    /// * `mutation_probability` - The chance that a chromosome mutates.
    /// * `seed` - The seed for the random number generator.
    pub fn new(
        generations: usize,
        population_size: usize,
        crossover_probability: f64,
        mutation_probability: f64,
        seed: u64,
    ) -> GeneticAlgorithm {
        assert!(population_size > 0, "The population cannot be empty");

        GeneticAlgorithm {
            generations,
            population_size,
            crossover_probability,
            mutation_probability,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Breeds pick-up orders and returns the shortest one found across all
    /// generations.
    ///
    /// # Arguments
    /// * `data` - The routes between every pair of stops.
    pub fn solve_tsp(&mut self, data: &TspData) -> Result<Vec<usize>> {
        let products = data.products();
        if products == 0 {
            return Err(AcoError::InvalidSpecification(
                "cannot order zero products".to_string(),
            ));
        }

        let mut population = self.initial_population(products);
        let mut best = population[0].clone();
        let mut best_distance = GeneticAlgorithm::total_distance(data, &best);
        GeneticAlgorithm::track_best(data, &population, &mut best, &mut best_distance);

        for _ in 0..self.generations {
            let probabilities = GeneticAlgorithm::selection_probabilities(data, &population);

            let mut next: Vec<Vec<usize>> = (0..self.population_size)
                .map(|_| self.select(&population, &probabilities).clone())
                .collect();

            for pair in 0..self.population_size / 2 {
                if self.rng.gen::<f64>() < self.crossover_probability {
                    let (first, second) = (2 * pair, 2 * pair + 1);
                    let (child_a, child_b) = self.crossover(&next[first], &next[second]);
                    next[first] = child_a;
                    next[second] = child_b;
                }
            }

            for chromosome in &mut next {
                if self.rng.gen::<f64>() < self.mutation_probability {
                    self.mutate(chromosome);
                }
            }

            population = next;
            GeneticAlgorithm::track_best(data, &population, &mut best, &mut best_distance);
        }

        Ok(best)
    }

    fn initial_population(&mut self, products: usize) -> Vec<Vec<usize>> {
        (0..self.population_size)
            .map(|_| {
                let mut chromosome: Vec<usize> = (0..products).collect();
                chromosome.shuffle(&mut self.rng);
                chromosome
            })
            .collect()
    }

    fn track_best(
        data: &TspData,
        population: &[Vec<usize>],
        best: &mut Vec<usize>,
        best_distance: &mut usize,
    ) {
        for chromosome in population {
            let distance = GeneticAlgorithm::total_distance(data, chromosome);
            if distance < *best_distance {
                *best = chromosome.clone();
                *best_distance = distance;
            }
        }
    }

    fn total_distance(data: &TspData, chromosome: &[usize]) -> usize {
        let mut distance = data.start_distance(chromosome[0]);
        for pair in chromosome.windows(2) {
            distance += data.distance(pair[0], pair[1]);
        }
        distance + data.end_distance(chromosome[chromosome.len() - 1])
    }

    /// The selection probability of each chromosome: its fitness
    /// `(max_distance - distance) + 1` over the fitness of the population.
    fn selection_probabilities(data: &TspData, population: &[Vec<usize>]) -> Vec<f64> {
        let distances: Vec<usize> = population
            .iter()
            .map(|chromosome| GeneticAlgorithm::total_distance(data, chromosome))
            .collect();
        let max_distance = distances.iter().fold(0, |max, &distance| max.max(distance));

        let fitnesses: Vec<f64> = distances
            .iter()
            .map(|&distance| (max_distance - distance + 1) as f64)
            .collect();
        let total: f64 = fitnesses.iter().sum();

        fitnesses.iter().map(|fitness| fitness / total).collect()
    }

    /// Draws one chromosome by roulette wheel, using a single uniform draw
    /// over the cumulative probabilities.
    fn select<'a>(
        &mut self,
        population: &'a [Vec<usize>],
        probabilities: &[f64],
    ) -> &'a Vec<usize> {
        let draw = self.rng.gen::<f64>();
        let mut cumulative = 0.0;
        let mut chosen = &population[0];

        for (chromosome, probability) in population.iter().zip(probabilities) {
            chosen = chromosome;
            cumulative += probability;
            if draw <= cumulative {
                break;
            }
        }

        chosen
    }

    fn crossover(&mut self, first: &[usize], second: &[usize]) -> (Vec<usize>, Vec<usize>) {
        let genes = first.len();
        let mut cut_a = self.rng.gen_range(0..genes);
        let mut cut_b = self.rng.gen_range(0..genes);
        if cut_a > cut_b {
            std::mem::swap(&mut cut_a, &mut cut_b);
        }

        (
            GeneticAlgorithm::crossover_child(first, second, cut_a, cut_b),
            GeneticAlgorithm::crossover_child(second, first, cut_a, cut_b),
        )
    }

    /// Order preserving crossover without wraparound: the child copies the
    /// donor's window between the cut points, and the receiver's other
    /// genes fill the positions around the window in their original order.
    fn crossover_child(
        receiver: &[usize],
        donor: &[usize],
        cut_a: usize,
        cut_b: usize,
    ) -> Vec<usize> {
        let window: HashSet<usize> = donor[cut_a..=cut_b].iter().copied().collect();
        let mut remaining = receiver
            .iter()
            .copied()
            .filter(|gene| !window.contains(gene));

        let mut child: Vec<usize> = remaining.by_ref().take(cut_a).collect();
        child.extend_from_slice(&donor[cut_a..=cut_b]);
        child.extend(remaining);
        child
    }

    /// Swaps two distinct genes.
    fn mutate(&mut self, chromosome: &mut [usize]) {
        let genes = chromosome.len();
        if genes < 2 {
            return;
        }

        let swap = rand::seq::index::sample(&mut self.rng, genes, 2);
        chromosome.swap(swap.index(0), swap.index(1));
    }
}
