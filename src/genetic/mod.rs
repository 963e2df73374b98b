//! Genetic Algorithm for the TSP.
//!
//! Generational GA over city-index permutations:
//! - Random initial population
//! - Tournament selection
//! - Ordered crossover (OX)
//! - Swap mutation
//!
//! Every generation fully replaces the previous one (no elitism), so the best
//! fitness is not guaranteed to improve monotonically. The run stops after the
//! configured number of generations and returns the best tour of the final
//! population.

pub mod crossover;
pub mod mutation;
pub mod population;
pub mod selection;

pub use crossover::{crossover, order_crossover};
pub use mutation::{mutate, swap_mutation};
pub use population::{initialize_population, is_permutation};
pub use selection::{select, tournament, Tournament, DEFAULT_TOURNAMENT_SIZE};

use crate::error::{Result, TspError};
use crate::fitness::{evaluate_population, Fitness};
use crate::graph::WeightedGraph;
use crate::solution::Solution;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

/// A chromosome: every city index exactly once, read as a cycle
pub type Tour = Vec<usize>;

/// Genetic Algorithm configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GAConfig {
    /// Population size (at least 2)
    pub population_size: usize,
    /// Number of generations
    pub generations: usize,
    /// Probability that an offspring gets a swap mutation
    pub mutation_rate: f64,
    /// Tournament size for selection
    pub tournament_size: usize,
    /// Random seed
    pub seed: u64,
}

impl Default for GAConfig {
    fn default() -> Self {
        GAConfig {
            population_size: 50,
            generations: 100,
            mutation_rate: 0.01,
            tournament_size: DEFAULT_TOURNAMENT_SIZE,
            seed: 42,
        }
    }
}

impl GAConfig {
    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Check parameter ranges before any computation
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(TspError::InvalidParameter(format!(
                "population size must be at least 2, got {}",
                self.population_size
            )));
        }
        if self.tournament_size == 0 || self.tournament_size > self.population_size {
            return Err(TspError::InvalidParameter(format!(
                "tournament size must be within [1, {}], got {}",
                self.population_size, self.tournament_size
            )));
        }
        mutation::check_mutation_rate(self.mutation_rate)
    }
}

/// Summary of one generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// 0 for the initial population
    pub generation: usize,
    pub best_distance: f64,
    pub mean_distance: f64,
    pub worst_distance: f64,
    pub best_fitness: Fitness,
}

impl GenerationStats {
    fn from_fitness(generation: usize, fitness: &[Fitness]) -> Self {
        let best = best_index(fitness)
            .map(|i| fitness[i])
            .unwrap_or(Fitness::Maximal);
        let distances: Vec<f64> = fitness.iter().map(Fitness::distance).collect();

        GenerationStats {
            generation,
            best_distance: best.distance(),
            mean_distance: distances.iter().sum::<f64>() / distances.len().max(1) as f64,
            worst_distance: distances.iter().cloned().fold(0.0, f64::max),
            best_fitness: best,
        }
    }
}

/// Flat CSV row for [`GenerationStats`]
#[derive(Debug, Serialize)]
struct HistoryRecord {
    generation: usize,
    best_distance: f64,
    mean_distance: f64,
    worst_distance: f64,
    best_fitness: f64,
}

/// Index of the first maximum of the fitness vector
pub fn best_index(fitness: &[Fitness]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, f) in fitness.iter().enumerate() {
        match best {
            Some(b) if fitness[b] >= *f => {}
            _ => best = Some(i),
        }
    }
    best
}

/// One generation: select, recombine, mutate, evaluate.
pub fn evolve_generation<R: Rng + ?Sized>(
    population: &[Tour],
    fitness: &[Fitness],
    graph: &WeightedGraph,
    config: &GAConfig,
    rng: &mut R,
) -> Result<(Vec<Tour>, Vec<Fitness>)> {
    let parents = select(population, fitness, config.tournament_size, rng)?;
    let offspring = crossover(parents, rng)?;
    let offspring = mutate(offspring, config.mutation_rate, rng)?;
    let offspring_fitness = evaluate_population(&offspring, graph)?;
    Ok((offspring, offspring_fitness))
}

/// Genetic Algorithm implementation
pub struct GeneticAlgorithm<'g, R: Rng = ChaCha8Rng> {
    config: GAConfig,
    graph: &'g WeightedGraph,
    rng: R,
    seed: Option<u64>,
    population: Vec<Tour>,
    fitness: Vec<Fitness>,
    generation: usize,
    history: Vec<GenerationStats>,
}

impl<'g> GeneticAlgorithm<'g, ChaCha8Rng> {
    /// Engine seeded from `config.seed`
    pub fn new(graph: &'g WeightedGraph, config: GAConfig) -> Result<Self> {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let seed = config.seed;
        let mut ga = Self::with_rng(graph, config, rng)?;
        ga.seed = Some(seed);
        Ok(ga)
    }
}

impl<'g, R: Rng> GeneticAlgorithm<'g, R> {
    /// Engine drawing from a caller-supplied generator; `config.seed` is ignored
    pub fn with_rng(graph: &'g WeightedGraph, config: GAConfig, rng: R) -> Result<Self> {
        config.validate()?;
        if graph.is_empty() {
            return Err(TspError::InvalidParameter(
                "graph has no cities".to_string(),
            ));
        }

        Ok(GeneticAlgorithm {
            config,
            graph,
            rng,
            seed: None,
            population: Vec::new(),
            fitness: Vec::new(),
            generation: 0,
            history: Vec::new(),
        })
    }

    /// Create and evaluate the initial population
    fn initialize(&mut self) -> Result<()> {
        self.population =
            initialize_population(self.config.population_size, self.graph, &mut self.rng);
        self.fitness = evaluate_population(&self.population, self.graph)?;
        self.generation = 0;
        self.history.clear();
        self.record();
        Ok(())
    }

    fn record(&mut self) -> &GenerationStats {
        let stats = GenerationStats::from_fitness(self.generation, &self.fitness);
        log::debug!(
            "[GA] Gen {}  Best distance {:.3}  Mean {:.3}  Diversity {:.2}",
            stats.generation,
            stats.best_distance,
            stats.mean_distance,
            self.population_diversity()
        );
        self.history.push(stats);
        &self.history[self.history.len() - 1]
    }

    /// Replace the population with the next generation
    fn step(&mut self) -> Result<()> {
        let (offspring, fitness) = evolve_generation(
            &self.population,
            &self.fitness,
            self.graph,
            &self.config,
            &mut self.rng,
        )?;
        self.population = offspring;
        self.fitness = fitness;
        self.generation += 1;
        Ok(())
    }

    /// Run the genetic algorithm
    pub fn run(&mut self) -> Result<Solution> {
        self.run_with_observer(|_| {})
    }

    /// Run, reporting each generation's statistics (generation 0 included)
    pub fn run_with_observer<F>(&mut self, mut observer: F) -> Result<Solution>
    where
        F: FnMut(&GenerationStats),
    {
        let start = Instant::now();
        log::info!(
            "Running GA on {} cities: population {}, generations {}, mutation rate {}, tournament {}",
            self.graph.len(),
            self.config.population_size,
            self.config.generations,
            self.config.mutation_rate,
            self.config.tournament_size
        );

        self.initialize()?;
        observer(&self.history[0]);

        while self.generation < self.config.generations {
            self.step()?;
            observer(self.record());
        }

        let (tour, fitness) = self
            .best()
            .ok_or_else(|| TspError::InvalidParameter("empty population".to_string()))?;
        let mut solution = Solution::from_tour(self.graph, tour.clone(), "GeneticAlgorithm")?;
        solution.fitness = fitness;
        solution.seed = self.seed;
        solution.generations = self.generation;
        solution.computation_time = start.elapsed().as_secs_f64();

        log::info!(
            "GA finished after {} generations: distance {:.2}, fitness {}",
            self.generation,
            solution.distance,
            solution.fitness
        );
        Ok(solution)
    }

    /// Best tour of the current population and its fitness
    pub fn best(&self) -> Option<(&Tour, Fitness)> {
        best_index(&self.fitness).map(|i| (&self.population[i], self.fitness[i]))
    }

    pub fn config(&self) -> &GAConfig {
        &self.config
    }

    pub fn population(&self) -> &[Tour] {
        &self.population
    }

    pub fn current_generation(&self) -> usize {
        self.generation
    }

    /// Statistics of every generation run so far
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// Write the generation history to CSV
    pub fn export_history_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for stats in &self.history {
            writer.serialize(HistoryRecord {
                generation: stats.generation,
                best_distance: stats.best_distance,
                mean_distance: stats.mean_distance,
                worst_distance: stats.worst_distance,
                best_fitness: stats.best_fitness.value(),
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Average number of differing positions between individuals
    /// (sampled over the first 20)
    pub fn population_diversity(&self) -> f64 {
        let sample = self.population.len().min(20);
        if sample < 2 {
            return 0.0;
        }

        let mut total_diff = 0.0;
        let mut count = 0;

        for i in 0..sample {
            for j in i + 1..sample {
                let diff = self.population[i]
                    .iter()
                    .zip(self.population[j].iter())
                    .filter(|(a, b)| a != b)
                    .count();
                total_diff += diff as f64;
                count += 1;
            }
        }

        total_diff / count as f64
    }
}

/// Run the GA with the caller's generator and return the best route by name
/// with its fitness.
pub fn run_genetic_algorithm<R: Rng + ?Sized>(
    graph: &WeightedGraph,
    pop_size: usize,
    generations: usize,
    mutation_rate: f64,
    rng: &mut R,
) -> Result<(Vec<String>, Fitness)> {
    let config = GAConfig {
        population_size: pop_size,
        generations,
        mutation_rate,
        ..Default::default()
    };
    let mut ga = GeneticAlgorithm::with_rng(graph, config, rng)?;
    let solution = ga.run()?;
    Ok((solution.route, solution.fitness))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::reference_dataset;
    use crate::fitness::total_distance;

    #[test]
    fn test_genetic_algorithm() {
        let graph = reference_dataset();
        let config = GAConfig {
            population_size: 20,
            generations: 10,
            ..Default::default()
        };

        let mut ga = GeneticAlgorithm::new(&graph, config).unwrap();
        let solution = ga.run().unwrap();

        assert_eq!(solution.tour.len(), 8);
        assert!(is_permutation(&solution.tour, 8));
        assert_eq!(solution.generations, 10);
        assert_eq!(ga.history().len(), 11);
        assert_eq!(ga.population().len(), 20);
        assert_eq!(solution.seed, Some(42));
        assert_eq!(ga.current_generation(), 10);
        assert_eq!(ga.config().population_size, 20);
    }

    #[test]
    fn test_same_seed_same_result() {
        let graph = reference_dataset();
        let config = GAConfig {
            population_size: 12,
            generations: 15,
            mutation_rate: 0.2,
            seed: 1234,
            ..Default::default()
        };

        let a = GeneticAlgorithm::new(&graph, config.clone()).unwrap().run().unwrap();
        let b = GeneticAlgorithm::new(&graph, config).unwrap().run().unwrap();
        assert_eq!(a.tour, b.tour);
        assert_eq!(a.fitness, b.fitness);
    }

    #[test]
    fn test_zero_generations_returns_initial_best() {
        let graph = reference_dataset();
        let config = GAConfig {
            population_size: 6,
            generations: 0,
            ..Default::default()
        };

        let mut ga = GeneticAlgorithm::new(&graph, config).unwrap();
        let solution = ga.run().unwrap();
        let initial_best = ga.history()[0].best_fitness;

        assert_eq!(solution.generations, 0);
        assert_eq!(solution.fitness, initial_best);
    }

    #[test]
    fn test_odd_population_size_is_stable() {
        let graph = reference_dataset();
        let config = GAConfig {
            population_size: 7,
            generations: 5,
            ..Default::default()
        };

        let mut ga = GeneticAlgorithm::new(&graph, config).unwrap();
        ga.run().unwrap();
        assert_eq!(ga.population().len(), 7);
        assert!(ga.population().iter().all(|t| is_permutation(t, 8)));
    }

    #[test]
    fn test_invalid_parameters() {
        let graph = reference_dataset();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        for (pop, rate) in [(1, 0.01), (10, 1.5), (10, -0.5), (2, 0.01)] {
            assert!(matches!(
                run_genetic_algorithm(&graph, pop, 5, rate, &mut rng),
                Err(TspError::InvalidParameter(_))
            ));
        }

        let empty = WeightedGraph::new();
        assert!(run_genetic_algorithm(&empty, 10, 5, 0.01, &mut rng).is_err());
    }

    #[test]
    fn test_missing_edge_aborts_run() {
        let mut graph = WeightedGraph::new();
        graph.add_neighbor("A", "B", 1.0).unwrap();
        graph.add_neighbor("B", "C", 1.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert!(matches!(
            run_genetic_algorithm(&graph, 4, 3, 0.1, &mut rng),
            Err(TspError::MissingEdge { .. })
        ));
    }

    #[test]
    fn test_best_index_prefers_first_maximum() {
        let fitness = vec![
            Fitness::from_distance(5.0),
            Fitness::from_distance(2.0),
            Fitness::from_distance(2.0),
        ];
        assert_eq!(best_index(&fitness), Some(1));
        assert_eq!(best_index(&[]), None);
    }

    #[test]
    fn test_history_tracks_distances() {
        let graph = reference_dataset();
        let config = GAConfig {
            population_size: 10,
            generations: 3,
            ..Default::default()
        };
        let mut ga = GeneticAlgorithm::new(&graph, config).unwrap();
        let mut seen = Vec::new();
        let solution = ga.run_with_observer(|s| seen.push(s.generation)).unwrap();

        assert_eq!(seen, vec![0, 1, 2, 3]);
        let last = ga.history().last().unwrap();
        assert!(last.best_distance <= last.mean_distance + 1e-9);
        assert!(last.mean_distance <= last.worst_distance + 1e-9);
        let best = total_distance(&solution.tour, &graph).unwrap();
        assert!((best - last.best_distance).abs() < 1e-6);
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: GAConfig = serde_json::from_str(r#"{"population_size": 30}"#).unwrap();
        assert_eq!(config.population_size, 30);
        assert_eq!(config.tournament_size, 3);
        assert!(config.validate().is_ok());
    }
}
