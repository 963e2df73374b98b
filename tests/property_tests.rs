//! Property-based tests for tsp-genetic
//!
//! Uses proptest to verify invariants of the evolutionary operators.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tsp_genetic::genetic::{
    crossover, initialize_population, is_permutation, mutate, order_crossover, swap_mutation,
    tournament, Tour,
};
use tsp_genetic::{total_distance, Fitness, WeightedGraph};

/// Complete directed graph with the given edge weights, row-major, diagonal ignored
fn complete_graph(n: usize, weights: &[f64]) -> WeightedGraph {
    let mut graph = WeightedGraph::new();
    let names: Vec<String> = (0..n).map(|i| format!("C{}", i)).collect();
    for name in &names {
        graph.add_city(name);
    }
    for i in 0..n {
        for j in 0..n {
            if i != j {
                graph
                    .add_neighbor(&names[i], &names[j], weights[(i * n + j) % weights.len()])
                    .unwrap();
            }
        }
    }
    graph
}

/// Complete graph where `i -> j` and `j -> i` share one weight
fn symmetric_graph(n: usize, weights: &[f64]) -> WeightedGraph {
    let mut graph = WeightedGraph::new();
    let names: Vec<String> = (0..n).map(|i| format!("C{}", i)).collect();
    for name in &names {
        graph.add_city(name);
    }
    for i in 0..n {
        for j in i + 1..n {
            let w = weights[(i * n + j) % weights.len()];
            graph.add_neighbor(&names[i], &names[j], w).unwrap();
            graph.add_neighbor(&names[j], &names[i], w).unwrap();
        }
    }
    graph
}

fn random_tour(n: usize, seed: u64) -> Tour {
    use rand::seq::SliceRandom;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut tour: Tour = (0..n).collect();
    tour.shuffle(&mut rng);
    tour
}

proptest! {
    // ==================== Population Properties ====================

    #[test]
    fn initial_population_is_permutations(
        n in 1usize..15,
        pop_size in 2usize..30,
        seed in any::<u64>()
    ) {
        let graph = complete_graph(n, &[1.0]);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let population = initialize_population(pop_size, &graph, &mut rng);

        prop_assert_eq!(population.len(), pop_size);
        for tour in &population {
            prop_assert!(is_permutation(tour, n));
        }
    }

    // ==================== Crossover Properties ====================

    #[test]
    fn order_crossover_preserves_permutation(
        n in 1usize..20,
        s1 in any::<u64>(),
        s2 in any::<u64>(),
        seed in any::<u64>()
    ) {
        let p1 = random_tour(n, s1);
        let p2 = random_tour(n, s2);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let (c1, c2) = order_crossover(&p1, &p2, &mut rng).unwrap();
        prop_assert!(is_permutation(&c1, n));
        prop_assert!(is_permutation(&c2, n));
    }

    #[test]
    fn crossover_keeps_offspring_count(
        n in 2usize..12,
        count in 2usize..25,
        seed in any::<u64>()
    ) {
        let parents: Vec<Tour> = (0..count as u64).map(|s| random_tour(n, s)).collect();
        let refs: Vec<&Tour> = parents.iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let offspring = crossover(refs, &mut rng).unwrap();
        prop_assert_eq!(offspring.len(), count);
        for child in &offspring {
            prop_assert!(is_permutation(child, n));
        }
    }

    // ==================== Mutation Properties ====================

    #[test]
    fn swap_mutation_changes_exactly_two_positions(
        n in 2usize..30,
        s in any::<u64>(),
        seed in any::<u64>()
    ) {
        let original = random_tour(n, s);
        let mut tour = original.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let (i, j) = swap_mutation(&mut tour, &mut rng).unwrap();
        prop_assert_ne!(i, j);

        let changed = original.iter().zip(tour.iter()).filter(|(a, b)| a != b).count();
        prop_assert_eq!(changed, 2);
        prop_assert!(is_permutation(&tour, n));
    }

    #[test]
    fn mutate_changes_zero_or_two_positions(
        n in 2usize..15,
        rate in 0.0f64..=1.0,
        seed in any::<u64>()
    ) {
        let originals: Vec<Tour> = (0..10u64).map(|s| random_tour(n, s)).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mutated = mutate(originals.clone(), rate, &mut rng).unwrap();
        for (before, after) in originals.iter().zip(mutated.iter()) {
            let changed = before.iter().zip(after.iter()).filter(|(a, b)| a != b).count();
            prop_assert!(changed == 0 || changed == 2);
            prop_assert!(is_permutation(after, n));
        }
    }

    // ==================== Fitness Properties ====================

    #[test]
    fn total_distance_is_rotation_invariant(
        n in 2usize..10,
        weights in prop::collection::vec(0.5f64..100.0, 1..50),
        s in any::<u64>(),
        shift in 0usize..10
    ) {
        let graph = complete_graph(n, &weights);
        let tour = random_tour(n, s);
        let mut rotated = tour.clone();
        rotated.rotate_left(shift % n);

        let d1 = total_distance(&tour, &graph).unwrap();
        let d2 = total_distance(&rotated, &graph).unwrap();
        prop_assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn total_distance_ignores_direction_on_symmetric_graph(
        n in 2usize..10,
        weights in prop::collection::vec(0.5f64..100.0, 1..50),
        s in any::<u64>()
    ) {
        let graph = symmetric_graph(n, &weights);
        prop_assert!(graph.is_symmetric());

        let tour = random_tour(n, s);
        let mut reversed = tour.clone();
        reversed.reverse();

        let forward = total_distance(&tour, &graph).unwrap();
        let backward = total_distance(&reversed, &graph).unwrap();
        prop_assert!((forward - backward).abs() < 1e-9);
    }

    #[test]
    fn shorter_distance_means_higher_fitness(
        a in 0.001f64..1e6,
        gap in 1.0f64..1e6
    ) {
        let b = a + gap;
        prop_assert!(Fitness::from_distance(a) > Fitness::from_distance(b));
        prop_assert!(Fitness::from_distance(0.0) > Fitness::from_distance(a));
    }

    // ==================== Selection Properties ====================

    #[test]
    fn tournament_winner_beats_contestants(
        scores in prop::collection::vec(0.001f64..10.0, 1..40),
        size in 1usize..40,
        seed in any::<u64>()
    ) {
        let size = size.min(scores.len());
        let fitness: Vec<Fitness> = scores.iter().map(|&d| Fitness::from_distance(d)).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let result = tournament(&fitness, size, &mut rng).unwrap();
        prop_assert_eq!(result.contestants.len(), size);
        prop_assert!(result.contestants.contains(&result.winner));
        for &idx in &result.contestants {
            prop_assert!(fitness[result.winner] >= fitness[idx]);
        }
    }
}
