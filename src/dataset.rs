//! Reference distance table: road distances in km between eight UK cities.

use crate::graph::WeightedGraph;

/// City names of the reference table, in registration order
pub const REFERENCE_CITIES: [&str; 8] = [
    "Brighton",
    "Bristol",
    "Cambridge",
    "Glasgow",
    "Liverpool",
    "London",
    "Manchester",
    "Oxford",
];

/// Row `i` holds the distances from `REFERENCE_CITIES[i]` to every city.
/// The table carries a 9 km Manchester self-loop; tours never use the diagonal.
const REFERENCE_DISTANCES: [[f64; 8]; 8] = [
    [0.0, 172.0, 145.0, 607.0, 329.0, 72.0, 312.0, 120.0],
    [172.0, 0.0, 192.0, 494.0, 209.0, 158.0, 216.0, 92.0],
    [145.0, 192.0, 0.0, 490.0, 237.0, 75.0, 205.0, 100.0],
    [607.0, 494.0, 490.0, 0.0, 286.0, 545.0, 296.0, 489.0],
    [329.0, 209.0, 237.0, 286.0, 0.0, 421.0, 49.0, 208.0],
    [72.0, 158.0, 75.0, 545.0, 421.0, 0.0, 249.0, 75.0],
    [312.0, 216.0, 205.0, 296.0, 49.0, 249.0, 9.0, 194.0],
    [120.0, 92.0, 100.0, 489.0, 208.0, 75.0, 194.0, 0.0],
];

/// Build the reference graph with both directions of every connection.
pub fn reference_dataset() -> WeightedGraph {
    let mut graph = WeightedGraph::new();
    for (from, row) in REFERENCE_CITIES.iter().zip(REFERENCE_DISTANCES.iter()) {
        for (to, &distance) in REFERENCE_CITIES.iter().zip(row.iter()) {
            if let Err(e) = graph.add_neighbor(from, to, distance) {
                log::error!("Reference dataset rejected {} -> {}: {}", from, to, e);
            }
        }
    }
    graph
}

impl WeightedGraph {
    /// The eight-city UK reference graph
    pub fn reference_dataset() -> Self {
        reference_dataset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_dataset_shape() {
        let graph = reference_dataset();
        let stats = graph.statistics();

        assert_eq!(graph.get_cities().len(), 8);
        assert_eq!(graph.get_cities()[0], "Brighton");
        assert!(stats.complete);
        assert!(stats.symmetric);
        assert_eq!(stats.num_connections, 64);
        assert_eq!(graph.get_neighbors("London").unwrap().get("Oxford"), Some(75.0));
        assert_eq!(graph.get_neighbors("Manchester").unwrap().get("Manchester"), Some(9.0));
    }
}
