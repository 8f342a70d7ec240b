use crate::epi_interface::{NodeId, SimError};
use hashbrown::HashSet;
use rand::Rng;

// ============================================================================
// Topology Selection
// ============================================================================

/// How the contact network is wired at construction
#[derive(Debug, Clone, PartialEq)]
pub enum Topology {
    /// Scale-free graph grown by preferential attachment: every node added
    /// after the seed connects to `attachment_m` existing nodes chosen with
    /// probability proportional to current degree. Average degree ends up
    /// near 2 × attachment_m.
    PreferentialAttachment { attachment_m: usize },

    /// Ring with `neighbors` contacts on each side (degree 2 × neighbors).
    /// Deterministic; mainly useful for controlled scenarios.
    Ring { neighbors: usize },
}

// ============================================================================
// Contact Network
// ============================================================================

/// Immutable undirected contact graph
///
/// Built once at simulation start; never mutated afterwards. Simple graph:
/// no self-loops, no duplicate edges between the same pair.
pub struct ContactNetwork {
    /// Neighbor lists indexed by node id
    adjacency: Vec<Vec<NodeId>>,

    /// Normalized (low, high) pairs for duplicate rejection and lookups
    edges: HashSet<(NodeId, NodeId)>,
}

impl ContactNetwork {
    /// Build a network of `population_size` nodes with the given topology
    pub fn build<R: Rng>(
        population_size: usize,
        topology: &Topology,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        match *topology {
            Topology::PreferentialAttachment { attachment_m } => {
                Self::preferential_attachment(population_size, attachment_m, rng)
            }
            Topology::Ring { neighbors } => Self::ring(population_size, neighbors),
        }
    }

    /// Grow a scale-free graph by preferential attachment
    ///
    /// Starts from `attachment_m` unconnected seed nodes; the first attached
    /// node links to all of them, and every later node links to
    /// `attachment_m` distinct existing nodes sampled with probability
    /// proportional to their current degree.
    pub fn preferential_attachment<R: Rng>(
        population_size: usize,
        attachment_m: usize,
        rng: &mut R,
    ) -> Result<Self, SimError> {
        if population_size == 0 {
            return Err(SimError::InvalidParameter("population_size must be positive"));
        }
        if attachment_m == 0 {
            return Err(SimError::InvalidParameter("attachment_m must be positive"));
        }
        if attachment_m >= population_size {
            return Err(SimError::InvalidParameter(
                "attachment_m must be smaller than population_size",
            ));
        }

        let mut network = Self::empty(population_size);

        // Every edge endpoint lands in this list once, so sampling an index
        // uniformly is the same as sampling a node by degree.
        let mut endpoints: Vec<NodeId> = Vec::with_capacity(2 * attachment_m * population_size);
        let mut targets: Vec<NodeId> = (0..attachment_m).collect();

        for new_node in attachment_m..population_size {
            for &target in &targets {
                network.add_edge(new_node, target);
            }
            endpoints.extend(&targets);
            endpoints.extend(std::iter::repeat(new_node).take(attachment_m));

            // Next round's targets: attachment_m distinct degree-weighted picks
            targets.clear();
            while targets.len() < attachment_m {
                let candidate = endpoints[rng.gen_range(0..endpoints.len())];
                if !targets.contains(&candidate) {
                    targets.push(candidate);
                }
            }
        }

        Ok(network)
    }

    /// Wire a ring where each node touches `neighbors` nodes on each side
    pub fn ring(population_size: usize, neighbors: usize) -> Result<Self, SimError> {
        if population_size == 0 {
            return Err(SimError::InvalidParameter("population_size must be positive"));
        }
        if neighbors == 0 {
            return Err(SimError::InvalidParameter("ring neighbors must be positive"));
        }
        if 2 * neighbors >= population_size {
            return Err(SimError::InvalidParameter(
                "ring neighbors must be fewer than half the population",
            ));
        }

        let mut network = Self::empty(population_size);

        // Forward offsets only; the reverse direction is the same edge
        for node in 0..population_size {
            for offset in 1..=neighbors {
                network.add_edge(node, (node + offset) % population_size);
            }
        }

        Ok(network)
    }

    fn empty(population_size: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); population_size],
            edges: HashSet::new(),
        }
    }

    /// Insert an undirected edge, silently rejecting self-loops and duplicates
    fn add_edge(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let key = (a.min(b), a.max(b));
        if self.edges.insert(key) {
            self.adjacency[a].push(b);
            self.adjacency[b].push(a);
        }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Neighbors of a node
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        &self.adjacency[node]
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency[node].len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edges.contains(&(a.min(b), a.max(b)))
    }

    pub fn average_degree(&self) -> f64 {
        if self.adjacency.is_empty() {
            return 0.0;
        }
        2.0 * self.edges.len() as f64 / self.adjacency.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn preferential_attachment_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let network = ContactNetwork::preferential_attachment(100, 3, &mut rng).unwrap();

        assert_eq!(network.len(), 100);
        // (population - seed) nodes each contribute exactly attachment_m edges
        assert_eq!(network.edge_count(), (100 - 3) * 3);
        assert!((network.average_degree() - 6.0).abs() < 0.25);
    }

    #[test]
    fn preferential_attachment_is_simple() {
        let mut rng = StdRng::seed_from_u64(11);
        let network = ContactNetwork::preferential_attachment(200, 4, &mut rng).unwrap();

        for node in 0..network.len() {
            let neighbors = network.neighbors(node);
            assert!(!neighbors.contains(&node), "self-loop at {}", node);

            let mut seen = neighbors.to_vec();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), neighbors.len(), "duplicate edge at {}", node);
        }
    }

    #[test]
    fn adjacency_is_symmetric() {
        let mut rng = StdRng::seed_from_u64(3);
        let network = ContactNetwork::preferential_attachment(80, 2, &mut rng).unwrap();

        for node in 0..network.len() {
            for &neighbor in network.neighbors(node) {
                assert!(network.neighbors(neighbor).contains(&node));
                assert!(network.contains_edge(node, neighbor));
            }
        }
    }

    #[test]
    fn preferential_attachment_is_deterministic_under_a_fixed_seed() {
        let build = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            ContactNetwork::preferential_attachment(150, 3, &mut rng).unwrap()
        };

        let a = build(42);
        let b = build(42);
        for node in 0..a.len() {
            assert_eq!(a.neighbors(node), b.neighbors(node));
        }
    }

    #[test]
    fn preferential_attachment_rejects_bad_parameters() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(ContactNetwork::preferential_attachment(0, 3, &mut rng).is_err());
        assert!(ContactNetwork::preferential_attachment(10, 0, &mut rng).is_err());
        assert!(ContactNetwork::preferential_attachment(10, 10, &mut rng).is_err());
        assert!(ContactNetwork::preferential_attachment(10, 11, &mut rng).is_err());
        assert!(ContactNetwork::preferential_attachment(10, 9, &mut rng).is_ok());
    }

    #[test]
    fn ring_has_uniform_degree() {
        let network = ContactNetwork::ring(10, 1).unwrap();

        assert_eq!(network.len(), 10);
        assert_eq!(network.edge_count(), 10);
        for node in 0..10 {
            assert_eq!(network.degree(node), 2);
        }
        // Wrap-around neighbors of node 0
        assert!(network.contains_edge(0, 1));
        assert!(network.contains_edge(0, 9));
    }

    #[test]
    fn ring_rejects_bad_parameters() {
        assert!(ContactNetwork::ring(0, 1).is_err());
        assert!(ContactNetwork::ring(10, 0).is_err());
        assert!(ContactNetwork::ring(10, 5).is_err());
        assert!(ContactNetwork::ring(10, 4).is_ok());
    }

    #[test]
    fn build_dispatches_on_topology() {
        let mut rng = StdRng::seed_from_u64(1);

        let pa = ContactNetwork::build(
            50,
            &Topology::PreferentialAttachment { attachment_m: 2 },
            &mut rng,
        )
        .unwrap();
        assert_eq!(pa.edge_count(), (50 - 2) * 2);

        let ring = ContactNetwork::build(12, &Topology::Ring { neighbors: 2 }, &mut rng).unwrap();
        assert_eq!(ring.degree(0), 4);
    }
}
