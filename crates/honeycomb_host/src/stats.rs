//! Weight statistics for decoding graphs.
//!
//! Summarizes the error edges of a decoding graph: how many there are, how
//! many end on the boundary, and how their weights are distributed. The
//! auxiliary connectivity edges are left out since they carry no error
//! information.

use honeycomb_core::graph::DecodingGraph;

const NUM_BUCKETS: usize = 20;

/// Tracks edge-weight statistics of a decoding graph.
///
/// Weights are negative log probabilities, so histogram buckets are one nat
/// wide; the last bucket collects everything from 19 upwards.
pub struct GraphStats {
    pub nodes: usize,
    pub detectors: usize,
    pub edges: u64,
    pub boundary_edges: u64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub buckets: [u64; NUM_BUCKETS],
}

impl GraphStats {
    /// Creates an empty tracker for a graph of `nodes` nodes, `detectors` of
    /// them detectors.
    pub fn new(nodes: usize, detectors: usize) -> Self {
        Self {
            nodes,
            detectors,
            edges: 0,
            boundary_edges: 0,
            min: f64::INFINITY,
            max: 0.0,
            sum: 0.0,
            buckets: [0; NUM_BUCKETS],
        }
    }

    /// Collects statistics over every error edge of `graph`.
    pub fn from_graph(graph: &DecodingGraph) -> Self {
        let mut stats = Self::new(graph.num_nodes(), graph.num_detectors());
        let boundary = graph.boundary_node();
        for (u, v, edge) in graph.error_edges() {
            stats.update(edge.weight, u == boundary || v == boundary);
        }
        stats
    }

    /// Records one edge weight.
    ///
    /// # Arguments
    ///
    /// * `weight` - Edge weight (negative log probability)
    /// * `boundary` - Whether the edge ends on the boundary node
    pub fn update(&mut self, weight: f64, boundary: bool) {
        self.min = self.min.min(weight);
        self.max = self.max.max(weight);
        self.sum += weight;
        self.edges += 1;
        if boundary {
            self.boundary_edges += 1;
        }

        let idx = (weight.max(0.0) as usize).min(NUM_BUCKETS - 1);
        self.buckets[idx] += 1;
    }

    /// Average edge weight, or 0.0 if no edge was recorded.
    pub fn avg(&self) -> f64 {
        if self.edges == 0 {
            0.0
        } else {
            self.sum / self.edges as f64
        }
    }

    /// Prints a formatted report of the graph statistics.
    pub fn print_report(&self) {
        println!("\nDecoding Graph");
        println!("Nodes:          {} ({} detectors)", self.nodes, self.detectors);
        println!("Error edges:    {}", self.edges);
        println!("Boundary edges: {}", self.boundary_edges);

        if self.edges == 0 {
            return;
        }
        println!("Min weight:     {:.4}", self.min);
        println!("Avg weight:     {:.4}", self.avg());
        println!("Max weight:     {:.4}", self.max);

        println!("Distribution (1-nat buckets):");
        for (i, &count) in self.buckets.iter().enumerate() {
            if count > 0 {
                let range_end = if i == NUM_BUCKETS - 1 { ">" } else { "" };
                println!("[{:2}-{:2}{}]: {}", i, i + 1, range_end, count);
            }
        }
    }
}
