//! Weighted decoding graph built from a detector error model.
//!
//! Nodes `0..n` are the detectors, node `n` is the boundary and node `n + 1`
//! is an auxiliary node joined to every other node with a prohibitive weight,
//! so decoders that need a single connected component accept the graph.
//! Error mechanisms flipping one detector pair it with the boundary; those
//! flipping two become an edge between them. Anything else is outside this
//! graph model and is skipped.

use crate::dem::{ErrorMechanism, ErrorModel};
use crate::{HoneycombError, Result};
use honeycomb_common::consts::{DISCONNECTED_WEIGHT, MAX_GRAPH_DETECTORS};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::{debug, trace};

/// Role of a graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Detector(u64),
    Boundary,
    Auxiliary,
}

/// Payload of a graph edge.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
    /// Negative log probability of the error mechanism.
    pub weight: f64,
    /// Logical observables flipped when the decoder selects this edge.
    pub observables: Vec<u64>,
}

/// Decoding graph representing the error model topology.
///
/// Construction is the only mutating surface; once built, the graph is read
/// through the accessors below or handed to a matching library through
/// [`DecodingGraph::as_petgraph`].
#[derive(Clone, Debug)]
pub struct DecodingGraph {
    graph: UnGraph<NodeKind, GraphEdge>,
    num_detectors: usize,
}

impl DecodingGraph {
    /// Creates a graph with `num_detectors` detector nodes, the boundary node
    /// and the auxiliary node, with no error edges yet.
    ///
    /// The size is taken as given; [`DecodingGraph::from_error_model`] is the
    /// entry point that bounds it.
    pub fn new(num_detectors: usize) -> Self {
        let mut graph = UnGraph::with_capacity(num_detectors + 2, num_detectors * 4);
        for id in 0..num_detectors {
            graph.add_node(NodeKind::Detector(id as u64));
        }
        graph.add_node(NodeKind::Boundary);
        let auxiliary = graph.add_node(NodeKind::Auxiliary);
        for node in 0..=num_detectors {
            graph.add_edge(
                NodeIndex::new(node),
                auxiliary,
                GraphEdge {
                    weight: DISCONNECTED_WEIGHT,
                    observables: Vec::new(),
                },
            );
        }
        Self {
            graph,
            num_detectors,
        }
    }

    /// Builds the graph for every mechanism of `model`.
    ///
    /// The detector count is taken from the model itself.
    ///
    /// # Errors
    ///
    /// `UnsupportedInstruction` if the model contains an instruction kind the
    /// traversal does not know, `DetectorIndexOverflow` if detector indices
    /// leave the 64-bit range, and `TooManyDetectors` if the model needs more
    /// than `MAX_GRAPH_DETECTORS` detector nodes.
    pub fn from_error_model(model: &ErrorModel) -> Result<Self> {
        let count = model.num_detectors()?;
        if count > MAX_GRAPH_DETECTORS {
            return Err(HoneycombError::TooManyDetectors {
                count,
                limit: MAX_GRAPH_DETECTORS,
            });
        }
        let num_detectors = count as usize;
        let mut graph = Self::new(num_detectors);
        let mut added = 0usize;
        for mechanism in model.errors()? {
            if graph.add_error(&mechanism)? {
                added += 1;
            }
        }
        debug!(
            detectors = num_detectors,
            edges = added,
            "built decoding graph from error model"
        );
        Ok(graph)
    }

    /// Adds the edge for one error mechanism, replacing any existing edge
    /// between the same endpoints.
    ///
    /// Returns whether an edge was written. Zero-probability mechanisms and
    /// mechanisms flipping other than one or two detectors write nothing.
    ///
    /// # Errors
    ///
    /// `NodeOutOfBounds` if a detector index is not below the graph's
    /// detector count.
    pub fn add_error(&mut self, mechanism: &ErrorMechanism) -> Result<bool> {
        if mechanism.probability == 0.0 {
            trace!("skipping zero-probability error mechanism");
            return Ok(false);
        }
        let (u, v) = match *mechanism.detectors.as_slice() {
            [d] => (self.detector_node(d)?, self.boundary_index()),
            [a, b] => (self.detector_node(a)?, self.detector_node(b)?),
            ref other => {
                trace!(
                    detectors = other.len(),
                    "skipping error mechanism outside the graph model"
                );
                return Ok(false);
            }
        };
        self.graph.update_edge(
            u,
            v,
            GraphEdge {
                weight: -mechanism.probability.ln(),
                observables: mechanism.observables.clone(),
            },
        );
        Ok(true)
    }

    pub fn num_detectors(&self) -> usize {
        self.num_detectors
    }

    /// Number of nodes, always `num_detectors + 2`.
    pub fn num_nodes(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges, auxiliary edges included.
    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn boundary_node(&self) -> usize {
        self.num_detectors
    }

    pub fn auxiliary_node(&self) -> usize {
        self.num_detectors + 1
    }

    pub fn node_kind(&self, node: usize) -> Option<NodeKind> {
        self.graph.node_weight(NodeIndex::new(node)).copied()
    }

    /// The edge between nodes `u` and `v`, in either order.
    pub fn edge(&self, u: usize, v: usize) -> Option<&GraphEdge> {
        if u >= self.num_nodes() || v >= self.num_nodes() {
            return None;
        }
        self.graph
            .find_edge(NodeIndex::new(u), NodeIndex::new(v))
            .and_then(|e| self.graph.edge_weight(e))
    }

    /// Every edge as `(u, v, payload)`, auxiliary edges included.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, &GraphEdge)> {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), e.weight()))
    }

    /// Edges produced by error mechanisms, excluding the auxiliary edges.
    pub fn error_edges(&self) -> impl Iterator<Item = (usize, usize, &GraphEdge)> {
        let auxiliary = self.auxiliary_node();
        self.edges()
            .filter(move |(u, v, _)| *u != auxiliary && *v != auxiliary)
    }

    /// The underlying graph, for handing to a matching library.
    pub fn as_petgraph(&self) -> &UnGraph<NodeKind, GraphEdge> {
        &self.graph
    }

    fn boundary_index(&self) -> NodeIndex {
        NodeIndex::new(self.boundary_node())
    }

    fn detector_node(&self, id: u64) -> Result<NodeIndex> {
        if id >= self.num_detectors as u64 {
            return Err(HoneycombError::NodeOutOfBounds {
                node: id,
                num_nodes: self.num_nodes(),
            });
        }
        Ok(NodeIndex::new(id as usize))
    }
}
