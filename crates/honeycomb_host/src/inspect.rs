//! Decoding-graph inspection command.
//!
//! Loads a detector error model from disk, builds its decoding graph and
//! prints the weight report.

use crate::stats::GraphStats;
use anyhow::Result;
use honeycomb_core::graph::DecodingGraph;
use honeycomb_io::parser;
use std::path::Path;
use std::time::Instant;

/// Loads a detector error model, builds its decoding graph and prints the
/// weight report.
pub fn report_graph(dem_path: &Path) -> Result<GraphStats> {
    println!("Loading error model from {}...", dem_path.display());
    let start = Instant::now();
    let model = parser::load_dem_file(dem_path)?;
    let graph = DecodingGraph::from_error_model(&model)?;
    println!(
        "Graph built in {:?}. Nodes: {}, Edges: {}",
        start.elapsed(),
        graph.num_nodes(),
        graph.num_edges()
    );

    let stats = GraphStats::from_graph(&graph);
    stats.print_report();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reports_repeated_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.dem");
        fs::write(
            &path,
            "error(0.2) D3\nrepeat 2 {\n    error(0.1) D0 D1\n    shift_detectors 5\n}\n",
        )
        .unwrap();
        let stats = report_graph(&path).unwrap();
        assert_eq!(stats.detectors, 7);
        assert_eq!(stats.edges, 3);
        assert_eq!(stats.boundary_edges, 1);
    }

    #[test]
    fn rejects_unsupported_instructions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd.dem");
        fs::write(&path, "error(0.1) D0\ndetector_separator 1\n").unwrap();
        assert!(report_graph(&path).is_err());
    }
}
