use honeycomb_core::dem::{DemInstruction, DemTarget, ErrorModel};
use honeycomb_core::generator::{CircuitParams, generate};
use honeycomb_core::graph::DecodingGraph;
use honeycomb_io::parser::{load_dem_file, parse_dem};
use honeycomb_io::writer::{write_circuit_file, write_dem_file};
use std::fs;
use tempfile::tempdir;

#[test]
fn repeated_model_from_disk_builds_shifted_graph() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("memory.dem");
    fs::write(
        &path,
        "repeat 2 {\n    error(0.1) D0 D1\n    shift_detectors 5\n}\n",
    )
    .unwrap();

    let model = load_dem_file(&path).unwrap();
    let graph = DecodingGraph::from_error_model(&model).unwrap();
    assert_eq!(graph.num_nodes(), 9);
    let weight = -(0.1f64).ln();
    assert!((graph.edge(0, 1).unwrap().weight - weight).abs() < 1e-12);
    assert!((graph.edge(5, 6).unwrap().weight - weight).abs() < 1e-12);
}

#[test]
fn boundary_edge_from_single_detector_error() {
    let model = parse_dem("error(0.2) D3\n").unwrap();
    let graph = DecodingGraph::from_error_model(&model).unwrap();
    assert_eq!(graph.num_detectors(), 4);
    assert_eq!(graph.boundary_node(), 4);
    let edge = graph.edge(3, 4).unwrap();
    assert!((edge.weight - (-(0.2f64).ln())).abs() < 1e-12);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let err = load_dem_file(dir.path().join("absent.dem")).unwrap_err();
    assert!(err.to_string().contains("absent.dem"));
}

#[test]
fn written_circuit_matches_rendering() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("d1.stim");
    let generated = generate(&CircuitParams {
        distance: 1,
        cycles: 3,
        ..CircuitParams::default()
    })
    .unwrap();
    write_circuit_file(&path, &generated.circuit).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text, generated.circuit.to_string());
    assert!(text.starts_with("QUBIT_COORDS(1, 0) 0\n"));
    assert!(text.contains("REPEAT 2 {"));
}

#[test]
fn written_model_reloads_with_same_structure() {
    let mut body = ErrorModel::new();
    body.push(DemInstruction::Error {
        probability: 0.125,
        targets: vec![
            DemTarget::Detector(0),
            DemTarget::Separator,
            DemTarget::Detector(2),
            DemTarget::Observable(0),
        ],
    });
    body.push(DemInstruction::ShiftDetectors {
        coords: vec![0.0, 0.0, 1.0],
        shift: 3,
    });
    let mut model = ErrorModel::new();
    model.push(DemInstruction::Detector {
        coords: vec![1.0, 2.0, 0.0],
        targets: vec![DemTarget::Detector(0)],
    });
    model.push(DemInstruction::Repeat { count: 4, body });

    let dir = tempdir().unwrap();
    let path = dir.path().join("model.dem");
    write_dem_file(&path, &model).unwrap();
    assert_eq!(load_dem_file(&path).unwrap(), model);
}

#[test]
fn overflowing_shift_in_file_is_an_error() {
    let model = parse_dem("shift_detectors 18446744073709551615\nerror(0.1) D1\n").unwrap();
    assert!(DecodingGraph::from_error_model(&model).is_err());

    let huge = parse_dem("error(0.1) D10000000000\n").unwrap();
    assert!(DecodingGraph::from_error_model(&huge).is_err());
}
