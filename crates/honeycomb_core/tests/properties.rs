//! Property-based tests for lattice construction, scheduling, detectors and
//! decoding-graph assembly.

use honeycomb_core::circuit::Instruction;
use honeycomb_core::dem::{DemInstruction, DemTarget, ErrorModel};
use honeycomb_core::detectors::{DetectorGenerator, closing_color};
use honeycomb_core::generator::{CircuitParams, generate};
use honeycomb_core::graph::DecodingGraph;
use honeycomb_core::lattice::{Color, Lattice};
use honeycomb_core::qubits::QubitIndex;
use honeycomb_core::schedule::{CYCLE, CycleScheduler, MeasurementStyle, MeasurementTimes};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn lattice_counts_scale_with_distance(d in 1usize..=6) {
        let lattice = Lattice::build(d).unwrap();
        let d2 = d * d;
        prop_assert_eq!(lattice.cells().len(), 6 * d2);
        prop_assert_eq!(lattice.edges().len(), 18 * d2);
        for color in Color::ALL {
            prop_assert_eq!(lattice.cells_of(color).count(), 2 * d2);
            prop_assert_eq!(lattice.edges_of(color).count(), 6 * d2);
        }
        prop_assert_eq!(QubitIndex::for_lattice(&lattice).len(), 12 * d2);
    }

    #[test]
    fn each_round_closes_one_color(d in 1usize..=4) {
        let lattice = Lattice::build(d).unwrap();
        let qubits = QubitIndex::for_lattice(&lattice);
        let scheduler = CycleScheduler::new(&lattice, &qubits).unwrap();
        let first = scheduler.schedule_cycle(MeasurementTimes::new());
        let second = scheduler.schedule_cycle(first.into_times());
        let generator = DetectorGenerator::new(&lattice, &qubits);
        for r in 0..CYCLE.len() {
            let detectors = generator.round_detectors(r, &second).unwrap();
            prop_assert_eq!(detectors.len(), lattice.cells_of(closing_color(r)).count());
            let now = second.round_end(r) as i64;
            for detector in &detectors {
                for &lookback in &detector.lookbacks {
                    prop_assert!(lookback < 0);
                    // Never before the start of the first cycle.
                    prop_assert!(now + lookback >= 0);
                }
            }
        }
    }

    #[test]
    fn generated_circuits_reference_existing_records(
        d in 1usize..=3,
        cycles in 1usize..=5,
        decomposed in any::<bool>(),
    ) {
        let params = CircuitParams {
            distance: d,
            cycles,
            noise: 0.0,
            style: if decomposed { MeasurementStyle::Decomposed } else { MeasurementStyle::Native },
        };
        let generated = generate(&params).unwrap();
        let circuit = &generated.circuit;
        prop_assert!(circuit.check_record_references().is_ok());
        prop_assert_eq!(
            circuit.num_measurements(),
            (cycles * generated.measurements_per_cycle) as u64
        );
        prop_assert_eq!(
            generated.measurements_per_cycle,
            generated.measurements_per_round.iter().sum::<usize>()
        );
        prop_assert_eq!(
            circuit.num_detectors(),
            ((cycles - 1) * 6 * 2 * d * d) as u64
        );
        let coords = circuit
            .instructions()
            .iter()
            .filter(|inst| matches!(inst, Instruction::QubitCoords { .. }))
            .count();
        prop_assert_eq!(coords, 12 * d * d);
    }

    #[test]
    fn repeated_pair_errors_land_on_shifted_nodes(
        pairs in prop::collection::vec((0u64..4, 0u64..4), 1..6),
        count in 1u64..5,
        shift in 4u64..8,
    ) {
        let mut body = ErrorModel::new();
        for &(a, b) in &pairs {
            let targets = if a == b {
                vec![DemTarget::Detector(a)]
            } else {
                vec![DemTarget::Detector(a), DemTarget::Detector(b)]
            };
            body.push(DemInstruction::Error { probability: 0.05, targets });
        }
        body.push(DemInstruction::ShiftDetectors { coords: vec![], shift });
        let mut model = ErrorModel::new();
        model.push(DemInstruction::Repeat { count, body });

        let graph = DecodingGraph::from_error_model(&model).unwrap();
        prop_assert_eq!(graph.num_nodes(), graph.num_detectors() + 2);
        for k in 0..count {
            let offset = k * shift;
            for &(a, b) in &pairs {
                let (u, v) = if a == b {
                    ((a + offset) as usize, graph.boundary_node())
                } else {
                    ((a + offset) as usize, (b + offset) as usize)
                };
                prop_assert!(graph.edge(u, v).is_some(), "missing edge {}-{}", u, v);
            }
        }
        let auxiliary = graph.auxiliary_node();
        for node in 0..auxiliary {
            prop_assert!(graph.edge(node, auxiliary).is_some());
        }
    }
}

#[test]
fn distance_one_reference_layout() {
    let generated = generate(&CircuitParams {
        distance: 1,
        cycles: 2,
        ..CircuitParams::default()
    })
    .unwrap();
    let text = generated.circuit.to_string();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("QUBIT_COORDS(1, 0) 0"));
    assert!(text.contains("QUBIT_COORDS(3, 5) 11"));
    assert!(text.contains("REPEAT 1 {"));
    assert_eq!(text.matches("DETECTOR(").count(), 12);
    let cells: Vec<(i64, i64)> = generated
        .lattice
        .cells()
        .keys()
        .map(|c| (c.re, c.im))
        .collect();
    for line in text.lines().map(str::trim).filter(|l| l.starts_with("DETECTOR(")) {
        let args = &line["DETECTOR(".len()..line.find(')').unwrap()];
        let parts: Vec<i64> = args.split(", ").map(|a| a.parse().unwrap()).collect();
        assert_eq!(parts.len(), 3, "{line}");
        assert_eq!(parts[2], 0, "{line}");
        assert!(cells.contains(&(parts[0], parts[1])), "{line}");
    }
    assert_eq!(text.matches("SHIFT_COORDS(0, 0, 1)").count(), 6);
}
