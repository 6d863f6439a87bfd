//! Property-based tests for evaluation and cycle handling.
//!
//! These use proptest to check properties that should hold for any wiring of
//! a control graph, cyclic or not.

use fls_core::{
    FuzzyLogic, Id, InputSide, MembershipGeometry, MembershipSet, Operator, TrapezoidGeometry,
    TrapezoidShape, UpdateConfig,
};
use proptest::prelude::*;

// ===== Helpers =====

/// Reads a fuzzification set's degree straight from its height.
struct HeightAsDegree;

impl MembershipGeometry for HeightAsDegree {
    fn membership_at(&self, set: &MembershipSet, _crisp: f32) -> f32 {
        set.height
    }
}

fn arb_operator() -> impl Strategy<Value = Operator> {
    prop::sample::select(Operator::ALL.to_vec())
}

/// One input wire: `Ok(i)` is input set `i`, `Err(i)` is node `i`.
type Wire = Result<usize, usize>;

fn arb_wire(sets: usize, nodes: usize) -> impl Strategy<Value = Wire> {
    prop_oneof![(0..sets).prop_map(Wire::Ok), (0..nodes).prop_map(Wire::Err)]
}

/// A wire for node `i` that only reads sets or nodes before it.
fn arb_backward_wire(sets: usize, i: usize) -> impl Strategy<Value = Wire> {
    arb_wire(sets, i.max(1)).prop_map(move |w| match w {
        Err(j) if j >= i => Ok(0),
        other => other,
    })
}

/// Build a graph with `sets` input sets, one output set per node and the given
/// node wiring, using the unchecked setters.
fn build(sets: usize, wiring: &[(Operator, Wire, Wire)]) -> (FuzzyLogic, Vec<Id>) {
    let mut logic = FuzzyLogic::new();
    logic.initialize();
    logic.set_evaluation_enabled(true);
    let fuzz = logic.fuzzification(0).unwrap().id().clone();
    let defuzz = logic.defuzzification().unwrap().id().clone();
    let set_ids: Vec<Id> = (0..sets)
        .map(|_| logic.add_membership_set(&fuzz).unwrap())
        .collect();
    let node_ids: Vec<Id> = wiring.iter().map(|_| logic.add_inference().unwrap()).collect();

    let pick = |wire: &Wire| match *wire {
        Ok(i) => set_ids[i].clone(),
        Err(i) => node_ids[i].clone(),
    };
    for (node, (operator, left, right)) in node_ids.iter().zip(wiring) {
        logic.set_operator(node, *operator).unwrap();
        logic.set_left_input(node, Some(pick(left))).unwrap();
        logic.set_right_input(node, Some(pick(right))).unwrap();
        let out = logic.add_membership_set(&defuzz).unwrap();
        logic.set_output(node, Some(out)).unwrap();
    }
    (logic, node_ids)
}

// ===== Property Tests =====

proptest! {
    #[test]
    fn prop_operator_semantics(
        operator in arb_operator(),
        left in 0.0f32..=1.0,
        right in 0.0f32..=1.0,
    ) {
        let (mut logic, nodes) = build(2, &[(operator, Ok(0), Ok(1))]);
        let a = logic.inference_by_id(&nodes[0]).unwrap().left_input().unwrap().clone();
        let b = logic.inference_by_id(&nodes[0]).unwrap().right_input().unwrap().clone();
        logic.membership_set_mut(&a).unwrap().height = left;
        logic.membership_set_mut(&b).unwrap().height = right;

        let expected = match operator {
            Operator::And => left.min(right),
            Operator::Or => left.max(right),
            Operator::Not => 1.0 - left,
            Operator::Passthrough => left,
        };
        prop_assert_eq!(logic.evaluate_with(&nodes[0], &HeightAsDegree), Ok(expected));
    }

    #[test]
    fn prop_clamped_trapezoid_degree_is_in_unit_interval(
        mut points in prop::array::uniform4(-100.0f32..100.0),
        crisp in prop::num::f32::ANY,
    ) {
        points.sort_by(f32::total_cmp);
        let mut set = MembershipSet::new(Id::from("s"));
        set.shape = TrapezoidShape::new(points[0], points[1], points[2], points[3]);
        let degree = TrapezoidGeometry.membership_at(&set, crisp);
        prop_assert!((0.0..=1.0).contains(&degree), "degree {} at {}", degree, crisp);
    }

    #[test]
    fn prop_backward_wiring_is_acyclic_and_resolves(
        wiring in (1usize..12).prop_flat_map(|n| {
            (0..n)
                .map(|i| (arb_operator(), arb_backward_wire(3, i), arb_backward_wire(3, i)))
                .collect::<Vec<_>>()
        })
    ) {
        let (mut logic, nodes) = build(3, &wiring);
        for node in &nodes {
            prop_assert_eq!(logic.has_cycle(node), Ok(false));
            prop_assert!(logic.evaluate(node).is_ok());
        }
        let report = logic.run_update().unwrap();
        prop_assert_eq!(report.written, nodes.len());
    }

    #[test]
    fn prop_any_wiring_terminates_and_accounts_for_every_node(
        wiring in (1usize..10).prop_flat_map(|n| {
            prop::collection::vec((arb_operator(), arb_wire(2, n), arb_wire(2, n)), n)
        }),
        memoize in any::<bool>(),
    ) {
        let (mut logic, nodes) = build(2, &wiring);
        let config = UpdateConfig { memoize };
        let report = logic.run_update_with(&TrapezoidGeometry, &config).unwrap();
        prop_assert_eq!(report.written + report.unresolved + report.cyclic, nodes.len());

        for node in &nodes {
            if logic.has_cycle(node).unwrap() {
                let out = logic.inference_by_id(node).unwrap().output().clone();
                prop_assert_eq!(logic.height(&out), Ok(1.0));
            }
        }
    }

    #[test]
    fn prop_checked_links_never_leave_a_cycle(
        links in prop::collection::vec((0usize..6, any::<bool>(), 0usize..6), 1..40),
    ) {
        let (mut logic, nodes) = build(1, &[(Operator::And, Ok(0), Ok(0)); 6]);
        for (node, left, target) in links {
            let side = if left { InputSide::Left } else { InputSide::Right };
            let _ = logic.link_input(&nodes[node], side, &nodes[target]);
            for id in &nodes {
                prop_assert_eq!(logic.has_cycle(id), Ok(false));
            }
        }
    }
}
