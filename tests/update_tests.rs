//! Integration tests for the update pass.

use fls_core::{
    FuzzyLogic, Id, MembershipGeometry, MembershipSet, Operator, UpdateConfig, UpdateReport,
};

// ─── helpers ─────────────────────────────────────────────────────────────────

/// Degree is the set's name parsed as a number; unnamed sets are 0.
struct NamedDegree;

impl MembershipGeometry for NamedDegree {
    fn membership_at(&self, set: &MembershipSet, _crisp: f32) -> f32 {
        set.name
            .as_deref()
            .and_then(|n| n.parse().ok())
            .unwrap_or(0.0)
    }
}

fn logic() -> FuzzyLogic {
    let mut logic = FuzzyLogic::new();
    logic.initialize();
    logic.set_evaluation_enabled(true);
    logic
}

fn input_set(logic: &mut FuzzyLogic, degree: &str) -> Id {
    let fuzz = logic.fuzzification(0).unwrap().id().clone();
    let id = logic.add_membership_set(&fuzz).unwrap();
    logic.membership_set_mut(&id).unwrap().name = Some(degree.into());
    id
}

fn output_set(logic: &mut FuzzyLogic) -> Id {
    let defuzz = logic.defuzzification().unwrap().id().clone();
    logic.add_membership_set(&defuzz).unwrap()
}

fn passthrough(logic: &mut FuzzyLogic, input: &Id, output: Option<&Id>) -> Id {
    let id = logic.add_inference().unwrap();
    logic.set_operator(&id, Operator::Passthrough).unwrap();
    logic.set_left_input(&id, Some(input.clone())).unwrap();
    logic.set_output(&id, output.cloned()).unwrap();
    id
}

fn update(logic: &mut FuzzyLogic) -> UpdateReport {
    logic
        .run_update_with(&NamedDegree, &UpdateConfig::default())
        .unwrap()
}

// ─── tests ───────────────────────────────────────────────────────────────────

#[test]
fn last_node_in_container_order_wins() {
    let mut logic = logic();
    let high = input_set(&mut logic, "0.75");
    let low = input_set(&mut logic, "0.25");
    let d1 = output_set(&mut logic);
    passthrough(&mut logic, &high, Some(&d1));
    let second = passthrough(&mut logic, &low, Some(&d1));

    let report = update(&mut logic);
    assert_eq!(report.written, 2);
    assert_eq!(logic.height(&d1), Ok(0.25));

    // drop the later node and the earlier one's result stands
    logic.remove_inference(&second).unwrap();
    update(&mut logic);
    assert_eq!(logic.height(&d1), Ok(0.75));
}

#[test]
fn disabled_pass_sets_every_output_height_to_one() {
    let mut logic = logic();
    let half = input_set(&mut logic, "0.5");
    let d1 = output_set(&mut logic);
    let d2 = output_set(&mut logic);
    passthrough(&mut logic, &half, Some(&d1));
    update(&mut logic);
    assert_eq!(logic.height(&d1), Ok(0.5));

    logic.set_evaluation_enabled(false);
    logic.membership_set_mut(&d2).unwrap().height = 0.1;
    let report = update(&mut logic);
    assert!(!report.evaluated);
    assert_eq!(report, UpdateReport::default());
    assert_eq!(logic.height(&d1), Ok(1.0));
    assert_eq!(logic.height(&d2), Ok(1.0));
}

#[test]
fn node_with_unassigned_output_has_no_effect() {
    let mut logic = logic();
    let half = input_set(&mut logic, "0.5");
    let d1 = output_set(&mut logic);
    let n1 = passthrough(&mut logic, &half, None);
    assert!(logic.inference_by_id(&n1).unwrap().output_is_unassigned());

    let report = update(&mut logic);
    assert!(report.evaluated);
    assert_eq!(report.written, 0);
    assert_eq!(logic.output_heights().unwrap(), vec![(d1, 1.0)]);
}

#[test]
fn output_pointing_elsewhere_is_unassigned() {
    let mut logic = logic();
    let half = input_set(&mut logic, "0.5");
    let n1 = passthrough(&mut logic, &half, None);
    assert_eq!(logic.set_output(&n1, Some(half.clone())), Ok(false));
    assert_eq!(logic.inference_by_id(&n1).unwrap().output(), &n1);
}

#[test]
fn heights_are_recomputed_from_scratch_every_pass() {
    let mut logic = logic();
    let half = input_set(&mut logic, "0.5");
    let d1 = output_set(&mut logic);
    let n1 = passthrough(&mut logic, &half, Some(&d1));
    update(&mut logic);
    assert_eq!(logic.height(&d1), Ok(0.5));

    logic.set_left_input(&n1, Some(Id::from("nowhere"))).unwrap();
    let report = update(&mut logic);
    assert_eq!(report.unresolved, 1);
    assert_eq!(logic.height(&d1), Ok(1.0));
}

#[test]
fn removing_the_target_set_unassigns_the_node() {
    let mut logic = logic();
    let half = input_set(&mut logic, "0.5");
    let d1 = output_set(&mut logic);
    let d2 = output_set(&mut logic);
    let n1 = passthrough(&mut logic, &half, Some(&d1));

    logic.remove_membership_set(&d1).unwrap();
    assert!(logic.inference_by_id(&n1).unwrap().output_is_unassigned());
    let report = update(&mut logic);
    assert_eq!(report.written, 0);
    assert_eq!(logic.height(&d2), Ok(1.0));
}

#[test]
fn memoized_pass_matches_plain_pass() {
    let mut logic = logic();
    let a = input_set(&mut logic, "0.6");
    let b = input_set(&mut logic, "0.3");
    let outputs: Vec<Id> = (0..3).map(|_| output_set(&mut logic)).collect();

    // diamond: shared feeds both branches, both branches feed the join
    let shared = logic.add_inference().unwrap();
    logic.set_left_input(&shared, Some(a.clone())).unwrap();
    logic.set_right_input(&shared, Some(b.clone())).unwrap();
    let left = logic.add_inference().unwrap();
    logic.set_operator(&left, Operator::Not).unwrap();
    logic.set_left_input(&left, Some(shared.clone())).unwrap();
    let right = passthrough(&mut logic, &shared, Some(&outputs[1]));
    let join = logic.add_inference().unwrap();
    logic.set_operator(&join, Operator::Or).unwrap();
    logic.set_left_input(&join, Some(left.clone())).unwrap();
    logic.set_right_input(&join, Some(right.clone())).unwrap();
    logic.set_output(&left, Some(outputs[0].clone())).unwrap();
    logic.set_output(&join, Some(outputs[2].clone())).unwrap();

    let plain_report = update(&mut logic);
    let plain = logic.output_heights().unwrap();

    let memo_report = logic
        .run_update_with(&NamedDegree, &UpdateConfig::memoized())
        .unwrap();
    let memoized = logic.output_heights().unwrap();

    assert_eq!(plain_report, memo_report);
    assert_eq!(plain, memoized);
    assert!((memoized[2].1 - 0.7).abs() < 1e-6);
}

#[test]
fn initialize_twice_is_a_no_op() {
    let mut logic = logic();
    let half = input_set(&mut logic, "0.5");
    let d1 = output_set(&mut logic);
    passthrough(&mut logic, &half, Some(&d1));
    update(&mut logic);

    let fuzz = logic.fuzzification(0).unwrap().id().clone();
    let defuzz = logic.defuzzification().unwrap().id().clone();
    logic.initialize();

    assert_eq!(logic.fuzzification_count(), Ok(1));
    assert_eq!(logic.inference_count(), Ok(1));
    assert_eq!(logic.fuzzification(0).unwrap().id(), &fuzz);
    assert_eq!(logic.defuzzification().unwrap().id(), &defuzz);
    // heights are only reset by the first initialize
    assert_eq!(logic.height(&d1), Ok(0.5));
}
