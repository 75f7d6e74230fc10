use golf_coach_engine::units::{mph_to_mps, mps_to_mph};
use golf_coach_engine::{
    analyze, Handedness, Metric, ReferenceTables, ShotClassifier, ShotMeasurement, SimulatorConfig, TrajectorySimulator,
};
use golf_coach_engine::measurement::InputBounds;
use once_cell::sync::Lazy;
use proptest::prelude::*;

static TABLES: Lazy<ReferenceTables> = Lazy::new(|| ReferenceTables::builtin().expect("builtin tables"));

fn shot() -> impl Strategy<Value = (f64, f64, f64, f64, f64)> {
    (20.0..85.0f64, -5.0..45.0f64, -15.0..15.0f64, 500.0..10000.0f64, -40.0..40.0f64)
}

fn simulator() -> TrajectorySimulator {
    TrajectorySimulator::new(SimulatorConfig::default(), InputBounds::default())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn analysis_is_deterministic((speed, vla, hla, spin, axis) in shot()) {
        let m = ShotMeasurement::now(speed, vla, hla, spin, axis);
        let a = analyze(&m, Handedness::Right, &TABLES);
        let b = analyze(&m, Handedness::Right, &TABLES);

        prop_assert_eq!(&a.inferred, &b.inferred);
        prop_assert_eq!(&a.benchmarks, &b.benchmarks);
        prop_assert_eq!(&a.coaching, &b.coaching);
        prop_assert_eq!(&a.estimated_trajectory, &b.estimated_trajectory);
    }

    #[test]
    fn trajectory_magnitudes_are_non_negative((speed, vla, hla, spin, axis) in shot()) {
        let m = ShotMeasurement::now(speed, vla, hla, spin, axis);
        let outcome = simulator().simulate(&m, Handedness::Right);
        prop_assert!(outcome.is_available(), "{:?}", outcome.result);
        let t = outcome.estimate().unwrap();
        prop_assert!(t.carry_distance_m >= 0.0);
        prop_assert!(t.total_distance_m >= t.carry_distance_m);
        prop_assert!(t.apex_height_m >= 0.0);
        prop_assert!(t.hang_time_s >= 0.0);
        prop_assert!(t.descent_angle_deg >= 0.0);
    }

    #[test]
    fn in_bound_shots_land_within_step_budget((speed, vla, hla, spin, axis) in shot(), hand in prop_oneof![Just(Handedness::Right), Just(Handedness::Left)]) {
        let config = SimulatorConfig::default();
        let budget_s = config.max_steps as f64 * config.time_step_s;
        let m = ShotMeasurement::now(speed, vla, hla, spin, axis);
        let outcome = simulator().simulate(&m, hand);

        prop_assert!(outcome.clamped_inputs.is_empty());
        let t = outcome.estimate();
        prop_assert!(t.is_some(), "{:?}", outcome.result);
        prop_assert!(t.unwrap().hang_time_s <= budget_s);
    }

    #[test]
    fn zero_speed_never_flies(vla in -10.0..60.0f64, hla in -20.0..20.0f64, spin in 0.0..9000.0f64, axis in -45.0..45.0f64) {
        let m = ShotMeasurement::now(0.0, vla, hla, spin, axis);
        let outcome = simulator().simulate(&m, Handedness::Right);
        let t = outcome.estimate().expect("zero speed is a valid flight");
        prop_assert_eq!(t.carry_distance_m, 0.0);
        prop_assert_eq!(t.total_distance_m, 0.0);
        prop_assert_eq!(t.apex_height_m, 0.0);
        prop_assert_eq!(t.hang_time_s, 0.0);
    }

    #[test]
    fn shape_mirrors_with_handedness((speed, vla, hla, spin, axis) in shot()) {
        let classifier = ShotClassifier::default();
        let right = classifier.classify(&ShotMeasurement::now(speed, vla, hla, spin, axis), Handedness::Right);
        let left = classifier.classify(&ShotMeasurement::now(speed, vla, -hla, spin, -axis), Handedness::Left);
        let flipped = classifier.classify(&ShotMeasurement::now(speed, vla, -hla, spin, -axis), Handedness::Right);

        prop_assert_eq!(right.shot_shape, left.shot_shape);
        prop_assert_eq!(right.club_category, left.club_category);
        prop_assert_eq!(flipped.shot_shape, right.shot_shape.mirrored());
    }

    #[test]
    fn faster_ball_never_ranks_lower(speed in 66.0..79.0f64, delta in 0.0..1.0f64) {
        let slow = ShotMeasurement::now(speed, 11.0, 0.0, 2500.0, 0.0);
        let fast = ShotMeasurement::now(speed + delta, 11.0, 0.0, 2500.0, 0.0);
        let a = analyze(&slow, Handedness::Right, &TABLES);
        let b = analyze(&fast, Handedness::Right, &TABLES);

        for cohort in ["pga_tour", "lpga_tour", "amateur_low", "amateur_mid", "amateur_high"] {
            let p_slow = a.benchmarks.entry(cohort, Metric::BallSpeed).and_then(|e| e.percentile());
            let p_fast = b.benchmarks.entry(cohort, Metric::BallSpeed).and_then(|e| e.percentile());
            if let (Some(p_slow), Some(p_fast)) = (p_slow, p_fast) {
                prop_assert!(p_fast >= p_slow - 1e-9, "{cohort}: {p_fast} < {p_slow}");
            }
        }
    }

    #[test]
    fn mph_round_trip(mps in 0.0..120.0f64) {
        prop_assert!((mph_to_mps(mps_to_mph(mps)) - mps).abs() < 1e-9);
    }
}
