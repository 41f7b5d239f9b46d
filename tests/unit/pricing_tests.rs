//! Fee quoting and gas budgeting behavior

use seedforge::{FeeConfig, FeeSchedule, GasConfig, GasFormula, RandomnessError};

// The two production callback measurements and the cap of the observed
// deployment.
const SINGLE_UNIT_GAS: u64 = 197_492;
const FIVE_UNIT_GAS: u64 = 343_518;
const CALLBACK_CAP: u64 = 2_500_000;

#[test]
fn quote_uses_base_plus_unit_times_quantity() {
    let schedule = FeeSchedule::new(10_000, 250);
    assert_eq!(schedule.quote(1).unwrap(), 10_250);
    assert_eq!(schedule.quote(50).unwrap(), 22_500);
}

#[test]
fn quote_never_below_single_unit() {
    let schedule = FeeSchedule::from(&FeeConfig::default());
    let floor = schedule.quote(1).unwrap();
    for quantity in 1..=100 {
        assert!(schedule.quote(quantity).unwrap() >= floor);
    }
}

#[test]
fn quote_rejects_zero_quantity() {
    let schedule = FeeSchedule::from(&FeeConfig::default());
    assert!(schedule.quote(0).is_err());
}

#[test]
fn calibrated_formula_predicts_both_measurements() {
    let formula =
        GasFormula::calibrate((1, SINGLE_UNIT_GAS), (5, FIVE_UNIT_GAS), 20, CALLBACK_CAP).unwrap();

    // The raw fit must land within the accepted safety margin of both
    // measurements; in practice it lands within integer-division error.
    for (quantity, measured) in [(1u32, SINGLE_UNIT_GAS), (5, FIVE_UNIT_GAS)] {
        let raw = formula.raw_estimate(quantity);
        assert!(raw.abs_diff(measured) * 100 <= measured * 20);
        // The budgeted estimate always covers the measurement.
        assert!(formula.estimate(quantity).unwrap() >= measured);
    }
}

#[test]
fn calibrated_formula_admits_fifty_unit_batch() {
    let formula =
        GasFormula::calibrate((1, SINGLE_UNIT_GAS), (5, FIVE_UNIT_GAS), 20, CALLBACK_CAP).unwrap();
    assert!(formula.estimate(50).unwrap() <= CALLBACK_CAP);
}

#[test]
fn default_formula_matches_calibration() {
    let default = GasFormula::from(&GasConfig::default());
    let calibrated =
        GasFormula::calibrate((1, SINGLE_UNIT_GAS), (5, FIVE_UNIT_GAS), 20, CALLBACK_CAP).unwrap();
    // The defaults are the committed fit of the same two points.
    assert!(default.fixed_overhead().abs_diff(calibrated.fixed_overhead()) <= calibrated.per_unit());
    assert!(default.per_unit().abs_diff(calibrated.per_unit()) <= 1);
}

#[test]
fn over_cap_quantity_is_rejected_not_clamped() {
    let formula = GasFormula::from(&GasConfig::default());
    match formula.estimate(100) {
        Err(RandomnessError::GasBudgetExceeded { estimated, cap, .. }) => {
            assert!(estimated > cap);
        }
        other => panic!("expected GasBudgetExceeded, got {:?}", other),
    }
}

#[test]
fn fixed_overhead_amortizes_across_batch() {
    let formula = GasFormula::from(&GasConfig::default());
    let per_unit_single = formula.estimate(1).unwrap();
    let per_unit_batched = formula.estimate(50).unwrap() / 50;
    // A single-unit request costs materially more per unit.
    assert!(per_unit_single > per_unit_batched * 2);
}
