//! Property-based tests for pricing as enforced at the service boundary

use proptest::prelude::*;

use seedforge::{
    Address, GasFormula, MintPayload, RandomnessError, RandomnessService, ServiceConfig,
};

use crate::mocks::MockCoordinator;

fn addr(byte: u8) -> Address {
    Address::new([byte; 20])
}

const OWNER: u8 = 0xff;
const HERO: u8 = 0x01;

fn service() -> RandomnessService<MockCoordinator> {
    let mut service = RandomnessService::new(
        addr(OWNER),
        ServiceConfig::development(),
        MockCoordinator::new(),
    )
    .unwrap();
    service.authorize_consumer(addr(OWNER), addr(HERO)).unwrap();
    service
}

proptest! {
    /// The quoted amount is exactly the acceptance threshold: one unit
    /// short is rejected, the exact quote is accepted.
    #[test]
    fn prop_quote_is_the_exact_payment_threshold(quantity in 1u32..=50) {
        let mut svc = service();
        let due = svc.quote(quantity).unwrap();

        let err = svc
            .commit_mint(
                addr(HERO),
                addr(0xaa),
                quantity,
                due - 1,
                MintPayload::default(),
                100,
            )
            .unwrap_err();
        prop_assert!(
            matches!(err, RandomnessError::InsufficientPayment { .. }),
            "expected InsufficientPayment, got {:?}",
            err
        );

        svc.commit_mint(addr(HERO), addr(0xaa), quantity, due, MintPayload::default(), 100)
            .unwrap();
    }

    /// Any accepted commit carries a gas budget at or under the cap, and
    /// at least the raw prediction for that batch size.
    #[test]
    fn prop_submitted_budget_within_cap(quantity in 1u32..=100) {
        let mut svc = service();
        let due = svc.quote(quantity).unwrap();
        let outcome =
            svc.commit_mint(addr(HERO), addr(0xaa), quantity, due, MintPayload::default(), 100);

        match outcome {
            Ok(_) => {
                let submitted = svc.oracle().last_submission().unwrap();
                prop_assert!(submitted.callback_gas_limit <= svc.config().gas.max_callback_gas);
                let raw = GasFormula::from(&svc.config().gas).raw_estimate(quantity);
                prop_assert!(submitted.callback_gas_limit >= raw);
            }
            Err(err) => {
                // The only acceptable refusal here is the gas cap.
                prop_assert!(
                    matches!(err, RandomnessError::GasBudgetExceeded { .. }),
                    "expected GasBudgetExceeded, got {:?}",
                    err
                );
                prop_assert!(svc.oracle().submissions.is_empty());
            }
        }
    }

    /// Calibrating against two points measured from any affine cost model
    /// recovers that model: the low point exactly, the high point within
    /// the flooring of the integer slope.
    #[test]
    fn prop_calibration_fits_both_points(
        fixed in 0u64..=500_000,
        per_unit in 1_000u64..=100_000,
        q_low in 1u32..=20,
        q_step in 1u32..=30,
        jitter in 0u32..=100,
    ) {
        let q_high = q_low + q_step;
        let gas_low = fixed + per_unit * q_low as u64;
        // Sub-slope jitter on the high measurement exercises the flooring.
        let jitter = jitter % q_step;
        let gas_high = fixed + per_unit * q_high as u64 + jitter as u64;

        let formula = GasFormula::calibrate(
            (q_low, gas_low),
            (q_high, gas_high),
            20,
            u64::MAX,
        )
        .unwrap();

        prop_assert_eq!(formula.raw_estimate(q_low), gas_low);
        prop_assert!(formula.raw_estimate(q_high) <= gas_high);
        prop_assert!(gas_high - formula.raw_estimate(q_high) < q_step as u64);
    }
}
