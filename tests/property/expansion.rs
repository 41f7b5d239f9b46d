//! Property-based tests for outcome expansion through the public API

use std::collections::HashSet;

use proptest::prelude::*;

use seedforge::{OutcomeExpander, RandomSeed, RarityConfig, RarityTable};

fn arb_seed() -> impl Strategy<Value = RandomSeed> {
    prop::array::uniform32(prop::num::u8::ANY).prop_map(RandomSeed::new)
}

fn arb_salt() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(prop::num::u8::ANY)
}

fn arb_weights() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(1u64..1_000, 1..8)
}

proptest! {
    /// Every outcome in a batch is distinct from every other, and from the
    /// raw seed itself.
    #[test]
    fn prop_batch_outcomes_distinct(
        seed in arb_seed(),
        salt in arb_salt(),
        quantity in 1u32..=100,
    ) {
        let outcomes = OutcomeExpander::expand(&seed, quantity, &salt);
        prop_assert_eq!(outcomes.len(), quantity as usize);

        let distinct: HashSet<_> = outcomes.iter().map(|o| *o.as_bytes()).collect();
        prop_assert_eq!(distinct.len(), outcomes.len());
        prop_assert!(outcomes.iter().all(|o| o.as_bytes() != seed.as_bytes()));
    }

    /// Different salts over the same seed never share an outcome, which is
    /// what keeps two requesters fulfilled by one oracle word uncorrelated.
    #[test]
    fn prop_salts_separate_identical_seeds(
        seed in arb_seed(),
        salt_a in arb_salt(),
        salt_b in arb_salt(),
    ) {
        prop_assume!(salt_a != salt_b);
        let a = OutcomeExpander::expand(&seed, 10, &salt_a);
        let b = OutcomeExpander::expand(&seed, 10, &salt_b);
        prop_assert!(a.iter().all(|o| !b.contains(o)));
    }

    /// Different seeds over the same salt never share an outcome either.
    #[test]
    fn prop_seeds_separate_identical_salts(
        seed_a in arb_seed(),
        seed_b in arb_seed(),
        salt in arb_salt(),
    ) {
        prop_assume!(seed_a != seed_b);
        let a = OutcomeExpander::expand(&seed_a, 10, &salt);
        let b = OutcomeExpander::expand(&seed_b, 10, &salt);
        prop_assert!(a.iter().all(|o| !b.contains(o)));
    }

    /// A table built from arbitrary configured weights always maps a draw
    /// to a tier inside the table.
    #[test]
    fn prop_configured_table_tier_in_range(
        seed in arb_seed(),
        salt in arb_salt(),
        weights in arb_weights(),
    ) {
        let table = RarityTable::try_from(&RarityConfig { weights: weights.clone() }).unwrap();
        for outcome in OutcomeExpander::expand(&seed, 20, &salt) {
            let tier = table.tier_for(&outcome);
            prop_assert!(tier >= 1);
            prop_assert!(tier as usize <= weights.len());
        }
    }
}
