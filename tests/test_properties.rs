use proptest::prelude::*;
use unmanaged_core::bits::{
    compute_multiplier, fast_mod, is_power_of_two, leading_zero_count, log2, log2_ceiling,
    pop_count, trailing_zero_count,
};
use unmanaged_core::hash::{hash32, Marvin};
use unmanaged_core::{simd, FrozenHashIndex};

fn cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(64)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(cases()))]

    #[test]
    fn fast_mod_matches_remainder(value in any::<u32>(), divisor in 1u32..=u32::MAX) {
        let multiplier = compute_multiplier(divisor);
        prop_assert_eq!(fast_mod(value, divisor, multiplier), value % divisor);
    }

    #[test]
    fn log2_brackets_value(value in 1u64..=u64::MAX) {
        let floor = log2(value);
        prop_assert!(value >> floor == 1);
        if is_power_of_two(value) {
            prop_assert_eq!(log2_ceiling(value), floor);
        } else {
            prop_assert_eq!(log2_ceiling(value), floor + 1);
        }
    }

    #[test]
    fn zero_counts_bound_the_word(value in any::<u64>()) {
        let total = trailing_zero_count(value) + leading_zero_count(value) + pop_count(value);
        prop_assert!(total <= 64 || value == 0);
        prop_assert_eq!(pop_count(value), value.count_ones());
    }

    #[test]
    fn or_then_and_not_clears_source_bits(
        a in prop::collection::vec(any::<u32>(), 0..70),
        b in prop::collection::vec(any::<u32>(), 70),
    ) {
        let mut dst = a.clone();
        simd::or(&mut dst, &b);
        simd::and_not(&mut dst, &b);
        for (i, &word) in dst.iter().enumerate() {
            prop_assert_eq!(word, a[i] & !b[i]);
        }
    }

    #[test]
    fn streaming_hash_matches_one_shot(data in prop::collection::vec(any::<u8>(), 0..128), seed in any::<u64>()) {
        let mut hasher = Marvin::new(seed);
        let (head, tail) = data.split_at(data.len() / 3);
        hasher.update(head);
        hasher.update(tail);
        prop_assert_eq!(hasher.finish32(), hash32(&data, seed));
    }

    #[test]
    fn index_groups_every_code(codes in prop::collection::vec(any::<i32>(), 0..200)) {
        let index = FrozenHashIndex::build(&codes, false).expect("build");
        for &code in &codes {
            prop_assert!(index.matching_indices(code).count() >= 1);
        }
        prop_assert_eq!(index.hash_codes().len(), codes.len());
    }
}
