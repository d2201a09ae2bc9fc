//! Bit primitive tests
//!
//! Organized by component:
//! - Power of two: predicate and rounding
//! - Scans: popcount, leading/trailing zeros, hardware vs software
//! - Logarithms: floor/ceiling and the zero coercion
//! - Fast modulo: agreement with `%`

#[cfg(test)]
mod tests {
    use super::super::*;
    use proptest::prelude::*;

    const PROPTEST_CASES: u32 = 256;

    // ===== Power of Two =====

    #[test]
    fn every_single_bit_is_a_power_of_two() {
        for shift in 0..64 {
            let value = 1u64 << shift;
            assert!(is_power_of_two(value), "1 << {shift}");
            assert_eq!(pop_count(value), 1);
        }
    }

    #[test]
    fn zero_and_composites_are_not_powers_of_two() {
        for value in [0u64, 3, 6, 12, 100, u64::MAX] {
            assert!(!is_power_of_two(value), "{value}");
        }
    }

    #[test]
    fn round_up_to_power_of_two_edges() {
        assert_eq!(round_up_to_power_of_two(0), 0);
        assert_eq!(round_up_to_power_of_two(1), 1);
        assert_eq!(round_up_to_power_of_two(2), 2);
        assert_eq!(round_up_to_power_of_two(3), 4);
        assert_eq!(round_up_to_power_of_two(1000), 1024);
        assert_eq!(round_up_to_power_of_two(1 << 31), 1 << 31);
        assert_eq!(round_up_to_power_of_two((1 << 31) + 1), 0);
    }

    // ===== Scans =====

    #[test]
    fn zero_scans_return_bit_width() {
        assert_eq!(leading_zero_count32(0), 32);
        assert_eq!(trailing_zero_count32(0), 32);
        assert_eq!(leading_zero_count(0), 64);
        assert_eq!(trailing_zero_count(0), 64);
        assert_eq!(soft::leading_zero_count32(0), 32);
        assert_eq!(soft::trailing_zero_count32(0), 32);
        assert_eq!(soft::leading_zero_count64(0), 64);
        assert_eq!(soft::trailing_zero_count64(0), 64);
    }

    #[test]
    fn de_bruijn_tables_cover_every_bit() {
        for bit in 0..32 {
            let value = 1u32 << bit;
            assert_eq!(soft::trailing_zero_count32(value), bit);
            assert_eq!(soft::leading_zero_count32(value), 31 - bit);
            assert_eq!(soft::log2_32(value), bit);
        }
        for bit in 0..64 {
            let value = 1u64 << bit;
            assert_eq!(soft::trailing_zero_count64(value), bit);
            assert_eq!(soft::leading_zero_count64(value), 63 - bit);
        }
    }

    #[test]
    fn swar_popcount_known_values() {
        assert_eq!(soft::pop_count64(0), 0);
        assert_eq!(soft::pop_count64(u64::MAX), 64);
        assert_eq!(soft::pop_count64(0xAAAA_AAAA_AAAA_AAAA), 32);
        assert_eq!(soft::pop_count32(u32::MAX), 32);
        assert_eq!(soft::pop_count32(0x8000_0001), 2);
    }

    // ===== Logarithms =====

    #[test]
    fn log2_coerces_zero_to_one() {
        assert_eq!(log2(0), 0);
        assert_eq!(log2(1), 0);
        assert_eq!(log2_32(0), 0);
        assert_eq!(log2_ceiling(0), 1);
    }

    #[test]
    fn log2_ceiling_rounds_up_non_powers() {
        assert_eq!(log2_ceiling(1), 0);
        assert_eq!(log2_ceiling(2), 1);
        assert_eq!(log2_ceiling(3), 2);
        assert_eq!(log2_ceiling(4), 2);
        assert_eq!(log2_ceiling(5), 3);
        assert_eq!(log2_ceiling(u64::MAX), 64);
        assert_eq!(log2_ceiling(1 << 63), 63);
    }

    // ===== Fast Modulo =====

    #[test]
    fn fast_mod_small_divisors_exhaustive_prefix() {
        for divisor in 1u32..=64 {
            let multiplier = compute_multiplier(divisor);
            for value in 0u32..1024 {
                assert_eq!(fast_mod(value, divisor, multiplier), value % divisor);
            }
            assert_eq!(fast_mod(u32::MAX, divisor, multiplier), u32::MAX % divisor);
        }
    }

    #[test]
    fn fast_mod_extreme_divisors() {
        for divisor in [1u32, 2, 1 << 31, (1 << 31) + 1, u32::MAX - 1, u32::MAX] {
            let modulo = FastModulo::new(divisor).expect("non-zero divisor");
            for value in [0u32, 1, divisor - 1, divisor.wrapping_add(1), u32::MAX] {
                assert_eq!(modulo.reduce(value), value % divisor, "{value} % {divisor}");
            }
        }
    }

    #[test]
    fn fast_modulo_rejects_zero() {
        assert!(FastModulo::new(0).is_none());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(
            crate::test_utils::proptest_cases(PROPTEST_CASES)
        ))]

        #[test]
        fn soft_scans_match_hardware(value in any::<u64>()) {
            prop_assert_eq!(soft::pop_count64(value), value.count_ones());
            prop_assert_eq!(soft::leading_zero_count64(value), value.leading_zeros());
            prop_assert_eq!(soft::trailing_zero_count64(value), value.trailing_zeros());
            let narrow = value as u32;
            prop_assert_eq!(soft::pop_count32(narrow), narrow.count_ones());
            prop_assert_eq!(soft::leading_zero_count32(narrow), narrow.leading_zeros());
            prop_assert_eq!(soft::trailing_zero_count32(narrow), narrow.trailing_zeros());
        }

        #[test]
        fn scans_and_popcount_fit_in_bit_width(value in 1u64..=u64::MAX) {
            let total = trailing_zero_count(value) + leading_zero_count(value) + pop_count(value);
            prop_assert!(total <= 64);
            // Equality exactly when the set bits form one contiguous run.
            let run = value >> trailing_zero_count(value);
            let contiguous = run == u64::MAX || run & (run + 1) == 0;
            prop_assert_eq!(total == 64, contiguous);
            if pop_count(value) == 1 {
                prop_assert_eq!(total, 64);
            }
        }

        #[test]
        fn log2_brackets_value(value in 1u64..=u64::MAX) {
            let floor = log2(value);
            prop_assert!(1u64 << floor <= value);
            prop_assert!(floor == 63 || value < 1u64 << (floor + 1));
        }

        #[test]
        fn fast_mod_matches_remainder(value in any::<u32>(), divisor in 1u32..=u32::MAX) {
            let multiplier = compute_multiplier(divisor);
            prop_assert_eq!(fast_mod(value, divisor, multiplier), value % divisor);
        }

        #[test]
        fn power_of_two_implies_single_bit(shift in 0u32..32) {
            let value = 1u32 << shift;
            prop_assert!(is_power_of_two(u64::from(value)));
            prop_assert_eq!(pop_count32(value), 1);
        }
    }
}
