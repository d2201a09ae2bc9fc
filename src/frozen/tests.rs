//! Frozen index tests
//!
//! Covers the layout produced by a known build, grouping invariants on
//! random inputs, the mapping callback and empty input.

#[cfg(test)]
mod tests {
    use super::super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const PROPTEST_CASES: u32 = 48;

    fn assert_grouped(index: &FrozenHashIndex, input: &[i32]) {
        let codes = index.hash_codes();
        assert_eq!(codes.len(), input.len());

        let total: i64 = index.buckets().iter().map(|b| i64::from(b.count)).sum();
        assert_eq!(total, input.len() as i64);

        for &code in input {
            let range = index.find_range(code);
            assert!(range.end <= codes.len());
            assert!(codes[range.clone()].contains(&code), "code {} outside {:?}", code, range);
            let bucket = code as u32 % index.bucket_count();
            assert_eq!(index.buckets()[bucket as usize].range(), range);
        }

        let mut sorted_input = input.to_vec();
        let mut sorted_codes = codes.to_vec();
        sorted_input.sort_unstable();
        sorted_codes.sort_unstable();
        assert_eq!(sorted_input, sorted_codes);
    }

    #[test]
    fn duplicate_codes_share_one_bucket() {
        let input = [5, 21, 5, 37];
        let index = FrozenHashIndex::build(&input, false).expect("build");

        assert_eq!(index.bucket_count(), 7);
        assert_eq!(index.len(), 4);
        // Ascending buckets 0, 2, 5; chains are prepended so the second 5
        // comes first.
        assert_eq!(index.hash_codes(), &[21, 37, 5, 5]);

        let range = index.find_range(5);
        assert_eq!(range, 2..4);
        assert_eq!(index.matching_indices(5).collect::<Vec<_>>(), vec![2, 3]);

        // 999 lands in the bucket of 5 but never matches.
        let absent = index.find_range(999);
        assert!(!index.hash_codes()[absent.clone()].contains(&999));
        assert_eq!(index.matching_indices(999).count(), 0);

        assert_grouped(&index, &input);
    }

    #[test]
    fn empty_bucket_is_zero_zero() {
        let index = FrozenHashIndex::build(&[5, 21, 5, 37], false).expect("build");
        let bucket = index.bucket_for(1);
        assert_eq!(bucket, Bucket { start_index: 0, count: 0 });
        assert!(bucket.is_empty());
        assert_eq!(bucket.end_index(), -1);
        assert!(index.find_range(1).is_empty());
    }

    #[test]
    fn non_empty_bucket_end_index_is_inclusive() {
        let index = FrozenHashIndex::build(&[5, 21, 5, 37], false).expect("build");
        let bucket = index.bucket_for(5);
        assert_eq!(bucket.start_index, 2);
        assert_eq!(bucket.end_index(), 3);
    }

    #[test]
    fn mapping_reports_every_destination_once() {
        let input = [5, 21, 5, 37];
        let mut mapping = Vec::new();
        let index = FrozenHashIndex::build_with_mapping(&input, false, |dest, src| {
            mapping.push((dest, src));
        })
        .expect("build");

        assert_eq!(mapping, vec![(0, 1), (1, 3), (2, 2), (3, 0)]);
        for &(dest, src) in &mapping {
            assert_eq!(index.hash_codes()[dest], input[src]);
        }
    }

    #[test]
    fn empty_input_builds_a_single_empty_bucket() {
        let index = FrozenHashIndex::build(&[], false).expect("build");
        assert!(index.is_empty());
        assert_eq!(index.bucket_count(), 1);
        assert_eq!(index.buckets(), &[Bucket::default()]);
        assert!(index.find_range(12345).is_empty());
        assert!(index.find_range(i32::MIN).is_empty());
    }

    #[test]
    fn storage_is_cache_line_aligned() {
        let index = FrozenHashIndex::build(&[1, 2, 3], true).expect("build");
        assert_eq!(index.buckets().as_ptr() as usize % CACHE_LINE, 0);
        assert_eq!(
            index.fast_mod_multiplier(),
            crate::bits::compute_multiplier(index.bucket_count())
        );
    }

    #[test]
    fn negative_codes_are_grouped() {
        let input = [-1, -7, i32::MIN, i32::MAX, 0, -1];
        let index = FrozenHashIndex::build(&input, false).expect("build");
        assert_grouped(&index, &input);
    }

    #[test]
    fn large_random_batch_is_grouped() {
        let mut rng = StdRng::seed_from_u64(0xF207);
        let input: Vec<i32> = (0..5_000).map(|_| rng.gen::<i32>()).collect();
        let index = FrozenHashIndex::build(&input, false).expect("build");
        assert_grouped(&index, &input);
        index.dispose();
    }

    #[test]
    fn dispose_returns_the_block() {
        let before = crate::allocator::global().stats().total_frees;
        let index = FrozenHashIndex::build(&[10, 20, 30], true).expect("build");
        index.dispose();
        assert!(crate::allocator::global().stats().total_frees > before);
    }

    #[test]
    fn index_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FrozenHashIndex>();

        let index = std::sync::Arc::new(FrozenHashIndex::build(&[3, 6, 9], true).expect("build"));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let index = index.clone();
                std::thread::spawn(move || index.matching_indices(6).count())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("reader thread"), 1);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(
            crate::test_utils::proptest_cases(PROPTEST_CASES)
        ))]

        #[test]
        fn every_code_lands_in_its_bucket(input in prop::collection::vec(any::<i32>(), 0..300)) {
            let index = FrozenHashIndex::build(&input, false).expect("build");
            let codes = index.hash_codes();
            let total: i64 = index.buckets().iter().map(|b| i64::from(b.count)).sum();
            prop_assert_eq!(total, input.len() as i64);
            for &code in &input {
                let range = index.find_range(code);
                prop_assert!(codes[range].contains(&code));
            }
        }

        #[test]
        fn small_domains_with_duplicates(input in prop::collection::vec(-20i32..20, 1..200)) {
            let index = FrozenHashIndex::build(&input, false).expect("build");
            for &code in &input {
                let expected = input.iter().filter(|&&c| c == code).count();
                prop_assert_eq!(index.matching_indices(code).count(), expected);
            }
        }
    }
}
