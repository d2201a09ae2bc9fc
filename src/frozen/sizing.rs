//! Bucket-count search
//!
//! Walks the prime table between `2 * distinct` and a multiplier cap,
//! simulating bucket assignment with a "seen bucket" bitset and keeping
//! the first prime that beats the best collision count so far. The search
//! stops early once collisions drop to 5% of the distinct codes.

use super::pool;
use super::primes::{get_prime, PRIMES};
use crate::bits::{compute_multiplier, fast_mod};
use crate::errors::{CoreError, Result};
use crate::logging::trace;
use bitvec::prelude::*;
use std::collections::HashSet;

/// Collisions per distinct code at which a candidate is good enough
pub const ACCEPTABLE_COLLISION_RATE: f64 = 0.05;

/// Distinct counts at or above this use the tighter size cap
pub const LARGE_INPUT_SIZE_THRESHOLD: usize = 1000;

const MAX_SMALL_BUCKET_TABLE_MULTIPLIER: usize = 16;
const MAX_LARGE_BUCKET_TABLE_MULTIPLIER: usize = 3;

/// Distinct codes in first-occurrence order.
pub fn distinct_codes(hash_codes: &[i32]) -> Vec<i32> {
    let mut seen = HashSet::with_capacity(hash_codes.len());
    hash_codes
        .iter()
        .copied()
        .filter(|&code| seen.insert(code))
        .collect()
}

/// Bucket count for a frozen index over `hash_codes`.
///
/// With `hash_codes_are_unique` the caller promises no duplicates and the
/// distinct pass is skipped. Empty input yields a single bucket.
pub fn calc_num_buckets(hash_codes: &[i32], hash_codes_are_unique: bool) -> Result<u32> {
    let distinct_storage;
    let codes: &[i32] = if hash_codes_are_unique {
        hash_codes
    } else {
        distinct_storage = distinct_codes(hash_codes);
        &distinct_storage
    };

    let distinct = codes.len();
    if distinct == 0 {
        return Ok(1);
    }

    let min_buckets = distinct.saturating_mul(2);
    let Some(min_index) = PRIMES.iter().position(|&p| p as usize >= min_buckets) else {
        let requested = i32::try_from(distinct).map_err(|_| CoreError::CapacityOverflow {
            requested: i64::try_from(distinct).unwrap_or(i64::MAX),
        })?;
        return get_prime(requested).map(|p| p as u32);
    };

    let multiplier = if distinct >= LARGE_INPUT_SIZE_THRESHOLD {
        MAX_LARGE_BUCKET_TABLE_MULTIPLIER
    } else {
        MAX_SMALL_BUCKET_TABLE_MULTIPLIER
    };
    let mut max_buckets = distinct.saturating_mul(multiplier);
    let max_index = PRIMES[min_index..]
        .iter()
        .position(|&p| p as usize >= max_buckets)
        .map_or(PRIMES.len(), |offset| min_index + offset);
    if max_index < PRIMES.len() && max_index > 0 {
        max_buckets = PRIMES[max_index - 1] as usize;
    }

    let mut words = pool::rent::<u32>(max_buckets / 32 + 1);
    let seen = BitSlice::<u32, Lsb0>::from_slice_mut(&mut words);

    let mut best_buckets = max_buckets;
    let mut best_collisions = distinct;

    for &prime in &PRIMES[min_index..max_index] {
        let num_buckets = prime as u32;
        let multiplier = compute_multiplier(num_buckets);
        seen[..num_buckets as usize].fill(false);

        let mut collisions = 0usize;
        for &code in codes {
            let bucket = fast_mod(code as u32, num_buckets, multiplier) as usize;
            if seen.replace(bucket, true) {
                collisions += 1;
                if collisions >= best_collisions {
                    break;
                }
            }
        }

        if collisions < best_collisions {
            best_buckets = num_buckets as usize;
            if collisions as f64 / distinct as f64 <= ACCEPTABLE_COLLISION_RATE {
                trace!(target: "frozen", num_buckets, collisions, "acceptable bucket count found");
                break;
            }
            best_collisions = collisions;
        }
    }

    u32::try_from(best_buckets).map_err(|_| CoreError::CapacityOverflow {
        requested: best_buckets as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frozen::primes::is_prime;

    #[test]
    fn empty_input_gets_one_bucket() {
        assert_eq!(calc_num_buckets(&[], false), Ok(1));
        assert_eq!(calc_num_buckets(&[], true), Ok(1));
    }

    #[test]
    fn single_code_takes_the_smallest_prime() {
        assert_eq!(calc_num_buckets(&[42], true), Ok(3));
        assert_eq!(calc_num_buckets(&[42; 100], false), Ok(3));
    }

    #[test]
    fn duplicates_are_counted_once() {
        assert_eq!(calc_num_buckets(&[5, 21, 5, 37], false), Ok(7));
        assert_eq!(distinct_codes(&[5, 21, 5, 37, 21]), vec![5, 21, 37]);
    }

    #[test]
    fn first_collision_free_prime_wins() {
        // Multiples of 7 spread cleanly over 11 buckets.
        assert_eq!(calc_num_buckets(&[0, 7, 14, 21, 28], true), Ok(11));
    }

    #[test]
    fn sequential_codes_use_the_minimum_prime() {
        let codes: Vec<i32> = (0..1000).collect();
        assert_eq!(calc_num_buckets(&codes, true), Ok(2333));

        let codes: Vec<i32> = (0..10_000).collect();
        assert_eq!(calc_num_buckets(&codes, true), Ok(21_023));
    }

    #[test]
    fn colliding_candidates_are_skipped() {
        // Every code is 0 mod 23 and mod 29; 667 is 1 mod 37.
        let codes: Vec<i32> = (0..10).map(|i| i * 23 * 29).collect();
        let buckets = calc_num_buckets(&codes, true).expect("bucket count");
        assert!(is_prime(buckets as i32));
        assert_eq!(buckets, 37);
    }

    #[test]
    fn negative_codes_bucket_as_unsigned() {
        let buckets = calc_num_buckets(&[-1, -2, -3], true).expect("bucket count");
        assert!(PRIMES.contains(&(buckets as i32)));
    }
}
