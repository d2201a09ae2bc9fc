//! Prime sizes for hash tables
//!
//! The table spaces primes roughly 1.2x apart; beyond it sizes are found
//! by trial division, skipping primes `p` with `(p - 1) % 101 == 0`.

use crate::errors::{CoreError, Result};

/// Largest prime below the maximum array length
pub const MAX_PRIME_ARRAY_LENGTH: i32 = 0x7FFF_FFC3;

const HASH_PRIME: i64 = 101;

#[rustfmt::skip]
pub static PRIMES: [i32; 72] = [
    3, 7, 11, 17, 23, 29, 37, 47, 59, 71, 89, 107, 131, 163, 197, 239, 293, 353, 431, 521, 631, 761, 919,
    1103, 1327, 1597, 1931, 2333, 2801, 3371, 4049, 4861, 5839, 7013, 8419, 10103, 12143, 14591,
    17519, 21023, 25229, 30293, 36353, 43627, 52361, 62851, 75431, 90523, 108631, 130363, 156437,
    187751, 225307, 270371, 324449, 389357, 467237, 560689, 672827, 807403, 968897, 1162687, 1395263,
    1674319, 2009191, 2411033, 2893249, 3471899, 4166287, 4999559, 5999471, 7199369,
];

/// Trial-division primality test. Values below 2 are not prime.
pub fn is_prime(candidate: i32) -> bool {
    if candidate & 1 == 0 {
        return candidate == 2;
    }
    if candidate < 3 {
        return false;
    }
    let candidate = i64::from(candidate);
    let mut divisor = 3i64;
    while divisor * divisor <= candidate {
        if candidate % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// Smallest table prime `>= min`, else the next suitable prime found by
/// search, else `min` itself when nothing fits below `i32::MAX`.
pub fn get_prime(min: i32) -> Result<i32> {
    if min < 0 {
        return Err(CoreError::CapacityOverflow { requested: i64::from(min) });
    }

    if let Some(&prime) = PRIMES.iter().find(|&&p| p >= min) {
        return Ok(prime);
    }

    let mut candidate = i64::from(min | 1);
    while candidate < i64::from(i32::MAX) {
        if is_prime(candidate as i32) && (candidate - 1) % HASH_PRIME != 0 {
            return Ok(candidate as i32);
        }
        candidate += 2;
    }
    Ok(min)
}

/// Next size when doubling a table of `old_size`.
pub fn expand_prime(old_size: i32) -> Result<i32> {
    let new_size = i64::from(old_size) * 2;
    if new_size > i64::from(MAX_PRIME_ARRAY_LENGTH) && MAX_PRIME_ARRAY_LENGTH > old_size {
        return Ok(MAX_PRIME_ARRAY_LENGTH);
    }
    let new_size = i32::try_from(new_size)
        .map_err(|_| CoreError::CapacityOverflow { requested: new_size })?;
    get_prime(new_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_prime() {
        assert!(PRIMES.windows(2).all(|w| w[0] < w[1]));
        assert!(PRIMES.iter().all(|&p| is_prime(p)));
    }

    #[test]
    fn small_values() {
        assert!(!is_prime(-7));
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(!is_prime(9));
        assert!(is_prime(MAX_PRIME_ARRAY_LENGTH));
    }

    #[test]
    fn get_prime_uses_the_table_first() {
        assert_eq!(get_prime(0), Ok(3));
        assert_eq!(get_prime(4), Ok(7));
        assert_eq!(get_prime(7), Ok(7));
        assert_eq!(get_prime(20_000), Ok(21_023));
        assert_eq!(get_prime(7_199_369), Ok(7_199_369));
    }

    #[test]
    fn get_prime_searches_past_the_table() {
        let prime = get_prime(7_199_370).expect("prime");
        assert!(prime >= 7_199_370);
        assert!(is_prime(prime));
        assert_ne!((prime - 1) % 101, 0);
    }

    #[test]
    fn negative_minimum_is_rejected() {
        assert_eq!(get_prime(-1), Err(CoreError::CapacityOverflow { requested: -1 }));
    }

    #[test]
    fn expand_prime_doubles_then_rounds_up() {
        assert_eq!(expand_prime(3), Ok(7));
        assert_eq!(expand_prime(100), Ok(239));
        assert_eq!(expand_prime(0x4000_0000), Ok(MAX_PRIME_ARRAY_LENGTH));
    }
}
