//! String value generators.

use super::FieldValue;
use rand::distr::{Alphanumeric, SampleString};
use rand::seq::IndexedRandom;
use rand::Rng;

/// Status values drawn by [`generate_status`].
pub const STATUSES: [&str; 5] = ["active", "inactive", "pending", "completed", "failed"];

/// Generate an alphanumeric string with a length in `min_len..=max_len`.
pub fn generate_alphanumeric<R: Rng + ?Sized>(
    rng: &mut R,
    min_len: usize,
    max_len: usize,
) -> FieldValue {
    let len = rng.random_range(min_len..=max_len);
    FieldValue::Text(Alphanumeric.sample_string(rng, len))
}

/// Generate one of the fixed status strings.
pub fn generate_status<R: Rng + ?Sized>(rng: &mut R) -> FieldValue {
    let status = STATUSES.choose(rng).copied().unwrap_or(STATUSES[0]);
    FieldValue::Text(status.to_string())
}

/// Generate an id such as `user_4821` from a prefix and a numeric range.
pub fn generate_prefixed_id<R: Rng + ?Sized>(
    rng: &mut R,
    prefix: &str,
    min: u64,
    max: u64,
) -> FieldValue {
    FieldValue::Text(format!("{prefix}{}", rng.random_range(min..=max)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_alphanumeric_length_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let FieldValue::Text(s) = generate_alphanumeric(&mut rng, 5, 15) else {
                panic!("Expected Text value");
            };
            assert!((5..=15).contains(&s.len()));
            assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn test_status_values() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let FieldValue::Text(s) = generate_status(&mut rng) else {
                panic!("Expected Text value");
            };
            assert!(STATUSES.contains(&s.as_str()));
        }
    }

    #[test]
    fn test_prefixed_ids() {
        let mut rng = StdRng::seed_from_u64(42);
        let FieldValue::Text(user) = generate_prefixed_id(&mut rng, "user_", 1_000, 9_999) else {
            panic!("Expected Text value");
        };
        assert!(user.starts_with("user_"));
        let digits: u64 = user["user_".len()..].parse().unwrap();
        assert!((1_000..=9_999).contains(&digits));

        let FieldValue::Text(session) =
            generate_prefixed_id(&mut rng, "session_", 100_000, 999_999)
        else {
            panic!("Expected Text value");
        };
        assert_eq!(session.len(), "session_".len() + 6);
    }
}
