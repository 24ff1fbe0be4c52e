//! Numeric value generators.

use super::FieldValue;
use rand::Rng;

/// Generate a random integer in the given range (inclusive).
pub fn generate_int_range<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> FieldValue {
    FieldValue::Int(rng.random_range(min..=max))
}

/// Generate a random float between 0.01 and `max / 100`, rounded to
/// `precision` decimal places.
pub fn generate_scaled_float<R: Rng + ?Sized>(rng: &mut R, max: i64, precision: u32) -> FieldValue {
    let upper = (max as f64 / 100.0).max(0.01);
    let value = rng.random_range(0.01..=upper);
    FieldValue::Float(round_to(value, precision))
}

/// Generate a ten digit integer, shaped like an epoch timestamp or an id.
pub fn generate_large_int<R: Rng + ?Sized>(rng: &mut R) -> FieldValue {
    FieldValue::Int(rng.random_range(1_000_000_000..=9_999_999_999))
}

/// Generate a replacement number small enough to squeeze into the tail of a
/// message.
pub fn generate_small_int<R: Rng + ?Sized>(rng: &mut R) -> FieldValue {
    FieldValue::Int(rng.random_range(1..=99))
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_int_range() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let value = generate_int_range(&mut rng, 10, 20);
            if let FieldValue::Int(v) = value {
                assert!((10..=20).contains(&v));
            } else {
                panic!("Expected Int value");
            }
        }
    }

    #[test]
    fn test_generate_scaled_float() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let value = generate_scaled_float(&mut rng, 100_000, 2);
            if let FieldValue::Float(v) = value {
                assert!((0.01..=1000.0).contains(&v));
                // Two decimal places at most
                let scaled = v * 100.0;
                assert!((scaled - scaled.round()).abs() < 1e-6);
            } else {
                panic!("Expected Float value");
            }
        }
    }

    #[test]
    fn test_scaled_float_tiny_range() {
        let mut rng = StdRng::seed_from_u64(1);
        // max / 100 is below the lower bound, the range collapses to 0.01
        assert_eq!(
            generate_scaled_float(&mut rng, 0, 2),
            FieldValue::Float(0.01)
        );
    }

    #[test]
    fn test_large_and_small_ints() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            match generate_large_int(&mut rng) {
                FieldValue::Int(v) => assert_eq!(v.to_string().len(), 10),
                other => panic!("Expected Int value, got {other:?}"),
            }
            match generate_small_int(&mut rng) {
                FieldValue::Int(v) => assert!((1..=99).contains(&v)),
                other => panic!("Expected Int value, got {other:?}"),
            }
        }
    }
}
