//! Individual value generators for synthetic message fields.
//!
//! Each synthetic field is produced by one [`FieldKind`], picked uniformly at
//! random per field. The kind decides both the value and how the message
//! builder may shrink it when it does not fit the remaining size budget.

pub mod numeric;
pub mod text;

use crate::spec::GenerationSpec;
use rand::Rng;
use serde_json::Value;

/// Kind of value a synthetic field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Integer,
    Float,
    Boolean,
    RandomString,
    Status,
    UserId,
    SessionId,
    LargeInteger,
}

impl FieldKind {
    /// Every kind, in selection order.
    pub const ALL: [FieldKind; 8] = [
        FieldKind::Integer,
        FieldKind::Float,
        FieldKind::Boolean,
        FieldKind::RandomString,
        FieldKind::Status,
        FieldKind::UserId,
        FieldKind::SessionId,
        FieldKind::LargeInteger,
    ];

    /// Pick a kind uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Generate a value of this kind.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, spec: &GenerationSpec) -> FieldValue {
        let (min_num, max_num) = spec.number_range;
        match self {
            FieldKind::Integer => numeric::generate_int_range(rng, min_num, max_num),
            FieldKind::Float => {
                numeric::generate_scaled_float(rng, max_num, spec.float_precision)
            }
            FieldKind::Boolean => FieldValue::Bool(rng.random_bool(0.5)),
            FieldKind::RandomString => {
                let (min_len, max_len) = spec.string_length_range;
                text::generate_alphanumeric(rng, min_len, max_len)
            }
            FieldKind::Status => text::generate_status(rng),
            FieldKind::UserId => text::generate_prefixed_id(rng, "user_", 1_000, 9_999),
            FieldKind::SessionId => {
                text::generate_prefixed_id(rng, "session_", 100_000, 999_999)
            }
            FieldKind::LargeInteger => numeric::generate_large_int(rng),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldKind::Integer | FieldKind::Float | FieldKind::LargeInteger
        )
    }

    pub fn is_string(&self) -> bool {
        matches!(
            self,
            FieldKind::RandomString | FieldKind::Status | FieldKind::UserId | FieldKind::SessionId
        )
    }
}

/// A generated field value before it is placed into a message.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl FieldValue {
    /// Convert into a JSON value.
    pub fn into_json(self) -> Value {
        match self {
            FieldValue::Int(v) => Value::from(v),
            FieldValue::Float(v) => Value::from(v),
            FieldValue::Bool(v) => Value::Bool(v),
            FieldValue::Text(v) => Value::String(v),
        }
    }

    /// Length of the compact JSON encoding of this value, in bytes.
    pub fn encoded_len(&self) -> usize {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()).to_string().len(),
            other => other.clone().into_json().to_string().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_kind_classification() {
        let numeric: Vec<_> = FieldKind::ALL.iter().filter(|k| k.is_numeric()).collect();
        let strings: Vec<_> = FieldKind::ALL.iter().filter(|k| k.is_string()).collect();
        assert_eq!(numeric.len(), 3);
        assert_eq!(strings.len(), 4);
        assert!(!FieldKind::Boolean.is_numeric());
        assert!(!FieldKind::Boolean.is_string());
    }

    #[test]
    fn test_random_kind_covers_all() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            seen.insert(FieldKind::random(&mut rng));
        }
        assert_eq!(seen.len(), FieldKind::ALL.len());
    }

    #[test]
    fn test_generated_value_matches_kind() {
        let mut rng = StdRng::seed_from_u64(42);
        let spec = GenerationSpec::default();
        for kind in FieldKind::ALL {
            let value = kind.generate(&mut rng, &spec);
            match (kind, &value) {
                (FieldKind::Integer | FieldKind::LargeInteger, FieldValue::Int(_)) => {}
                (FieldKind::Float, FieldValue::Float(_)) => {}
                (FieldKind::Boolean, FieldValue::Bool(_)) => {}
                (k, FieldValue::Text(_)) if k.is_string() => {}
                _ => panic!("{kind:?} produced {value:?}"),
            }
        }
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(FieldValue::Int(12345).encoded_len(), 5);
        assert_eq!(FieldValue::Bool(false).encoded_len(), 5);
        assert_eq!(FieldValue::Text("abc".to_string()).encoded_len(), 5);
        assert_eq!(FieldValue::Float(1.25).encoded_len(), 4);
    }
}
