//! Main message generator for producing sized JSON payloads.

use crate::generators::{numeric, FieldKind, FieldValue};
use crate::spec::{GenerationSpec, SpecError};
use chrono::{DateTime, SecondsFormat, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde_json::{Map, Value};

/// Synthetic fields added before a numeric field may be swapped for a
/// two-digit number to fit the size budget.
const SMALL_NUMBER_MIN_FIELDS: usize = 10;

/// Message generator that produces JSON records close to a target size.
///
/// The generator holds no mutable state, so a single instance can be shared
/// across workers behind an `Arc`. Content comes from a pseudo-random source
/// and is not reproducible unless [`MessageGenerator::generate_with`] is
/// given a seeded RNG (the timestamp always reflects the wall clock).
#[derive(Debug, Clone)]
pub struct MessageGenerator {
    spec: GenerationSpec,
}

impl MessageGenerator {
    /// Create a new generator after validating the generation settings.
    pub fn new(spec: GenerationSpec) -> Result<Self, SpecError> {
        spec.validate()?;
        Ok(Self { spec })
    }

    /// Get a reference to the generation spec.
    pub fn spec(&self) -> &GenerationSpec {
        &self.spec
    }

    /// Generate one compact JSON payload using the thread-local RNG.
    pub fn generate(&self) -> Vec<u8> {
        let mut rng = rand::rng();
        self.generate_with(&mut rng)
    }

    /// Generate one compact JSON payload using the given RNG.
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<u8> {
        self.build_record(rng, Utc::now()).to_string().into_bytes()
    }

    /// Build the record for a message generated at `now`.
    ///
    /// Synthetic fields are appended while the running size is below
    /// `target_size - size_tolerance` and the per-message field budget is not
    /// used up. A candidate that would push the record past `target_size` is
    /// shrunk (strings truncated, numbers swapped for a two-digit value once
    /// enough fields exist) or ends the record.
    pub fn build_record<R: Rng + ?Sized>(&self, rng: &mut R, now: DateTime<Utc>) -> Value {
        let spec = &self.spec;
        let mut record = Map::new();

        let timestamp = Value::String(now.to_rfc3339_opts(SecondsFormat::Micros, false));
        let category = Value::String(spec.categories.choose(rng).cloned().unwrap_or_default());

        // Outer braces, two entries and the comma between them
        let mut current_size = 2
            + entry_len(&spec.timestamp_field, timestamp.to_string().len())
            + 1
            + entry_len(&spec.category_field, category.to_string().len());

        record.insert(spec.timestamp_field.clone(), timestamp);
        record.insert(spec.category_field.clone(), category);

        let max_fields = self.field_budget(rng);
        let lower_bound = spec.target_size.saturating_sub(spec.size_tolerance);
        let mut field_count = 0;

        while current_size < lower_bound && field_count < max_fields {
            let name = format!("field_{field_count}");
            let kind = FieldKind::random(rng);
            let mut value = kind.generate(rng, spec);

            // Leading comma plus `"name":`
            let overhead = 1 + entry_len(&name, 0);
            let mut field_size = overhead + value.encoded_len();

            if current_size + field_size > spec.target_size {
                match value {
                    FieldValue::Text(text) if kind.is_string() => {
                        let available = spec.target_size as i64
                            - current_size as i64
                            - overhead as i64
                            - 2;
                        if available <= 0 {
                            break;
                        }
                        value = FieldValue::Text(text.chars().take(available as usize).collect());
                    }
                    _ if kind.is_numeric() && field_count >= SMALL_NUMBER_MIN_FIELDS => {
                        value = numeric::generate_small_int(rng);
                        if current_size + overhead + value.encoded_len() > spec.target_size {
                            break;
                        }
                    }
                    _ => break,
                }
                field_size = overhead + value.encoded_len();
            }

            record.insert(name, value.into_json());
            current_size += field_size;
            field_count += 1;
        }

        Value::Object(record)
    }

    /// Field budget for one message: the target count perturbed by up to
    /// `field_count_variance` in either direction.
    fn field_budget<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let variance = self.spec.field_count_variance as i64;
        let delta = if variance > 0 {
            rng.random_range(-variance..=variance)
        } else {
            0
        };
        (self.spec.target_field_count as i64 + delta).max(0) as usize
    }
}

/// Encoded length of `"key":<value>` for a value of `value_len` bytes.
fn entry_len(key: &str, value_len: usize) -> usize {
    Value::String(key.to_string()).to_string().len() + 1 + value_len
}
