//! Generation settings shared by every worker for the lifetime of a run.

use serde::{Deserialize, Serialize};

/// Error type for invalid generation settings.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SpecError {
    /// No category values to draw from
    #[error("Category set is empty")]
    EmptyCategories,

    /// Target size of zero bytes
    #[error("Target message size must be greater than zero")]
    ZeroTargetSize,

    /// Range with min above max
    #[error("Invalid {name}: min {min} is greater than max {max}")]
    InvalidRange {
        name: &'static str,
        min: i64,
        max: i64,
    },

    /// Float precision beyond what an f64 can carry
    #[error("Float precision {0} is too large (max 15)")]
    InvalidPrecision(u32),

    /// Empty field name for a mandatory field
    #[error("Mandatory field name for {0} is empty")]
    EmptyFieldName(&'static str),
}

/// Settings describing the shape of generated messages.
///
/// Loaded once at startup and never mutated afterwards, so it can be shared
/// by all workers without locking. Missing keys fall back to the defaults
/// listed on [`GenerationSpec::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSpec {
    /// Approximate serialized size of each message, in bytes
    pub target_size: usize,

    /// Accepted distance below `target_size` before field appending stops
    pub size_tolerance: usize,

    /// Number of synthetic fields to aim for
    pub target_field_count: usize,

    /// Symmetric random perturbation applied to `target_field_count` per message
    pub field_count_variance: usize,

    /// Inclusive length bounds for random strings
    pub string_length_range: (usize, usize),

    /// Inclusive bounds for random integers
    pub number_range: (i64, i64),

    /// Decimal places kept on random floats
    pub float_precision: u32,

    /// Values for the category field
    pub categories: Vec<String>,

    /// Name of the category field
    pub category_field: String,

    /// Name of the timestamp field
    pub timestamp_field: String,
}

impl Default for GenerationSpec {
    fn default() -> Self {
        Self {
            target_size: 500,
            size_tolerance: 50,
            target_field_count: 100,
            field_count_variance: 5,
            string_length_range: (5, 15),
            number_range: (1, 100_000),
            float_precision: 2,
            categories: ["AAPL", "GOOGL", "MSFT", "TSLA", "AMZN"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            category_field: "stockName".to_string(),
            timestamp_field: "timestamp".to_string(),
        }
    }
}

impl GenerationSpec {
    /// Check the settings for values the generator cannot work with.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.categories.is_empty() {
            return Err(SpecError::EmptyCategories);
        }
        if self.target_size == 0 {
            return Err(SpecError::ZeroTargetSize);
        }
        let (min_str, max_str) = self.string_length_range;
        if min_str > max_str {
            return Err(SpecError::InvalidRange {
                name: "string_length_range",
                min: min_str as i64,
                max: max_str as i64,
            });
        }
        let (min_num, max_num) = self.number_range;
        if min_num > max_num {
            return Err(SpecError::InvalidRange {
                name: "number_range",
                min: min_num,
                max: max_num,
            });
        }
        if self.float_precision > 15 {
            return Err(SpecError::InvalidPrecision(self.float_precision));
        }
        if self.category_field.is_empty() {
            return Err(SpecError::EmptyFieldName("category"));
        }
        if self.timestamp_field.is_empty() {
            return Err(SpecError::EmptyFieldName("timestamp"));
        }
        Ok(())
    }

    /// Lowest `target_size` for which a message can hold the mandatory
    /// fields plus a few bytes of synthetic data.
    pub fn minimum_useful_size(&self) -> usize {
        let longest_category = self.categories.iter().map(|c| c.len()).max().unwrap_or(0);
        // {"<ts>":"2024-01-01T00:00:00.000000+00:00","<cat>":"<value>"}
        let timestamp_len = 32;
        2 + (self.timestamp_field.len() + 3 + timestamp_len + 2)
            + 1
            + (self.category_field.len() + 3 + longest_category + 2)
            + 16
    }
}
