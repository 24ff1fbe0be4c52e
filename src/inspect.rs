//! Local generator self-check: no sink, just size and shape statistics.

use loadtest_generator::MessageGenerator;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

/// Problems kept per size; the rest are only counted.
const MAX_REPORTED_PROBLEMS: usize = 10;

/// Statistics for one target size.
#[derive(Debug, Clone, Serialize)]
pub struct SizeCheck {
    pub target_size: usize,
    pub messages: usize,
    pub avg_size: f64,
    pub min_size: usize,
    pub max_size: usize,
    pub size_variance: f64,
    pub avg_fields: f64,
    /// Fraction of messages within `target_size ± size_tolerance`
    pub within_tolerance: f64,
    pub messages_per_sec: f64,
    pub invalid: usize,
    pub problems: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
}

impl SizeCheck {
    pub fn passed(&self) -> bool {
        self.invalid == 0
    }
}

/// Generate `count` messages and check each one.
///
/// A message is invalid when it does not parse as a JSON object, lacks the
/// timestamp or category field, or carries a category outside the set.
pub fn inspect_generator(generator: &MessageGenerator, count: usize, keep_sample: bool) -> SizeCheck {
    let spec = generator.spec();

    let start = Instant::now();
    let payloads: Vec<Vec<u8>> = (0..count).map(|_| generator.generate()).collect();
    let elapsed = start.elapsed().as_secs_f64();

    let mut sizes = Vec::with_capacity(count);
    let mut field_total = 0usize;
    let mut within = 0usize;
    let mut invalid = 0usize;
    let mut problems = Vec::new();

    for (i, payload) in payloads.iter().enumerate() {
        let size = payload.len();
        sizes.push(size);
        if size.abs_diff(spec.target_size) <= spec.size_tolerance {
            within += 1;
        }

        match check_message(payload, spec) {
            Ok(fields) => field_total += fields,
            Err(problem) => {
                invalid += 1;
                if problems.len() < MAX_REPORTED_PROBLEMS {
                    problems.push(format!("message {i}: {problem}"));
                }
            }
        }
    }

    let n = count.max(1) as f64;
    let avg_size = sizes.iter().sum::<usize>() as f64 / n;
    let size_variance = if sizes.len() > 1 {
        sizes
            .iter()
            .map(|&s| (s as f64 - avg_size).powi(2))
            .sum::<f64>()
            / (sizes.len() - 1) as f64
    } else {
        0.0
    };

    SizeCheck {
        target_size: spec.target_size,
        messages: count,
        avg_size,
        min_size: sizes.iter().copied().min().unwrap_or(0),
        max_size: sizes.iter().copied().max().unwrap_or(0),
        size_variance,
        avg_fields: field_total as f64 / n,
        within_tolerance: within as f64 / n,
        messages_per_sec: if elapsed > 0.0 { count as f64 / elapsed } else { 0.0 },
        invalid,
        problems,
        sample: if keep_sample {
            payloads
                .first()
                .map(|p| String::from_utf8_lossy(p).into_owned())
        } else {
            None
        },
    }
}

/// Check one payload, returning its field count.
fn check_message(
    payload: &[u8],
    spec: &loadtest_generator::GenerationSpec,
) -> Result<usize, String> {
    let value: Value = serde_json::from_slice(payload).map_err(|e| format!("invalid JSON: {e}"))?;
    let object = value.as_object().ok_or("not a JSON object")?;

    if !object.contains_key(&spec.timestamp_field) {
        return Err(format!("missing '{}' field", spec.timestamp_field));
    }
    match object.get(&spec.category_field).and_then(Value::as_str) {
        Some(category) if spec.categories.iter().any(|c| c == category) => {}
        Some(category) => return Err(format!("unknown category '{category}'")),
        None => return Err(format!("missing '{}' field", spec.category_field)),
    }

    Ok(object.len())
}
