//! Similarity Scorer — cosine similarity rescaled to a percentage.

use crate::screening::vectorizer::FeatureVector;
use crate::screening::ModelError;

/// Cosine similarity in `[-1, 1]`.
///
/// Returns 0.0 when either vector is all zeros (empty or out-of-vocabulary
/// text). The result is clamped to absorb rounding past ±1.
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> Result<f64, ModelError> {
    if a.dim() != b.dim() {
        return Err(ModelError::DimensionMismatch {
            expected: a.dim(),
            actual: b.dim(),
        });
    }

    if a.is_zero() || b.is_zero() {
        return Ok(0.0);
    }

    Ok((a.dot(b) / (a.norm() * b.norm())).clamp(-1.0, 1.0))
}

/// Similarity × 100, rounded to two decimals and clamped to `[0, 100]`.
///
/// Rounding goes through decimal formatting, which is exact on the binary
/// value and sends ties to the even digit.
pub fn to_fit_percentage(similarity: f64) -> f64 {
    let percentage = similarity * 100.0;
    let rounded = format!("{percentage:.2}").parse::<f64>().unwrap_or(percentage);
    rounded.clamp(0.0, 100.0)
}
