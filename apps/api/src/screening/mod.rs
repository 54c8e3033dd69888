// Screening core: normalization, vectorization, classification, similarity.
// Models are loaded once into an immutable `ModelBundle`; nothing here mutates after start-up.

pub mod artifacts;
pub mod classifier;
pub mod handlers;
pub mod normalizer;
pub mod predictor;
pub mod similarity;
pub mod vectorizer;

use thiserror::Error;

pub use artifacts::ModelBundle;
pub use predictor::{CandidateProfile, PredictionResult, MAX_EXPERIENCE_YEARS};

/// Per-call inference failure. Artifacts are checked for compatibility at
/// load time, so these only surface from custom `Vectorizer`/`Classifier`
/// implementations that break their contract.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("vectorizer returned fewer vectors than documents")]
    EmptyBatch,
}
