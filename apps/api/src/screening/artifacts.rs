//! Artifact loading — reads the vectorizer and both classifiers from one directory.
//!
//! Loading is all-or-nothing: a missing, corrupt or incompatible artifact is
//! an error and the service must not start.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::screening::classifier::{Classifier, ClassifierInfo, LinearClassifier};
use crate::screening::predictor::{self, CandidateProfile, PredictionResult};
use crate::screening::vectorizer::{TfidfVectorizer, Vectorizer, VectorizerInfo};
use crate::screening::ModelError;

pub const VECTORIZER_FILE: &str = "tfidf.json";
pub const JOB_ROLE_MODEL_FILE: &str = "job_role_model.json";
pub const RECRUITER_MODEL_FILE: &str = "recruiter_model.json";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model artifact not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read model artifact {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt model artifact {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{model} expects {expected} features but the vectorizer produces {actual}")]
    Incompatible {
        model: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Metadata for every loaded model, served by `GET /api/v1/models`.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub vectorizer: VectorizerInfo,
    pub job_role: ClassifierInfo,
    pub recruiter_decision: ClassifierInfo,
}

/// The immutable screening context: one vectorizer shared by two classifiers.
///
/// Built once at start-up and shared read-only (`Arc<ModelBundle>` in `AppState`).
pub struct ModelBundle {
    vectorizer: Box<dyn Vectorizer>,
    job_role: Box<dyn Classifier>,
    recruiter: Box<dyn Classifier>,
}

impl ModelBundle {
    /// Assembles a bundle, rejecting classifiers whose width differs from the vectorizer's.
    pub fn new(
        vectorizer: Box<dyn Vectorizer>,
        job_role: Box<dyn Classifier>,
        recruiter: Box<dyn Classifier>,
    ) -> Result<Self, ArtifactError> {
        let dim = vectorizer.dimension();
        for (model, classifier) in [("job role model", &job_role), ("recruiter model", &recruiter)] {
            if classifier.n_features() != dim {
                return Err(ArtifactError::Incompatible {
                    model,
                    expected: classifier.n_features(),
                    actual: dim,
                });
            }
        }

        Ok(Self {
            vectorizer,
            job_role,
            recruiter,
        })
    }

    /// Loads `tfidf.json`, `job_role_model.json` and `recruiter_model.json` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        info!("Loading model artifacts from {}", dir.display());

        let vectorizer: TfidfVectorizer = read_artifact(&dir.join(VECTORIZER_FILE))?;
        let job_role: LinearClassifier = read_artifact(&dir.join(JOB_ROLE_MODEL_FILE))?;
        let recruiter: LinearClassifier = read_artifact(&dir.join(RECRUITER_MODEL_FILE))?;

        let bundle = Self::new(Box::new(vectorizer), Box::new(job_role), Box::new(recruiter))?;

        let info = bundle.info();
        info!(
            "Models loaded: vocabulary {} terms, {} job roles, {} recruiter decisions",
            info.vectorizer.dimension,
            info.job_role.classes.len(),
            info.recruiter_decision.classes.len()
        );
        Ok(bundle)
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            vectorizer: self.vectorizer.info(),
            job_role: self.job_role.info(),
            recruiter_decision: self.recruiter.info(),
        }
    }

    pub fn predict_job_role(&self, profile: &CandidateProfile) -> Result<String, ModelError> {
        predictor::predict_label(self.vectorizer.as_ref(), self.job_role.as_ref(), profile)
    }

    pub fn predict_recruiter_decision(
        &self,
        profile: &CandidateProfile,
    ) -> Result<String, ModelError> {
        predictor::predict_label(self.vectorizer.as_ref(), self.recruiter.as_ref(), profile)
    }

    pub fn job_fit_score(&self, resume_text: &str, job_description: &str) -> Result<f64, ModelError> {
        predictor::job_fit_score(self.vectorizer.as_ref(), resume_text, job_description)
    }

    /// The full "Analyze" interaction.
    ///
    /// The fit score compares the reconstructed attribute text (not a resume
    /// document) against the job description.
    pub fn analyze(
        &self,
        profile: &CandidateProfile,
        job_description: &str,
    ) -> Result<PredictionResult, ModelError> {
        Ok(PredictionResult {
            job_role: self.predict_job_role(profile)?,
            recruiter_decision: self.predict_recruiter_decision(profile)?,
            fit_score: self.job_fit_score(&profile.attribute_text(), job_description)?,
        })
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::Missing(path.to_path_buf())
        } else {
            ArtifactError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_str(&content).map_err(|source| ArtifactError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}
