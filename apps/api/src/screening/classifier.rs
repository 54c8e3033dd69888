//! Classifier — maps a feature vector to a discrete label.
//!
//! `LinearClassifier` covers every pre-fit linear model we ship (logistic
//! regression, linear SVM, multinomial naive Bayes): all of them reduce to
//! `intercept + coef · x` followed by an argmax.

use serde::{Deserialize, Serialize};

use crate::screening::vectorizer::FeatureVector;
use crate::screening::ModelError;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A pre-fit classifier. Carried in `ModelBundle` as `Box<dyn Classifier>`.
pub trait Classifier: Send + Sync {
    /// Width of the feature vectors this classifier accepts.
    fn n_features(&self) -> usize;

    /// Returns the single top label for `features`.
    fn predict(&self, features: &FeatureVector) -> Result<String, ModelError>;

    fn info(&self) -> ClassifierInfo;
}

/// Metadata reported by `GET /api/v1/models`.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifierInfo {
    pub kind: String,
    pub classes: Vec<String>,
    pub n_features: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Linear classifier artifact
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    #[default]
    LogisticRegression,
    LinearSvc,
    MultinomialNb,
}

impl ClassifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassifierKind::LogisticRegression => "logistic_regression",
            ClassifierKind::LinearSvc => "linear_svc",
            ClassifierKind::MultinomialNb => "multinomial_nb",
        }
    }
}

/// Class labels arrive as whatever the training labels were.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLabel {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl From<RawLabel> for String {
    fn from(label: RawLabel) -> Self {
        match label {
            RawLabel::Text(s) => s,
            RawLabel::Integer(n) => n.to_string(),
            RawLabel::Float(x) => x.to_string(),
            RawLabel::Flag(b) => b.to_string(),
        }
    }
}

/// On-disk form of a fitted linear model (`job_role_model.json`, `recruiter_model.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct LinearArtifact {
    #[serde(default)]
    pub kind: ClassifierKind,
    pub classes: Vec<RawLabel>,
    pub coef: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

// ────────────────────────────────────────────────────────────────────────────
// LinearClassifier
// ────────────────────────────────────────────────────────────────────────────

/// Validated linear model.
///
/// Binary models carry one coefficient row: a positive score selects
/// `classes[1]`. Otherwise there is one row per class and the highest score
/// wins, ties resolved toward the lower index.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "LinearArtifact")]
pub struct LinearClassifier {
    kind: ClassifierKind,
    classes: Vec<String>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    n_features: usize,
}

impl TryFrom<LinearArtifact> for LinearClassifier {
    type Error = String;

    fn try_from(artifact: LinearArtifact) -> Result<Self, Self::Error> {
        let classes: Vec<String> = artifact.classes.into_iter().map(String::from).collect();
        let rows = artifact.coef.len();

        if classes.len() < 2 {
            return Err(format!("expected at least 2 classes, got {}", classes.len()));
        }
        let binary = rows == 1 && classes.len() == 2;
        if !binary && rows != classes.len() {
            return Err(format!(
                "{rows} coefficient rows do not match {} classes",
                classes.len()
            ));
        }
        if artifact.intercept.len() != rows {
            return Err(format!(
                "intercept has {} entries, expected {rows}",
                artifact.intercept.len()
            ));
        }

        let n_features = artifact.coef[0].len();
        if let Some(row) = artifact.coef.iter().position(|r| r.len() != n_features) {
            return Err(format!(
                "coefficient row {row} has {} features, expected {n_features}",
                artifact.coef[row].len()
            ));
        }
        let all_finite = artifact
            .coef
            .iter()
            .flatten()
            .chain(artifact.intercept.iter())
            .all(|w| w.is_finite());
        if !all_finite {
            return Err("coefficients must be finite numbers".to_string());
        }

        Ok(Self {
            kind: artifact.kind,
            classes,
            coef: artifact.coef,
            intercept: artifact.intercept,
            n_features,
        })
    }
}

impl LinearClassifier {
    /// Raw per-row scores: `intercept_k + coef_k · x`.
    pub fn decision_function(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        if features.dim() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual: features.dim(),
            });
        }
        Ok(self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| b + features.dot_dense(row))
            .collect())
    }
}

impl Classifier for LinearClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &FeatureVector) -> Result<String, ModelError> {
        let scores = self.decision_function(features)?;

        let index = if scores.len() == 1 {
            usize::from(scores[0] > 0.0)
        } else {
            // First maximum wins.
            scores
                .iter()
                .enumerate()
                .fold(0, |best, (i, s)| if *s > scores[best] { i } else { best })
        };

        Ok(self.classes[index].clone())
    }

    fn info(&self) -> ClassifierInfo {
        ClassifierInfo {
            kind: self.kind.as_str().to_string(),
            classes: self.classes.clone(),
            n_features: self.n_features,
        }
    }
}
