//! Predictors — the three screening operations over a vectorizer and classifiers.
//!
//! Everything here is a pure function of its inputs. Models are passed in
//! explicitly so tests can substitute fakes for the loaded artifacts.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::screening::classifier::Classifier;
use crate::screening::normalizer::{attribute_text, clean_text};
use crate::screening::similarity::{cosine_similarity, to_fit_percentage};
use crate::screening::vectorizer::Vectorizer;
use crate::screening::ModelError;

/// Inclusive upper bound accepted for `experience_years`.
pub const MAX_EXPERIENCE_YEARS: u32 = 50;

/// Candidate attributes collected per interaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub skills: String,
    pub education: String,
    pub experience_years: u32,
}

impl CandidateProfile {
    /// `"{skills} {education} {experience}"`, before normalization.
    pub fn attribute_text(&self) -> String {
        attribute_text(&self.skills, &self.education, self.experience_years)
    }
}

/// The three outputs of one "Analyze" interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub job_role: String,
    pub recruiter_decision: String,
    pub fit_score: f64,
}

/// Normalizes the profile's attribute text, vectorizes it and asks
/// `classifier` for its top label.
pub fn predict_label(
    vectorizer: &dyn Vectorizer,
    classifier: &dyn Classifier,
    profile: &CandidateProfile,
) -> Result<String, ModelError> {
    let text = clean_text(&profile.attribute_text());
    let features = vectorizer.transform(&[text.as_str()]);
    let features = features.first().ok_or(ModelError::EmptyBatch)?;
    let label = classifier.predict(features)?;
    debug!(normalized = %text, nnz = features.entries().len(), %label, "classified profile");
    Ok(label)
}

/// Cosine similarity between the normalized resume and job description,
/// as a percentage rounded to two decimals.
pub fn job_fit_score(
    vectorizer: &dyn Vectorizer,
    resume_text: &str,
    job_description: &str,
) -> Result<f64, ModelError> {
    let resume = clean_text(resume_text);
    let job = clean_text(job_description);

    let vectors = vectorizer.transform(&[resume.as_str(), job.as_str()]);
    let [resume_vec, job_vec] = vectors.as_slice() else {
        return Err(ModelError::EmptyBatch);
    };

    let score = to_fit_percentage(cosine_similarity(resume_vec, job_vec)?);
    debug!(score, "computed job fit");
    Ok(score)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::screening::classifier::ClassifierInfo;
    use crate::screening::vectorizer::{FeatureVector, VectorizerInfo};

    /// Bag-of-words over a fixed word list; counts are not weighted.
    pub(crate) struct WordCountVectorizer(pub Vec<&'static str>);

    impl Vectorizer for WordCountVectorizer {
        fn dimension(&self) -> usize {
            self.0.len()
        }

        fn transform(&self, documents: &[&str]) -> Vec<FeatureVector> {
            documents
                .iter()
                .map(|doc| {
                    let counts: Vec<f64> = self
                        .0
                        .iter()
                        .map(|w| doc.split(' ').filter(|t| t == w).count() as f64)
                        .collect();
                    FeatureVector::from_dense(&counts)
                })
                .collect()
        }

        fn info(&self) -> VectorizerInfo {
            VectorizerInfo {
                kind: "word_count".to_string(),
                dimension: self.0.len(),
                ngram_range: (1, 1),
                sublinear_tf: false,
                norm: None,
            }
        }
    }

    /// Returns the label of the first non-zero feature, or `fallback`.
    pub(crate) struct FirstHitClassifier {
        pub labels: Vec<&'static str>,
        pub fallback: &'static str,
    }

    impl Classifier for FirstHitClassifier {
        fn n_features(&self) -> usize {
            self.labels.len()
        }

        fn predict(&self, features: &FeatureVector) -> Result<String, ModelError> {
            if features.dim() != self.labels.len() {
                return Err(ModelError::DimensionMismatch {
                    expected: self.labels.len(),
                    actual: features.dim(),
                });
            }
            Ok(features
                .entries()
                .first()
                .map(|(i, _)| self.labels[*i])
                .unwrap_or(self.fallback)
                .to_string())
        }

        fn info(&self) -> ClassifierInfo {
            ClassifierInfo {
                kind: "first_hit".to_string(),
                classes: self.labels.iter().map(|l| l.to_string()).collect(),
                n_features: self.labels.len(),
            }
        }
    }

    pub(crate) fn fake_vectorizer() -> WordCountVectorizer {
        WordCountVectorizer(vec!["python", "sql", "rust", "bsc", "design"])
    }

    pub(crate) fn fake_classifier() -> FirstHitClassifier {
        FirstHitClassifier {
            labels: vec!["Data Analyst", "Data Analyst", "Systems Engineer", "Graduate", "Designer"],
            fallback: "Unknown",
        }
    }

    fn profile(skills: &str, education: &str, experience_years: u32) -> CandidateProfile {
        CandidateProfile {
            skills: skills.to_string(),
            education: education.to_string(),
            experience_years,
        }
    }

    #[test]
    fn test_predict_label_uses_normalized_attribute_text() {
        let label = predict_label(
            &fake_vectorizer(),
            &fake_classifier(),
            &profile("Python, SQL", "BSc", 3),
        )
        .unwrap();
        assert_eq!(label, "Data Analyst");
    }

    #[test]
    fn test_punctuation_merges_adjacent_tokens() {
        // "rust/python" → "rustpython": neither word survives as a token.
        let label = predict_label(
            &fake_vectorizer(),
            &fake_classifier(),
            &profile("Rust/Python", "", 0),
        )
        .unwrap();
        assert_eq!(label, "Unknown");
    }

    #[test]
    fn test_degenerate_profile_still_returns_label() {
        let label =
            predict_label(&fake_vectorizer(), &fake_classifier(), &profile("", "", 0)).unwrap();
        assert_eq!(label, "Unknown");
    }

    #[test]
    fn test_predict_label_is_deterministic() {
        let p = profile("Rust SQL", "MSc", 7);
        let first = predict_label(&fake_vectorizer(), &fake_classifier(), &p).unwrap();
        for _ in 0..5 {
            assert_eq!(
                predict_label(&fake_vectorizer(), &fake_classifier(), &p).unwrap(),
                first
            );
        }
    }

    #[test]
    fn test_incompatible_classifier_errors() {
        let narrow = FirstHitClassifier {
            labels: vec!["only"],
            fallback: "none",
        };
        let err = predict_label(&fake_vectorizer(), &narrow, &profile("rust", "", 1)).unwrap_err();
        assert!(matches!(err, ModelError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_fit_score_self_is_100() {
        let text = "Python SQL Rust";
        assert_eq!(job_fit_score(&fake_vectorizer(), text, text).unwrap(), 100.0);
    }

    #[test]
    fn test_fit_score_symmetric() {
        let a = "python python sql design";
        let b = "rust sql sql";
        let v = fake_vectorizer();
        assert_eq!(
            job_fit_score(&v, a, b).unwrap(),
            job_fit_score(&v, b, a).unwrap()
        );
    }

    #[test]
    fn test_fit_score_empty_job_description_is_zero() {
        assert_eq!(
            job_fit_score(&fake_vectorizer(), "python sql", "").unwrap(),
            0.0
        );
    }

    #[test]
    fn test_fit_score_partial_overlap() {
        // [1,1,0,0,0] vs [1,0,0,0,0] → 1/sqrt(2) → 70.71
        assert_eq!(
            job_fit_score(&fake_vectorizer(), "python sql", "Python!").unwrap(),
            70.71
        );
    }
}
