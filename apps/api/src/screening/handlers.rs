//! Axum route handlers for the Screening API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::screening::artifacts::ModelInfo;
use crate::screening::{CandidateProfile, PredictionResult, MAX_EXPERIENCE_YEARS};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Candidate attributes as submitted. Missing text fields are empty and a
/// missing experience is 0.
///
/// `experience` is kept as raw JSON so that non-integers reach validation
/// and are reported in the API error envelope.
#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub experience: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(flatten)]
    pub profile: ProfileRequest,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct FitScoreRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct JobRoleResponse {
    pub job_role: String,
}

#[derive(Debug, Serialize)]
pub struct RecruiterDecisionResponse {
    pub recruiter_decision: String,
}

#[derive(Debug, Serialize)]
pub struct FitScoreResponse {
    pub fit_score: f64,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub model_dir: String,
    pub models: ModelInfo,
}

impl TryFrom<ProfileRequest> for CandidateProfile {
    type Error = AppError;

    fn try_from(request: ProfileRequest) -> Result<Self, Self::Error> {
        let experience_years = match &request.experience {
            None => 0,
            Some(value) => value
                .as_u64()
                .filter(|years| *years <= u64::from(MAX_EXPERIENCE_YEARS))
                .and_then(|years| u32::try_from(years).ok())
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "experience must be a whole number between 0 and {MAX_EXPERIENCE_YEARS} years, got {value}"
                    ))
                })?,
        };

        Ok(CandidateProfile {
            skills: request.skills,
            education: request.education,
            experience_years,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Predicts the job role and recruiter decision for the profile and scores
/// the profile's attribute text against the job description.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<PredictionResult>, AppError> {
    let profile = CandidateProfile::try_from(request.profile)?;
    let result = state.models.analyze(&profile, &request.job_description)?;

    info!(
        job_role = %result.job_role,
        recruiter_decision = %result.recruiter_decision,
        fit_score = result.fit_score,
        "Analyzed candidate"
    );
    Ok(Json(result))
}

/// POST /api/v1/predict/job-role
pub async fn handle_predict_job_role(
    State(state): State<AppState>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<JobRoleResponse>, AppError> {
    let profile = CandidateProfile::try_from(request)?;
    let job_role = state.models.predict_job_role(&profile)?;
    Ok(Json(JobRoleResponse { job_role }))
}

/// POST /api/v1/predict/recruiter-decision
pub async fn handle_predict_recruiter_decision(
    State(state): State<AppState>,
    Json(request): Json<ProfileRequest>,
) -> Result<Json<RecruiterDecisionResponse>, AppError> {
    let profile = CandidateProfile::try_from(request)?;
    let recruiter_decision = state.models.predict_recruiter_decision(&profile)?;
    Ok(Json(RecruiterDecisionResponse { recruiter_decision }))
}

/// POST /api/v1/fit-score
///
/// Cosine similarity between arbitrary resume text and a job description, 0–100.
pub async fn handle_fit_score(
    State(state): State<AppState>,
    Json(request): Json<FitScoreRequest>,
) -> Result<Json<FitScoreResponse>, AppError> {
    let fit_score = state
        .models
        .job_fit_score(&request.resume_text, &request.job_description)?;
    Ok(Json(FitScoreResponse { fit_score }))
}

/// GET /api/v1/models
pub async fn handle_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        model_dir: state.config.model_dir.display().to_string(),
        models: state.models.info(),
    })
}
