pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/models", get(handlers::handle_models))
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .route(
            "/api/v1/predict/job-role",
            post(handlers::handle_predict_job_role),
        )
        .route(
            "/api/v1/predict/recruiter-decision",
            post(handlers::handle_predict_recruiter_decision),
        )
        .route("/api/v1/fit-score", post(handlers::handle_fit_score))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::screening::artifacts::tests::bundled_models_dir;
    use crate::screening::ModelBundle;

    fn app() -> Router {
        let model_dir = bundled_models_dir();
        let models = ModelBundle::load(&model_dir).unwrap();
        build_router(AppState {
            config: Config {
                model_dir,
                port: 0,
                rust_log: "info".to_string(),
            },
            models: Arc::new(models),
        })
    }

    async fn send(method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let response = app().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "screener-api");
    }

    #[tokio::test]
    async fn test_analyze_returns_three_outputs() {
        let (status, body) = send(
            Method::POST,
            "/api/v1/analyze",
            Some(json!({
                "skills": "Python SQL",
                "education": "BSc",
                "experience": 3,
                "job_description": "Looking for a data analyst with Python and SQL"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["job_role"], "Data Analyst");
        assert_eq!(body["recruiter_decision"], "Hire");
        let score = body["fit_score"].as_f64().unwrap();
        assert!(score > 0.0 && score <= 100.0, "score {score}");
    }

    #[tokio::test]
    async fn test_analyze_rejects_experience_out_of_range() {
        let (status, body) = send(
            Method::POST,
            "/api/v1/analyze",
            Some(json!({"skills": "Rust", "education": "BSc", "experience": 51})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_non_integer_experience_uses_error_envelope() {
        for experience in [json!(2.5), json!("3")] {
            for uri in ["/api/v1/analyze", "/api/v1/predict/job-role"] {
                let (status, body) = send(
                    Method::POST,
                    uri,
                    Some(json!({"skills": "Rust", "experience": experience})),
                )
                .await;
                assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {experience}");
                assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
            }
        }
    }

    #[tokio::test]
    async fn test_analyze_with_empty_form() {
        let (status, body) = send(Method::POST, "/api/v1/analyze", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recruiter_decision"], "Reject");
        assert_eq!(body["fit_score"], 0.0);
    }

    #[tokio::test]
    async fn test_predict_endpoints() {
        let profile = json!({
            "skills": "Figma, UX research, prototyping",
            "education": "BA Design",
            "experience": 2
        });
        let (status, body) =
            send(Method::POST, "/api/v1/predict/job-role", Some(profile.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["job_role"], "UI/UX Designer");

        let (status, body) =
            send(Method::POST, "/api/v1/predict/recruiter-decision", Some(profile)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recruiter_decision"], "Hire");
    }

    #[tokio::test]
    async fn test_fit_score_endpoint() {
        let text = "Rust Kubernetes Docker backend engineer";
        let (status, body) = send(
            Method::POST,
            "/api/v1/fit-score",
            Some(json!({"resume_text": text, "job_description": text})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fit_score"], 100.0);
    }

    #[tokio::test]
    async fn test_models_endpoint() {
        let (status, body) = send(Method::GET, "/api/v1/models", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["models"]["vectorizer"]["kind"], "tfidf");
        assert_eq!(body["models"]["job_role"]["classes"].as_array().unwrap().len(), 4);
        assert_eq!(body["models"]["recruiter_decision"]["kind"], "logistic_regression");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = send(Method::GET, "/api/v1/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
