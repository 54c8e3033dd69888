use std::sync::Arc;

use crate::config::Config;
use crate::screening::ModelBundle;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Vectorizer and both classifiers, loaded once at start-up and never mutated.
    pub models: Arc<ModelBundle>,
}
