use std::sync::Arc;

use crate::applications::tracker::ApplicationTracker;
use crate::config::Config;
use crate::recommendation::engine::RecommendationEngine;
use crate::skills::profile::SkillProfileService;

/// Shared application state, injected into every Axum handler via State<AppState>.
/// All fields must be cheap to clone (Arc-wrapped or internally reference-counted).
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub recommender: Arc<RecommendationEngine>,
    pub tracker: Arc<ApplicationTracker>,
    pub skills: Arc<SkillProfileService>,
}
