//! API route definitions
//!
//! Author: hephaex@gmail.com

use crate::handlers::{annotate, annotations, vocabulary};
use crate::middleware::require_api_token;
use crate::state::AppState;
use axum::{
    handler::Handler,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Create API v1 routes
pub fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Replacing the vocabulary requires the API token
    let replace_vocabulary = vocabulary::replace_vocabulary
        .layer(middleware::from_fn_with_state(state.clone(), require_api_token));

    // Saved annotations require the API token for reads and writes
    let saved_annotations = Router::new()
        .route(
            "/annotations",
            get(annotations::list_annotations).post(annotations::save_annotation),
        )
        .route_layer(middleware::from_fn_with_state(state, require_api_token));

    Router::new()
        // Annotation endpoints
        .route("/annotate", post(annotate::annotate_handler))
        .route("/stem", post(annotate::stem_handler))
        // Vocabulary endpoints
        .route(
            "/vocabulary",
            get(vocabulary::get_vocabulary).put(replace_vocabulary),
        )
        .merge(saved_annotations)
}
