//! DocuSeal proxy
//!
//! Session-gated HTTP routes in front of the DocuSeal REST API. Each route
//! checks the caller's session, builds the upstream query or body, forwards
//! it with the server's API key and relays the answer. Upstream errors keep
//! their status and body.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod upstream;

use config::Config;
use handlers::{builder_token, submissions, submitters, templates};
use upstream::DocusealClient;

/// Uploads carry whole documents
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub docuseal: DocusealClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let docuseal = DocusealClient::new(config.docuseal_url.clone());
        Self { config, docuseal }
    }
}

pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Templates
        .route(
            "/api/docuseal/templates",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/api/docuseal/templates/upload",
            post(templates::upload_template),
        )
        .route(
            "/api/docuseal/templates/:id",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        )
        // Submissions
        .route(
            "/api/docuseal/submissions",
            get(submissions::list_submissions).post(submissions::create_submission),
        )
        .route(
            "/api/docuseal/submissions/:id",
            get(submissions::get_submission)
                .put(submissions::update_submission)
                .delete(submissions::delete_submission),
        )
        .route(
            "/api/docuseal/submissions/:id/documents",
            get(submissions::submission_documents),
        )
        // Submitters
        .route("/api/docuseal/submitters", get(submitters::list_submitters))
        .route(
            "/api/docuseal/submitters/:id",
            get(submitters::get_submitter).put(submitters::update_submitter),
        )
        // Embedded builder
        .route(
            "/api/docuseal/builder_token",
            post(builder_token::builder_token),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
