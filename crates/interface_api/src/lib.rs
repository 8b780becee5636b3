//! HTTP API Layer
//!
//! This crate provides the REST API for the claim readiness system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for each domain
//! - **Middleware**: Authentication, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Scheduler**: Background reminder scan loop
//! - **Error Handling**: Consistent error responses
//!
//! Handlers reach the domains only through the services in `AppState`;
//! the database pool never appears in a handler signature.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod scheduler;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::HealthCheckable;
use domain_jumpstart::JumpstartService;
use domain_loss::LossEventService;
use domain_proof::ProofOfLossService;

use crate::config::ApiConfig;
use crate::handlers::{health, jumpstart, loss_events, proof_of_loss};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub loss_events: Arc<LossEventService>,
    pub proof_of_loss: Arc<ProofOfLossService>,
    pub jumpstart: Arc<JumpstartService>,
    /// Readiness probe target, usually the database adapter
    pub health: Arc<dyn HealthCheckable>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Shared application state with the domain services
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Loss event routes, with the Proof of Loss nested per event
    let loss_event_routes = Router::new()
        .route("/", post(loss_events::report_event))
        .route("/", get(loss_events::list_events))
        .route("/:id", get(loss_events::get_event))
        .route("/:id/proof-of-loss", post(proof_of_loss::submit_form))
        .route("/:id/proof-of-loss", get(proof_of_loss::get_form));

    // Jumpstart session routes
    let jumpstart_routes = Router::new()
        .route("/sessions", post(jumpstart::start_session))
        .route("/sessions/active", get(jumpstart::active_session))
        .route(
            "/sessions/:id/prompts/complete",
            post(jumpstart::complete_prompt),
        )
        .route("/sessions/:id/prompts/skip", post(jumpstart::skip_prompt))
        .route("/sessions/:id/complete", post(jumpstart::complete_session))
        .route("/sessions/:id/dismiss", post(jumpstart::dismiss_session));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/loss-events", loss_event_routes)
        .nest("/jumpstart", jumpstart_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            audit_middleware,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
