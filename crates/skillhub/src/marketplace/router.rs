use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;

use super::domain::{
    Actor, ActorId, JobDraft, JobFilter, JobId, ProfilePatch, ProposalId, ProposalSubmission,
    Registration,
};
use super::identity::{IdentityError, IdentityProvider};
use super::service::{MarketplaceError, MarketplaceService};
use super::store::{MarketplaceStore, StoreError};

/// Router builder exposing the marketplace lifecycle over HTTP.
pub fn marketplace_router<S, I>(service: Arc<MarketplaceService<S, I>>) -> Router
where
    S: MarketplaceStore + 'static,
    I: IdentityProvider + 'static,
{
    Router::new()
        .route("/api/v1/users", post(register_handler::<S, I>))
        .route("/api/v1/users/me", put(update_profile_handler::<S, I>))
        .route("/api/v1/users/:actor_id", get(profile_handler::<S, I>))
        .route(
            "/api/v1/jobs",
            get(browse_jobs_handler::<S, I>).post(post_job_handler::<S, I>),
        )
        .route("/api/v1/jobs/mine", get(my_jobs_handler::<S, I>))
        .route(
            "/api/v1/jobs/:job_id",
            get(job_handler::<S, I>).delete(delete_job_handler::<S, I>),
        )
        .route(
            "/api/v1/jobs/:job_id/complete",
            post(complete_job_handler::<S, I>),
        )
        .route(
            "/api/v1/jobs/:job_id/proposals",
            get(list_proposals_handler::<S, I>).post(submit_proposal_handler::<S, I>),
        )
        .route(
            "/api/v1/jobs/:job_id/proposals/:proposal_id/accept",
            post(accept_proposal_handler::<S, I>),
        )
        .route("/api/v1/proposals/mine", get(my_proposals_handler::<S, I>))
        .with_state(service)
}

/// Map the engine's error taxonomy onto response codes.
pub fn error_response(error: MarketplaceError) -> Response {
    let status = match &error {
        MarketplaceError::Forbidden(_) => StatusCode::FORBIDDEN,
        MarketplaceError::InvalidState(_) | MarketplaceError::Duplicate(_) => StatusCode::CONFLICT,
        MarketplaceError::NotFound(_) => StatusCode::NOT_FOUND,
        MarketplaceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        MarketplaceError::Identity(_) => StatusCode::UNAUTHORIZED,
        MarketplaceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        MarketplaceError::Store(StoreError::Conflict) => StatusCode::CONFLICT,
        MarketplaceError::Store(StoreError::Unavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = Json(json!({ "error": error.to_string() }));
    (status, body).into_response()
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, MarketplaceError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(MarketplaceError::Identity(IdentityError::MissingCredential))
}

fn authenticated<S, I>(
    service: &MarketplaceService<S, I>,
    headers: &HeaderMap,
) -> Result<Actor, Response>
where
    S: MarketplaceStore + 'static,
    I: IdentityProvider + 'static,
{
    let token = bearer_token(headers).map_err(error_response)?;
    service.authenticate(token).map_err(error_response)
}

pub(crate) async fn register_handler<S, I>(
    State(service): State<Arc<MarketplaceService<S, I>>>,
    headers: HeaderMap,
    Json(registration): Json<Registration>,
) -> Response
where
    S: MarketplaceStore + 'static,
    I: IdentityProvider + 'static,
{
    let auth = match bearer_token(&headers).and_then(|token| service.identify(token)) {
        Ok(auth) => auth,
        Err(err) => return error_response(err),
    };

    match service.register(&auth, registration) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn profile_handler<S, I>(
    State(service): State<Arc<MarketplaceService<S, I>>>,
    Path(actor_id): Path<String>,
) -> Response
where
    S: MarketplaceStore + 'static,
    I: IdentityProvider + 'static,
{
    match service.profile(&ActorId(actor_id)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_profile_handler<S, I>(
    State(service): State<Arc<MarketplaceService<S, I>>>,
    headers: HeaderMap,
    Json(patch): Json<ProfilePatch>,
) -> Response
where
    S: MarketplaceStore + 'static,
    I: IdentityProvider + 'static,
{
    let actor = match authenticated(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.update_profile(&actor, patch) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn browse_jobs_handler<S, I>(
    State(service): State<Arc<MarketplaceService<S, I>>>,
    Query(filter): Query<JobFilter>,
) -> Response
where
    S: MarketplaceStore + 'static,
    I: IdentityProvider + 'static,
{
    match service.browse_jobs(&filter) {
        Ok(jobs) => (StatusCode::OK, Json(jobs)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn post_job_handler<S, I>(
    State(service): State<Arc<MarketplaceService<S, I>>>,
    headers: HeaderMap,
    Json(draft): Json<JobDraft>,
) -> Response
where
    S: MarketplaceStore + 'static,
    I: IdentityProvider + 'static,
{
    let actor = match authenticated(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.post_job(&actor, draft) {
        Ok(job) => (StatusCode::CREATED, Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn my_jobs_handler<S, I>(
    State(service): State<Arc<MarketplaceService<S, I>>>,
    headers: HeaderMap,
) -> Response
where
    S: MarketplaceStore + 'static,
    I: IdentityProvider + 'static,
{
    let actor = match authenticated(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.jobs_for_client(&actor) {
        Ok(jobs) => (StatusCode::OK, Json(jobs)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn job_handler<S, I>(
    State(service): State<Arc<MarketplaceService<S, I>>>,
    Path(job_id): Path<String>,
) -> Response
where
    S: MarketplaceStore + 'static,
    I: IdentityProvider + 'static,
{
    match service.job(&JobId(job_id)) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_job_handler<S, I>(
    State(service): State<Arc<MarketplaceService<S, I>>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Response
where
    S: MarketplaceStore + 'static,
    I: IdentityProvider + 'static,
{
    let actor = match authenticated(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.delete_job(&actor, &JobId(job_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_proposal_handler<S, I>(
    State(service): State<Arc<MarketplaceService<S, I>>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
    Json(submission): Json<ProposalSubmission>,
) -> Response
where
    S: MarketplaceStore + 'static,
    I: IdentityProvider + 'static,
{
    let actor = match authenticated(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.submit_proposal(&actor, &JobId(job_id), submission) {
        Ok(proposal) => (StatusCode::CREATED, Json(proposal)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_proposals_handler<S, I>(
    State(service): State<Arc<MarketplaceService<S, I>>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Response
where
    S: MarketplaceStore + 'static,
    I: IdentityProvider + 'static,
{
    let actor = match authenticated(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.proposals_for_owner(&actor, &JobId(job_id)) {
        Ok(proposals) => (StatusCode::OK, Json(proposals)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn accept_proposal_handler<S, I>(
    State(service): State<Arc<MarketplaceService<S, I>>>,
    headers: HeaderMap,
    Path((job_id, proposal_id)): Path<(String, String)>,
) -> Response
where
    S: MarketplaceStore + 'static,
    I: IdentityProvider + 'static,
{
    let actor = match authenticated(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.accept_proposal(&actor, &JobId(job_id), &ProposalId(proposal_id)) {
        Ok(proposal) => (StatusCode::OK, Json(proposal)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn complete_job_handler<S, I>(
    State(service): State<Arc<MarketplaceService<S, I>>>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Response
where
    S: MarketplaceStore + 'static,
    I: IdentityProvider + 'static,
{
    let actor = match authenticated(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.mark_completed(&actor, &JobId(job_id)) {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn my_proposals_handler<S, I>(
    State(service): State<Arc<MarketplaceService<S, I>>>,
    headers: HeaderMap,
) -> Response
where
    S: MarketplaceStore + 'static,
    I: IdentityProvider + 'static,
{
    let actor = match authenticated(&service, &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };

    match service.my_proposals(&actor) {
        Ok(proposals) => (StatusCode::OK, Json(proposals)).into_response(),
        Err(err) => error_response(err),
    }
}
