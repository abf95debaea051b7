use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult, CONNECT_FAILURE_MESSAGE},
    middleware::request_id::RequestId,
    models::{Budget, Destination, SearchCriteria, Vibe},
    services::{FormEdits, SearchForm},
};

use super::state::{AppStateInner, FetchState, View};
use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SetViewRequest {
    pub view: View,
}

#[derive(Debug, Serialize)]
pub struct BudgetRange {
    pub min: u32,
    pub max: u32,
    pub step: u32,
    pub default: u32,
}

#[derive(Debug, Serialize)]
pub struct SearchOptionsResponse {
    pub vibes: Vec<Vibe>,
    pub budget: BudgetRange,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Full snapshot of the client-facing state
pub async fn get_state(State(state): State<AppState>) -> Json<AppStateInner> {
    let inner = state.inner.read().await;
    Json(inner.clone())
}

/// Switch the current view
pub async fn set_view(
    State(state): State<AppState>,
    Json(request): Json<SetViewRequest>,
) -> Json<Value> {
    let mut inner = state.inner.write().await;
    inner.view = request.view;
    Json(json!({ "view": inner.view }))
}

/// Vibes and budget bounds the form accepts
pub async fn get_search_options() -> Json<SearchOptionsResponse> {
    Json(SearchOptionsResponse {
        vibes: Vibe::ALL.to_vec(),
        budget: BudgetRange {
            min: Budget::MIN,
            max: Budget::MAX,
            step: Budget::STEP,
            default: Budget::DEFAULT,
        },
    })
}

/// Current form fields and busy flag
pub async fn get_form(State(state): State<AppState>) -> Json<SearchForm> {
    let inner = state.inner.read().await;
    Json(inner.form.clone())
}

/// Edit form fields without submitting
pub async fn update_form(
    State(state): State<AppState>,
    Json(edits): Json<FormEdits>,
) -> AppResult<Json<SearchForm>> {
    let mut inner = state.inner.write().await;
    inner.form.apply(edits)?;
    Ok(Json(inner.form.clone()))
}

/// Apply optional edits, submit the form and fetch personalized suggestions
///
/// Rejected with 409 while a previous submission is still outstanding; no
/// second request is made in that case. The fetch runs in its own task so a
/// client that disconnects mid-request still leaves the form settled.
pub async fn search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(edits): Json<FormEdits>,
) -> AppResult<Json<Vec<Destination>>> {
    let criteria = {
        let mut inner = state.inner.write().await;
        inner.form.apply(edits)?;
        let criteria = inner.form.submit()?;
        if let Err(e) = inner.suggestions.begin() {
            inner.form.settle();
            return Err(e);
        }
        inner.view = View::Home;
        criteria
    };

    tracing::info!(
        request_id = %request_id,
        origin = %criteria.origin,
        budget = criteria.budget.value(),
        vibe = %criteria.vibe,
        "Processing search request"
    );

    let destinations = tokio::spawn(run_search(state, criteria, request_id))
        .await
        .map_err(|e| AppError::Internal(format!("Search task failed: {}", e)))??;

    Ok(Json(destinations))
}

/// Fetches suggestions and settles the form and result slot
async fn run_search(
    state: AppState,
    criteria: SearchCriteria,
    request_id: RequestId,
) -> AppResult<Vec<Destination>> {
    let result = state.suggestions.fetch_personalized(&criteria).await;

    let mut inner = state.inner.write().await;
    inner.form.settle();
    match result {
        Ok(destinations) => {
            inner.suggestions.succeed(destinations.clone());
            tracing::info!(
                request_id = %request_id,
                results = destinations.len(),
                "Search completed"
            );
            Ok(destinations)
        }
        Err(e) => {
            inner.suggestions.fail(CONNECT_FAILURE_MESSAGE);
            let kept = inner.suggestions.destinations().len();
            if e.is_upstream() {
                tracing::error!(request_id = %request_id, error = %e, kept, "Search failed");
            } else {
                tracing::warn!(request_id = %request_id, error = %e, kept, "Search failed");
            }
            Err(e)
        }
    }
}

/// Personalized results slot
pub async fn get_suggestions(State(state): State<AppState>) -> Json<FetchState> {
    let inner = state.inner.read().await;
    Json(inner.suggestions.clone())
}

/// Trending results slot
pub async fn get_trending(State(state): State<AppState>) -> Json<FetchState> {
    let inner = state.inner.read().await;
    Json(inner.trending.clone())
}
