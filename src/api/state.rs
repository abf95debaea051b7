use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult, CONNECT_FAILURE_MESSAGE};
use crate::models::Destination;
use crate::services::{SearchForm, SuggestionService};

/// Which page the client should be showing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Home,
    Destinations,
}

/// Lifecycle of one result slot
///
/// `Idle → Loading → Loaded | Failed`, then `Loading` again on the next
/// attempt. A failed attempt keeps whatever was showing before it.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchState {
    #[default]
    Idle,
    Loading {
        #[serde(skip)]
        previous: Vec<Destination>,
    },
    Loaded {
        destinations: Vec<Destination>,
        loaded_at: DateTime<Utc>,
    },
    Failed {
        error: String,
        destinations: Vec<Destination>,
    },
}

impl FetchState {
    /// Starts an attempt; only one may be outstanding per slot
    pub fn begin(&mut self) -> AppResult<()> {
        let previous = match std::mem::take(self) {
            FetchState::Loading { previous } => {
                *self = FetchState::Loading { previous };
                return Err(AppError::Busy(
                    "A request for these results is already in progress".to_string(),
                ));
            }
            FetchState::Idle => Vec::new(),
            FetchState::Loaded { destinations, .. } | FetchState::Failed { destinations, .. } => {
                destinations
            }
        };

        *self = FetchState::Loading { previous };
        Ok(())
    }

    pub fn succeed(&mut self, destinations: Vec<Destination>) {
        *self = FetchState::Loaded {
            destinations,
            loaded_at: Utc::now(),
        };
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        let destinations = std::mem::take(self).into_destinations();
        *self = FetchState::Failed {
            error: error.into(),
            destinations,
        };
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading { .. })
    }

    /// Results a client should render in this state
    pub fn destinations(&self) -> &[Destination] {
        match self {
            FetchState::Idle | FetchState::Loading { .. } => &[],
            FetchState::Loaded { destinations, .. } | FetchState::Failed { destinations, .. } => {
                destinations
            }
        }
    }

    fn into_destinations(self) -> Vec<Destination> {
        match self {
            FetchState::Idle => Vec::new(),
            FetchState::Loading { previous } => previous,
            FetchState::Loaded { destinations, .. } | FetchState::Failed { destinations, .. } => {
                destinations
            }
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<RwLock<AppStateInner>>,
    pub suggestions: Arc<SuggestionService>,
}

/// Inner state that can be modified
#[derive(Debug, Clone, Serialize, Default)]
pub struct AppStateInner {
    pub view: View,
    pub form: SearchForm,
    pub suggestions: FetchState,
    pub trending: FetchState,
}

impl AppState {
    /// Creates a fresh state around the given suggestion service
    pub fn new(suggestions: Arc<SuggestionService>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(AppStateInner::default())),
            suggestions,
        }
    }
}

/// Fetches the trending list into its slot
///
/// Run once at startup alongside the server. Failures are logged and leave
/// the slot in `Failed`; they never reach a caller.
pub async fn load_trending(state: AppState) {
    if let Err(e) = state.inner.write().await.trending.begin() {
        tracing::debug!(error = %e, "Trending fetch already running");
        return;
    }

    let result = state.suggestions.fetch_trending().await;

    let mut inner = state.inner.write().await;
    match result {
        Ok(destinations) => inner.trending.succeed(destinations),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch trending destinations");
            inner.trending.fail(CONNECT_FAILURE_MESSAGE);
        }
    }
}
