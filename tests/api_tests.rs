use std::future::IntoFuture;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json, Router};
use axum_test::TestServer;
use serde_json::{json, Value};
use tokio::sync::Notify;

use voyage_api::api::{create_router, load_trending, AppState};
use voyage_api::services::decoration::{PERSONALIZED_POOL, TRENDING_POOL};
use voyage_api::services::{providers::GeminiProvider, SuggestionService};

const CONNECT_FAILURE: &str =
    "We couldn't connect to our travel database. Please try again in a moment.";

/// Canned behavior of the fake Gemini endpoint
#[derive(Clone)]
enum Reply {
    /// 200 with this text as the single candidate part
    Text(String),
    /// Non-success status
    Status(u16),
}

#[derive(Clone)]
struct Upstream {
    reply: Arc<Mutex<Reply>>,
    calls: Arc<AtomicUsize>,
    last_body: Arc<Mutex<Option<Value>>>,
    last_key: Arc<Mutex<Option<String>>>,
    /// When set, replies wait until the gate is notified
    gate: Arc<Mutex<Option<Arc<Notify>>>>,
}

impl Upstream {
    fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    /// Holds every following reply until the returned gate is notified
    fn hold_replies(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_prompt(&self) -> String {
        self.last_body.lock().unwrap().as_ref().unwrap()["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

async fn fake_generate_content(
    State(upstream): State<Upstream>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    upstream.calls.fetch_add(1, Ordering::SeqCst);
    *upstream.last_body.lock().unwrap() = Some(body);
    *upstream.last_key.lock().unwrap() = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let gate = upstream.gate.lock().unwrap().clone();
    if let Some(gate) = gate {
        gate.notified().await;
    }

    let reply = upstream.reply.lock().unwrap().clone();
    match reply {
        Reply::Text(text) => (
            StatusCode::OK,
            Json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": text }] },
                    "finishReason": "STOP"
                }]
            })),
        ),
        Reply::Status(code) => (
            StatusCode::from_u16(code).unwrap(),
            Json(json!({ "error": { "code": code, "message": "upstream failure" } })),
        ),
    }
}

/// Starts a fake Gemini API on an ephemeral port
async fn spawn_upstream(reply: Reply) -> (String, Upstream) {
    let upstream = Upstream {
        reply: Arc::new(Mutex::new(reply)),
        calls: Arc::new(AtomicUsize::new(0)),
        last_body: Arc::new(Mutex::new(None)),
        last_key: Arc::new(Mutex::new(None)),
        gate: Arc::new(Mutex::new(None)),
    };

    let app = Router::new()
        .fallback(fake_generate_content)
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), upstream)
}

fn destinations_text(count: usize) -> String {
    let items: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("d{}", i),
                "city": format!("City {}", i),
                "country": "Somewhere",
                "vibe": "Tropical",
                "weather": { "temp": 27.5, "condition": "Sunny" },
                "priceEstimate": 1900,
                "description": "Beaches",
                "topAttractions": ["Beach", "Market"]
            })
        })
        .collect();
    serde_json::to_string(&items).unwrap()
}

/// Polls `check` until it holds, failing the test after two seconds
async fn wait_until(check: impl Fn() -> bool) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

fn form_busy(state: &AppState) -> Option<bool> {
    state.inner.try_read().ok().map(|inner| inner.form.is_busy())
}

async fn create_test_server(reply: Reply) -> (TestServer, AppState, Upstream) {
    let (url, upstream) = spawn_upstream(reply).await;
    let provider = GeminiProvider::new(
        "test_key".to_string(),
        url,
        "gemini-3-flash-preview".to_string(),
    );
    let state = AppState::new(Arc::new(SuggestionService::new(Arc::new(provider))));
    let server = TestServer::new(create_router(state.clone())).unwrap();
    (server, state, upstream)
}

#[tokio::test]
async fn test_health_check() {
    let (server, _, _) = create_test_server(Reply::Text("[]".to_string())).await;
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_echoed() {
    let (server, _, _) = create_test_server(Reply::Text("[]".to_string())).await;
    let response = server.get("/health").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_form_defaults_and_edit() {
    let (server, _, _) = create_test_server(Reply::Text("[]".to_string())).await;

    let form: Value = server.get("/api/v1/form").await.json();
    assert_eq!(
        form,
        json!({ "origin": "New York City", "budget": 2000, "vibe": "Tropical", "busy": false })
    );

    let response = server
        .patch("/api/v1/form")
        .json(&json!({ "origin": "Seattle", "vibe": "Snowy", "budget": 3500 }))
        .await;
    response.assert_status_ok();
    let form: Value = response.json();
    assert_eq!(form["origin"], "Seattle");
    assert_eq!(form["vibe"], "Snowy");
    assert_eq!(form["budget"], 3500);
}

#[tokio::test]
async fn test_form_rejects_out_of_range_budget() {
    let (server, _, _) = create_test_server(Reply::Text("[]".to_string())).await;

    let response = server
        .patch("/api/v1/form")
        .json(&json!({ "origin": "Seattle", "budget": 450 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let form: Value = server.get("/api/v1/form").await.json();
    assert_eq!(form["origin"], "New York City");
    assert_eq!(form["budget"], 2000);
}

#[tokio::test]
async fn test_options_lists_vibes_and_budget_range() {
    let (server, _, _) = create_test_server(Reply::Text("[]".to_string())).await;

    let options: Value = server.get("/api/v1/options").await.json();
    assert_eq!(
        options["vibes"],
        json!([
            "Tropical",
            "Snowy",
            "Urban/City",
            "Nature/Mountains",
            "Historic/Cultural",
            "Adventure"
        ])
    );
    assert_eq!(
        options["budget"],
        json!({ "min": 500, "max": 10000, "step": 100, "default": 2000 })
    );
}

#[tokio::test]
async fn test_search_makes_one_request_and_decorates() {
    let (server, _, upstream) = create_test_server(Reply::Text(destinations_text(5))).await;

    let response = server.post("/api/v1/search").json(&json!({})).await;
    response.assert_status_ok();

    let destinations: Vec<Value> = response.json();
    assert_eq!(destinations.len(), 5);
    for (i, destination) in destinations.iter().enumerate() {
        assert_eq!(destination["imageUrl"], PERSONALIZED_POOL.image_for(i));
    }
    assert_eq!(destinations[0]["weather"]["temp"], 27.5);

    assert_eq!(upstream.calls(), 1);
    let prompt = upstream.last_prompt();
    assert!(prompt.contains("New York City"));
    assert!(prompt.contains("$2000"));
    assert!(prompt.contains("Tropical"));

    let body = upstream.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");
    assert_eq!(upstream.last_key.lock().unwrap().as_deref(), Some("test_key"));

    let form: Value = server.get("/api/v1/form").await.json();
    assert_eq!(form["busy"], false);

    let slot: Value = server.get("/api/v1/suggestions").await.json();
    assert_eq!(slot["status"], "loaded");
    assert_eq!(slot["destinations"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_search_applies_edits_before_submitting() {
    let (server, _, upstream) = create_test_server(Reply::Text("[]".to_string())).await;

    server
        .post("/api/v1/search")
        .json(&json!({ "origin": "Toronto", "budget": 8000, "vibe": "Historic/Cultural" }))
        .await
        .assert_status_ok();

    let prompt = upstream.last_prompt();
    assert!(prompt.contains("- Origin: Toronto"));
    assert!(prompt.contains("- Budget: $8000"));
    assert!(prompt.contains("- Vibe: Historic/Cultural"));

    // Submission does not reset the form
    let form: Value = server.get("/api/v1/form").await.json();
    assert_eq!(form["origin"], "Toronto");
}

#[tokio::test]
async fn test_search_switches_to_home_view() {
    let (server, _, _) = create_test_server(Reply::Text("[]".to_string())).await;

    server
        .put("/api/v1/view")
        .json(&json!({ "view": "destinations" }))
        .await
        .assert_status_ok();
    let snapshot: Value = server.get("/api/v1/state").await.json();
    assert_eq!(snapshot["view"], "destinations");

    server.post("/api/v1/search").json(&json!({})).await.assert_status_ok();

    let snapshot: Value = server.get("/api/v1/state").await.json();
    assert_eq!(snapshot["view"], "home");
}

#[tokio::test]
async fn test_unparsable_model_output_is_empty_list() {
    let (server, _, upstream) =
        create_test_server(Reply::Text("Sorry, I can't help with that.".to_string())).await;

    let response = server.post("/api/v1/search").json(&json!({})).await;
    response.assert_status_ok();
    let destinations: Vec<Value> = response.json();
    assert!(destinations.is_empty());
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let (server, _, upstream) = create_test_server(Reply::Text(destinations_text(2))).await;

    server.post("/api/v1/search").json(&json!({})).await.assert_status_ok();

    upstream.set_reply(Reply::Status(403));
    let response = server.post("/api/v1/search").json(&json!({})).await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(response.json::<Value>()["error"], CONNECT_FAILURE);
    assert_eq!(upstream.calls(), 2);

    // Previous results survive, the form is usable again
    let slot: Value = server.get("/api/v1/suggestions").await.json();
    assert_eq!(slot["status"], "failed");
    assert_eq!(slot["error"], CONNECT_FAILURE);
    assert_eq!(slot["destinations"].as_array().unwrap().len(), 2);

    let form: Value = server.get("/api/v1/form").await.json();
    assert_eq!(form["busy"], false);
}

#[tokio::test]
async fn test_search_while_busy_is_rejected() {
    let (server, state, upstream) = create_test_server(Reply::Text("[]".to_string())).await;

    // A submission from this form is still outstanding
    state.inner.write().await.form.submit().unwrap();

    let response = server.post("/api/v1/search").json(&json!({})).await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(upstream.calls(), 0);

    let form: Value = server.get("/api/v1/form").await.json();
    assert_eq!(form["busy"], true);
}

#[tokio::test]
async fn test_trending_loads_from_trending_pool() {
    let (server, state, upstream) = create_test_server(Reply::Text(destinations_text(6))).await;

    let slot: Value = server.get("/api/v1/trending").await.json();
    assert_eq!(slot["status"], "idle");

    load_trending(state).await;

    assert_eq!(upstream.calls(), 1);
    assert!(upstream.last_prompt().contains("Suggest 6 globally trending"));

    let slot: Value = server.get("/api/v1/trending").await.json();
    assert_eq!(slot["status"], "loaded");
    let destinations = slot["destinations"].as_array().unwrap();
    assert_eq!(destinations.len(), 6);
    assert_eq!(destinations[5]["imageUrl"], TRENDING_POOL.image_for(5));
}

#[tokio::test]
async fn test_trending_failure_is_recorded() {
    let (server, state, _) = create_test_server(Reply::Status(500)).await;

    load_trending(state).await;

    let slot: Value = server.get("/api/v1/trending").await.json();
    assert_eq!(slot["status"], "failed");
    assert!(slot["destinations"].as_array().unwrap().is_empty());

    // Personalized slot is untouched
    let slot: Value = server.get("/api/v1/suggestions").await.json();
    assert_eq!(slot["status"], "idle");
}

#[tokio::test]
async fn test_overlapping_searches_make_one_request() {
    let (server, state, upstream) = create_test_server(Reply::Text(destinations_text(4))).await;
    let gate = upstream.hold_replies();

    let first = server.post("/api/v1/search").json(&json!({})).into_future();
    let second = async {
        wait_until(|| upstream.calls() == 1).await;
        assert_eq!(form_busy(&state), Some(true));

        let response = server.post("/api/v1/search").json(&json!({})).await;
        response.assert_status(StatusCode::CONFLICT);

        gate.notify_one();
    };

    let (first_response, ()) = tokio::join!(first, second);
    first_response.assert_status_ok();
    assert_eq!(first_response.json::<Vec<Value>>().len(), 4);
    assert_eq!(upstream.calls(), 1);

    let form: Value = server.get("/api/v1/form").await.json();
    assert_eq!(form["busy"], false);
}

#[tokio::test]
async fn test_disconnected_search_still_settles() {
    let (server, state, upstream) = create_test_server(Reply::Text(destinations_text(3))).await;
    let gate = upstream.hold_replies();

    // Client gives up while the model call is outstanding
    let dropped = tokio::time::timeout(
        Duration::from_millis(100),
        server.post("/api/v1/search").json(&json!({})).into_future(),
    )
    .await;
    assert!(dropped.is_err());
    wait_until(|| upstream.calls() == 1).await;
    assert_eq!(form_busy(&state), Some(true));

    gate.notify_one();
    wait_until(|| form_busy(&state) == Some(false)).await;

    let slot: Value = server.get("/api/v1/suggestions").await.json();
    assert_eq!(slot["status"], "loaded");
    assert_eq!(slot["destinations"].as_array().unwrap().len(), 3);

    // The form accepts the next submission
    *upstream.gate.lock().unwrap() = None;
    let response = server.post("/api/v1/search").json(&json!({})).await;
    response.assert_status_ok();
    assert_eq!(upstream.calls(), 2);
}
