//! Integration tests for the wizard / intro / consent REST surface.
//!
//! Each test spins up an Axum server on a random port and exercises the
//! real HTTP contract with reqwest.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;

use kibble_wizard::config::{ReentryPolicy, WizardConfig};
use kibble_wizard::routes::{AppState, app_routes};
use kibble_wizard::store::{FlagStore, Flags, LibSqlFlagStore};

/// Start an Axum server on a random port, return (base url, flags).
async fn start_server() -> (String, Flags) {
    start_server_with(WizardConfig::default()).await
}

async fn start_server_with(config: WizardConfig) -> (String, Flags) {
    let store: Arc<dyn FlagStore> = Arc::new(LibSqlFlagStore::new_memory().await.unwrap());
    let flags = Flags::new(store);
    let state = AppState::new(flags.clone(), config).await;
    let app = app_routes(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://127.0.0.1:{port}"), flags)
}

async fn post(client: &reqwest::Client, url: String, body: Value) -> (u16, Value) {
    let resp = client.post(url).json(&body).send().await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let (base, _) = start_server().await;
    let body: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn pet_step_round_trip_over_http() {
    let (base, _) = start_server().await;
    let client = reqwest::Client::new();

    let status: Value = reqwest::get(format!("{base}/api/wizard"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["step"], "landing");

    let (_, body) = post(&client, format!("{base}/api/wizard/next"), json!({})).await;
    assert_eq!(body["status"]["step"], "pet");

    // Blocked without answers
    let (_, body) = post(&client, format!("{base}/api/wizard/next"), json!({})).await;
    assert_eq!(body["outcome"]["outcome"], "blocked");
    assert_eq!(body["status"]["step"], "pet");

    let (code, body) = post(
        &client,
        format!("{base}/api/wizard/answers"),
        json!({"step": "pet", "species": "Dog", "lifeStage": "Adult", "weight": "26-50 lb"}),
    )
    .await;
    assert_eq!(code, 200);
    assert_eq!(body["can_advance"], true);

    let (_, body) = post(&client, format!("{base}/api/wizard/next"), json!({})).await;
    assert_eq!(body["status"]["step"], "diet");

    let (_, body) = post(&client, format!("{base}/api/wizard/back"), json!({})).await;
    assert_eq!(body["step"], "pet");
    assert_eq!(body["draft"]["species"], "Dog");
    assert_eq!(body["draft"]["lifeStage"], "Adult");
    assert_eq!(body["draft"]["weight"], "26-50 lb");
}

#[tokio::test]
async fn answers_for_other_step_conflict() {
    let (base, _) = start_server().await;
    let client = reqwest::Client::new();

    let (code, body) = post(
        &client,
        format!("{base}/api/wizard/answers"),
        json!({"step": "shopping", "budget": "$150+"}),
    )
    .await;
    assert_eq!(code, 409);
    assert!(body["error"].as_str().unwrap().contains("landing"));
}

/// Walk from landing past the pet step so the diet step is on screen.
async fn walk_to_diet(client: &reqwest::Client, base: &str) {
    post(client, format!("{base}/api/wizard/next"), json!({})).await;
    post(
        client,
        format!("{base}/api/wizard/answers"),
        json!({"step": "pet", "species": "Dog", "lifeStage": "Puppy/Kitten", "weight": "11-25 lb"}),
    )
    .await;
    let (_, body) = post(client, format!("{base}/api/wizard/next"), json!({})).await;
    assert_eq!(body["status"]["step"], "diet");
}

#[tokio::test]
async fn toggles_enforce_selection_rules() {
    let (base, _) = start_server().await;
    let client = reqwest::Client::new();
    walk_to_diet(&client, &base).await;

    for tag in ["Chicken", "Corn", "None"] {
        post(&client, format!("{base}/api/wizard/toggle/ingredient"), json!({"tag": tag})).await;
    }
    let (_, body) = post(
        &client,
        format!("{base}/api/wizard/toggle/ingredient"),
        json!({"tag": "Soy"}),
    )
    .await;
    assert_eq!(body["status"]["draft"]["avoidIngredients"], json!(["Soy"]));

    let (_, body) = post(&client, format!("{base}/api/wizard/next"), json!({})).await;
    assert_eq!(body["status"]["step"], "goals");

    for tag in ["Organic", "Grain-free"] {
        post(&client, format!("{base}/api/wizard/toggle/priority"), json!({"tag": tag})).await;
    }
    let (_, body) = post(
        &client,
        format!("{base}/api/wizard/toggle/priority"),
        json!({"tag": "Local"}),
    )
    .await;
    assert_eq!(body["toggle"], "rejected");
    assert_eq!(body["status"]["draft"]["priorities"], json!(["Organic", "Grain-free"]));
}

#[tokio::test]
async fn toggles_off_their_step_conflict() {
    let (base, _) = start_server().await;
    let client = reqwest::Client::new();

    let (code, body) = post(
        &client,
        format!("{base}/api/wizard/toggle/ingredient"),
        json!({"tag": "Chicken"}),
    )
    .await;
    assert_eq!(code, 409);
    assert_eq!(body["toggle"], "not_on_screen");
    assert_eq!(body["status"]["draft"]["avoidIngredients"], json!([]));

    walk_to_diet(&client, &base).await;
    let (code, body) = post(
        &client,
        format!("{base}/api/wizard/toggle/priority"),
        json!({"tag": "Organic"}),
    )
    .await;
    assert_eq!(code, 409);
    assert_eq!(body["status"]["draft"]["priorities"], json!([]));
}

#[tokio::test]
async fn answers_apply_selection_rules_to_tag_sets() {
    let (base, _) = start_server().await;
    let client = reqwest::Client::new();
    walk_to_diet(&client, &base).await;

    let (code, body) = post(
        &client,
        format!("{base}/api/wizard/answers"),
        json!({"step": "diet", "avoidIngredients": ["None", "Chicken", "Chicken"]}),
    )
    .await;
    assert_eq!(code, 200);
    assert_eq!(body["draft"]["avoidIngredients"], json!(["Chicken"]));

    post(&client, format!("{base}/api/wizard/next"), json!({})).await;
    let (code, body) = post(
        &client,
        format!("{base}/api/wizard/answers"),
        json!({"step": "goals", "priorities": ["A", "B", "C"]}),
    )
    .await;
    assert_eq!(code, 422);
    assert!(body["error"].as_str().unwrap().contains("at most 2"));

    let status: Value = reqwest::get(format!("{base}/api/wizard"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["step"], "goals");
    assert_eq!(status["draft"]["priorities"], json!([]));
}

#[tokio::test]
async fn completing_wizard_publishes_results() {
    let (base, _) = start_server().await;
    let client = reqwest::Client::new();

    let missing = reqwest::get(format!("{base}/api/results")).await.unwrap();
    assert_eq!(missing.status().as_u16(), 404);

    post(&client, format!("{base}/api/wizard/next"), json!({})).await;
    post(
        &client,
        format!("{base}/api/wizard/answers"),
        json!({"step": "pet", "species": "Cat", "lifeStage": "Senior", "weight": "0-10 lb"}),
    )
    .await;
    for _ in 0..4 {
        post(&client, format!("{base}/api/wizard/next"), json!({})).await;
    }
    post(
        &client,
        format!("{base}/api/wizard/answers"),
        json!({"step": "openness", "zipCode": "02139"}),
    )
    .await;

    let (_, body) = post(&client, format!("{base}/api/wizard/next"), json!({})).await;
    assert_eq!(body["outcome"]["outcome"], "handed_off");

    let results: Value = reqwest::get(format!("{base}/api/results"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(results["species"], "Cat");
    assert_eq!(results["zipCode"], "02139");
}

#[tokio::test]
async fn fresh_reentry_refuses_stale_answers() {
    let config = WizardConfig {
        reentry: ReentryPolicy::StartFresh,
        ..Default::default()
    };
    let (base, _) = start_server_with(config).await;
    let client = reqwest::Client::new();

    walk_to_diet(&client, &base).await;
    for _ in 0..3 {
        post(&client, format!("{base}/api/wizard/next"), json!({})).await;
    }
    let (_, body) = post(&client, format!("{base}/api/wizard/next"), json!({})).await;
    assert_eq!(body["outcome"]["outcome"], "handed_off");

    let (code, body) = post(
        &client,
        format!("{base}/api/wizard/answers"),
        json!({"step": "openness", "zipCode": "10001"}),
    )
    .await;
    assert_eq!(code, 409);
    assert!(body["error"].as_str().unwrap().contains("landing"));

    let status: Value = reqwest::get(format!("{base}/api/wizard"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["step"], "landing");
    assert_eq!(status["handed_off"], false);
    assert_eq!(status["draft"]["species"], Value::Null);
}

#[tokio::test]
async fn intro_skip_persists_flag() {
    let (base, flags) = start_server().await;
    let client = reqwest::Client::new();

    let body: Value = reqwest::get(format!("{base}/api/intro"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["state"], "playing");
    assert_eq!(body["overlay_visible"], true);

    let (_, body) = post(&client, format!("{base}/api/intro/event"), json!({"event": "skip"})).await;
    assert_eq!(body["state"], "shown");
    assert_eq!(body["content_visible"], true);
    assert_eq!(flags.get_bool("intro-video-seen").await, Some(true));
}

#[tokio::test]
async fn intro_natural_end_finishes_after_exit_animation() {
    let (base, _) = start_server().await;
    let client = reqwest::Client::new();

    let (_, body) = post(&client, format!("{base}/api/intro/event"), json!({"event": "ended"})).await;
    assert_eq!(body["state"], "transitioning");

    tokio::time::sleep(Duration::from_millis(900)).await;
    let body: Value = reqwest::get(format!("{base}/api/intro"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["state"], "shown");
}

#[tokio::test]
async fn consent_banner_hides_after_answer() {
    let (base, _) = start_server().await;
    let client = reqwest::Client::new();

    let body: Value = reqwest::get(format!("{base}/api/consent"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["show_banner"], true);

    let (code, body) = post(&client, format!("{base}/api/consent"), json!({"accepted": true})).await;
    assert_eq!(code, 200);
    assert_eq!(body["record"]["accepted"], true);

    let body: Value = reqwest::get(format!("{base}/api/consent"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["show_banner"], false);
}
