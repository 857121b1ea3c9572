// tests/api_tests.rs

use axum::{body::Body, http::Request};
use quiz_engine::{
    config::Config,
    quiz::QuestionBank,
    routes,
    state::AppState,
    utils::jwt::sign_jwt,
};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "test_secret_for_integration_tests";

fn test_config(answer_timeout_secs: i64) -> Config {
    Config {
        jwt_secret: SECRET.to_string(),
        questions_file: "unused.json".into(),
        answer_timeout_secs,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        rust_log: "error".to_string(),
    }
}

fn test_state(answer_timeout_secs: i64) -> AppState {
    let bank = QuestionBank::from_json(
        &json!([
            {"question": "Capital of France?", "choices": ["Paris", "Lyon"], "answer": 0},
            {"question": "Red planet?", "choices": ["Venus", "Mars", "Jupiter"], "answer": 1}
        ])
        .to_string(),
    )
    .unwrap();
    AppState::new(bank, test_config(answer_timeout_secs))
}

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app_with(state: AppState) -> String {
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn spawn_app() -> String {
    spawn_app_with(test_state(90)).await
}

fn token_for(user_id: u64) -> String {
    sign_jwt(user_id, SECRET, 600).unwrap()
}

async fn post(client: &reqwest::Client, url: String, token: &str, body: Option<Value>) -> reqwest::Response {
    let mut request = client.post(url).bearer_auth(token);
    if let Some(body) = body {
        request = request.json(&body);
    }
    request.send().await.expect("Failed to execute request")
}

#[tokio::test]
async fn health_check_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn quiz_routes_require_token() {
    let app = routes::create_router(test_state(90));

    let response = app
        .clone()
        .oneshot(
            Request::post("/api/quiz/start")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let response = app
        .oneshot(
            Request::post("/api/quiz/start")
                .header("Authorization", "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn bank_info_is_public() {
    let address = spawn_app().await;
    let body: Value = reqwest::get(format!("{}/api/quiz/bank", address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["question_count"], 2);
}

#[tokio::test]
async fn next_without_session_conflicts() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = token_for(1);

    let response = post(&client, format!("{}/api/quiz/next", address), &token, None).await;
    assert_eq!(response.status().as_u16(), 409);

    let score: Value = client
        .get(format!("{}/api/quiz/score", address))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(score["score"], 0);
    assert_eq!(score["active"], false);
}

#[tokio::test]
async fn full_round_flow() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = token_for(1001);

    let response = post(&client, format!("{}/api/quiz/start", address), &token, None).await;
    assert_eq!(response.status().as_u16(), 200);

    let mut answered = 0;
    loop {
        let body: Value = post(&client, format!("{}/api/quiz/next", address), &token, None)
            .await
            .json()
            .await
            .unwrap();

        if body["finished"] == true {
            assert_eq!(body["final_score"], 1);
            break;
        }

        let question = &body["question"];
        assert!(question.get("correct_index").is_none());
        let index = question["index"].as_u64().unwrap();

        // Second request before answering is refused.
        let blocked = post(&client, format!("{}/api/quiz/next", address), &token, None).await;
        assert_eq!(blocked.status().as_u16(), 409);

        // Always pick the first choice: right for France, wrong for Mars.
        let selected = 0;
        let answer: Value = post(
            &client,
            format!("{}/api/quiz/answer", address),
            &token,
            Some(json!({"question_index": index, "selected_index": selected})),
        )
        .await
        .json()
        .await
        .unwrap();

        if index == 0 {
            assert_eq!(answer["correct"], true);
        } else {
            assert_eq!(answer["correct"], false);
            assert!(answer["message"].as_str().unwrap().contains("Mars"));
        }
        answered += 1;
    }

    assert_eq!(answered, 2);

    // Exhaustion ended the session.
    let stop: Value = post(&client, format!("{}/api/quiz/stop", address), &token, None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(stop["final_score"], 0);
}

#[tokio::test]
async fn answer_for_other_question_is_rejected() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = token_for(2002);

    post(&client, format!("{}/api/quiz/start", address), &token, None).await;
    let body: Value = post(&client, format!("{}/api/quiz/next", address), &token, None)
        .await
        .json()
        .await
        .unwrap();
    let index = body["question"]["index"].as_u64().unwrap();
    let other = 1 - index;

    let response = post(
        &client,
        format!("{}/api/quiz/answer", address),
        &token,
        Some(json!({"question_index": other, "selected_index": 0})),
    )
    .await;
    assert_eq!(response.status().as_u16(), 409);

    // The real question is still answerable.
    let response = post(
        &client,
        format!("{}/api/quiz/answer", address),
        &token,
        Some(json!({"question_index": index, "selected_index": 0})),
    )
    .await;
    assert_eq!(response.status().as_u16(), 200);

    // And only once.
    let response = post(
        &client,
        format!("{}/api/quiz/answer", address),
        &token,
        Some(json!({"question_index": index, "selected_index": 0})),
    )
    .await;
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn negative_indexes_fail_validation() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = token_for(3003);

    post(&client, format!("{}/api/quiz/start", address), &token, None).await;
    let response = post(
        &client,
        format!("{}/api/quiz/answer", address),
        &token,
        Some(json!({"question_index": -1, "selected_index": 0})),
    )
    .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn expired_question_unblocks_next() {
    let address = spawn_app_with(test_state(1)).await;
    let client = reqwest::Client::new();
    let token = token_for(4004);

    post(&client, format!("{}/api/quiz/start", address), &token, None).await;
    let first: Value = post(&client, format!("{}/api/quiz/next", address), &token, None)
        .await
        .json()
        .await
        .unwrap();
    let index = first["question"]["index"].as_u64().unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let late = post(
        &client,
        format!("{}/api/quiz/answer", address),
        &token,
        Some(json!({"question_index": index, "selected_index": 0})),
    )
    .await;
    assert_eq!(late.status().as_u16(), 409);

    let next = post(&client, format!("{}/api/quiz/next", address), &token, None).await;
    assert_eq!(next.status().as_u16(), 200);
}

#[tokio::test]
async fn stop_twice_and_restart() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = token_for(5005);

    post(&client, format!("{}/api/quiz/start", address), &token, None).await;
    let body: Value = post(&client, format!("{}/api/quiz/next", address), &token, None)
        .await
        .json()
        .await
        .unwrap();
    let index = body["question"]["index"].as_u64().unwrap();
    let correct = if index == 0 { 0 } else { 1 };
    let answer: Value = post(
        &client,
        format!("{}/api/quiz/answer", address),
        &token,
        Some(json!({"question_index": index, "selected_index": correct})),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(answer["score"], 1);

    let stop: Value = post(&client, format!("{}/api/quiz/stop", address), &token, None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(stop["final_score"], 1);

    let stop: Value = post(&client, format!("{}/api/quiz/stop", address), &token, None)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(stop["final_score"], 0);

    // Answering after stop is a no-op report, not a failure.
    let answer: Value = post(
        &client,
        format!("{}/api/quiz/answer", address),
        &token,
        Some(json!({"question_index": index, "selected_index": correct})),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(answer["correct"], false);
    assert_eq!(answer["score"], 0);
}

#[tokio::test]
async fn restart_discards_pending_question() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = token_for(6006);

    post(&client, format!("{}/api/quiz/start", address), &token, None).await;
    let first = post(&client, format!("{}/api/quiz/next", address), &token, None).await;
    assert_eq!(first.status().as_u16(), 200);

    post(&client, format!("{}/api/quiz/start", address), &token, None).await;
    let next = post(&client, format!("{}/api/quiz/next", address), &token, None).await;
    assert_eq!(next.status().as_u16(), 200);
}

#[tokio::test]
async fn stop_discards_pending_question() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = token_for(7007);

    post(&client, format!("{}/api/quiz/start", address), &token, None).await;
    let first = post(&client, format!("{}/api/quiz/next", address), &token, None).await;
    assert_eq!(first.status().as_u16(), 200);

    post(&client, format!("{}/api/quiz/stop", address), &token, None).await;
    post(&client, format!("{}/api/quiz/start", address), &token, None).await;
    let next = post(&client, format!("{}/api/quiz/next", address), &token, None).await;
    assert_eq!(next.status().as_u16(), 200);
}

#[tokio::test]
async fn concurrent_next_issues_one_question() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let token = token_for(8008);

    post(&client, format!("{}/api/quiz/start", address), &token, None).await;

    let requests = (0..8).map(|_| {
        let client = client.clone();
        let url = format!("{}/api/quiz/next", address);
        let token = token.clone();
        tokio::spawn(async move { post(&client, url, &token, None).await.status().as_u16() })
    });

    let mut issued = 0;
    for request in requests.collect::<Vec<_>>() {
        if request.await.unwrap() == 200 {
            issued += 1;
        }
    }
    assert_eq!(issued, 1);
}

#[tokio::test]
async fn valid_token_reaches_handler() {
    let app = routes::create_router(test_state(90));

    let response = app
        .oneshot(
            Request::post("/api/quiz/start")
                .header("Authorization", format!("Bearer {}", token_for(9009)))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}
