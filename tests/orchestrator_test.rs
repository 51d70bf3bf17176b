mod common;

use common::{
    body_json, function_call_chunk, sse_response, text_chunk, BodyContains, BodyNotContains,
    GEMINI_STREAM_PATH,
};
use product_agent::catalog::{open_store, StoreConfig};
use product_agent::llm::{GeminiClient, GeminiModel};
use product_agent::{AppError, Orchestrator, USER_QUERY};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TABLE_PATH: &str = "/rest/v1/grainger_products";

/// Gemini asks for a faucet search first, then answers once it sees a result
async fn mount_model(server: &MockServer, final_text: &str) {
    Mock::given(method("POST"))
        .and(path(GEMINI_STREAM_PATH))
        .and(BodyNotContains("functionResponse"))
        .respond_with(sse_response(&[function_call_chunk(
            "search_products",
            json!({"category": "faucet", "max_price": 200}),
        )]))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(GEMINI_STREAM_PATH))
        .and(BodyContains("functionResponse"))
        .respond_with(sse_response(&[text_chunk(final_text, true)]))
        .mount(server)
        .await;
}

async fn mount_store(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .respond_with(response)
        .mount(server)
        .await;
}

fn orchestrator(model: &MockServer, store: &MockServer) -> Orchestrator {
    let provider = GeminiClient::new("test-key", GeminiModel::Gemini25Flash)
        .expect("client")
        .with_base_url(model.uri());
    let store = open_store(&StoreConfig::new(
        Some(store.uri()),
        Some("anon-key".to_string()),
    ))
    .expect("store");

    Orchestrator::with_store(Box::new(provider), store).expect("orchestrator")
}

/// The `response` object of the function response in the second model call
async fn function_response(model: &MockServer) -> Value {
    let requests = model.received_requests().await.expect("recorded requests");
    assert_eq!(requests.len(), 2);

    let body = body_json(&requests[1]);
    let contents = body["contents"].as_array().expect("contents");
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["parts"][0]["text"], USER_QUERY);
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[1]["parts"][0]["functionCall"]["name"], "search_products");

    let response = &contents[2]["parts"][0]["functionResponse"];
    assert_eq!(response["name"], "search_products");
    response["response"].clone()
}

#[tokio::test]
async fn two_matching_products_reach_the_model() {
    let model = MockServer::start().await;
    let store = MockServer::start().await;
    mount_model(&model, "The Widespread Faucet at $50 fits your budget.").await;
    mount_store(
        &store,
        ResponseTemplate::new(200).set_body_json(json!([
            {"Product": "Widespread Faucet", "Prices": 50, "Grainger URL": "https://www.grainger.com/product/A1"},
            {"Product": "Pull-Down Faucet", "Prices": 150, "Grainger URL": "https://www.grainger.com/product/A2"}
        ])),
    )
    .await;

    let answer = orchestrator(&model, &store)
        .answer(USER_QUERY)
        .await
        .expect("answer");
    assert_eq!(answer, "The Widespread Faucet at $50 fits your budget.");

    let result = function_response(&model).await;
    assert_eq!(
        result["result"],
        "Product: Widespread Faucet | Price: $50 | Link: https://www.grainger.com/product/A1\n\
         Product: Pull-Down Faucet | Price: $150 | Link: https://www.grainger.com/product/A2"
    );
}

#[tokio::test]
async fn empty_catalog_returns_sentinel_to_model() {
    let model = MockServer::start().await;
    let store = MockServer::start().await;
    mount_model(&model, "I could not find a faucet under $200.").await;
    mount_store(&store, ResponseTemplate::new(200).set_body_json(json!([]))).await;

    let answer = orchestrator(&model, &store)
        .answer(USER_QUERY)
        .await
        .expect("answer");
    assert_eq!(answer, "I could not find a faucet under $200.");

    let result = function_response(&model).await;
    assert_eq!(result["result"], "No products found within that budget.");
}

#[tokio::test]
async fn store_failure_is_reported_as_text() {
    let model = MockServer::start().await;
    let store = MockServer::start().await;
    mount_model(&model, "The catalog is unavailable right now.").await;
    mount_store(
        &store,
        ResponseTemplate::new(500).set_body_json(json!({"message": "upstream timeout"})),
    )
    .await;

    let answer = orchestrator(&model, &store)
        .answer(USER_QUERY)
        .await
        .expect("answer");
    assert_eq!(answer, "The catalog is unavailable right now.");

    let result = function_response(&model).await;
    let text = result["result"].as_str().expect("text result");
    assert!(text.starts_with("Database Error: "), "{}", text);
    assert!(text.contains("upstream timeout"));
}

#[tokio::test]
async fn model_failure_is_remote_call_error() {
    let model = MockServer::start().await;
    let store = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GEMINI_STREAM_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&model)
        .await;

    let err = orchestrator(&model, &store)
        .answer(USER_QUERY)
        .await
        .unwrap_err();
    assert!(matches!(&err, AppError::RemoteCall(msg) if msg.contains("503")));
    assert!(store.received_requests().await.expect("recorded").is_empty());
}
