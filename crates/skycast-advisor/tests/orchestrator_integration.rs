//! Integration tests for the recommendation chain using wiremock.
//!
//! One mock server stands in for the agent platform, another for the
//! text-generation API. Call counts are checked by `expect` when the
//! servers drop.

use std::time::Duration;

use skycast_advisor::{
    build_client, BriefingGenerator, FallbackTextGenerator, Orchestrator, RecommendationSource,
};
use skycast_core::Config;
use skycast_weather::WeatherSnapshot;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-pro:generateContent";

fn config_for(primary: &MockServer, secondary: &MockServer) -> Config {
    let mut config = Config::default();
    config.primary.base_url = primary.uri();
    config.primary.api_key = "primary-key".to_string();
    config.secondary.base_url = secondary.uri();
    config.secondary.api_key = "secondary-key".to_string();
    config.http.request_timeout_secs = 1;
    config
}

fn snapshot(name: &str, temp: f64, description: &str) -> WeatherSnapshot {
    serde_json::from_value(serde_json::json!({
        "coord": { "lon": 2.35, "lat": 48.85 },
        "name": name,
        "main": { "temp": temp, "feels_like": temp + 2.0, "humidity": 20, "pressure": 1015 },
        "weather": [{ "id": 800, "description": description, "main": "Clear", "icon": "01d" }],
        "wind": { "speed": 3, "deg": 90 }
    }))
    .unwrap()
}

fn paris() -> WeatherSnapshot {
    serde_json::from_value(serde_json::json!({
        "name": "Paris",
        "main": { "temp": 32, "feels_like": 34, "humidity": 20 },
        "weather": [{ "description": "clear sky", "main": "Clear" }],
        "wind": { "speed": 3 }
    }))
    .unwrap()
}

async fn mount_environment(server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/v2/environment"))
        .and(header("x-api-key", "primary-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "env-1"})))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_agent(server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/v2/agent"))
        .and(body_partial_json(serde_json::json!({"environment_id": "env-1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"agent_id": "agent-1"})),
        )
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_tool(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/v2/tool"))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_json(serde_json::json!({"tool_ids": ["tool-1"]})),
        )
        .mount(server)
        .await;
}

async fn mount_chat(server: &MockServer, answer: &str) {
    Mock::given(method("POST"))
        .and(path("/v2/chat"))
        .and(body_partial_json(serde_json::json!({
            "agent_id": "agent-1",
            "user_id": "skycast_user"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"response": answer})),
        )
        .mount(server)
        .await;
}

async fn mount_generate(server: &MockServer, template: ResponseTemplate, expected: u64) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("authorization", "Bearer secondary-key"))
        .respond_with(template)
        .expect(expected)
        .mount(server)
        .await;
}

fn generated(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    }))
}

#[tokio::test]
async fn test_primary_success_skips_secondary() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    mount_environment(&primary, 1).await;
    mount_agent(&primary, 1).await;
    mount_tool(&primary, 200).await;
    mount_chat(&primary, "Wear linen and drink water").await;
    mount_generate(&secondary, generated("unused"), 0).await;

    let orchestrator = Orchestrator::from_config(&config_for(&primary, &secondary)).unwrap();
    let rec = orchestrator.recommend(&paris()).await;

    assert_eq!(rec.text, "Wear linen and drink water");
    assert_eq!(rec.source, RecommendationSource::Provider("primary"));
}

#[tokio::test]
async fn test_chat_message_carries_digest_and_session_key() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    mount_environment(&primary, 1).await;
    mount_agent(&primary, 1).await;
    mount_tool(&primary, 200).await;
    Mock::given(method("POST"))
        .and(path("/v2/chat"))
        .and(body_partial_json(serde_json::json!({
            "session_id": "session_Paris",
            "message": "Analyze the current weather in Paris and provide recommendations:\nTemperature: 32°C\nFeels like: 34°C\nConditions: clear sky\nHumidity: 20%\nWind: 3 m/s"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"response": "ok"})),
        )
        .expect(1)
        .mount(&primary)
        .await;

    let orchestrator = Orchestrator::from_config(&config_for(&primary, &secondary)).unwrap();
    assert_eq!(orchestrator.get_recommendations(&paris()).await, "ok");
}

#[tokio::test]
async fn test_primary_failure_uses_secondary() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/environment"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&primary)
        .await;
    mount_generate(&secondary, generated("Secondary says: sunscreen"), 1).await;

    let orchestrator = Orchestrator::from_config(&config_for(&primary, &secondary)).unwrap();
    let rec = orchestrator.recommend(&paris()).await;

    assert_eq!(rec.text, "Secondary says: sunscreen");
    assert_eq!(rec.source, RecommendationSource::Provider("secondary"));
}

#[tokio::test]
async fn test_full_fallthrough_matches_fallback_text() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/environment"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&primary)
        .await;
    mount_generate(&secondary, ResponseTemplate::new(500), 1).await;

    let weather = snapshot("Berlin", 12.4, "overcast clouds");
    let orchestrator = Orchestrator::from_config(&config_for(&primary, &secondary)).unwrap();
    let rec = orchestrator.recommend(&weather).await;

    assert_eq!(rec.source, RecommendationSource::Fallback);
    assert_eq!(rec.text, FallbackTextGenerator::new().generate(&weather));
}

#[tokio::test]
async fn test_paris_example_with_providers_down() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/environment"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&primary)
        .await;
    mount_generate(&secondary, ResponseTemplate::new(500), 1).await;

    let orchestrator = Orchestrator::from_config(&config_for(&primary, &secondary)).unwrap();
    let text = orchestrator.get_recommendations(&paris()).await;

    assert!(text.contains("Paris"));
    assert!(text.contains("32"));
    assert!(text.contains("clear sky"));
}

#[tokio::test]
async fn test_session_is_reused_across_requests() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    mount_environment(&primary, 1).await;
    mount_agent(&primary, 1).await;
    mount_tool(&primary, 200).await;
    mount_chat(&primary, "advice").await;
    mount_generate(&secondary, generated("unused"), 0).await;

    let orchestrator = Orchestrator::from_config(&config_for(&primary, &secondary)).unwrap();

    let first = orchestrator.get_recommendations(&paris()).await;
    let second = orchestrator
        .get_recommendations(&snapshot("Madrid", 28.0, "few clouds"))
        .await;

    assert_eq!(first, "advice");
    assert_eq!(second, "advice");
}

#[tokio::test]
async fn test_partial_session_resumes_at_agent_creation() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    mount_environment(&primary, 1).await;
    // First agent attempt fails, the second succeeds.
    Mock::given(method("POST"))
        .and(path("/v2/agent"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&primary)
        .await;
    mount_agent(&primary, 1).await;
    mount_tool(&primary, 200).await;
    mount_chat(&primary, "primary advice").await;
    mount_generate(&secondary, generated("secondary advice"), 1).await;

    let orchestrator = Orchestrator::from_config(&config_for(&primary, &secondary)).unwrap();

    let first = orchestrator.recommend(&paris()).await;
    assert_eq!(first.text, "secondary advice");
    assert_eq!(first.source, RecommendationSource::Provider("secondary"));

    let second = orchestrator.recommend(&paris()).await;
    assert_eq!(second.text, "primary advice");
    assert_eq!(second.source, RecommendationSource::Provider("primary"));
}

#[tokio::test]
async fn test_tool_failure_is_not_fatal() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    mount_environment(&primary, 1).await;
    mount_agent(&primary, 1).await;
    mount_tool(&primary, 500).await;
    mount_chat(&primary, "still works").await;
    mount_generate(&secondary, generated("unused"), 0).await;

    let orchestrator = Orchestrator::from_config(&config_for(&primary, &secondary)).unwrap();
    let rec = orchestrator.recommend(&paris()).await;

    assert_eq!(rec.text, "still works");
    assert_eq!(rec.source, RecommendationSource::Provider("primary"));
}

#[tokio::test]
async fn test_malformed_and_slow_providers_never_escape() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    mount_environment(&primary, 1).await;
    mount_agent(&primary, 1).await;
    mount_tool(&primary, 200).await;
    Mock::given(method("POST"))
        .and(path("/v2/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&primary)
        .await;
    mount_generate(
        &secondary,
        generated("too late").set_delay(Duration::from_secs(3)),
        1,
    )
    .await;

    let weather = paris();
    let orchestrator = Orchestrator::from_config(&config_for(&primary, &secondary)).unwrap();
    let rec = orchestrator.recommend(&weather).await;

    assert_eq!(rec.source, RecommendationSource::Fallback);
    assert!(!rec.text.is_empty());
}

#[tokio::test]
async fn test_empty_answers_fall_through() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    mount_environment(&primary, 1).await;
    mount_agent(&primary, 1).await;
    mount_tool(&primary, 200).await;
    mount_chat(&primary, "   ").await;
    mount_generate(&secondary, generated(""), 1).await;

    let orchestrator = Orchestrator::from_config(&config_for(&primary, &secondary)).unwrap();
    let text = orchestrator.get_recommendations(&paris()).await;

    assert_eq!(text, FallbackTextGenerator::new().generate(&paris()));
}

#[tokio::test]
async fn test_unreachable_providers_use_fallback() {
    // Bind and drop servers so their ports refuse connections.
    let (primary_uri, secondary_uri) = {
        let primary = MockServer::start().await;
        let secondary = MockServer::start().await;
        (primary.uri(), secondary.uri())
    };

    let mut config = Config::default();
    config.primary.base_url = primary_uri;
    config.secondary.base_url = secondary_uri;
    config.http.request_timeout_secs = 1;

    let orchestrator = Orchestrator::from_config(&config).unwrap();
    let rec = orchestrator.recommend(&paris()).await;

    assert_eq!(rec.source, RecommendationSource::Fallback);
    assert!(rec.text.contains("Paris"));
}

#[tokio::test]
async fn test_concurrent_first_requests_share_setup() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/environment"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"id": "env-1"}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&primary)
        .await;
    mount_agent(&primary, 1).await;
    mount_tool(&primary, 200).await;
    mount_chat(&primary, "shared").await;
    mount_generate(&secondary, generated("unused"), 0).await;

    let orchestrator = Orchestrator::from_config(&config_for(&primary, &secondary)).unwrap();
    let paris = paris();
    let rome = snapshot("Rome", 24.0, "clear sky");

    let (a, b) = tokio::join!(
        orchestrator.get_recommendations(&paris),
        orchestrator.get_recommendations(&rome),
    );

    assert_eq!(a, "shared");
    assert_eq!(b, "shared");
}

#[tokio::test]
async fn test_briefing_and_recommendations_share_one_client() {
    let primary = MockServer::start().await;
    let secondary = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/environment"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&primary)
        .await;
    mount_generate(&secondary, generated("from the shared client"), 2).await;

    let config = config_for(&primary, &secondary);
    let client = build_client(config.http.request_timeout()).unwrap();
    let briefing = BriefingGenerator::from_client(client.clone(), &config);
    let orchestrator = Orchestrator::from_client(client, &config);
    let weather = paris();

    let b = briefing.generate("Paris", &weather).await.unwrap();
    let rec = orchestrator.recommend(&weather).await;

    assert_eq!(b.text, "from the shared client");
    assert_eq!(rec.text, "from the shared client");
    assert_eq!(rec.source, RecommendationSource::Provider("secondary"));
}
