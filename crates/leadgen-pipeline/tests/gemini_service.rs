//! End-to-end session against a wiremock Gemini server.

use std::sync::Arc;

use leadgen_core::{to_csv, AppConfig, Environment, LeadStatus};
use leadgen_pipeline::{Banner, GeminiLeadService, Orchestrator, PipelineError, SearchParams};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DISCOVERY_PATH: &str = "/v1beta/models/discovery-model:generateContent";
const ENRICH_PATH: &str = "/v1beta/models/enrich-model:generateContent";

fn test_config(base_url: &str) -> AppConfig {
    AppConfig {
        env: Environment::Test,
        log_level: "debug".to_string(),
        gemini_api_key: "test-key".to_string(),
        gemini_base_url: base_url.to_string(),
        discovery_model: "discovery-model".to_string(),
        enrichment_model: "enrich-model".to_string(),
        request_timeout_secs: 5,
        enrich_batch_size: 3,
        discovery_limit: 10,
        default_latitude: 45.76,
        default_longitude: 4.84,
    }
}

fn orchestrator(config: &AppConfig) -> Orchestrator {
    let service = GeminiLeadService::from_config(config).expect("service should build");
    Orchestrator::new(Arc::new(service), config.enrich_batch_size)
}

fn params() -> SearchParams {
    SearchParams::new("bakeries", "Lyon").unwrap()
}

async fn mount_discovery(server: &MockServer) {
    let body = json!({
        "candidates": [{
            "content": {"parts": [{"text": "Here are some bakeries."}]},
            "groundingMetadata": {"groundingChunks": [
                {"maps": {"title": "Boulangerie Paul", "address": "1 Rue A, Lyon", "placeId": "p1", "uri": "https://maps.google.com/?cid=1"}},
                {"maps": {"title": "Maison Pralus", "placeId": "p2", "uri": "https://maps.google.com/?cid=2"}}
            ]}
        }]
    });
    Mock::given(method("POST"))
        .and(path(DISCOVERY_PATH))
        .and(body_partial_json(json!({
            "toolConfig": {"retrievalConfig": {"latLng": {"latitude": 45.76, "longitude": 4.84}}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn search_enrich_and_export_round_trip() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;

    let reply = "```json\n{\"website\":\"https://bakery.example\",\"phone\":\"04 78 00 00 00\",\"email\":\"NOT_FOUND\",\"owner\":\"Jean Dupont\"}\n```";
    Mock::given(method("POST"))
        .and(path(ENRICH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": reply}]}}]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let orch = orchestrator(&config);

    assert_eq!(orch.search(&params()).await.unwrap(), 2);
    let view = orch.snapshot();
    assert_eq!(view.leads()[1].address, "Address unavailable");

    let report = orch.enrich_all().await.unwrap();
    assert_eq!(report.batch_sizes, vec![2]);
    assert_eq!(report.completed, 2);

    let view = orch.snapshot();
    for lead in view.leads() {
        assert_eq!(lead.status, LeadStatus::Completed);
        assert_eq!(lead.phone.as_deref(), Some("04 78 00 00 00"));
        assert_eq!(lead.owner.as_deref(), Some("Jean Dupont"));
        assert!(lead.email.is_none());
    }

    let csv = to_csv(view.leads());
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("\"Boulangerie Paul\",\"1 Rue A, Lyon\",\"04 78 00 00 00\",\"\",\"https://bakery.example\",\"Jean Dupont\",\"completed\",\"https://maps.google.com/?cid=1\""));
}

#[tokio::test]
async fn failed_enrichment_can_be_retried() {
    let server = MockServer::start().await;
    mount_discovery(&server).await;

    Mock::given(method("POST"))
        .and(path(ENRICH_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ENRICH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "{\"phone\":\"555-0100\"}"}]}}]
        })))
        .mount(&server)
        .await;

    let orch = orchestrator(&test_config(&server.uri()));
    orch.search(&params()).await.unwrap();

    let report = orch.enrich_all().await.unwrap();
    assert_eq!(report.failed, 2);
    let view = orch.snapshot();
    assert_eq!(view.count_with_status(LeadStatus::Failed), 2);
    assert!(view.controls().can_enrich_all);

    let id = view.leads()[0].id;
    assert_eq!(
        orch.retry(id).await,
        leadgen_pipeline::EnrichOutcome::Completed
    );
    let view = orch.snapshot();
    let lead = view.lead(id).unwrap();
    assert_eq!(lead.phone.as_deref(), Some("555-0100"));
    assert!(lead.notes.is_none());
}

#[tokio::test]
async fn discovery_auth_failure_sets_error_banner() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DISCOVERY_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "API key not valid.", "status": "PERMISSION_DENIED"}
        })))
        .mount(&server)
        .await;

    let orch = orchestrator(&test_config(&server.uri()));
    let err = orch.search(&params()).await.unwrap_err();
    assert!(matches!(err, PipelineError::Discovery(_)));

    let view = orch.snapshot();
    assert!(view.leads().is_empty());
    assert_eq!(view.banner(), Some(Banner::SearchFailed));
}
