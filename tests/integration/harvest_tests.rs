//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the Seoul OpenAPI and exercise the
//! HTTP transport and full harvest runs end-to-end.

use seoul_catalog_harvester::api::{CatalogQuery, PageRequest};
use seoul_catalog_harvester::config::HarvestConfig;
use seoul_catalog_harvester::{
    HarvestError, HarvestPlan, Harvester, HttpTransport, RetryPolicy, Transport,
};
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "test-key";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, out_dir: &Path) -> HarvestConfig {
    let mut config = HarvestConfig::default();
    config.api.base_url = base_url.to_string();
    config.http.timeout_secs = 5;
    config.http.retries = 3;
    config.http.retry_delay_secs = 0.0;
    config.paging.delay_secs = 0.0;
    config.output.dir = out_dir.to_path_buf();
    config
}

fn transport() -> HttpTransport {
    HttpTransport::with_client(reqwest::Client::new(), RetryPolicy::new(3, Duration::ZERO))
}

fn success(service: &str, total: u64, rows: Value) -> Value {
    json!({
        service: {
            "list_total_count": total,
            "RESULT": {"CODE": "INFO-000", "MESSAGE": "정상 처리되었습니다"},
            "row": rows,
        }
    })
}

fn read_jsonl(path: &Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .expect("Failed to read JSONL output")
        .lines()
        .map(|line| serde_json::from_str(line).expect("Invalid JSONL line"))
        .collect()
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .expect("Request recording is disabled")
        .len()
}

#[tokio::test]
async fn test_transport_retries_until_success() {
    let mock_server = MockServer::start().await;
    let api = create_test_config(&mock_server.uri(), Path::new("unused")).api;
    let request = PageRequest::catalog(&api, KEY, 1, 1000, &CatalogQuery::default());

    // First two attempts fail
    Mock::given(method("GET"))
        .and(path("/test-key/json/SearchCatalogService/1/1000/"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/test-key/json/SearchCatalogService/1/1000/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(
            "SearchCatalogService",
            1,
            json!([{"INF_ID": "OA-1"}]),
        )))
        .mount(&mock_server)
        .await;

    let document = transport().get_json(&request).await.expect("Fetch failed");

    assert_eq!(document["SearchCatalogService"]["row"][0]["INF_ID"], "OA-1");
    assert_eq!(request_count(&mock_server).await, 3);
}

#[tokio::test]
async fn test_transport_gives_up_after_max_attempts() {
    let mock_server = MockServer::start().await;
    let api = create_test_config(&mock_server.uri(), Path::new("unused")).api;
    let request = PageRequest::catalog(&api, KEY, 1, 1000, &CatalogQuery::default());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let err = transport().get_json(&request).await.unwrap_err();

    match err {
        HarvestError::Transport { url, attempts, source } => {
            assert_eq!(attempts, 3);
            assert!(url.ends_with("/json/SearchCatalogService/1/1000/"));
            assert!(!url.contains(KEY), "API key leaked into error: {}", url);
            assert_eq!(source.status(), Some(reqwest::StatusCode::SERVICE_UNAVAILABLE));
        }
        other => panic!("Expected transport error, got {:?}", other),
    }
    assert_eq!(request_count(&mock_server).await, 3);
}

#[tokio::test]
async fn test_transport_retries_undecodable_body() {
    let mock_server = MockServer::start().await;
    let api = create_test_config(&mock_server.uri(), Path::new("unused")).api;
    let request = PageRequest::catalog(&api, KEY, 1, 1000, &CatalogQuery::default());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let err = transport().get_json(&request).await.unwrap_err();

    assert!(matches!(err, HarvestError::Transport { attempts: 3, .. }));
    assert!(!err.to_string().contains(KEY));
}

#[tokio::test]
async fn test_full_harvest_with_io_params() {
    let mock_server = MockServer::start().await;
    let out_dir = tempfile::tempdir().expect("Failed to create temp dir");

    // Catalog in two pages of two rows
    Mock::given(method("GET"))
        .and(path("/test-key/json/SearchCatalogService/1/2/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(
            "SearchCatalogService",
            3,
            json!([
                {"INF_ID": "OA-110", "INF_NM": "서울시 자치구 정보"},
                {"INF_ID": "OA-220", "INF_NM": "지하철 승하차 인원"},
            ]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/test-key/json/SearchCatalogService/3/4/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(
            "SearchCatalogService",
            3,
            json!({"INF_NM": "중복 항목", "URL": "http://data.seoul.go.kr/dataList/OA-110/S/1/datasetView.do"}),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    // OA-110 has IO params, OA-220 reports an error
    Mock::given(method("GET"))
        .and(path("/test-key/json/SearchOpenAPIIOValueService/1/200/OA-110/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(
            "SearchOpenAPIIOValueService",
            2,
            json!([
                {"IN_OUT": "IN", "NM": "KEY", "DESC": "인증키"},
                {"IN_OUT": "OUT", "NM": "GU_NM", "DESC": "자치구명"},
            ]),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/test-key/json/SearchOpenAPIIOValueService/1/200/OA-220/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "RESULT": {"CODE": "ERROR-500", "MESSAGE": "서버 오류입니다."}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), out_dir.path());
    config.paging.catalog_page_size = 2;

    let harvester = Harvester::new(config, KEY).expect("Failed to create harvester");
    let plan = HarvestPlan {
        with_io: true,
        ..HarvestPlan::default()
    };
    let summary = harvester.run(&plan).await.expect("Harvest failed");

    assert_eq!(summary.catalog_rows, 3);
    assert_eq!(summary.service_ids_found, 2);
    assert_eq!(summary.services_queried, 2);
    assert_eq!(summary.services_with_io, 1);
    assert_eq!(summary.io_rows, 2);
    assert_eq!(summary.files.len(), 4);

    // Catalog JSONL keeps order and Korean text
    let catalog = read_jsonl(&out_dir.path().join("seoul_catalog.jsonl"));
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog[0]["INF_NM"], "서울시 자치구 정보");
    assert_eq!(catalog[2]["INF_NM"], "중복 항목");

    // Catalog CSV header is the sorted key union
    let mut reader = csv::Reader::from_path(out_dir.path().join("seoul_catalog.csv"))
        .expect("Failed to open catalog CSV");
    let headers: Vec<String> = reader
        .headers()
        .expect("Missing CSV header")
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(headers, vec!["INF_ID", "INF_NM", "URL"]);
    assert_eq!(reader.records().count(), 3);

    // IO params are tagged with their service
    let io = read_jsonl(&out_dir.path().join("seoul_io_params.jsonl"));
    assert_eq!(io.len(), 2);
    assert!(io.iter().all(|row| row["_service_id"] == "OA-110"));
    assert_eq!(io[1]["DESC"], "자치구명");

    let io_csv = std::fs::read_to_string(out_dir.path().join("seoul_io_params.csv"))
        .expect("Failed to read IO CSV");
    assert!(io_csv.starts_with("DESC,IN_OUT,NM,_service_id"));
}

#[tokio::test]
async fn test_catalog_api_error_writes_no_files() {
    let mock_server = MockServer::start().await;
    let out_dir = tempfile::tempdir().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "RESULT": {"CODE": "INFO-100", "MESSAGE": "인증키가 유효하지 않습니다."}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), out_dir.path());
    let harvester = Harvester::new(config, KEY).expect("Failed to create harvester");

    let err = harvester.run(&HarvestPlan::default()).await.unwrap_err();

    match err {
        HarvestError::Api { code, message, url } => {
            assert_eq!(code, "INFO-100");
            assert_eq!(message, "인증키가 유효하지 않습니다.");
            assert!(url.contains("SearchCatalogService/1/1000/"));
        }
        other => panic!("Expected API error, got {:?}", other),
    }
    assert!(!out_dir.path().join("seoul_catalog.jsonl").exists());
    assert!(!out_dir.path().join("seoul_catalog.csv").exists());
}

#[tokio::test]
async fn test_keyword_filter_reaches_upstream() {
    let mock_server = MockServer::start().await;
    let out_dir = tempfile::tempdir().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path(
            "/test-key/json/SearchCatalogService/1/1000//%ED%86%B5%EA%B3%84/",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(
            "SearchCatalogService",
            1,
            json!({"INF_ID": "OA-15", "INF_NM": "인구 통계"}),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), out_dir.path());
    let harvester = Harvester::new(config, KEY).expect("Failed to create harvester");
    let plan = HarvestPlan {
        query: CatalogQuery {
            service_filter: None,
            keyword: Some("통계".to_string()),
        },
        ..HarvestPlan::default()
    };

    let summary = harvester.run(&plan).await.expect("Harvest failed");
    assert_eq!(summary.catalog_rows, 1);
}

#[tokio::test]
async fn test_io_transport_failure_policy() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test-key/json/SearchCatalogService/1/1000/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(
            "SearchCatalogService",
            2,
            json!([{"INF_ID": "OA-1"}, {"INF_ID": "OA-2"}]),
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/test-key/json/SearchOpenAPIIOValueService/1/200/OA-1/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/test-key/json/SearchOpenAPIIOValueService/1/200/OA-2/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(
            "SearchOpenAPIIOValueService",
            1,
            json!({"IN_OUT": "OUT", "NM": "VAL"}),
        )))
        .mount(&mock_server)
        .await;

    // Default: transport failure ends the run
    let strict_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let harvester = Harvester::new(create_test_config(&mock_server.uri(), strict_dir.path()), KEY)
        .expect("Failed to create harvester");
    let plan = HarvestPlan {
        with_io: true,
        ..HarvestPlan::default()
    };
    let err = harvester.run(&plan).await.unwrap_err();
    assert!(matches!(err, HarvestError::Transport { attempts: 3, .. }));
    assert!(strict_dir.path().join("seoul_catalog.jsonl").exists());
    assert!(!strict_dir.path().join("seoul_io_params.jsonl").exists());

    // Opt-in: the failing service contributes nothing
    let lenient_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let harvester = Harvester::new(create_test_config(&mock_server.uri(), lenient_dir.path()), KEY)
        .expect("Failed to create harvester");
    let plan = HarvestPlan {
        with_io: true,
        skip_failed_io: true,
        ..HarvestPlan::default()
    };
    let summary = harvester.run(&plan).await.expect("Harvest failed");
    assert_eq!(summary.services_with_io, 1);
    assert_eq!(summary.io_rows, 1);

    let io = read_jsonl(&lenient_dir.path().join("seoul_io_params.jsonl"));
    assert_eq!(io[0]["_service_id"], "OA-2");
}
