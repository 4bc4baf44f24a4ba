use crate::support::{config_for, spawn_gateway};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POLYLINE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

async fn mount_plans(upstream: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/search/plans"))
        .and(query_param("fromICAO", "KJFK"))
        .and(query_param("toICAO", "KLAX"))
        .and(query_param("limit", "1"))
        .respond_with(response)
        .mount(upstream)
        .await;
}

#[tokio::test]
async fn first_plan_polyline_is_returned() {
    let upstream = MockServer::start().await;
    mount_plans(
        &upstream,
        ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "fromICAO": "KJFK", "toICAO": "KLAX", "encodedPolyline": POLYLINE},
            {"id": 2, "fromICAO": "KJFK", "toICAO": "KLAX", "encodedPolyline": "ignored"}
        ])),
    )
    .await;

    let base = spawn_gateway(&config_for(&upstream)).await;
    let resp = reqwest::get(format!("{base}/api/plan?fromICAO=kjfk&toICAO=KLAX"))
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"encodedPolyline": POLYLINE}));
}

#[tokio::test]
async fn decode_flag_adds_points() {
    let upstream = MockServer::start().await;
    mount_plans(
        &upstream,
        ResponseTemplate::new(200).set_body_json(json!([{"encodedPolyline": POLYLINE}])),
    )
    .await;

    let base = spawn_gateway(&config_for(&upstream)).await;
    let resp = reqwest::get(format!("{base}/api/plan?fromICAO=KJFK&toICAO=KLAX&decode=true"))
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body["points"],
        json!([[38.5, -120.2], [40.7, -120.95], [43.252, -126.453]])
    );
}

#[tokio::test]
async fn empty_result_is_404_naming_both_airports() {
    let upstream = MockServer::start().await;
    mount_plans(&upstream, ResponseTemplate::new(200).set_body_json(json!([]))).await;

    let base = spawn_gateway(&config_for(&upstream)).await;
    let resp = reqwest::get(format!("{base}/api/plan?fromICAO=KJFK&toICAO=KLAX"))
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No flight plans found from KJFK to KLAX");
}

#[tokio::test]
async fn upstream_failure_status_is_mirrored() {
    let upstream = MockServer::start().await;
    mount_plans(&upstream, ResponseTemplate::new(503).set_body_string("maintenance")).await;

    let base = spawn_gateway(&config_for(&upstream)).await;
    let resp = reqwest::get(format!("{base}/api/plan?fromICAO=KJFK&toICAO=KLAX"))
        .await
        .unwrap();

    assert_eq!(resp.status(), 503);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("maintenance"));
}

#[tokio::test]
async fn missing_destination_is_400() {
    let upstream = MockServer::start().await;
    let base = spawn_gateway(&config_for(&upstream)).await;

    let resp = reqwest::get(format!("{base}/api/plan?fromICAO=KJFK")).await.unwrap();
    assert_eq!(resp.status(), 400);
    assert!(upstream.received_requests().await.unwrap().is_empty());
}
