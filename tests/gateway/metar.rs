use crate::support::{config_for, spawn_gateway};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KJFK: &str = "KJFK 181751Z 31012KT 10SM FEW250 12/M03 A3012 RMK AO2\n";
const BBOX: &str = "40.55507246376812,-74.14492753623189,40.844927536231886,-73.85507246376811";

#[tokio::test]
async fn station_code_is_tried_first_and_returned_verbatim() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/data/metar"))
        .and(query_param("ids", "KJFK"))
        .respond_with(ResponseTemplate::new(200).set_body_string(KJFK))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&upstream)
        .await;

    let base = spawn_gateway(&config_for(&upstream)).await;
    let resp = reqwest::get(format!("{base}/api/metar?q=kjfk")).await.unwrap();

    assert_eq!(resp.status(), 200);
    assert!(
        resp.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );
    assert_eq!(resp.text().await.unwrap(), KJFK);
    upstream.verify().await;
}

#[tokio::test]
async fn place_names_fall_back_to_geocoded_bounding_box() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "New York"))
        .and(query_param("format", "json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"lat": "40.7", "lon": "-74.0", "display_name": "New York"}])),
        )
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/data/metar"))
        .and(query_param("bbox", BBOX))
        .respond_with(ResponseTemplate::new(200).set_body_string(KJFK))
        .expect(1)
        .mount(&upstream)
        .await;

    let base = spawn_gateway(&config_for(&upstream)).await;
    let resp = reqwest::get(format!("{base}/api/metar?q=New%20York")).await.unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), KJFK);
    upstream.verify().await;
}

#[tokio::test]
async fn failing_station_code_falls_back_to_box_around_geocode() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/data/metar"))
        .and(query_param("ids", "KXYZ"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "KXYZ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"lat": "40.0", "lon": "-75.0"}])))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/data/metar"))
        .and(query_param(
            "bbox",
            "39.85507246376812,-75.14492753623189,40.14492753623188,-74.85507246376811",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(KJFK))
        .expect(1)
        .mount(&upstream)
        .await;

    let base = spawn_gateway(&config_for(&upstream)).await;
    let resp = reqwest::get(format!("{base}/api/metar?q=KXYZ")).await.unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), KJFK);

    let order: Vec<String> = upstream
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(order, ["/api/data/metar", "/search", "/api/data/metar"]);
    upstream.verify().await;
}

#[tokio::test]
async fn unknown_station_with_failed_geocode_is_404() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/data/metar"))
        .and(query_param("ids", "KXYZ"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&upstream)
        .await;

    let base = spawn_gateway(&config_for(&upstream)).await;
    let resp = reqwest::get(format!("{base}/api/metar?q=KXYZ")).await.unwrap();

    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "No METAR found for “KXYZ”");
}

#[tokio::test]
async fn missing_query_is_400() {
    let upstream = MockServer::start().await;
    let base = spawn_gateway(&config_for(&upstream)).await;

    let resp = reqwest::get(format!("{base}/api/metar")).await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Missing `q` parameter");
    assert!(upstream.received_requests().await.unwrap().is_empty());
}
