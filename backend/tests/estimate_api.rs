use axum::{
    body::{Body, to_bytes},
    http::Request,
};
use backend::{
    AppState,
    config::Config,
    create_router,
    models::{AssistantResponse, CityEntry, EstimateResponse},
};
use hyper::StatusCode;
use serde_json::{Value, json};
use shared::{DeliveryStage, DistanceSource};
use tower::ServiceExt;

fn test_app() -> axum::Router {
    create_router(AppState::new(Config::default()))
}

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

#[tokio::test]
async fn estimate_between_known_cities_uses_haversine() {
    let app = test_app();
    let payload = json!({
        "pickup": "São Paulo",
        "dropoff": "Rio de Janeiro",
        "base_fare": 10.0,
        "per_km_rate": 2.0,
        "payment": "card"
    });

    let response = app.oneshot(post_json("/api/estimate", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: EstimateResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.result.source, DistanceSource::Haversine);
    assert!((360.0..=362.0).contains(&body.result.distance_km));
    assert!((body.result.price - (10.0 + 2.0 * body.result.distance_km)).abs() < 1e-9);
    assert!(body.display.price.starts_with("R$ "));
    assert_eq!(
        body.stages,
        vec![DeliveryStage::Prep, DeliveryStage::Way, DeliveryStage::Near]
    );
}

#[tokio::test]
async fn estimate_falls_back_to_manual_distance() {
    let app = test_app();
    let payload = json!({
        "pickup": "Rua Augusta, 1500",
        "dropoff": "Av. Paulista, 900",
        "fallback_km": 5.0,
        "base_fare": 10.0,
        "per_km_rate": 2.0,
        "avg_speed_kmh": 25.0
    });

    let response = app.oneshot(post_json("/api/estimate", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: EstimateResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body.result.source, DistanceSource::Fallback);
    assert_eq!(body.result.distance_km, 5.0);
    assert_eq!(body.result.price, 20.0);
    assert_eq!(body.display.eta, "12 min");
}

#[tokio::test]
async fn estimate_without_dropoff_is_rejected() {
    let app = test_app();
    let payload = json!({ "pickup": "Recife", "dropoff": "  " });

    let response = app.oneshot(post_json("/api/estimate", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Informe o endereço de entrega.");
}

#[tokio::test]
async fn assistant_prefers_payment_answer() {
    let app = test_app();
    let payload = json!({ "question": "Qual o valor se eu pagar no pix?" });

    let response = app.oneshot(post_json("/api/assistant", payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: AssistantResponse = serde_json::from_slice(&bytes).unwrap();
    assert!(body.reply.starts_with("Aceitamos Pix"));
}

#[tokio::test]
async fn assistant_rejects_blank_question() {
    let app = test_app();
    let response = app
        .oneshot(post_json("/api/assistant", json!({ "question": "   " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cities_endpoint_lists_the_table() {
    let app = test_app();
    let request = Request::builder()
        .uri("/api/cities")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: Vec<CityEntry> = serde_json::from_slice(&bytes).unwrap();
    let rio = body.iter().find(|c| c.name == "rio de janeiro").unwrap();
    assert_eq!(rio.coord.lat, -22.9068);
    assert_eq!(body.len(), shared::cities::cities().count());
}

#[tokio::test]
async fn health_check() {
    let app = test_app();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
