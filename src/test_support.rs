use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::jpeg::tests::sample_jpeg;

pub(crate) fn image_json(base: &str, key: &str, lat: f64, lon: f64, ca: f64) -> Value {
    json!({
        "key": key,
        "image_url": format!("{base}/img/{key}/"),
        "lat": lat,
        "lon": lon,
        "ca": ca,
    })
}

/// Local stand-in for the search API and image host. Keys starting with
/// `missing` answer 404, keys starting with `html` answer an HTML page.
pub(crate) async fn spawn_fixture(search_body: impl FnOnce(&str) -> Value) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fixture listener");
    let base = format!("http://{}", listener.local_addr().expect("fixture addr"));
    let body = search_body(&base);

    let app = Router::new()
        .route(
            "/v1/im/search",
            get(move || {
                let body = body.clone();
                async move { Json(body) }
            }),
        )
        .route(
            "/broken-search",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route("/img/{key}/{file}", get(thumbnail));

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fixture server");
    });
    base
}

async fn thumbnail(Path((key, _file)): Path<(String, String)>) -> Result<Vec<u8>, StatusCode> {
    if key.starts_with("missing") {
        return Err(StatusCode::NOT_FOUND);
    }
    if key.starts_with("html") {
        return Ok(b"<html><body>rate limited</body></html>".to_vec());
    }
    Ok(sample_jpeg())
}
