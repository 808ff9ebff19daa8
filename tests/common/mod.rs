#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr};

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use chrono::{Duration, NaiveDate};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use catalog_backend::build_app;
use catalog_backend::config::AppConfig;
use catalog_backend::dtos::category::CategoryInput;
use catalog_backend::dtos::product::ProductInput;
use catalog_backend::state::AppState;

pub const JWT_SECRET: &str = "test-secret";
pub const DEV_COOKIE: &str = "dev_token=true";

pub fn test_config(allow_dev_token: bool) -> AppConfig {
    AppConfig {
        database_url: String::new(),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        jwt_secret: JWT_SECRET.to_string(),
        allow_dev_token,
        db_max_connections: 5,
    }
}

pub fn build_test_app(pool: PgPool) -> Router {
    build_app(AppState::new(pool, test_config(true)))
}

pub fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Today as the database sees it, i.e. what `CURRENT_DATE` filters compare with.
pub async fn db_today(pool: &PgPool) -> NaiveDate {
    sqlx::query_scalar("SELECT CURRENT_DATE")
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn days_after(day: NaiveDate, days: i64) -> NaiveDate {
    day + Duration::days(days)
}

pub fn product(name: &str, code: &str, price: f64) -> ProductInput {
    ProductInput {
        name: Some(name.to_string()),
        slug: Some(code.to_lowercase()),
        code: Some(code.to_string()),
        price: Some(price),
        ..Default::default()
    }
}

pub fn category(name: &str, slug: &str, parent_id: Option<i64>) -> CategoryInput {
    CategoryInput {
        name: Some(name.to_string()),
        slug: Some(slug.to_string()),
        parent_id: parent_id.map(Some),
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(header::COOKIE, DEV_COOKIE)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::delete(uri)
        .header(header::COOKIE, DEV_COOKIE)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, "POST", uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, "PUT", uri, body).await
}

async fn json_request(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, DEV_COOKIE)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
