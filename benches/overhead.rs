use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::{routing::post, Router};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::net::SocketAddr;
use telegram_webhook_guard::{
    OnlyTelegramNetwork, OnlyTelegramNetworkWithSecret, TelegramGuardLayer,
};
use tower::ServiceExt;

const BENCH_SECRET: &str = "bench-secret-0123456789abcdef";

// Raw Axum webhook route, no guard
fn raw_webhook() -> Router {
    Router::new().route("/webhook", post(|| async { "ok" }))
}

// Same route behind the network allowlist
fn network_guarded_webhook() -> Router {
    Router::new()
        .route("/webhook", post(|| async { "ok" }))
        .route_layer(TelegramGuardLayer::new(OnlyTelegramNetwork::new()))
}

// Network allowlist plus the constant-time path secret
fn secret_guarded_webhook() -> Router {
    Router::new()
        .route("/webhook/{secret}", post(|| async { "ok" }))
        .route_layer(TelegramGuardLayer::new(OnlyTelegramNetworkWithSecret::new(
            BENCH_SECRET,
        )))
}

async fn make_request(router: &Router, path: &str) {
    let mut req = Request::builder()
        .method("POST")
        .uri(path)
        .body(axum::body::Body::empty())
        .unwrap();
    // Same peer a live listener would record for a Telegram caller.
    req.extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([149, 154, 160, 1], 443))));

    let _response = router.clone().oneshot(req).await.unwrap();
}

fn benchmark_network_guard(c: &mut Criterion) {
    let mut group = c.benchmark_group("network_guard");

    let raw_router = raw_webhook();
    let guarded_router = network_guarded_webhook();

    let rt = tokio::runtime::Runtime::new().unwrap();

    group.bench_function("raw_axum", |b| {
        b.iter(|| {
            rt.block_on(make_request(black_box(&raw_router), "/webhook"));
        });
    });

    group.bench_function("guarded", |b| {
        b.iter(|| {
            rt.block_on(make_request(black_box(&guarded_router), "/webhook"));
        });
    });

    group.finish();
}

fn benchmark_secret_guard(c: &mut Criterion) {
    let mut group = c.benchmark_group("secret_guard");

    let network_router = network_guarded_webhook();
    let secret_router = secret_guarded_webhook();
    let secret_path = format!("/webhook/{BENCH_SECRET}");

    let rt = tokio::runtime::Runtime::new().unwrap();

    group.bench_function("network_only", |b| {
        b.iter(|| {
            rt.block_on(make_request(black_box(&network_router), "/webhook"));
        });
    });

    group.bench_function("network_with_secret", |b| {
        b.iter(|| {
            rt.block_on(make_request(black_box(&secret_router), &secret_path));
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_network_guard, benchmark_secret_guard);
criterion_main!(benches);
