/// Example of a guarded Telegram bot webhook server
///
/// Run with: TELEGRAM_WEBHOOK_SECRET=pick-something-long cargo run --example webhook_server
use axum::{
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use telegram_webhook_guard::{OnlyTelegramNetworkWithSecret, TelegramGuardLayer};
use tracing_subscriber::EnvFilter;

async fn receive_update(Json(update): Json<serde_json::Value>) -> &'static str {
    tracing::info!(
        update_id = update.get("update_id").and_then(|v| v.as_u64()),
        "received update"
    );
    "ok"
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let secret = std::env::var("TELEGRAM_WEBHOOK_SECRET")
        .unwrap_or_else(|_| "demo-secret-change-me".to_string());

    let scheme = OnlyTelegramNetworkWithSecret::new(secret.clone());

    let app = Router::new()
        .route("/webhook/{secret}", post(receive_update))
        .route_layer(TelegramGuardLayer::new(scheme))
        // Added after the guard layer, so probes stay unauthenticated.
        .route("/health", get(|| async { "ok" }));

    println!("Webhook server listening on 0.0.0.0:8000");
    println!("Register it with: https://api.telegram.org/bot<TOKEN>/setWebhook?url=https://<public-host>/webhook/{secret}");
    println!("Requests from outside Telegram's subnets will be answered with 403.");

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
    axum::serve(
        listener,
        // Without connect info the guard cannot see peer addresses and
        // every webhook request would be rejected with a 500.
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
