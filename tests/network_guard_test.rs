use axum::{
    routing::{get, post},
    Extension, Router,
};
use telegram_webhook_guard::{testing, Guarded, OnlyTelegramNetwork, TelegramGuardLayer};

fn guarded_app() -> Router {
    Router::new()
        .route("/webhook", post(|| async { "handled" }))
        .route_layer(TelegramGuardLayer::new(OnlyTelegramNetwork::new()))
}

#[tokio::test]
async fn test_telegram_peer_reaches_handler() {
    let body = testing::post(guarded_app(), "/webhook")
        .peer_ip("149.154.160.1")
        .execute()
        .await
        .assert_ok()
        .body_string()
        .await;

    assert_eq!(body, "handled");
}

#[tokio::test]
async fn test_both_published_subnets_are_allowed() {
    testing::post(guarded_app(), "/webhook")
        .peer_ip("149.154.167.99")
        .execute()
        .await
        .assert_ok();

    testing::post(guarded_app(), "/webhook")
        .peer_ip("91.108.4.7")
        .execute()
        .await
        .assert_ok();
}

#[tokio::test]
async fn test_outside_peer_is_forbidden_with_exact_body() {
    let body = testing::post(guarded_app(), "/webhook")
        .peer_ip("8.8.8.8")
        .execute()
        .await
        .assert_forbidden()
        .body_string()
        .await;

    // Callers outside the allowlist get this literal body and nothing
    // else - no JSON framing, no address echo.
    assert_eq!(body, "Bad IP address");
}

#[tokio::test]
async fn test_missing_connect_info_is_server_error() {
    // No peer injected: the router was served without the connect-info
    // make-service. The guard treats that as our misconfiguration, not
    // the caller's fault.
    testing::post(guarded_app(), "/webhook")
        .execute()
        .await
        .assert_server_error();
}

#[tokio::test]
async fn test_ipv6_peer_is_server_error() {
    // An IPv6 listener cannot be matched against the IPv4 allowlist,
    // so the guard refuses to guess and reports a deployment problem.
    testing::post(guarded_app(), "/webhook")
        .peer_ip("2001:db8::1")
        .execute()
        .await
        .assert_server_error();
}

#[tokio::test]
async fn test_custom_networks_replace_defaults() {
    let scheme = OnlyTelegramNetwork::with_networks(vec!["10.0.0.0/8".parse().unwrap()]);
    let app = Router::new()
        .route("/webhook", post(|| async { "handled" }))
        .route_layer(TelegramGuardLayer::new(scheme));

    testing::post(app.clone(), "/webhook")
        .peer_ip("10.1.2.3")
        .execute()
        .await
        .assert_ok();

    // Telegram's own subnets are no longer allowed once replaced.
    testing::post(app, "/webhook")
        .peer_ip("149.154.160.1")
        .execute()
        .await
        .assert_forbidden();
}

#[tokio::test]
async fn test_route_layer_scopes_guard_to_earlier_routes() {
    let app = Router::new()
        .route("/webhook", post(|| async { "handled" }))
        .route_layer(TelegramGuardLayer::new(OnlyTelegramNetwork::new()))
        .route("/health", get(|| async { "ok" }));

    // The health route was added after the layer and stays open.
    let body = testing::get(app.clone(), "/health")
        .peer_ip("8.8.8.8")
        .execute()
        .await
        .assert_ok()
        .body_string()
        .await;
    assert_eq!(body, "ok");

    testing::post(app, "/webhook")
        .peer_ip("8.8.8.8")
        .execute()
        .await
        .assert_forbidden();
}

#[tokio::test]
async fn test_extractor_yields_validated_peer() {
    async fn peer_echo(guard: Guarded<OnlyTelegramNetwork>) -> String {
        guard.peer().to_string()
    }

    let app = Router::new()
        .route("/webhook", post(peer_echo))
        .layer(Extension(OnlyTelegramNetwork::new()));

    let body = testing::post(app, "/webhook")
        .peer_ip("91.108.4.7")
        .execute()
        .await
        .assert_ok()
        .body_string()
        .await;

    assert_eq!(body, "91.108.4.7");
}

#[tokio::test]
async fn test_extractor_rejects_like_the_layer() {
    async fn peer_echo(guard: Guarded<OnlyTelegramNetwork>) -> String {
        guard.peer().to_string()
    }

    let app = Router::new()
        .route("/webhook", post(peer_echo))
        .layer(Extension(OnlyTelegramNetwork::new()));

    let body = testing::post(app.clone(), "/webhook")
        .peer_ip("203.0.113.9")
        .execute()
        .await
        .assert_forbidden()
        .body_string()
        .await;
    assert_eq!(body, "Bad IP address");

    testing::post(app, "/webhook")
        .execute()
        .await
        .assert_server_error();
}

#[tokio::test]
async fn test_extractor_without_registered_scheme_is_server_error() {
    async fn peer_echo(guard: Guarded<OnlyTelegramNetwork>) -> String {
        guard.peer().to_string()
    }

    // No Extension layer: the handler asks for a guard nobody
    // registered. Telegram's own address still gets a 500 because the
    // failure is ours.
    let app = Router::new().route("/webhook", post(peer_echo));

    testing::post(app, "/webhook")
        .peer_ip("149.154.160.1")
        .execute()
        .await
        .assert_server_error();
}
