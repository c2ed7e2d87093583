use time::macros::datetime;

use super::*;

fn test_config() -> BackendConfig {
    BackendConfig {
        base_url: "https://api.example.com".into(),
        api_key: "anon".into(),
        redirect_uri: "https://app.example.com/auth/callback".into(),
    }
}

// =============================================================================
// bytes_to_hex / generate_state_token
// =============================================================================

#[test]
fn bytes_to_hex_empty() {
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn bytes_to_hex_multi_byte() {
    assert_eq!(bytes_to_hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
}

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a]), "0a");
}

#[test]
fn state_token_is_64_hex_chars() {
    let token = generate_state_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn state_token_two_calls_differ() {
    assert_ne!(generate_state_token(), generate_state_token());
}

// =============================================================================
// authorize_url
// =============================================================================

#[test]
fn authorize_url_contains_provider() {
    let api = HttpIdentityApi::new(test_config());
    let url = api.authorize_url("google", "st");
    assert!(url.contains("provider=google"));
}

#[test]
fn authorize_url_contains_redirect() {
    let api = HttpIdentityApi::new(test_config());
    let url = api.authorize_url("google", "st");
    assert!(url.contains("redirect_to=https://app.example.com/auth/callback"));
}

#[test]
fn authorize_url_contains_state() {
    let api = HttpIdentityApi::new(test_config());
    let url = api.authorize_url("google", "csrf_abc");
    assert!(url.contains("state=csrf_abc"));
}

#[test]
fn authorize_url_starts_with_auth_endpoint() {
    let api = HttpIdentityApi::new(test_config());
    let url = api.authorize_url("google", "st");
    assert!(url.starts_with("https://api.example.com/auth/v1/authorize"));
}

// =============================================================================
// TokenResponse decoding
// =============================================================================

#[test]
fn token_response_into_session() {
    let json = serde_json::json!({
        "access_token": "at",
        "refresh_token": "rt",
        "expires_in": 3600,
        "user": {
            "id": "6f2c6a3e-0000-0000-0000-000000000001",
            "email": "ana@example.com",
            "user_metadata": { "full_name": "Ana" }
        }
    });
    let token: TokenResponse = serde_json::from_value(json).unwrap();
    let now = datetime!(2025-11-01 12:00:00 UTC);
    let session = token.into_session(now);
    assert_eq!(session.access_token, "at");
    assert_eq!(session.refresh_token, "rt");
    assert_eq!(session.expires_at, datetime!(2025-11-01 13:00:00 UTC));
    assert_eq!(session.user.name.as_deref(), Some("Ana"));
    assert_eq!(session.user.email.as_deref(), Some("ana@example.com"));
}

#[test]
fn token_response_without_metadata_has_no_name() {
    let json = serde_json::json!({
        "access_token": "at",
        "refresh_token": "rt",
        "expires_in": 60,
        "user": { "id": "6f2c6a3e-0000-0000-0000-000000000002", "email": null }
    });
    let token: TokenResponse = serde_json::from_value(json).unwrap();
    let session = token.into_session(datetime!(2025-11-01 12:00:00 UTC));
    assert!(session.user.name.is_none());
    assert!(session.user.email.is_none());
}

// =============================================================================
// Session expiry
// =============================================================================

#[test]
fn session_expiry_window() {
    let session = Session {
        access_token: "at".into(),
        refresh_token: "rt".into(),
        expires_at: datetime!(2025-11-01 13:00:00 UTC),
        user: AuthUser { id: Uuid::nil(), name: None, email: None },
    };
    assert!(!session.is_expired_at(datetime!(2025-11-01 12:59:59 UTC)));
    assert!(session.is_expired_at(datetime!(2025-11-01 13:00:00 UTC)));
}

// =============================================================================
// HTTP error mapping — loopback provider
// =============================================================================

async fn serve(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn exchange_code_maps_provider_rejection_to_auth_error() {
    use axum::http::StatusCode;
    use axum::routing::post;

    let app = axum::Router::new().route(
        "/auth/v1/token",
        post(|| async { (StatusCode::BAD_REQUEST, "invalid grant") }),
    );
    let base_url = serve(app).await;

    let api = HttpIdentityApi::new(BackendConfig {
        base_url,
        api_key: "anon".into(),
        redirect_uri: "http://localhost/auth/callback".into(),
    });
    let err = api.exchange_code("bad").await.unwrap_err();
    assert!(matches!(err, ApiError::Auth(_)));
}

#[tokio::test]
async fn exchange_code_maps_provider_outage_to_network_error() {
    use axum::http::StatusCode;
    use axum::routing::post;

    let app = axum::Router::new().route(
        "/auth/v1/token",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "upstream down") }),
    );
    let base_url = serve(app).await;

    let api = HttpIdentityApi::new(BackendConfig {
        base_url,
        api_key: "anon".into(),
        redirect_uri: "http://localhost/auth/callback".into(),
    });
    let err = api.exchange_code("good").await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn exchange_code_decodes_session() {
    use axum::routing::post;

    let app = axum::Router::new().route(
        "/auth/v1/token",
        post(|| async {
            axum::Json(serde_json::json!({
                "access_token": "at",
                "refresh_token": "rt",
                "expires_in": 3600,
                "user": {
                    "id": "6f2c6a3e-0000-0000-0000-000000000003",
                    "email": "kai@example.com",
                    "user_metadata": { "full_name": "Kai" }
                }
            }))
        }),
    );
    let base_url = serve(app).await;

    let api = HttpIdentityApi::new(BackendConfig {
        base_url,
        api_key: "anon".into(),
        redirect_uri: "http://localhost/auth/callback".into(),
    });
    let session = api.exchange_code("good").await.unwrap();
    assert_eq!(session.user.name.as_deref(), Some("Kai"));
    assert!(!session.is_expired_at(OffsetDateTime::now_utc()));
}

#[tokio::test]
async fn sign_out_succeeds_on_no_content() {
    use axum::http::StatusCode;
    use axum::routing::post;

    let app = axum::Router::new().route("/auth/v1/logout", post(|| async { StatusCode::NO_CONTENT }));
    let base_url = serve(app).await;

    let api = HttpIdentityApi::new(BackendConfig {
        base_url,
        api_key: "anon".into(),
        redirect_uri: "http://localhost/auth/callback".into(),
    });
    assert!(api.sign_out("at").await.is_ok());
}

#[tokio::test]
async fn unreachable_provider_maps_to_network_error() {
    let api = HttpIdentityApi::new(BackendConfig {
        // Port 1 is never listening.
        base_url: "http://127.0.0.1:1".into(),
        api_key: "anon".into(),
        redirect_uri: "http://localhost/auth/callback".into(),
    });
    let err = api.refresh_session("rt").await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}
